use crate::utils::error::{FlowLogError, Result};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Firehose 資料轉換事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirehoseRequest {
    #[serde(default)]
    pub invocation_id: Option<String>,
    #[serde(default)]
    pub delivery_stream_arn: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    pub records: Vec<InputRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputRecord {
    pub record_id: String,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximate_arrival_timestamp: Option<i64>,
}

impl FirehoseRequest {
    /// recordId 不做任何檢查，原樣回傳
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| FlowLogError::BatchStructureError {
            message: e.to_string(),
        })
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| FlowLogError::BatchStructureError {
            message: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordResult {
    Ok,
    Dropped,
    ProcessingFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub record_id: String,
    pub result: RecordResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Operator diagnostics only, never sent back to the delivery stream.
    #[serde(skip)]
    pub cause: Option<String>,
}

impl OutputRecord {
    pub fn ok(record_id: &str, data: String) -> Self {
        Self {
            record_id: record_id.to_string(),
            result: RecordResult::Ok,
            data: Some(data),
            cause: None,
        }
    }

    pub fn dropped(record_id: &str, cause: impl Into<String>) -> Self {
        Self {
            record_id: record_id.to_string(),
            result: RecordResult::Dropped,
            data: None,
            cause: Some(cause.into()),
        }
    }

    pub fn failed(record_id: &str, cause: impl Into<String>) -> Self {
        Self {
            record_id: record_id.to_string(),
            result: RecordResult::ProcessingFailed,
            data: None,
            cause: Some(cause.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirehoseResponse {
    pub records: Vec<OutputRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlowAction {
    Accept,
    Reject,
}

impl FlowAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowAction::Accept => "ACCEPT",
            FlowAction::Reject => "REJECT",
        }
    }
}

/// VPC flow log version 2 預設格式的一行記錄
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowLogFields {
    pub version: u8,
    pub account_id: String,
    pub interface_id: String,
    pub src_addr: IpAddr,
    pub dst_addr: IpAddr,
    pub src_port: u16,
    pub dst_port: u16,
    pub protocol: u8,
    pub packets: u64,
    pub bytes: u64,
    pub start: u64,
    pub end: u64,
    pub action: FlowAction,
    pub log_status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Blank,
    Header,
    NoData,
    SkipData,
}

impl SkipReason {
    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::Blank => "blank line",
            SkipReason::Header => "flow log header line",
            SkipReason::NoData => "NODATA: no traffic during the capture window",
            SkipReason::SkipData => "SKIPDATA: records skipped during the capture window",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Flow(FlowLogFields),
    Skip(SkipReason),
}

/// HEC event envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedEvent {
    pub time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub source: String,
    pub sourcetype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    pub event: serde_json::Map<String, serde_json::Value>,
}

/// 目的端的欄位命名，可由設定覆蓋
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldNames {
    pub version: String,
    pub account_id: String,
    pub interface_id: String,
    pub src_addr: String,
    pub dst_addr: String,
    pub src_port: String,
    pub dst_port: String,
    pub protocol: String,
    pub packets: String,
    pub bytes: String,
    pub start: String,
    pub end: String,
    pub action: String,
    pub log_status: String,
    pub duration: String,
    pub transport: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            version: "version".to_string(),
            account_id: "account_id".to_string(),
            interface_id: "interface_id".to_string(),
            src_addr: "src_ip".to_string(),
            dst_addr: "dest_ip".to_string(),
            src_port: "src_port".to_string(),
            dst_port: "dest_port".to_string(),
            protocol: "protocol".to_string(),
            packets: "packets".to_string(),
            bytes: "bytes".to_string(),
            start: "start_time".to_string(),
            end: "end_time".to_string(),
            action: "action".to_string(),
            log_status: "log_status".to_string(),
            duration: "duration".to_string(),
            transport: "transport".to_string(),
        }
    }
}

impl FieldNames {
    pub fn entries(&self) -> [(&'static str, &str); 16] {
        [
            ("version", self.version.as_str()),
            ("account_id", self.account_id.as_str()),
            ("interface_id", self.interface_id.as_str()),
            ("src_addr", self.src_addr.as_str()),
            ("dst_addr", self.dst_addr.as_str()),
            ("src_port", self.src_port.as_str()),
            ("dst_port", self.dst_port.as_str()),
            ("protocol", self.protocol.as_str()),
            ("packets", self.packets.as_str()),
            ("bytes", self.bytes.as_str()),
            ("start", self.start.as_str()),
            ("end", self.end.as_str()),
            ("action", self.action.as_str()),
            ("log_status", self.log_status.as_str()),
            ("duration", self.duration.as_str()),
            ("transport", self.transport.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_firehose_request() {
        let body = br#"{
            "invocationId": "827b170e-77e5-4627-bfb4-dd48e308a997",
            "deliveryStreamArn": "arn:aws:firehose:us-east-1:123456789012:deliverystream/VPCFlowLogs",
            "region": "us-east-1",
            "records": [
                {"recordId": "a", "approximateArrivalTimestamp": 1643160814345, "data": "eyJ9"},
                {"recordId": "b", "data": ""}
            ]
        }"#;

        let request = FirehoseRequest::from_slice(body).unwrap();
        assert_eq!(request.records.len(), 2);
        assert_eq!(request.records[0].record_id, "a");
        assert_eq!(request.records[0].approximate_arrival_timestamp, Some(1643160814345));
        assert_eq!(request.region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn test_request_without_records_is_malformed() {
        let err = FirehoseRequest::from_slice(br#"{"invocationId": "x"}"#).unwrap_err();
        assert!(matches!(err, FlowLogError::BatchStructureError { .. }));

        let err = FirehoseRequest::from_slice(br#"{"records": {"recordId": "a"}}"#).unwrap_err();
        assert!(matches!(err, FlowLogError::BatchStructureError { .. }));

        let err = FirehoseRequest::from_slice(br#"{"records": [{"data": "eyJ9"}]}"#).unwrap_err();
        assert!(matches!(err, FlowLogError::BatchStructureError { .. }));
    }

    #[test]
    fn test_record_ids_are_not_interpreted() {
        let value = serde_json::json!({
            "records": [
                {"recordId": "same", "data": ""},
                {"recordId": "same", "data": ""},
                {"recordId": "", "data": ""}
            ]
        });
        let request = FirehoseRequest::from_value(value).unwrap();
        let ids: Vec<&str> = request.records.iter().map(|r| r.record_id.as_str()).collect();
        assert_eq!(ids, vec!["same", "same", ""]);
    }

    #[test]
    fn test_output_record_wire_format() {
        let ok = serde_json::to_value(OutputRecord::ok("r1", "aGk=".to_string())).unwrap();
        assert_eq!(
            ok,
            serde_json::json!({"recordId": "r1", "result": "Ok", "data": "aGk="})
        );

        let failed = serde_json::to_value(OutputRecord::failed("r2", "bad")).unwrap();
        assert_eq!(
            failed,
            serde_json::json!({"recordId": "r2", "result": "ProcessingFailed"})
        );

        let dropped = serde_json::to_value(OutputRecord::dropped("r3", "nodata")).unwrap();
        assert_eq!(dropped["result"], "Dropped");
    }

    #[test]
    fn test_field_names_partial_override() {
        let names: FieldNames = toml::from_str(r#"src_addr = "source_address""#).unwrap();
        assert_eq!(names.src_addr, "source_address");
        assert_eq!(names.dst_addr, "dest_ip");
    }
}
