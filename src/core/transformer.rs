use crate::core::{ConfigProvider, FieldNames, FlowLogFields, TransformedEvent};
use crate::utils::error::TransformError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// 將 flow log 欄位轉換為 Splunk HEC 事件
#[derive(Debug, Clone)]
pub struct HecTransformer {
    source: String,
    sourcetype: String,
    host: Option<String>,
    index: Option<String>,
    names: FieldNames,
    max_record_bytes: usize,
}

impl HecTransformer {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            source: config.source().to_string(),
            sourcetype: config.sourcetype().to_string(),
            host: config.host().map(str::to_string),
            index: config.index().map(str::to_string),
            names: config.field_names().clone(),
            max_record_bytes: config.max_record_bytes(),
        }
    }

    pub fn transform(&self, fields: &FlowLogFields) -> Result<TransformedEvent, TransformError> {
        let names = &self.names;
        let mut event = Map::new();

        event.insert(names.version.clone(), Value::from(fields.version));
        event.insert(names.account_id.clone(), Value::from(fields.account_id.as_str()));
        event.insert(names.interface_id.clone(), Value::from(fields.interface_id.as_str()));
        event.insert(names.src_addr.clone(), Value::from(fields.src_addr.to_string()));
        event.insert(names.dst_addr.clone(), Value::from(fields.dst_addr.to_string()));
        event.insert(names.src_port.clone(), Value::from(fields.src_port));
        event.insert(names.dst_port.clone(), Value::from(fields.dst_port));
        event.insert(names.protocol.clone(), Value::from(fields.protocol));
        event.insert(names.packets.clone(), Value::from(fields.packets));
        event.insert(names.bytes.clone(), Value::from(fields.bytes));
        event.insert(names.start.clone(), Value::from(rfc3339(fields.start)?));
        event.insert(names.end.clone(), Value::from(rfc3339(fields.end)?));
        event.insert(names.action.clone(), Value::from(fields.action.as_str()));
        event.insert(names.log_status.clone(), Value::from(fields.log_status.as_str()));
        event.insert(
            names.duration.clone(),
            Value::from(fields.end.saturating_sub(fields.start)),
        );
        if let Some(transport) = transport_name(fields.protocol) {
            event.insert(names.transport.clone(), Value::from(transport));
        }

        Ok(TransformedEvent {
            time: epoch_seconds(fields.start)?,
            host: self.host.clone(),
            source: self.source.clone(),
            sourcetype: self.sourcetype.clone(),
            index: self.index.clone(),
            event,
        })
    }

    /// 序列化為單行 JSON (以換行結尾)，超過上限時回傳錯誤而不截斷
    pub fn encode(&self, event: &TransformedEvent) -> Result<Vec<u8>, TransformError> {
        let mut payload =
            serde_json::to_vec(event).map_err(|e| TransformError::Serialization(e.to_string()))?;
        payload.push(b'\n');

        if payload.len() > self.max_record_bytes {
            return Err(TransformError::RecordTooLarge {
                size: payload.len(),
                limit: self.max_record_bytes,
            });
        }

        Ok(payload)
    }
}

fn epoch_seconds(secs: u64) -> Result<i64, TransformError> {
    i64::try_from(secs).map_err(|_| TransformError::InvalidTimestamp(secs))
}

fn rfc3339(secs: u64) -> Result<String, TransformError> {
    let timestamp: DateTime<Utc> = DateTime::from_timestamp(epoch_seconds(secs)?, 0)
        .ok_or(TransformError::InvalidTimestamp(secs))?;
    Ok(timestamp.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn transport_name(protocol: u8) -> Option<&'static str> {
    match protocol {
        1 => Some("icmp"),
        6 => Some("tcp"),
        17 => Some("udp"),
        58 => Some("icmpv6"),
        _ => None,
    }
}
