use crate::core::{Decoded, FlowAction, FlowLogFields, SkipReason};
use crate::utils::error::DecodeError;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use std::str::FromStr;

/// version 2 預設格式的欄位數
pub const V2_FIELD_COUNT: usize = 14;

const V2_FIELDS: [&str; V2_FIELD_COUNT] = [
    "version",
    "account-id",
    "interface-id",
    "srcaddr",
    "dstaddr",
    "srcport",
    "dstport",
    "protocol",
    "packets",
    "bytes",
    "start",
    "end",
    "action",
    "log-status",
];

/// CloudWatch Logs 訂閱送進 Firehose 的外層 JSON
#[derive(Deserialize)]
struct CloudWatchMessage {
    message: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlowLogDecoder;

impl FlowLogDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(&self, data: &str) -> Result<Decoded, DecodeError> {
        let bytes = STANDARD
            .decode(data.trim())
            .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
        let line = Self::extract_line(&bytes)?;
        self.parse_line(&line)
    }

    fn extract_line(bytes: &[u8]) -> Result<String, DecodeError> {
        let text = std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;

        if text.trim_start().starts_with('{') {
            let envelope: CloudWatchMessage = serde_json::from_str(text)
                .map_err(|e| DecodeError::InvalidEnvelope(e.to_string()))?;
            return Ok(envelope.message);
        }

        Ok(text.to_string())
    }

    pub fn parse_line(&self, line: &str) -> Result<Decoded, DecodeError> {
        let tokens: Vec<&str> = line.split_ascii_whitespace().collect();

        let version = match tokens.first() {
            None => return Ok(Decoded::Skip(SkipReason::Blank)),
            Some(&"version") => return Ok(Decoded::Skip(SkipReason::Header)),
            Some(version) => *version,
        };

        if version != "2" {
            return Err(DecodeError::UnsupportedVersion(version.to_string()));
        }

        if tokens.len() != V2_FIELD_COUNT {
            return Err(DecodeError::FieldCount {
                expected: V2_FIELD_COUNT,
                found: tokens.len(),
            });
        }

        // NODATA / SKIPDATA 的其他欄位都是 "-"，不做型別檢查
        match tokens[13] {
            "NODATA" => return Ok(Decoded::Skip(SkipReason::NoData)),
            "SKIPDATA" => return Ok(Decoded::Skip(SkipReason::SkipData)),
            "OK" => {}
            other => {
                return Err(DecodeError::InvalidField {
                    field: V2_FIELDS[13],
                    value: other.to_string(),
                    reason: "expected OK, NODATA or SKIPDATA".to_string(),
                })
            }
        }

        let fields = FlowLogFields {
            version: parse_field(0, version)?,
            account_id: parse_account_id(tokens[1])?,
            interface_id: parse_identifier(2, tokens[2])?,
            src_addr: parse_field(3, tokens[3])?,
            dst_addr: parse_field(4, tokens[4])?,
            src_port: parse_field(5, tokens[5])?,
            dst_port: parse_field(6, tokens[6])?,
            protocol: parse_field(7, tokens[7])?,
            packets: parse_field(8, tokens[8])?,
            bytes: parse_field(9, tokens[9])?,
            start: parse_field(10, tokens[10])?,
            end: parse_field(11, tokens[11])?,
            action: parse_action(tokens[12])?,
            log_status: tokens[13].to_string(),
        };

        if fields.end < fields.start {
            return Err(DecodeError::InvalidField {
                field: V2_FIELDS[11],
                value: tokens[11].to_string(),
                reason: format!("end precedes start {}", fields.start),
            });
        }

        Ok(Decoded::Flow(fields))
    }
}

fn parse_field<T>(position: usize, value: &str) -> Result<T, DecodeError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| DecodeError::InvalidField {
        field: V2_FIELDS[position],
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_account_id(value: &str) -> Result<String, DecodeError> {
    // 跨帳號的流量可能出現 "unknown"
    if value == "unknown" || (!value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())) {
        return Ok(value.to_string());
    }
    Err(DecodeError::InvalidField {
        field: V2_FIELDS[1],
        value: value.to_string(),
        reason: "expected a numeric AWS account id".to_string(),
    })
}

fn parse_identifier(position: usize, value: &str) -> Result<String, DecodeError> {
    if value == "-" {
        return Err(DecodeError::InvalidField {
            field: V2_FIELDS[position],
            value: value.to_string(),
            reason: "value is missing".to_string(),
        });
    }
    Ok(value.to_string())
}

fn parse_action(value: &str) -> Result<FlowAction, DecodeError> {
    match value {
        "ACCEPT" => Ok(FlowAction::Accept),
        "REJECT" => Ok(FlowAction::Reject),
        other => Err(DecodeError::InvalidField {
            field: V2_FIELDS[12],
            value: other.to_string(),
            reason: "expected ACCEPT or REJECT".to_string(),
        }),
    }
}
