use thiserror::Error;
use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use super::serde_utils::{serialize_fields_as_map, deserialize_fields_from_map};
use super::normalize::CanonicalField;
use super::timestamp::TimestampParser;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// `key=value` pairs with an embedded timestamp (RouterOS firewall logs)
    KeyValue,
    /// Comma separated rows with a header line
    Csv,
    /// Whitespace separated `timestamp key value ...` lines
    SpaceDelimited,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::KeyValue => "key_value",
            LogFormat::Csv => "csv",
            LogFormat::SpaceDelimited => "space_delimited",
        }
    }
}

/// Why a single line did not produce a record.
///
/// These never escape the parser: the driver loop counts them and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("No parseable timestamp")]
    MissingTimestamp,

    #[error("Too few tokens: {0} (min: {1})")]
    TooFewTokens(usize, usize),

    #[error("Column count mismatch: expected {expected}, found {found}")]
    RowShapeMismatch { expected: usize, found: usize },

    #[error("Line too large: {0} bytes (max: {1} bytes)")]
    LineTooLarge(usize, usize),
}

/// A traffic log entry normalized to the canonical field set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficRecord {
    pub timestamp: DateTime<Utc>,

    pub src_ip: Option<String>,

    pub dst_ip: Option<String>,

    /// Free-form protocol token as it appeared in the log (`tcp`, `udp`, `icmp`, ...)
    pub protocol: Option<String>,

    pub src_port: Option<u32>,

    pub dst_port: Option<u32>,

    pub bytes: Option<u64>,

    /// Keys that did not map onto a canonical field, in input order.
    /// Serialized as a JSON object so callers can still display them.
    #[serde(
        default,
        serialize_with = "serialize_fields_as_map",
        deserialize_with = "deserialize_fields_from_map"
    )]
    pub fields: Vec<(String, String)>,
}

impl TrafficRecord {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            src_ip: None,
            dst_ip: None,
            protocol: None,
            src_port: None,
            dst_port: None,
            bytes: None,
            fields: Vec::new(),
        }
    }

    /// Look up an extra (non-canonical) field by its normalized key
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Accumulates canonical fields while a line is being tokenized.
///
/// Parsers learn the timestamp at different points (before, during or after
/// the key/value pass), so fields are gathered here and the record is only
/// materialised once a timestamp is known.
#[derive(Debug, Default)]
pub(crate) struct RecordBuilder {
    pub timestamp: Option<DateTime<Utc>>,
    pub src_ip: Option<String>,
    pub dst_ip: Option<String>,
    pub protocol: Option<String>,
    pub src_port: Option<u32>,
    pub dst_port: Option<u32>,
    pub bytes: Option<u64>,
    pub fields: Vec<(String, String)>,
}

impl RecordBuilder {
    pub fn build(self) -> Result<TrafficRecord, LineError> {
        let timestamp = self.timestamp.ok_or(LineError::MissingTimestamp)?;
        Ok(TrafficRecord {
            timestamp,
            src_ip: self.src_ip,
            dst_ip: self.dst_ip,
            protocol: self.protocol,
            src_port: self.src_port,
            dst_port: self.dst_port,
            bytes: self.bytes,
            fields: self.fields,
        })
    }
}

impl RecordBuilder {
    /// Store one normalized key/value pair on the matching canonical field.
    ///
    /// Empty values are treated as "not reported". Numeric fields that fail to
    /// parse are left absent rather than defaulting to zero. A timestamp value
    /// only fills the slot if no timestamp has been found yet.
    pub fn assign(&mut self, key: String, value: &str, timestamps: &TimestampParser) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }

        match CanonicalField::from_key(&key) {
            CanonicalField::Timestamp => {
                if self.timestamp.is_none() {
                    self.timestamp = timestamps.parse(value);
                }
            }
            CanonicalField::SrcIp => self.src_ip = Some(value.to_string()),
            CanonicalField::DstIp => self.dst_ip = Some(value.to_string()),
            CanonicalField::Protocol => self.protocol = Some(value.to_string()),
            CanonicalField::SrcPort => self.src_port = value.parse().ok(),
            CanonicalField::DstPort => self.dst_port = value.parse().ok(),
            CanonicalField::Bytes => self.bytes = value.parse().ok(),
            CanonicalField::Other => self.fields.push((key, value.to_string())),
        }
    }
}
