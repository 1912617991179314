use std::sync::LazyLock;

use regex::Regex;

use crate::parser::model::RecordBuilder;
use crate::parser::normalize::normalize_key;
use crate::parser::timestamp::{find_timestamp, TimestampParser};
use crate::parser::traits::*;

/// `key=value` or `key="quoted value"`; no escape sequences inside quotes.
static KV_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z0-9_-]+)=([^"\s]+|"[^"]*")"#).expect("key/value pattern is valid")
});

pub struct KeyValueDetector;

impl FormatDetector for KeyValueDetector {
    fn matches(&self, sample: &str) -> bool {
        sample.contains('=')
    }

    fn format(&self) -> LogFormat {
        LogFormat::KeyValue
    }
}

/// Parser for RouterOS-style lines such as
/// `2023-10-05 08:23:45 firewall,info src-ip=10.0.0.1 dst-ip=8.8.8.8 proto=tcp bytes=1500`.
///
/// The timestamp is searched for anywhere in the line since most producers
/// print it before the `key=value` section. A line only yields a record when a
/// timestamp could be resolved.
pub struct KeyValueParser {
    timestamps: TimestampParser,
}

impl KeyValueParser {
    pub fn new(timestamps: TimestampParser) -> Self {
        Self { timestamps }
    }
}

impl LogParser for KeyValueParser {
    fn parse_line(&self, line: &str) -> Result<TrafficRecord, LineError> {
        let mut builder = RecordBuilder::default();

        if let Some(stamp) = find_timestamp(line) {
            builder.timestamp = self.timestamps.parse(stamp);
        }

        for (key, value) in key_value_pairs(line) {
            builder.assign(normalize_key(key), value, &self.timestamps);
        }

        builder.build()
    }

    fn format(&self) -> LogFormat {
        LogFormat::KeyValue
    }
}

/// Iterate the `key=value` tokens of a line, with surrounding quotes removed.
pub fn key_value_pairs(line: &str) -> impl Iterator<Item = (&str, &str)> + '_ {
    KV_PATTERN.captures_iter(line).filter_map(|caps| {
        let key = caps.get(1)?.as_str();
        let value = caps.get(2)?.as_str();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        Some((key, value))
    })
}
