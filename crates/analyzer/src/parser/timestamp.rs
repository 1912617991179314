//! Timestamp discovery and parsing.
//!
//! Two separate steps: [`find_timestamp`] locates a timestamp-shaped substring
//! anywhere in a line, [`TimestampParser::parse`] turns a candidate string into
//! an instant. Both are pure; the compiled shapes are immutable statics so no
//! match state survives between calls.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

/// Shapes tried in order; the first that matches anywhere in the line wins.
static TIMESTAMP_SHAPES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // 2023-10-05 08:23:45
        r"\d{4}-\d{2}-\d{2}\s+\d{2}:\d{2}:\d{2}",
        // Oct  5 08:23:45
        r"\w{3}\s+\d{1,2}\s+\d{2}:\d{2}:\d{2}",
        // 10/5/2023 08:23:45
        r"\d{1,2}/\d{1,2}/\d{4}\s+\d{2}:\d{2}:\d{2}",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("timestamp shape pattern is valid"))
    .collect()
});

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d/%b/%Y:%H:%M:%S",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Locate the first timestamp-shaped substring in `line`.
pub fn find_timestamp(line: &str) -> Option<&str> {
    TIMESTAMP_SHAPES
        .iter()
        .find_map(|shape| shape.find(line))
        .map(|m| m.as_str())
}

/// Lenient date parser shared by all log formats.
///
/// Values without an offset are read as UTC wall-clock time. Syslog stamps
/// carry no year, so `syslog_year` fills it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampParser {
    syslog_year: i32,
}

impl TimestampParser {
    pub fn new(syslog_year: i32) -> Self {
        Self { syslog_year }
    }

    pub fn syslog_year(&self) -> i32 {
        self.syslog_year
    }

    pub fn parse(&self, raw: &str) -> Option<DateTime<Utc>> {
        let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(&text) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(&text) {
            return Some(dt.with_timezone(&Utc));
        }

        for format in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(&text, format) {
                return Some(dt.with_timezone(&Utc));
            }
        }

        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(&text, format) {
                return Some(Utc.from_utc_datetime(&naive));
            }
        }

        for format in NAIVE_DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(&text, format) {
                return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
            }
        }

        self.parse_syslog(&text).or_else(|| parse_epoch(&text))
    }

    fn parse_syslog(&self, text: &str) -> Option<DateTime<Utc>> {
        let with_year = format!("{} {}", self.syslog_year, text);
        NaiveDateTime::parse_from_str(&with_year, "%Y %b %d %H:%M:%S")
            .ok()
            .map(|naive| Utc.from_utc_datetime(&naive))
    }
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self::new(Utc::now().year())
    }
}

/// Unix epoch seconds, or milliseconds when the value is too large to be seconds
fn parse_epoch(text: &str) -> Option<DateTime<Utc>> {
    if text.len() < 10 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let value: i64 = text.parse().ok()?;
    if value > 1_000_000_000_000 {
        DateTime::from_timestamp_millis(value)
    } else {
        DateTime::from_timestamp(value, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_find_iso_shape_inside_line() {
        let line = "router1 2023-10-05 08:23:45 src-ip=10.0.0.1";
        assert_eq!(find_timestamp(line), Some("2023-10-05 08:23:45"));
    }

    #[test]
    fn test_find_syslog_shape() {
        let line = "Oct  5 08:23:45 firewall,info forward: proto=TCP";
        assert_eq!(find_timestamp(line), Some("Oct  5 08:23:45"));
    }

    #[test]
    fn test_find_us_shape() {
        let line = "10/5/2023 08:23:45 src-ip=10.0.0.1";
        assert_eq!(find_timestamp(line), Some("10/5/2023 08:23:45"));
    }

    #[test]
    fn test_find_prefers_iso_over_later_shapes() {
        let line = "Oct  5 08:23:45 logged 2023-10-06 09:00:00";
        assert_eq!(find_timestamp(line), Some("2023-10-06 09:00:00"));
    }

    #[test]
    fn test_find_nothing() {
        assert_eq!(find_timestamp("src-ip=10.0.0.1 bytes=15"), None);
    }

    #[test]
    fn test_parse_common_formats() {
        let parser = TimestampParser::new(2023);
        let expected = utc(2023, 10, 5, 8, 23, 45);

        let cases = vec![
            "2023-10-05 08:23:45",
            "2023-10-05   08:23:45",
            "2023-10-05T08:23:45",
            "2023-10-05T08:23:45Z",
            "2023-10-05T10:23:45+02:00",
            "2023-10-05 10:23:45+02:00",
            "2023/10/05 08:23:45",
            "10/5/2023 08:23:45",
            "Oct 5 08:23:45",
            "Oct  5 08:23:45",
            "Thu, 05 Oct 2023 08:23:45 +0000",
            "05/Oct/2023:08:23:45",
            "1696494225",
            "1696494225000",
        ];

        for case in cases {
            assert_eq!(parser.parse(case), Some(expected), "parsing {:?}", case);
        }
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let parser = TimestampParser::new(2023);
        let parsed = parser.parse("2023-10-05 08:23:45.250").unwrap();
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        let parser = TimestampParser::new(2023);
        assert_eq!(parser.parse("2023-10-05"), Some(utc(2023, 10, 5, 0, 0, 0)));
    }

    #[test]
    fn test_syslog_uses_configured_year() {
        let parser = TimestampParser::new(2019);
        assert_eq!(parser.parse("Mar 14 01:02:03"), Some(utc(2019, 3, 14, 1, 2, 3)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let parser = TimestampParser::new(2023);
        for case in ["", "   ", "yesterday", "2023-13-45 99:99:99", "12345", "src-ip"] {
            assert_eq!(parser.parse(case), None, "parsing {:?}", case);
        }
    }
}
