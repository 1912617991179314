use serde::Serialize;

use super::model::{LineError, LogFormat};

/// Skip counters by cause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipMetrics {
    pub missing_timestamp: u64,
    pub too_few_tokens: u64,
    pub row_shape_mismatch: u64,
    pub line_too_large: u64,
}

impl SkipMetrics {
    pub fn total(&self) -> u64 {
        self.missing_timestamp + self.too_few_tokens + self.row_shape_mismatch + self.line_too_large
    }
}

/// Diagnostics for one parse call.
///
/// Lines that fail to parse are dropped on purpose; this is the only place
/// the drop is visible. Built fresh per call and owned by the caller, so
/// nothing is shared between concurrent analyses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseMetrics {
    /// Format chosen by detection, `None` when the input had no content lines
    pub format: Option<LogFormat>,
    /// Non-blank, non-comment lines handed to the parser (CSV header excluded)
    pub lines_examined: u64,
    pub records_parsed: u64,
    pub skipped: SkipMetrics,
}

impl ParseMetrics {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format: Some(format),
            ..Self::default()
        }
    }

    #[inline]
    pub fn record_parse(&mut self) {
        self.lines_examined += 1;
        self.records_parsed += 1;
    }

    #[inline]
    pub fn record_skip(&mut self, error: &LineError) {
        self.lines_examined += 1;
        match error {
            LineError::MissingTimestamp => self.skipped.missing_timestamp += 1,
            LineError::TooFewTokens(..) => self.skipped.too_few_tokens += 1,
            LineError::RowShapeMismatch { .. } => self.skipped.row_shape_mismatch += 1,
            LineError::LineTooLarge(..) => self.skipped.line_too_large += 1,
        }
    }

    pub fn lines_skipped(&self) -> u64 {
        self.skipped.total()
    }

    /// Share of examined lines that produced a record (0.0 when nothing was examined)
    pub fn success_rate(&self) -> f64 {
        if self.lines_examined == 0 {
            return 0.0;
        }
        self.records_parsed as f64 / self.lines_examined as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_by_cause() {
        let mut metrics = ParseMetrics::new(LogFormat::Csv);
        metrics.record_parse();
        metrics.record_parse();
        metrics.record_skip(&LineError::MissingTimestamp);
        metrics.record_skip(&LineError::RowShapeMismatch { expected: 3, found: 4 });
        metrics.record_skip(&LineError::RowShapeMismatch { expected: 3, found: 2 });
        metrics.record_skip(&LineError::TooFewTokens(1, 3));
        metrics.record_skip(&LineError::LineTooLarge(10, 5));

        assert_eq!(metrics.format, Some(LogFormat::Csv));
        assert_eq!(metrics.lines_examined, 7);
        assert_eq!(metrics.records_parsed, 2);
        assert_eq!(metrics.skipped.missing_timestamp, 1);
        assert_eq!(metrics.skipped.row_shape_mismatch, 2);
        assert_eq!(metrics.skipped.too_few_tokens, 1);
        assert_eq!(metrics.skipped.line_too_large, 1);
        assert_eq!(metrics.lines_skipped(), 5);
        assert_eq!(metrics.lines_examined, metrics.records_parsed + metrics.lines_skipped());
    }

    #[test]
    fn test_success_rate() {
        let empty = ParseMetrics::default();
        assert_eq!(empty.success_rate(), 0.0);
        assert_eq!(empty.format, None);

        let mut metrics = ParseMetrics::new(LogFormat::KeyValue);
        metrics.record_parse();
        metrics.record_skip(&LineError::MissingTimestamp);
        assert!((metrics.success_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serializes_snapshot() {
        let mut metrics = ParseMetrics::new(LogFormat::SpaceDelimited);
        metrics.record_skip(&LineError::TooFewTokens(2, 3));

        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["format"], "space_delimited");
        assert_eq!(json["skipped"]["too_few_tokens"], 1);
    }
}
