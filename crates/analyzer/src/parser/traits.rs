pub use super::model::{LineError, LogFormat, TrafficRecord};

pub trait FormatDetector: Send + Sync {
    /// whether the sample line looks like this detector's format
    fn matches(&self, sample: &str) -> bool;
    fn format(&self) -> LogFormat;
}

pub trait LogParser: Send + Sync {
    /// parse one pre-filtered, trimmed line into a canonical record
    fn parse_line(&self, line: &str) -> Result<TrafficRecord, LineError>;
    fn format(&self) -> LogFormat;
}
