//! Model: AnalyzerConfig.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::parser::{ParseOptions, TimestampParser, MAX_LINE_SIZE};
use crate::series::Granularity;
use crate::stats::DEFAULT_TOP_N;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Length of every top-N ranking
    pub top_n: usize,
    /// Lines longer than this many bytes are skipped
    pub max_line_size: usize,
    /// Year given to syslog timestamps, which carry none. Current year when unset.
    pub syslog_year: Option<i32>,
    pub default_granularity: Granularity,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            max_line_size: MAX_LINE_SIZE,
            syslog_year: None,
            default_granularity: Granularity::Hourly,
        }
    }
}

impl AnalyzerConfig {
    pub fn parse_options(&self) -> ParseOptions {
        let year = self.syslog_year.unwrap_or_else(|| Utc::now().year());
        ParseOptions {
            max_line_size: self.max_line_size,
            timestamps: TimestampParser::new(year),
        }
    }
}
