/// Traffic log parsing and normalization module
///
/// Turns raw log text into canonical [`TrafficRecord`]s.
///
/// # Architecture
///
/// - `traits.rs`: Core traits for detectors and parsers
/// - `detector.rs`: Ranked format detection on the first content line
/// - `formats/`: Individual format parser implementations
/// - `normalize.rs`: Field-name normalization
/// - `timestamp.rs`: Timestamp discovery and lenient date parsing
/// - `metrics.rs`: Per-call parse diagnostics
///
/// # Failure policy
///
/// Parsing is per line and best effort. A line that cannot be parsed is
/// counted in [`ParseMetrics`] and dropped; it never aborts the batch.

pub mod traits;
pub mod detector;
pub mod metrics;
pub mod formats;
pub mod model;
pub mod normalize;
pub mod timestamp;
mod serde_utils;

use tracing::{debug, trace};

use detector::FormatDetectorOrchestrator;
use formats::{CsvParser, KeyValueParser, SpaceDelimitedParser};

// Re-export commonly used types
pub use traits::LogParser;
pub use model::{LineError, LogFormat, TrafficRecord};
pub use metrics::ParseMetrics;
pub use normalize::normalize_key;
pub use timestamp::TimestampParser;

// Constants
pub const MAX_LINE_SIZE: usize = 1_048_576; // 1MB

/// Knobs shared by every parser in one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub max_line_size: usize,
    pub timestamps: TimestampParser,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_line_size: MAX_LINE_SIZE,
            timestamps: TimestampParser::default(),
        }
    }
}

/// Records produced by one parse call plus its diagnostics
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub records: Vec<TrafficRecord>,
    pub metrics: ParseMetrics,
}

impl ParseReport {
    pub fn format(&self) -> Option<LogFormat> {
        self.metrics.format
    }
}

/// Parse `text` with default options and return only the records.
pub fn parse(text: &str) -> Vec<TrafficRecord> {
    parse_with_report(text, &ParseOptions::default()).records
}

/// Detect the format of `text`, parse every content line and report what was skipped.
pub fn parse_with_report(text: &str, options: &ParseOptions) -> ParseReport {
    let lines = content_lines(text);

    let Some(first) = lines.first() else {
        debug!("No content lines to parse");
        return ParseReport::default();
    };

    let format = FormatDetectorOrchestrator::new().detect(first);
    let (parser, body): (Box<dyn LogParser>, &[&str]) = match format {
        LogFormat::KeyValue => (Box::new(KeyValueParser::new(options.timestamps)), &lines[..]),
        LogFormat::Csv => (Box::new(CsvParser::from_header(first, options.timestamps)), &lines[1..]),
        LogFormat::SpaceDelimited => (Box::new(SpaceDelimitedParser::new(options.timestamps)), &lines[..]),
    };

    let mut metrics = ParseMetrics::new(format);
    let mut records = Vec::with_capacity(body.len());

    for line in body {
        match parse_guarded(parser.as_ref(), line, options.max_line_size) {
            Ok(record) => {
                metrics.record_parse();
                records.push(record);
            }
            Err(e) => {
                trace!("Skipping {} line: {}", format.as_str(), e);
                metrics.record_skip(&e);
            }
        }
    }

    debug!(
        "Parsed {} records from {} {} lines ({} skipped)",
        metrics.records_parsed,
        metrics.lines_examined,
        format.as_str(),
        metrics.lines_skipped()
    );

    ParseReport { records, metrics }
}

/// Trimmed lines with blanks and `#` comments removed
fn content_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

fn parse_guarded(parser: &dyn LogParser, line: &str, max_line_size: usize) -> Result<TrafficRecord, LineError> {
    // Enforce size limit so a single runaway line cannot dominate the batch
    if line.len() > max_line_size {
        return Err(LineError::LineTooLarge(line.len(), max_line_size));
    }
    parser.parse_line(line)
}
