use crate::parser::model::RecordBuilder;
use crate::parser::normalize::normalize_key;
use crate::parser::timestamp::TimestampParser;
use crate::parser::traits::*;

pub struct CsvDetector;

impl FormatDetector for CsvDetector {
    fn matches(&self, sample: &str) -> bool {
        sample.contains(',')
    }

    fn format(&self) -> LogFormat {
        LogFormat::Csv
    }
}

/// Parser for header-led CSV exports.
///
/// Rows are split on every `,`. There is no quoting support: a comma inside a
/// quoted cell shifts the columns and the row is dropped as mis-shaped.
pub struct CsvParser {
    headers: Vec<String>,
    timestamps: TimestampParser,
}

impl CsvParser {
    /// Build a parser from the header row; every column name is normalized.
    pub fn from_header(header: &str, timestamps: TimestampParser) -> Self {
        let headers = header.split(',').map(normalize_key).collect();
        Self { headers, timestamps }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl LogParser for CsvParser {
    fn parse_line(&self, line: &str) -> Result<TrafficRecord, LineError> {
        let values: Vec<&str> = line.split(',').map(str::trim).collect();

        if values.len() != self.headers.len() {
            return Err(LineError::RowShapeMismatch {
                expected: self.headers.len(),
                found: values.len(),
            });
        }

        let mut builder = RecordBuilder::default();
        for (header, value) in self.headers.iter().zip(values) {
            builder.assign(header.clone(), value, &self.timestamps);
        }

        builder.build()
    }

    fn format(&self) -> LogFormat {
        LogFormat::Csv
    }
}
