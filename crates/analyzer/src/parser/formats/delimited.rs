use crate::parser::model::RecordBuilder;
use crate::parser::normalize::normalize_key;
use crate::parser::timestamp::TimestampParser;
use crate::parser::traits::*;

const MIN_TOKENS: usize = 3;

/// Space-delimited detector (fallback - always matches)
pub struct SpaceDelimitedDetector;

impl FormatDetector for SpaceDelimitedDetector {
    fn matches(&self, _sample: &str) -> bool {
        true
    }

    fn format(&self) -> LogFormat {
        LogFormat::SpaceDelimited
    }
}

/// Parser for `timestamp key value key value ...` lines.
///
/// The timestamp takes one token, or two when the first is a bare date and the
/// second a time of day (`2023-10-05 08:23:45`). Keys may carry a trailing
/// colon (`src: 10.0.0.1`).
pub struct SpaceDelimitedParser {
    timestamps: TimestampParser,
}

impl SpaceDelimitedParser {
    pub fn new(timestamps: TimestampParser) -> Self {
        Self { timestamps }
    }
}

impl LogParser for SpaceDelimitedParser {
    fn parse_line(&self, line: &str) -> Result<TrafficRecord, LineError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens.len() < MIN_TOKENS {
            return Err(LineError::TooFewTokens(tokens.len(), MIN_TOKENS));
        }

        let (stamp, rest) = if !tokens[0].contains(':') && tokens[1].contains(':') {
            (format!("{} {}", tokens[0], tokens[1]), &tokens[2..])
        } else {
            (tokens[0].to_string(), &tokens[1..])
        };

        let mut builder = RecordBuilder {
            timestamp: Some(self.timestamps.parse(&stamp).ok_or(LineError::MissingTimestamp)?),
            ..RecordBuilder::default()
        };

        for pair in rest.chunks_exact(2) {
            let lowered = pair[0].to_lowercase();
            let key = lowered.strip_suffix(':').unwrap_or(&lowered);
            builder.assign(normalize_key(key), pair[1], &self.timestamps);
        }

        builder.build()
    }

    fn format(&self) -> LogFormat {
        LogFormat::SpaceDelimited
    }
}
