/// Individual log format parsers and detectors

pub mod key_value;
pub mod csv;
pub mod delimited;

// Re-export parser implementations
pub use key_value::{KeyValueDetector, KeyValueParser};
pub use csv::{CsvDetector, CsvParser};
pub use delimited::{SpaceDelimitedDetector, SpaceDelimitedParser};
