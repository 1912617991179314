// Domain-driven module structure for the traffic analyzer.

// Core pipeline
pub mod parser;
pub mod stats;
pub mod series;

// Facade and infrastructure
pub mod analysis;
pub mod conf;
pub mod error;
pub mod runtime;

pub use analysis::{Analysis, AnalysisData, AnalysisReport, ChartSet, TrafficAnalyzer};
pub use conf::AnalyzerConfig;
pub use error::{AnalysisError, ConfigError};
pub use parser::{LogFormat, TrafficRecord};
pub use series::Granularity;
