//! Conf module: analyzer configuration model and loading.

pub mod model;
pub mod load;

pub use model::AnalyzerConfig;
