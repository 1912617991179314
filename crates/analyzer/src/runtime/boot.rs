//! Boot: logging init and config load.

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::analysis::TrafficAnalyzer;
use crate::conf::AnalyzerConfig;
use crate::error::ConfigError;

/// Initialise the tracing / logging subsystem.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "analyzer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load and validate config, then build the analyzer.
///
/// Returns `(TrafficAnalyzer, AnalyzerConfig)` on success.
pub fn boot() -> Result<(TrafficAnalyzer, AnalyzerConfig), ConfigError> {
    info!("Starting traffic analyzer v{}", env!("CARGO_PKG_VERSION"));

    let config = AnalyzerConfig::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;
    info!(
        "Loaded configuration: top_n={}, max_line_size={}, granularity={}",
        config.top_n,
        config.max_line_size,
        config.default_granularity.as_str()
    );
    if let Some(year) = config.syslog_year {
        info!("Syslog timestamps will be dated {}", year);
    }

    Ok((TrafficAnalyzer::new(config.clone()), config))
}
