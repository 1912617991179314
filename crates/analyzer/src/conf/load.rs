//! Load: config loading from file and environment variables.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use super::model::AnalyzerConfig;
use crate::error::ConfigError;

pub const CONFIG_FILE_ENV: &str = "ANALYZER_CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "/etc/analyzer/analyzer.toml";

impl AnalyzerConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var(CONFIG_FILE_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = if Path::new(&config_path).exists() {
            info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            info!("Config file not found at {}, using environment variables", config_path);
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `ANALYZER_*` overrides. Values that don't parse are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(top_n) = parsed(&lookup, "ANALYZER_TOP_N") {
            self.top_n = top_n;
        }
        if let Some(size) = parsed(&lookup, "ANALYZER_MAX_LINE_SIZE") {
            self.max_line_size = size;
        }
        if let Some(year) = parsed(&lookup, "ANALYZER_SYSLOG_YEAR") {
            self.syslog_year = Some(year);
        }
        if let Some(granularity) = parsed(&lookup, "ANALYZER_GRANULARITY") {
            self.default_granularity = granularity;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::Invalid("top_n must be > 0".to_string()));
        }
        if self.max_line_size == 0 {
            return Err(ConfigError::Invalid("max_line_size must be > 0".to_string()));
        }
        Ok(())
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Granularity;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.max_line_size, 1024 * 1024);
        assert_eq!(config.syslog_year, None);
        assert_eq!(config.default_granularity, Granularity::Hourly);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "top_n = 5").unwrap();
        writeln!(file, "default_granularity = \"weekly\"").unwrap();

        let config = AnalyzerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.default_granularity, Granularity::Weekly);
        assert_eq!(config.max_line_size, 1024 * 1024);
    }

    #[test]
    fn test_from_file_errors() {
        let missing = AnalyzerConfig::from_file("/nonexistent/analyzer.toml");
        assert!(matches!(missing, Err(ConfigError::Read { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "top_n = \"many\"").unwrap();
        let bad = AnalyzerConfig::from_file(file.path());
        assert!(matches!(bad, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = AnalyzerConfig::default();
        config.apply_overrides(lookup_from(&[
            ("ANALYZER_TOP_N", "3"),
            ("ANALYZER_SYSLOG_YEAR", "2021"),
            ("ANALYZER_GRANULARITY", "daily"),
        ]));

        assert_eq!(config.top_n, 3);
        assert_eq!(config.syslog_year, Some(2021));
        assert_eq!(config.default_granularity, Granularity::Daily);
    }

    #[test]
    fn test_bad_override_ignored() {
        let mut config = AnalyzerConfig::default();
        config.apply_overrides(lookup_from(&[
            ("ANALYZER_TOP_N", "lots"),
            ("ANALYZER_GRANULARITY", "monthly"),
        ]));
        assert_eq!(config, AnalyzerConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero() {
        let config = AnalyzerConfig { top_n: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = AnalyzerConfig { max_line_size: 0, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_options_use_configured_year() {
        let config = AnalyzerConfig { syslog_year: Some(2020), max_line_size: 64, ..Default::default() };
        let options = config.parse_options();
        assert_eq!(options.max_line_size, 64);
        assert_eq!(options.timestamps.syslog_year(), 2020);
    }
}
