//! Analysis module: the facade tying parsing, statistics and series together.
//!
//! [`TrafficAnalyzer`] is the only entry point an outer layer needs: it turns
//! text or a file into an [`Analysis`], and builds chart series from records
//! that were already parsed.

pub mod report;

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::conf::AnalyzerConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::parser::{self, LogFormat, ParseMetrics, TrafficRecord};
use crate::series::{
    self, AddressRole, BandwidthPoint, ConnectionPoint, Granularity, HeatmapCell, IpTraffic, PortMetric,
    PortValue, ProtocolCount,
};
use crate::stats::{self, AggregateResult};

pub use report::{AnalysisData, AnalysisReport};

/// Outcome of one successful analysis call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub records: Vec<TrafficRecord>,
    pub stats: AggregateResult,
    pub format: Option<LogFormat>,
    pub diagnostics: ParseMetrics,
}

/// Every chart series for one batch, as printed by the binary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub granularity: Granularity,
    pub bandwidth: Vec<BandwidthPoint>,
    pub connections: Vec<ConnectionPoint>,
    pub protocols: Vec<ProtocolCount>,
    pub heatmap: Vec<HeatmapCell>,
    pub top_sources: Vec<IpTraffic>,
    pub top_destinations: Vec<IpTraffic>,
    pub top_ports_by_connections: Vec<PortValue>,
    pub top_ports_by_traffic: Vec<PortValue>,
}

#[derive(Debug, Clone, Default)]
pub struct TrafficAnalyzer {
    config: AnalyzerConfig,
}

impl TrafficAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Parse `text` and aggregate the records it yields.
    ///
    /// Fails with [`AnalysisError::UnsupportedFormat`] when no line produced a
    /// record; individual bad lines never fail the call.
    pub fn analyze_content(&self, text: &str) -> AnalysisResult<Analysis> {
        let report = parser::parse_with_report(text, &self.config.parse_options());

        if report.records.is_empty() {
            info!(
                "No records recovered from {} content lines ({} skipped)",
                report.metrics.lines_examined,
                report.metrics.lines_skipped()
            );
            return Err(AnalysisError::UnsupportedFormat);
        }

        let stats = stats::aggregate(&report.records, self.config.top_n);
        info!(
            "Analyzed {} records as {} ({} lines skipped)",
            stats.total_records,
            report.format().map(|f| f.as_str()).unwrap_or("unknown"),
            report.metrics.lines_skipped()
        );

        Ok(Analysis {
            format: report.format(),
            diagnostics: report.metrics,
            records: report.records,
            stats,
        })
    }

    /// Read the whole file at `path` and analyze it.
    pub fn analyze_file(&self, path: impl AsRef<Path>) -> AnalysisResult<Analysis> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| {
            warn!("Cannot read log input {}: {}", path.display(), source);
            AnalysisError::UnreadableInput {
                path: path.to_path_buf(),
                source,
            }
        })?;

        self.analyze_content(&text)
    }

    pub fn bandwidth_chart(&self, records: &[TrafficRecord], granularity: Granularity) -> Vec<BandwidthPoint> {
        series::bandwidth_over_time(records, granularity)
    }

    pub fn connection_chart(&self, records: &[TrafficRecord], granularity: Granularity) -> Vec<ConnectionPoint> {
        series::connections_over_time(records, granularity)
    }

    pub fn protocol_distribution(&self, records: &[TrafficRecord]) -> Vec<ProtocolCount> {
        series::protocol_distribution(records)
    }

    pub fn traffic_heatmap(&self, records: &[TrafficRecord]) -> Vec<HeatmapCell> {
        series::hourly_heatmap(records)
    }

    pub fn top_ips_by_traffic(&self, records: &[TrafficRecord], role: AddressRole, top_n: usize) -> Vec<IpTraffic> {
        series::top_ips_by_traffic(records, role, top_n)
    }

    pub fn top_ports(&self, records: &[TrafficRecord], metric: PortMetric, top_n: usize) -> Vec<PortValue> {
        series::top_ports(records, metric, top_n)
    }

    /// All chart series at once, with rankings capped at the configured `top_n`.
    pub fn charts(&self, records: &[TrafficRecord], granularity: Granularity) -> ChartSet {
        let top_n = self.config.top_n;
        ChartSet {
            granularity,
            bandwidth: self.bandwidth_chart(records, granularity),
            connections: self.connection_chart(records, granularity),
            protocols: self.protocol_distribution(records),
            heatmap: self.traffic_heatmap(records),
            top_sources: self.top_ips_by_traffic(records, AddressRole::Source, top_n),
            top_destinations: self.top_ips_by_traffic(records, AddressRole::Destination, top_n),
            top_ports_by_connections: self.top_ports(records, PortMetric::Connections, top_n),
            top_ports_by_traffic: self.top_ports(records, PortMetric::Traffic, top_n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const KV_LOG: &str = "\
time=2023-10-05T08:23:45Z src_ip=10.0.0.1 dst_ip=10.0.0.2 dst_port=443 bytes=1048576 protocol=tcp
time=2023-10-05T09:10:00Z src_ip=10.0.0.3 dst_ip=10.0.0.2 dst_port=53 bytes=2048 protocol=udp
";

    fn analyzer() -> TrafficAnalyzer {
        TrafficAnalyzer::new(AnalyzerConfig { syslog_year: Some(2023), ..Default::default() })
    }

    #[test]
    fn test_analyze_content() {
        let analysis = analyzer().analyze_content(KV_LOG).unwrap();

        assert_eq!(analysis.records.len(), 2);
        assert_eq!(analysis.stats.total_records, 2);
        assert_eq!(analysis.stats.total_bytes, 1_048_576 + 2048);
        assert_eq!(analysis.format, Some(LogFormat::KeyValue));
        assert_eq!(analysis.diagnostics.records_parsed, 2);
    }

    #[test]
    fn test_empty_content_is_unsupported() {
        let err = analyzer().analyze_content("").unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedFormat));

        let err = analyzer().analyze_content("# only a comment\n\n").unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedFormat));
    }

    #[test]
    fn test_unparseable_content_is_unsupported() {
        let err = analyzer().analyze_content("hello world again\nfoo bar baz\n").unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedFormat));
    }

    #[test]
    fn test_analyze_content_is_idempotent() {
        let a = analyzer();
        assert_eq!(a.analyze_content(KV_LOG).unwrap(), a.analyze_content(KV_LOG).unwrap());
    }

    #[test]
    fn test_analyze_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(KV_LOG.as_bytes()).unwrap();

        let analysis = analyzer().analyze_file(file.path()).unwrap();
        assert_eq!(analysis.stats.total_records, 2);
    }

    #[test]
    fn test_analyze_missing_file() {
        let err = analyzer().analyze_file("/nonexistent/traffic.log").unwrap_err();
        match err {
            AnalysisError::UnreadableInput { path, source } => {
                assert_eq!(path, Path::new("/nonexistent/traffic.log"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_charts_respect_top_n() {
        let a = TrafficAnalyzer::new(AnalyzerConfig { top_n: 1, ..Default::default() });
        let analysis = a.analyze_content(KV_LOG).unwrap();
        let charts = a.charts(&analysis.records, Granularity::Hourly);

        assert_eq!(charts.bandwidth.len(), 2);
        assert_eq!(charts.connections.iter().map(|p| p.count).sum::<u64>(), 2);
        assert_eq!(charts.heatmap.len(), 168);
        assert_eq!(charts.top_sources.len(), 1);
        assert_eq!(charts.top_sources[0].ip, "10.0.0.1");
        assert_eq!(charts.top_destinations[0].ip, "10.0.0.2");
        assert_eq!(charts.top_ports_by_connections.len(), 1);
        assert_eq!(charts.protocols.len(), 2);
    }

    #[test]
    fn test_analyzer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TrafficAnalyzer>();
    }
}
