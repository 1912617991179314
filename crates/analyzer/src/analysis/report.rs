//! Report: the success/failure envelope handed to the HTTP layer.

use serde::Serialize;

use super::Analysis;
use crate::error::AnalysisError;
use crate::parser::TrafficRecord;
use crate::stats::AggregateResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisData {
    pub records: Vec<TrafficRecord>,
    pub stats: AggregateResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub success: bool,
    pub message: String,
    pub data: Option<AnalysisData>,
}

impl AnalysisReport {
    pub fn from_result(result: Result<Analysis, AnalysisError>) -> Self {
        match result {
            Ok(analysis) => Self {
                success: true,
                message: format!("Analyzed {} records.", analysis.stats.total_records),
                data: Some(AnalysisData {
                    records: analysis.records,
                    stats: analysis.stats,
                }),
            },
            Err(e) => Self {
                success: false,
                message: e.to_string(),
                data: None,
            },
        }
    }
}

impl From<Result<Analysis, AnalysisError>> for AnalysisReport {
    fn from(result: Result<Analysis, AnalysisError>) -> Self {
        Self::from_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TrafficAnalyzer;

    #[test]
    fn test_success_envelope() {
        let analyzer = TrafficAnalyzer::default();
        let result = analyzer.analyze_content("2023-10-05 08:23:45,10.0.0.1,10.0.0.2,512\n");
        // a single line is taken as the CSV header, leaving nothing to parse
        assert!(result.is_err());

        let text = "timestamp,src_ip,dst_ip,bytes\n2023-10-05 08:23:45,10.0.0.1,10.0.0.2,512\n";
        let report = AnalysisReport::from_result(analyzer.analyze_content(text));

        assert!(report.success);
        assert_eq!(report.message, "Analyzed 1 records.");
        let data = report.data.unwrap();
        assert_eq!(data.records.len(), 1);
        assert_eq!(data.stats.total_bytes, 512);
    }

    #[test]
    fn test_failure_envelope() {
        let report: AnalysisReport = TrafficAnalyzer::default().analyze_content("").into();

        assert!(!report.success);
        assert!(report.message.contains("unsupported format"));
        assert!(report.data.is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["data"].is_null());
    }
}
