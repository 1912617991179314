use analyzer::runtime::boot;
use analyzer::AnalysisReport;

const USAGE: &str = "usage: analyzer <log-file> [hourly|daily|weekly]";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    boot::init_logging();
    let (analyzer, config) = boot::boot()?;

    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or(USAGE)?;
    let granularity = match args.next() {
        Some(raw) => raw.parse()?,
        None => config.default_granularity,
    };

    let result = analyzer.analyze_file(&path);
    let charts = result
        .as_ref()
        .ok()
        .map(|analysis| analyzer.charts(&analysis.records, granularity));
    let report = AnalysisReport::from_result(result);

    let output = serde_json::json!({
        "report": report,
        "charts": charts,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
