use super::traits::*;
use super::formats::*;

/// Format detector orchestrator.
///
/// Detectors are evaluated in a fixed priority order against a single sample
/// line and the first one that matches decides the format. The last detector
/// always matches, so detection never fails.
pub struct FormatDetectorOrchestrator {
    detectors: Vec<Box<dyn FormatDetector>>,
}

impl FormatDetectorOrchestrator {
    pub fn new() -> Self {
        let detectors: Vec<Box<dyn FormatDetector>> = vec![
            // Order matters! A key=value line often also contains commas
            Box::new(KeyValueDetector),
            Box::new(CsvDetector),
            Box::new(SpaceDelimitedDetector), // Fallback (always matches)
        ];

        Self { detectors }
    }

    pub fn detect(&self, sample: &str) -> LogFormat {
        self.detectors
            .iter()
            .find(|detector| detector.matches(sample))
            .map(|detector| detector.format())
            .unwrap_or(LogFormat::SpaceDelimited)
    }

    /// Formats in the order they are tried
    pub fn priority(&self) -> Vec<LogFormat> {
        self.detectors.iter().map(|d| d.format()).collect()
    }
}

impl Default for FormatDetectorOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
