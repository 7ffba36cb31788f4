//! Result types for a run: one [`ImageOutcome`] per image plus totals.

use crate::error::StepError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happened to one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageOutcome {
    /// Image file name as configured.
    pub file_name: String,
    /// URL submitted to the search engine.
    pub url: String,
    /// Standalone HTML capture, when extraction succeeded.
    pub html_path: Option<PathBuf>,
    /// Converted document, when conversion succeeded.
    pub docx_path: Option<PathBuf>,
    /// Submission failure. Recorded separately because extraction may still
    /// run afterwards (`extract_after_failed_submit`).
    pub submit_error: Option<StepError>,
    /// Failure of navigation, extraction or conversion.
    pub error: Option<StepError>,
    /// Wall-clock time spent on this image.
    pub duration_ms: u64,
}

impl ImageOutcome {
    pub fn new(file_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            url: url.into(),
            html_path: None,
            docx_path: None,
            submit_error: None,
            error: None,
            duration_ms: 0,
        }
    }

    /// True when the `.docx` file was written.
    pub fn is_success(&self) -> bool {
        self.docx_path.is_some() && self.error.is_none()
    }

    /// The error to report for this image, step error first.
    pub fn first_error(&self) -> Option<&StepError> {
        self.error.as_ref().or(self.submit_error.as_ref())
    }
}

/// Totals for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub total_images: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_duration_ms: u64,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub output_dir: PathBuf,
    pub outcomes: Vec<ImageOutcome>,
    pub stats: RunStats,
}

impl RunReport {
    pub(crate) fn from_outcomes(
        output_dir: PathBuf,
        outcomes: Vec<ImageOutcome>,
        total_duration_ms: u64,
    ) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        let stats = RunStats {
            total_images: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            total_duration_ms,
        };
        Self {
            output_dir,
            outcomes,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;

    #[test]
    fn success_requires_docx_and_no_error() {
        let mut o = ImageOutcome::new("a.jpg", "http://h/a.jpg");
        assert!(!o.is_success());
        o.docx_path = Some(PathBuf::from("/out/a.docx"));
        assert!(o.is_success());
        o.error = Some(StepError::Conversion {
            detail: "x".into(),
        });
        assert!(!o.is_success());
    }

    #[test]
    fn first_error_prefers_step_error() {
        let mut o = ImageOutcome::new("a.jpg", "u");
        o.submit_error = Some(StepError::Timeout {
            stage: Stage::Submit,
            waited_ms: 15000,
            last_error: None,
        });
        assert!(matches!(o.first_error(), Some(StepError::Timeout { .. })));
        o.error = Some(StepError::MissingInput {
            path: PathBuf::from("a.html"),
        });
        assert!(matches!(o.first_error(), Some(StepError::MissingInput { .. })));
    }

    #[test]
    fn report_counts() {
        let mut ok = ImageOutcome::new("a.jpg", "u");
        ok.docx_path = Some(PathBuf::from("a.docx"));
        let bad = ImageOutcome::new("b.jpg", "u");
        let report = RunReport::from_outcomes(PathBuf::from("/out"), vec![ok, bad], 10);
        assert_eq!(report.stats.total_images, 2);
        assert_eq!(report.stats.succeeded, 1);
        assert_eq!(report.stats.failed, 1);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"succeeded\":1"));
    }
}
