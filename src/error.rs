//! Error types for the lens2docx library.
//!
//! Three error types, one per layer:
//!
//! * [`Lens2DocxError`]: **Fatal**: the run cannot start at all (no output
//!   folder chosen, folder cannot be created, browser fails to launch, bad
//!   configuration). Returned as `Err(Lens2DocxError)` from
//!   [`crate::run::execute`].
//!
//! * [`StepError`]: **Non-fatal**: one step of one image failed (the page
//!   never showed the result region, the HTML file is missing, the document
//!   could not be packaged). Stored inside [`crate::output::ImageOutcome`]
//!   and the run moves on to the next image.
//!
//! * [`SessionError`]: what a [`crate::session::BrowserSession`] reports
//!   for a single browser call. Steps translate it into a [`StepError`]
//!   tagged with the [`Stage`] that was running.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the lens2docx library.
#[derive(Debug, Error)]
pub enum Lens2DocxError {
    /// The folder picker was dismissed without a choice.
    #[error("No folder selected. Exiting.")]
    NoFolderSelected,

    /// The output folder could not be created.
    #[error("Failed to create output folder '{}': {source}", .path.display())]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The browser process could not be started or its first tab opened.
    #[error("Failed to launch browser: {reason}\nIs Chrome or Chromium installed?")]
    BrowserLaunch { reason: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// The pipeline stage a [`StepError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Loading the search engine landing page.
    Navigate,
    /// Waiting for the URL input and submitting the image URL.
    Submit,
    /// Waiting for the result container to exist.
    RegionPresent,
    /// Waiting for the container to fill with recognized-text items.
    RegionLoaded,
    /// Reading geometry, direction, head and items from the page.
    Snapshot,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Navigate => "navigate",
            Stage::Submit => "submit",
            Stage::RegionPresent => "region-present",
            Stage::RegionLoaded => "region-loaded",
            Stage::Snapshot => "snapshot",
        };
        f.write_str(s)
    }
}

/// A non-fatal error for a single step of a single image.
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
pub enum StepError {
    /// A bounded wait expired before its condition held.
    #[error("{stage}: timed out after {waited_ms}ms{}", last_error_suffix(.last_error))]
    Timeout {
        stage: Stage,
        waited_ms: u64,
        last_error: Option<String>,
    },

    /// The browser rejected a call outright.
    #[error("{stage}: browser error: {detail}")]
    Browser { stage: Stage, detail: String },

    /// The HTML file the converter needs does not exist.
    #[error("Input file not found: '{}'", .path.display())]
    MissingInput { path: PathBuf },

    /// HTML could not be turned into a document.
    #[error("Conversion failed: {detail}")]
    Conversion { detail: String },

    /// An output file could not be written.
    #[error("Failed to write '{}': {detail}", .path.display())]
    WriteFailed { path: PathBuf, detail: String },
}

fn last_error_suffix(last_error: &Option<String>) -> String {
    match last_error {
        Some(e) => format!(" (last error: {e})"),
        None => String::new(),
    }
}

/// Failure of one browser session call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error("navigation to '{url}' failed: {detail}")]
    Navigation { url: String, detail: String },

    #[error("no element matches '{0}'")]
    NotFound(String),

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("input failed: {0}")]
    Input(String),

    #[error("browser session is closed")]
    Closed,
}

impl SessionError {
    /// Tag this error with the stage that was running.
    pub fn at(self, stage: Stage) -> StepError {
        StepError::Browser {
            stage,
            detail: self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_display_names_stage() {
        let e = StepError::Timeout {
            stage: Stage::RegionLoaded,
            waited_ms: 20000,
            last_error: None,
        };
        let msg = e.to_string();
        assert!(msg.contains("region-loaded"), "got: {msg}");
        assert!(msg.contains("20000ms"), "got: {msg}");
        assert!(!msg.contains("last error"));
    }

    #[test]
    fn timeout_display_with_last_error() {
        let e = StepError::Timeout {
            stage: Stage::Submit,
            waited_ms: 15000,
            last_error: Some("no element matches 'input'".into()),
        };
        assert!(e.to_string().contains("last error: no element matches"));
    }

    #[test]
    fn session_error_tagged_with_stage() {
        let e = SessionError::Script("boom".into()).at(Stage::Snapshot);
        assert_eq!(
            e,
            StepError::Browser {
                stage: Stage::Snapshot,
                detail: "script evaluation failed: boom".into()
            }
        );
    }

    #[test]
    fn missing_input_display() {
        let e = StepError::MissingInput {
            path: PathBuf::from("/tmp/out/image1.html"),
        };
        assert!(e.to_string().contains("image1.html"));
    }

    #[test]
    fn step_error_serialises() {
        let e = StepError::Conversion {
            detail: "zip".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("Conversion"));
    }

    #[test]
    fn no_folder_message() {
        assert_eq!(
            Lens2DocxError::NoFolderSelected.to_string(),
            "No folder selected. Exiting."
        );
    }
}
