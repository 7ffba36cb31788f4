//! Output folder selection.
//!
//! The native dialog blocks its thread until the user answers, so it runs on
//! the blocking pool and the async run simply awaits the choice.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Title of the folder dialog.
pub const FOLDER_DIALOG_TITLE: &str = "Select Output Folder";

/// Asks the user where the files of a run should go.
#[async_trait]
pub trait FolderPicker: Send + Sync {
    /// `None` when the user dismissed the dialog.
    async fn pick_folder(&self, title: &str) -> Option<PathBuf>;
}

/// Native folder dialog (`rfd`).
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogFolderPicker;

#[async_trait]
impl FolderPicker for DialogFolderPicker {
    async fn pick_folder(&self, title: &str) -> Option<PathBuf> {
        let title = title.to_string();
        let picked = tokio::task::spawn_blocking(move || {
            rfd::FileDialog::new().set_title(&title).pick_folder()
        })
        .await;

        match picked {
            Ok(Some(dir)) => {
                debug!("Folder selected: {}", dir.display());
                Some(dir)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Folder dialog task failed: {}", e);
                None
            }
        }
    }
}

/// A picker that always answers with the same folder (or cancels).
///
/// Used when the folder is known up front, and in tests.
#[derive(Debug, Clone, Default)]
pub struct FixedFolderPicker(pub Option<PathBuf>);

#[async_trait]
impl FolderPicker for FixedFolderPicker {
    async fn pick_folder(&self, _title: &str) -> Option<PathBuf> {
        self.0.clone()
    }
}
