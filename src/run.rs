//! Run orchestration: folder, browser, then every image in order.
//!
//! ```text
//! execute ─▶ output folder ─▶ launch ─▶ run ─▶ close
//!                                        │
//!                 ┌──────────────────────┘  for each image
//!                 ▼
//!     navigate ─▶ settle ─▶ submit ─▶ extract ─▶ convert
//! ```
//!
//! Per-image failures never stop the run: each one lands on that image's
//! [`ImageOutcome`] and the loop moves on. Only the steps before the loop
//! (folder, launch) are fatal.

use crate::config::{ImageRef, RunConfig};
use crate::dialog::{FolderPicker, FOLDER_DIALOG_TITLE};
use crate::error::{Lens2DocxError, Stage, StepError};
use crate::output::{ImageOutcome, RunReport};
use crate::pipeline::{docx, extract, submit};
use crate::session::{BrowserSession, SessionLauncher};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Run the whole pipeline.
///
/// # Errors
/// Returns `Err(Lens2DocxError)` only for fatal errors:
/// - no output folder chosen (nothing is launched or written)
/// - the output folder cannot be created
/// - the browser cannot be launched
///
/// Per-image failures are reported in the returned [`RunReport`].
pub async fn execute(
    picker: &dyn FolderPicker,
    launcher: &dyn SessionLauncher,
    config: &RunConfig,
) -> Result<RunReport, Lens2DocxError> {
    let output_dir = resolve_output_dir(picker, config).await?;

    tokio::fs::create_dir_all(&output_dir)
        .await
        .map_err(|e| Lens2DocxError::OutputDirFailed {
            path: output_dir.clone(),
            source: e,
        })?;
    info!("Output folder: {}", output_dir.display());

    let session = launcher.launch(config).await?;
    let report = run(session.as_ref(), config, &output_dir).await;

    if let Err(e) = session.close().await {
        warn!("Failed to close browser: {}", e);
    } else {
        debug!("Browser closed");
    }

    Ok(report)
}

/// Synchronous wrapper around [`execute`].
///
/// Creates a temporary tokio runtime internally.
pub fn execute_sync(
    picker: &dyn FolderPicker,
    launcher: &dyn SessionLauncher,
    config: &RunConfig,
) -> Result<RunReport, Lens2DocxError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Lens2DocxError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(execute(picker, launcher, config))
}

/// Process every configured image with an already open session.
///
/// Always returns a report; the caller owns (and closes) the session.
pub async fn run(
    session: &dyn BrowserSession,
    config: &RunConfig,
    output_dir: &Path,
) -> RunReport {
    let total_start = Instant::now();
    let total = config.images.len();
    info!("Processing {} images", total);

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(total);
    }

    let mut outcomes = Vec::with_capacity(total);
    for (i, image) in config.images.iter().enumerate() {
        let index = i + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_image_start(index, total, &image.file_name);
        }

        let outcome = process_image(session, config, output_dir, image).await;

        if let Some(ref cb) = config.progress_callback {
            report_outcome(cb.as_ref(), index, total, &outcome);
        }
        outcomes.push(outcome);
    }

    let report = RunReport::from_outcomes(
        output_dir.to_path_buf(),
        outcomes,
        total_start.elapsed().as_millis() as u64,
    );
    info!(
        "Run complete: {}/{} documents, {}ms total",
        report.stats.succeeded, report.stats.total_images, report.stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(total, report.stats.succeeded);
    }
    report
}

/// Navigate, submit, extract and convert one image.
///
/// Never fails: every error is recorded on the returned outcome.
pub async fn process_image(
    session: &dyn BrowserSession,
    config: &RunConfig,
    output_dir: &Path,
    image: &ImageRef,
) -> ImageOutcome {
    let start = Instant::now();
    let url = config.url_for(image);
    let mut outcome = ImageOutcome::new(&image.file_name, &url);
    info!("Processing image: {}", url);

    if let Err(e) = drive_image(session, config, output_dir, image, &mut outcome).await {
        warn!("{}: {}", image.file_name, e);
        outcome.error = Some(e);
    }

    outcome.duration_ms = start.elapsed().as_millis() as u64;
    outcome
}

async fn drive_image(
    session: &dyn BrowserSession,
    config: &RunConfig,
    output_dir: &Path,
    image: &ImageRef,
    outcome: &mut ImageOutcome,
) -> Result<(), StepError> {
    session
        .navigate(&config.search_url)
        .await
        .map_err(|e| e.at(Stage::Navigate))?;
    if !config.settle_delay.is_zero() {
        tokio::time::sleep(config.settle_delay).await;
    }

    let url = outcome.url.clone();
    if let Err(e) = submit::submit_image_url(session, &url, config).await {
        warn!("Failed to upload image URL {}: {}", url, e);
        outcome.submit_error = Some(e);
        if !config.extract_after_failed_submit {
            debug!("Skipping extraction for {}", image.file_name);
            return Ok(());
        }
    }

    let html_path = image.html_path(output_dir);
    let saved = extract::save_region_as_html(session, config, &html_path).await?;
    outcome.html_path = Some(saved);

    let docx_path = docx::convert_html_to_docx(&html_path, &image.docx_path(output_dir)).await?;
    outcome.docx_path = Some(docx_path);
    Ok(())
}

async fn resolve_output_dir(
    picker: &dyn FolderPicker,
    config: &RunConfig,
) -> Result<PathBuf, Lens2DocxError> {
    if let Some(ref dir) = config.output_dir {
        return Ok(dir.clone());
    }
    picker
        .pick_folder(FOLDER_DIALOG_TITLE)
        .await
        .ok_or(Lens2DocxError::NoFolderSelected)
}

pub(crate) fn report_outcome(
    cb: &dyn crate::progress::RunProgressCallback,
    index: usize,
    total: usize,
    outcome: &ImageOutcome,
) {
    if outcome.is_success() {
        cb.on_image_complete(index, total, outcome);
    } else {
        let message = outcome
            .first_error()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no document produced".to_string());
        cb.on_image_error(index, total, &outcome.file_name, &message);
    }
}
