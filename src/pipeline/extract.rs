//! Capture the recognized-text region as a standalone HTML file.
//!
//! ```text
//! container present ──▶ > N items ──▶ snapshot ──▶ sanitize ──▶ document ──▶ file
//!   (bounded wait)     (bounded wait)  (page)      (labels)     (head, dir,   (atomic)
//!                                                               size)
//! ```
//!
//! Nothing is written unless every stage succeeds.

use crate::config::RunConfig;
use crate::error::{Stage, StepError};
use crate::pipeline::document::{standalone_document, Geometry};
use crate::pipeline::sanitize::render_region;
use crate::pipeline::wait::wait_until;
use crate::pipeline::write::write_atomic;
use crate::session::BrowserSession;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Wait for the result region, capture it and save it to `output_html`.
///
/// Returns the written path.
pub async fn save_region_as_html(
    session: &dyn BrowserSession,
    config: &RunConfig,
    output_html: &Path,
) -> Result<PathBuf, StepError> {
    let html = capture_region_document(session, config).await?;
    write_atomic(output_html, html.as_bytes()).await?;
    info!("HTML content saved to {}", output_html.display());
    Ok(output_html.to_path_buf())
}

/// Everything [`save_region_as_html`] does except the write.
pub async fn capture_region_document(
    session: &dyn BrowserSession,
    config: &RunConfig,
) -> Result<String, StepError> {
    let region = &config.region;

    wait_until(
        Stage::RegionPresent,
        config.region_timeout,
        config.poll_interval,
        || session.element_exists(&region.container),
    )
    .await?;
    debug!("Result container '{}' found", region.container);

    let min_items = config.min_text_items;
    wait_until(
        Stage::RegionLoaded,
        config.region_timeout,
        config.poll_interval,
        || async move {
            session
                .count_within(&region.container, &region.item)
                .await
                .map(|n| n > min_items)
        },
    )
    .await?;
    debug!("Result container holds more than {} text items", min_items);

    let snapshot = session
        .snapshot_region(region)
        .await
        .map_err(|e| e.at(Stage::Snapshot))?;
    debug!(
        "Container {}x{} px, {} kept items, direction {}",
        snapshot.width,
        snapshot.height,
        snapshot.items.len(),
        snapshot.direction
    );

    let region_html = render_region(&snapshot);
    Ok(standalone_document(
        &snapshot.head_html,
        snapshot.text_direction(),
        Geometry {
            width: snapshot.width,
            height: snapshot.height,
        },
        &region_html,
    ))
}
