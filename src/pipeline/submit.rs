//! Submit an image URL through the Lens upload panel.

use crate::config::RunConfig;
use crate::error::{Stage, StepError};
use crate::pipeline::wait::wait_until;
use crate::session::BrowserSession;
use tracing::{debug, info};

/// Wait for the URL input, then clear it, type `image_url` and press Enter.
///
/// Does not wait for results; that is the extractor's job.
pub async fn submit_image_url(
    session: &dyn BrowserSession,
    image_url: &str,
    config: &RunConfig,
) -> Result<(), StepError> {
    let selector = config.input_selector.as_str();

    wait_until(
        Stage::Submit,
        config.submit_timeout,
        config.poll_interval,
        || session.element_exists(selector),
    )
    .await?;
    debug!("Found input field '{}'", selector);

    session
        .submit_text(selector, image_url)
        .await
        .map_err(|e| e.at(Stage::Submit))?;

    info!("Uploaded image URL: {}", image_url);
    Ok(())
}
