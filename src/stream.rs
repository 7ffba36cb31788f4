//! Streaming API: emit each image's outcome as soon as it is done.
//!
//! [`crate::run::run`] returns only after the last image. [`process_stream`]
//! yields one [`ImageOutcome`] per image instead, so callers can report or
//! post-process files while the browser keeps working. Images are still
//! handled strictly one after another on the single session, so outcomes
//! arrive in list order.

use crate::config::RunConfig;
use crate::output::ImageOutcome;
use crate::run::process_image;
use crate::session::BrowserSession;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of per-image outcomes.
pub type ImageStream = Pin<Box<dyn Stream<Item = ImageOutcome> + Send>>;

/// Process the configured images lazily, one per poll of the stream.
///
/// The output folder must already exist. The session stays open after the
/// stream ends; closing it is the caller's job.
pub fn process_stream(
    session: Arc<dyn BrowserSession>,
    config: RunConfig,
    output_dir: PathBuf,
) -> ImageStream {
    info!("Starting streaming run: {} images", config.images.len());
    let images = config.images.clone();
    let config = Arc::new(config);

    let s = stream::iter(images).then(move |image| {
        let session = Arc::clone(&session);
        let config = Arc::clone(&config);
        let output_dir = output_dir.clone();
        async move { process_image(session.as_ref(), &config, &output_dir, &image).await }
    });

    Box::pin(s)
}
