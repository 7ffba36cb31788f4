//! Progress-callback trait for per-image run events.
//!
//! Inject an [`Arc<dyn RunProgressCallback>`] via
//! [`crate::config::RunConfigBuilder::progress_callback`] to receive events
//! as the run works through its image list. The CLI uses this to drive a
//! terminal progress bar; library callers can forward events anywhere.
//!
//! # Example
//!
//! ```rust
//! use lens2docx::{ImageOutcome, RunConfig, RunProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     done: AtomicUsize,
//! }
//!
//! impl RunProgressCallback for CountingCallback {
//!     fn on_image_complete(&self, index: usize, total: usize, outcome: &ImageOutcome) {
//!         self.done.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} {}", index, total, outcome.file_name);
//!     }
//! }
//!
//! let cb = Arc::new(CountingCallback { done: AtomicUsize::new(0) });
//! let config = RunConfig::builder()
//!     .progress_callback(cb as Arc<dyn RunProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::ImageOutcome;
use std::sync::Arc;

/// Called by the run loop as it processes each image.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Indices are 1-based.
pub trait RunProgressCallback: Send + Sync {
    /// Called once, after the browser is up and before the first image.
    fn on_run_start(&self, total_images: usize) {
        let _ = total_images;
    }

    /// Called before navigating for an image.
    fn on_image_start(&self, index: usize, total_images: usize, file_name: &str) {
        let _ = (index, total_images, file_name);
    }

    /// Called when an image produced its `.docx` file.
    fn on_image_complete(&self, index: usize, total_images: usize, outcome: &ImageOutcome) {
        let _ = (index, total_images, outcome);
    }

    /// Called when any step for an image failed.
    ///
    /// # Arguments
    /// * `error`: human-readable description of the first failing step
    fn on_image_error(&self, index: usize, total_images: usize, file_name: &str, error: &str) {
        let _ = (index, total_images, file_name, error);
    }

    /// Called once after every image has been attempted.
    fn on_run_complete(&self, total_images: usize, success_count: usize) {
        let _ = (total_images, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl RunProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RunConfig`].
pub type ProgressCallback = Arc<dyn RunProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        run_total: AtomicUsize,
        run_ok: AtomicUsize,
    }

    impl RunProgressCallback for TrackingCallback {
        fn on_run_start(&self, total_images: usize) {
            self.run_total.store(total_images, Ordering::SeqCst);
        }

        fn on_image_start(&self, _index: usize, _total: usize, _file_name: &str) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_image_complete(&self, _index: usize, _total: usize, _outcome: &ImageOutcome) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_image_error(&self, _index: usize, _total: usize, _file_name: &str, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_run_complete(&self, _total: usize, success_count: usize) {
            self.run_ok.store(success_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_run_start(2);
        cb.on_image_start(1, 2, "a.jpg");
        cb.on_image_complete(1, 2, &ImageOutcome::new("a.jpg", "http://h/a.jpg"));
        cb.on_image_error(2, 2, "b.jpg", "region-loaded: timed out");
        cb.on_run_complete(2, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_run_start(3);
        tracker.on_image_start(1, 3, "image1.jpg");
        tracker.on_image_complete(1, 3, &ImageOutcome::new("image1.jpg", "u1"));
        tracker.on_image_start(2, 3, "image2.jpg");
        tracker.on_image_error(2, 3, "image2.jpg", "submit: timed out");
        tracker.on_image_start(3, 3, "image3.jpg");
        tracker.on_image_complete(3, 3, &ImageOutcome::new("image3.jpg", "u3"));
        tracker.on_run_complete(3, 2);

        assert_eq!(tracker.run_total.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.run_ok.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_run_start(1);
        cb.on_image_start(1, 1, "x.png");
    }
}
