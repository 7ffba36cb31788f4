//! Configuration types for a Lens-to-DOCX run.
//!
//! Everything a run needs lives in [`RunConfig`], built via its
//! [`RunConfigBuilder`]. The defaults reproduce the fixed behaviour of the
//! tool: three images on the demo host, the Google Lens landing page, 15 s to
//! find the URL input, 20 s for the result region and a 2 s settle pause
//! after each navigation.

use crate::error::Lens2DocxError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Base URL the images are served from.
pub const DEFAULT_BASE_URL: &str = "http://mosishoki18.unaux.com/img";

/// Google Lens landing page (the `olud` flag opens the upload panel).
pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/?olud";

/// Image file names processed when none are configured.
pub const DEFAULT_IMAGES: [&str; 3] = ["image1.jpg", "image2.jpg", "image3.jpg"];

/// Text field on the Lens upload panel that accepts an image link.
pub const DEFAULT_INPUT_SELECTOR: &str = "input[text='text']";

/// Configuration for one run.
///
/// Built via [`RunConfig::builder()`] or [`RunConfig::default()`].
///
/// # Example
/// ```rust
/// use lens2docx::RunConfig;
/// use std::time::Duration;
///
/// let config = RunConfig::builder()
///     .base_url("https://images.example.com/scans")
///     .images(["page1.png", "page2.png"])
///     .region_timeout(Duration::from_secs(30))
///     .build()
///     .unwrap();
/// assert_eq!(config.images.len(), 2);
/// ```
#[derive(Clone)]
pub struct RunConfig {
    /// URL prefix joined with each image name. Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// Image file names, processed in order. Default: [`DEFAULT_IMAGES`].
    pub images: Vec<ImageRef>,

    /// Output folder. `None` means ask with the folder picker.
    pub output_dir: Option<PathBuf>,

    /// Page loaded before each submission. Default: [`DEFAULT_SEARCH_URL`].
    pub search_url: String,

    /// CSS selector of the URL input. Default: [`DEFAULT_INPUT_SELECTOR`].
    pub input_selector: String,

    /// Where the recognized text lives on the result page.
    pub region: RegionLocator,

    /// The region counts as loaded once it holds strictly more than this many
    /// item elements. Default: 5.
    pub min_text_items: usize,

    /// Bound on waiting for the URL input. Default: 15 s.
    pub submit_timeout: Duration,

    /// Bound on each of the two region waits. Default: 20 s.
    pub region_timeout: Duration,

    /// How often wait conditions are re-checked. Default: 250 ms.
    pub poll_interval: Duration,

    /// Pause after navigating to the search page. Default: 2 s.
    ///
    /// The landing page keeps loading scripts after the load event fires;
    /// the input wait alone can latch onto a field that is not yet wired up.
    pub settle_delay: Duration,

    /// Run Chrome without a window. Default: false.
    pub headless: bool,

    /// Run extraction even when the submission step failed. Default: false.
    ///
    /// When enabled the extractor reads whatever the page shows, which after
    /// a failed submission may be the previous image's result.
    pub extract_after_failed_submit: bool,

    /// Optional per-image event sink.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            images: DEFAULT_IMAGES.iter().map(|n| ImageRef::new(*n)).collect(),
            output_dir: None,
            search_url: DEFAULT_SEARCH_URL.to_string(),
            input_selector: DEFAULT_INPUT_SELECTOR.to_string(),
            region: RegionLocator::default(),
            min_text_items: 5,
            submit_timeout: Duration::from_secs(15),
            region_timeout: Duration::from_secs(20),
            poll_interval: Duration::from_millis(250),
            settle_delay: Duration::from_secs(2),
            headless: false,
            extract_after_failed_submit: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("base_url", &self.base_url)
            .field("images", &self.images)
            .field("output_dir", &self.output_dir)
            .field("search_url", &self.search_url)
            .field("input_selector", &self.input_selector)
            .field("region", &self.region)
            .field("min_text_items", &self.min_text_items)
            .field("submit_timeout", &self.submit_timeout)
            .field("region_timeout", &self.region_timeout)
            .field("poll_interval", &self.poll_interval)
            .field("settle_delay", &self.settle_delay)
            .field("headless", &self.headless)
            .field("extract_after_failed_submit", &self.extract_after_failed_submit)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn RunProgressCallback>"),
            )
            .finish()
    }
}

impl RunConfig {
    /// Create a new builder for `RunConfig`.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder {
            config: Self::default(),
        }
    }

    /// Submission URL for `image`.
    pub fn url_for(&self, image: &ImageRef) -> String {
        image_url(&self.base_url, &image.file_name)
    }
}

/// Builder for [`RunConfig`].
#[derive(Debug)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn images<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.images = names.into_iter().map(ImageRef::new).collect();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn search_url(mut self, url: impl Into<String>) -> Self {
        self.config.search_url = url.into();
        self
    }

    pub fn input_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.input_selector = selector.into();
        self
    }

    pub fn region(mut self, region: RegionLocator) -> Self {
        self.config.region = region;
        self
    }

    pub fn min_text_items(mut self, n: usize) -> Self {
        self.config.min_text_items = n;
        self
    }

    pub fn submit_timeout(mut self, timeout: Duration) -> Self {
        self.config.submit_timeout = timeout;
        self
    }

    pub fn region_timeout(mut self, timeout: Duration) -> Self {
        self.config.region_timeout = timeout;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay = delay;
        self
    }

    pub fn headless(mut self, v: bool) -> Self {
        self.config.headless = v;
        self
    }

    pub fn extract_after_failed_submit(mut self, v: bool) -> Self {
        self.config.extract_after_failed_submit = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RunConfig, Lens2DocxError> {
        let c = &self.config;
        if c.base_url.trim().is_empty() {
            return Err(Lens2DocxError::InvalidConfig("base URL is empty".into()));
        }
        if c.images.is_empty() {
            return Err(Lens2DocxError::InvalidConfig(
                "at least one image name is required".into(),
            ));
        }
        if let Some(bad) = c.images.iter().find(|i| i.file_name.trim().is_empty()) {
            return Err(Lens2DocxError::InvalidConfig(format!(
                "empty image name in list: {:?}",
                bad.file_name
            )));
        }
        if c.submit_timeout.is_zero() || c.region_timeout.is_zero() {
            return Err(Lens2DocxError::InvalidConfig(
                "timeouts must be greater than zero".into(),
            ));
        }
        if c.poll_interval.is_zero() {
            return Err(Lens2DocxError::InvalidConfig(
                "poll interval must be greater than zero".into(),
            ));
        }
        for (name, sel) in [
            ("input selector", &c.input_selector),
            ("container selector", &c.region.container),
            ("item selector", &c.region.item),
            ("kept item selector", &c.region.kept_item),
        ] {
            if sel.trim().is_empty() {
                return Err(Lens2DocxError::InvalidConfig(format!("{name} is empty")));
            }
        }
        Ok(self.config)
    }
}

// ── Page locators ────────────────────────────────────────────────────────

/// CSS selectors describing the result region on the Lens page.
///
/// These class names belong to Google's markup and change without notice;
/// when they drift the region waits time out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionLocator {
    /// The result container. Default: `.RTMDre`.
    pub container: String,
    /// Any recognized-text element inside the container, counted to decide
    /// whether the region finished loading. Default: `.lv6PAb`.
    pub item: String,
    /// Direct children kept in the capture; everything else is dropped.
    /// Default: `.lv6PAb.PyT1Q`.
    pub kept_item: String,
}

impl Default for RegionLocator {
    fn default() -> Self {
        Self {
            container: ".RTMDre".to_string(),
            item: ".lv6PAb".to_string(),
            kept_item: ".lv6PAb.PyT1Q".to_string(),
        }
    }
}

// ── Images ───────────────────────────────────────────────────────────────

/// One image to process, identified by its file name on the image host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub file_name: String,
}

impl ImageRef {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// File name without its extension; names the `.html` and `.docx` outputs.
    pub fn stem(&self) -> String {
        Path::new(&self.file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_name.clone())
    }

    /// `<dir>/<stem>.html`
    pub fn html_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.html", self.stem()))
    }

    /// `<dir>/<stem>.docx`
    pub fn docx_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.docx", self.stem()))
    }
}

/// Join `base` and `file_name` with exactly one `/`.
pub fn image_url(base: &str, file_name: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        file_name.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_run() {
        let c = RunConfig::default();
        assert_eq!(c.base_url, "http://mosishoki18.unaux.com/img");
        assert_eq!(c.search_url, "https://www.google.com/?olud");
        assert_eq!(c.images.len(), 3);
        assert_eq!(c.submit_timeout, Duration::from_secs(15));
        assert_eq!(c.region_timeout, Duration::from_secs(20));
        assert_eq!(c.settle_delay, Duration::from_secs(2));
        assert_eq!(c.min_text_items, 5);
        assert!(!c.headless);
        assert!(c.output_dir.is_none());
    }

    #[test]
    fn every_default_url_has_single_separator() {
        let c = RunConfig::default();
        for image in &c.images {
            let url = c.url_for(image);
            assert_eq!(url, format!("{}/{}", DEFAULT_BASE_URL, image.file_name));
            let after_scheme = url.split_once("://").map(|(_, r)| r).unwrap();
            assert!(!after_scheme.contains("//"), "double slash in {url}");
        }
    }

    #[test]
    fn image_url_normalises_slashes() {
        assert_eq!(image_url("http://h/img", "a.jpg"), "http://h/img/a.jpg");
        assert_eq!(image_url("http://h/img/", "a.jpg"), "http://h/img/a.jpg");
        assert_eq!(image_url("http://h/img", "/a.jpg"), "http://h/img/a.jpg");
        assert_eq!(image_url("http://h/img//", "//a.jpg"), "http://h/img/a.jpg");
    }

    #[test]
    fn stem_and_output_paths() {
        let img = ImageRef::new("scan.page-1.jpg");
        assert_eq!(img.stem(), "scan.page-1");
        let dir = Path::new("/out");
        assert_eq!(img.html_path(dir), PathBuf::from("/out/scan.page-1.html"));
        assert_eq!(img.docx_path(dir), PathBuf::from("/out/scan.page-1.docx"));
        assert_eq!(ImageRef::new("noext").stem(), "noext");
    }

    #[test]
    fn build_rejects_empty_images() {
        let err = RunConfig::builder()
            .images(Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("image"));
    }

    #[test]
    fn build_rejects_zero_timeout() {
        assert!(RunConfig::builder()
            .region_timeout(Duration::ZERO)
            .build()
            .is_err());
        assert!(RunConfig::builder()
            .poll_interval(Duration::ZERO)
            .build()
            .is_err());
    }

    #[test]
    fn build_rejects_blank_selector() {
        let region = RegionLocator {
            kept_item: " ".into(),
            ..RegionLocator::default()
        };
        assert!(RunConfig::builder().region(region).build().is_err());
    }

    #[test]
    fn debug_hides_callback() {
        let s = format!("{:?}", RunConfig::default());
        assert!(s.contains("RunConfig"));
        assert!(s.contains("progress_callback: None"));
    }
}
