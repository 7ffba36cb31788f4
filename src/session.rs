//! The browser seam: what the pipeline needs from a live browser tab.
//!
//! [`BrowserSession`] is the capability set the steps are written against.
//! The production implementation is [`crate::browser::ChromeSession`];
//! tests drive the same steps with in-memory fakes.
//!
//! The session only reports what the page shows. Waiting, sanitising and
//! document assembly happen in [`crate::pipeline`], so they can be exercised
//! without a browser.

use crate::config::{RegionLocator, RunConfig};
use crate::error::{Lens2DocxError, SessionError};
use crate::pipeline::document::TextDirection;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One browser tab, owned by the run for its whole duration.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Load `url` and wait for the navigation to commit.
    async fn navigate(&self, url: &str) -> Result<(), SessionError>;

    /// Whether any element matches `selector` right now.
    async fn element_exists(&self, selector: &str) -> Result<bool, SessionError>;

    /// Number of `item` elements inside the first `container` match
    /// (0 when the container is absent).
    async fn count_within(&self, container: &str, item: &str) -> Result<usize, SessionError>;

    /// Clear the input matching `selector`, type `text`, press Enter.
    async fn submit_text(&self, selector: &str, text: &str) -> Result<(), SessionError>;

    /// Read the result region described by `region`.
    async fn snapshot_region(&self, region: &RegionLocator)
        -> Result<RegionSnapshot, SessionError>;

    /// Shut the browser down. Further calls return [`SessionError::Closed`].
    async fn close(&self) -> Result<(), SessionError>;
}

/// Starts the single session a run uses.
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self, config: &RunConfig) -> Result<Box<dyn BrowserSession>, Lens2DocxError>;
}

/// The result region as the page reported it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSnapshot {
    /// Container start tag with all its attributes, e.g. `<div class="RTMDre">`.
    pub open_tag: String,
    /// Matching end tag, e.g. `</div>`.
    pub close_tag: String,
    /// Direct children of the container that match the kept-item selector,
    /// in document order.
    pub items: Vec<RegionItem>,
    /// Rendered width in CSS pixels.
    pub width: f64,
    /// Rendered height in CSS pixels.
    pub height: f64,
    /// Computed `direction` of the page body (`"ltr"` or `"rtl"`).
    pub direction: String,
    /// Inner markup of the page `<head>` (styles, fonts).
    pub head_html: String,
}

impl RegionSnapshot {
    pub fn text_direction(&self) -> TextDirection {
        TextDirection::from_computed(&self.direction)
    }
}

/// One recognized-text element kept from the region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionItem {
    /// The element's markup without the injected label.
    pub outer_html: String,
    /// Its `aria-label` attribute; `None` when absent.
    pub aria_label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_deserialises_from_page_json() {
        let json = r#"{
            "openTag": "<div class=\"RTMDre\">",
            "closeTag": "</div>",
            "items": [
                {"outerHtml": "<div class=\"lv6PAb PyT1Q\"></div>", "ariaLabel": "Hello"},
                {"outerHtml": "<div class=\"lv6PAb PyT1Q\"></div>", "ariaLabel": null}
            ],
            "width": 412.5,
            "height": 300,
            "direction": "rtl",
            "headHtml": "<style>body{}</style>"
        }"#;
        let snap: RegionSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.items.len(), 2);
        assert_eq!(snap.items[0].aria_label.as_deref(), Some("Hello"));
        assert_eq!(snap.items[1].aria_label, None);
        assert_eq!(snap.width, 412.5);
        assert_eq!(snap.text_direction(), TextDirection::Rtl);
    }
}
