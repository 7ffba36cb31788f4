//! Chrome-backed [`BrowserSession`] via `chromiumoxide` (CDP, async).
//!
//! One Chrome process and one tab serve the whole run. The CDP handler runs
//! on its own tokio task and must be polled for any page call to complete.
//! Chrome starts with a visible window unless [`RunConfig::headless`] is set;
//! Google serves a reduced Lens page to some headless user agents.

use crate::config::{RegionLocator, RunConfig};
use crate::error::{Lens2DocxError, SessionError};
use crate::scripts;
use crate::session::{BrowserSession, RegionSnapshot, SessionLauncher};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Launches [`ChromeSession`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChromeLauncher;

#[async_trait]
impl SessionLauncher for ChromeLauncher {
    async fn launch(&self, config: &RunConfig) -> Result<Box<dyn BrowserSession>, Lens2DocxError> {
        let session = ChromeSession::launch(config.headless).await?;
        Ok(Box::new(session))
    }
}

/// A live Chrome tab.
pub struct ChromeSession {
    /// `None` once closed.
    browser: Mutex<Option<Browser>>,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    /// Start Chrome and open a blank tab.
    pub async fn launch(headless: bool) -> Result<Self, Lens2DocxError> {
        info!("Launching Chrome (headless: {})", headless);

        let mut builder = BrowserConfig::builder()
            .window_size(1280, 900)
            .arg("--disable-dev-shm-usage");
        if !headless {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|reason| Lens2DocxError::BrowserLaunch { reason })?;

        let (browser, mut handler) =
            Browser::launch(config)
                .await
                .map_err(|e| Lens2DocxError::BrowserLaunch {
                    reason: e.to_string(),
                })?;

        let handler = tokio::spawn(async move {
            let events = drive_handler(&mut handler).await;
            debug!("CDP handler event loop ended after {} events", events);
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| Lens2DocxError::BrowserLaunch {
                reason: format!("could not open a tab: {e}"),
            })?;

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            page,
            handler,
        })
    }

    async fn ensure_open(&self) -> Result<(), SessionError> {
        if self.browser.lock().await.is_none() {
            return Err(SessionError::Closed);
        }
        Ok(())
    }

    async fn eval<T: DeserializeOwned>(&self, js: String) -> Result<T, SessionError> {
        self.ensure_open().await?;
        let result = self
            .page
            .evaluate(js)
            .await
            .map_err(|e| SessionError::Script(e.to_string()))?;
        result
            .into_value::<T>()
            .map_err(|e| SessionError::Script(format!("unexpected result: {e}")))
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.ensure_open().await?;
        debug!("Navigating to {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| SessionError::Navigation {
                url: url.to_string(),
                detail: e.to_string(),
            })?;
        Ok(())
    }

    async fn element_exists(&self, selector: &str) -> Result<bool, SessionError> {
        self.eval(scripts::element_exists(selector)).await
    }

    async fn count_within(&self, container: &str, item: &str) -> Result<usize, SessionError> {
        self.eval(scripts::count_within(container, item)).await
    }

    async fn submit_text(&self, selector: &str, text: &str) -> Result<(), SessionError> {
        let cleared: bool = self.eval(scripts::clear_input(selector)).await?;
        if !cleared {
            return Err(SessionError::NotFound(selector.to_string()));
        }

        let input = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| SessionError::NotFound(selector.to_string()))?;
        input
            .click()
            .await
            .map_err(|e| SessionError::Input(format!("focus: {e}")))?;
        input
            .type_str(text)
            .await
            .map_err(|e| SessionError::Input(format!("typing: {e}")))?;
        input
            .press_key("Enter")
            .await
            .map_err(|e| SessionError::Input(format!("enter: {e}")))?;
        Ok(())
    }

    async fn snapshot_region(
        &self,
        region: &RegionLocator,
    ) -> Result<RegionSnapshot, SessionError> {
        let snapshot: Option<RegionSnapshot> =
            self.eval(scripts::snapshot_region(region)).await?;
        snapshot.ok_or_else(|| SessionError::NotFound(region.container.clone()))
    }

    async fn close(&self) -> Result<(), SessionError> {
        let Some(mut browser) = self.browser.lock().await.take() else {
            return Ok(());
        };
        info!("Closing Chrome");
        let result = browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| SessionError::Script(format!("close: {e}")));
        if let Err(e) = browser.wait().await {
            warn!("Chrome did not exit cleanly: {}", e);
        }
        self.handler.abort();
        result
    }
}

/// Poll the CDP handler until the connection closes.
///
/// The handler reports messages it cannot decode as errors; those are logged
/// and polling continues, since every page call depends on this loop.
/// Returns the number of events seen.
async fn drive_handler<S, E>(events: &mut S) -> usize
where
    S: Stream<Item = Result<(), E>> + Unpin,
    E: std::fmt::Display,
{
    let mut seen = 0;
    while let Some(event) = events.next().await {
        seen += 1;
        if let Err(e) = event {
            warn!("CDP handler event error: {}", e);
        }
    }
    seen
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
