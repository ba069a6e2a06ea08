//! Browser seam between the crawler and the engine that renders pages.

use crate::error::{CrawlError, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Remote-controlled browser as the crawler sees it: navigate somewhere,
/// report where it ended up, measure the rendered page, list anchor targets.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<()>;

    /// The URL the browser is actually on, after any redirects.
    async fn current_url(&self) -> Result<String>;

    /// Rendered height of the page body in CSS pixels.
    async fn content_height(&self) -> Result<u32>;

    /// The raw `href` attribute of every anchor element on the current page.
    /// Anchors without a usable attribute are skipped.
    async fn anchor_hrefs(&self) -> Result<Vec<String>>;

    async fn close(&self) -> Result<()>;
}

/// [`BrowserDriver`] backed by one headless Chromium tab via chromiumoxide.
pub struct ChromiumDriver {
    browser: Mutex<Browser>,
    page: Page,
    event_loop: JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch a headless browser with the given window width. The window
    /// height only affects rendering during the crawl, screenshots are taken
    /// by a separate process at the measured page height.
    pub async fn launch(width: u32) -> Result<Self> {
        let config = BrowserConfig::builder()
            .window_size(width, 1080)
            .build()
            .map_err(CrawlError::Launch)?;

        let (browser, mut handler) = Browser::launch(config).await?;
        let event_loop = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        debug!("launched headless browser at {width}px width");

        Ok(Self {
            browser: Mutex::new(browser),
            page,
            event_loop,
        })
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        let failed = |err: chromiumoxide::error::CdpError| CrawlError::Navigation {
            url: url.to_owned(),
            reason: err.to_string(),
        };
        self.page.goto(url).await.map_err(failed)?;
        self.page.wait_for_navigation().await.map_err(failed)?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        self.page
            .url()
            .await?
            .ok_or_else(|| CrawlError::Eval("page reported no URL".to_owned()))
    }

    async fn content_height(&self) -> Result<u32> {
        let height: f64 = self
            .page
            .evaluate("document.body.getBoundingClientRect().height")
            .await?
            .into_value()
            .map_err(|err| CrawlError::Eval(format!("body height: {err}")))?;
        Ok(height.ceil() as u32)
    }

    async fn anchor_hrefs(&self) -> Result<Vec<String>> {
        let mut hrefs = Vec::new();
        for element in self.page.find_elements("a").await? {
            match element.attribute("href").await {
                Ok(Some(href)) => hrefs.push(href),
                Ok(None) => {}
                // Stale or detached elements are not worth failing the page.
                Err(err) => warn!("skipping unreadable anchor: {err}"),
            }
        }
        Ok(hrefs)
    }

    async fn close(&self) -> Result<()> {
        let mut browser = self.browser.lock().await;
        browser.close().await?;
        browser.wait().await?;
        self.event_loop.abort();
        Ok(())
    }
}
