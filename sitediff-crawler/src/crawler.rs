use crate::browser::BrowserDriver;
use crate::error::Result;
use crate::frontier::UrlFrontier;
use crate::links;
use crate::screenshot::ScreenshotService;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Fires synchronously after every captured screenshot with the visited URL
/// and the artifact path. Downstream consumers (the compare command chains
/// its diff engine in here) see each screenshot before the next page is
/// processed.
pub type ScreenshotCreatedCallback = Arc<dyn Fn(&str, &Path) + Send + Sync>;

/// Breadth-first crawler over the internal link graph of one site.
///
/// Visits one URL at a time: navigate, measure, capture, notify, then feed
/// the page's internal links back into the frontier. The first failing
/// browser or capture call aborts the whole run; the frontier is left at
/// the exact failure point so the caller can checkpoint it for recovery.
pub struct Crawler {
    driver: Arc<dyn BrowserDriver>,
    screenshots: ScreenshotService,
    base_url: String,
    on_screenshot: Option<ScreenshotCreatedCallback>,
}

impl Crawler {
    pub fn new(
        driver: Arc<dyn BrowserDriver>,
        screenshots: ScreenshotService,
        base_url: &str,
    ) -> Self {
        Self {
            driver,
            screenshots,
            base_url: normalize_base_url(base_url),
            on_screenshot: None,
        }
    }

    pub fn with_screenshot_callback(mut self, callback: ScreenshotCreatedCallback) -> Self {
        self.on_screenshot = Some(callback);
        self
    }

    /// The normalized crawl entry point (always ends in exactly one `/`).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A fresh frontier holding only the normalized base URL.
    pub fn seeded_frontier(&self) -> UrlFrontier {
        UrlFrontier::seeded(&self.base_url)
    }

    pub async fn crawl(&self, frontier: &mut UrlFrontier) -> Result<()> {
        while let Some(entry) = frontier.next_url().map(str::to_owned) {
            let target = self.resolve(&entry)?;
            debug!("visiting {target}");

            self.driver.navigate(&target).await?;
            let height = self.driver.content_height().await?;

            // Screenshots are keyed by where the browser actually ended up,
            // not by the href that led there.
            let current = self.driver.current_url().await?;
            let screenshot = self.screenshots.create_screenshot(&current, height).await?;
            if let Some(callback) = &self.on_screenshot {
                callback(&current, &screenshot);
            }

            frontier.mark_visited(&entry);

            let hrefs = self.driver.anchor_hrefs().await?;
            for link in links::internal_links(&hrefs, &self.base_url) {
                frontier.add_url(&link);
            }
        }

        info!("crawl finished, visited {} pages", frontier.visited().len());
        Ok(())
    }

    /// Frontier entries are stored as discovered, which includes relative
    /// references; navigation needs them absolute.
    fn resolve(&self, entry: &str) -> Result<String> {
        Ok(Url::parse(&self.base_url)?.join(entry)?.to_string())
    }
}

/// Right-trim any trailing slashes from the base URL, then append exactly
/// one, so the seed always compares equal to the browser's version of it.
pub fn normalize_base_url(base_url: &str) -> String {
    format!("{}/", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_base_url_forces_a_single_trailing_slash() {
        assert_eq!(normalize_base_url("https://x.test"), "https://x.test/");
        assert_eq!(normalize_base_url("https://x.test/"), "https://x.test/");
        assert_eq!(normalize_base_url("https://x.test//"), "https://x.test/");
    }
}
