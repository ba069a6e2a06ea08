//! Full-page screenshot capture through an external headless browser process.

use crate::error::{CrawlError, Result};
use crate::paths;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Upper bound for a single capture; expiry is fatal for the crawl run.
pub const CAPTURE_TIMEOUT: Duration = Duration::from_secs(120);

/// Anything that can materialize a page as an image file on disk, given the
/// URL, a target path and the viewport dimensions.
#[async_trait]
pub trait ScreenshotCapturer: Send + Sync {
    async fn capture(&self, url: &str, target: &Path, width: u32, height: u32) -> Result<()>;
}

/// Captures by spawning a headless Chrome/Chromium process per page.
pub struct HeadlessChromeCapturer {
    binary: PathBuf,
}

impl HeadlessChromeCapturer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for HeadlessChromeCapturer {
    fn default() -> Self {
        Self::new("chromium-browser")
    }
}

#[async_trait]
impl ScreenshotCapturer for HeadlessChromeCapturer {
    async fn capture(&self, url: &str, target: &Path, width: u32, height: u32) -> Result<()> {
        let mut command = Command::new(&self.binary);
        command
            .arg("--headless")
            .arg("--disable-gpu")
            .arg(format!("--window-size={width},{height}"))
            .arg(format!("--screenshot={}", target.display()))
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let status = tokio::time::timeout(CAPTURE_TIMEOUT, command.status())
            .await
            .map_err(|_| CrawlError::CaptureTimeout {
                url: url.to_owned(),
                timeout: CAPTURE_TIMEOUT,
            })??;

        if !status.success() {
            return Err(CrawlError::CaptureFailed {
                url: url.to_owned(),
                status,
            });
        }
        Ok(())
    }
}

/// Owns the screenshot output tree: derives the artifact path for a URL,
/// makes sure its directory exists and hands the actual capture to the
/// configured [`ScreenshotCapturer`].
pub struct ScreenshotService {
    capturer: Arc<dyn ScreenshotCapturer>,
    screenshot_dir: PathBuf,
    width: u32,
}

impl ScreenshotService {
    pub fn new(
        capturer: Arc<dyn ScreenshotCapturer>,
        screenshot_dir: impl Into<PathBuf>,
        width: u32,
    ) -> Self {
        Self {
            capturer,
            screenshot_dir: screenshot_dir.into(),
            width,
        }
    }

    pub fn screenshot_dir(&self) -> &Path {
        &self.screenshot_dir
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Capture `url` at the configured width and the measured page height,
    /// returning the path of the written artifact.
    pub async fn create_screenshot(&self, url: &str, height: u32) -> Result<PathBuf> {
        let target = self.screenshot_dir.join(paths::target_path(url, "png")?);
        if let Some(parent) = target.parent() {
            paths::create_dir(parent)?;
        }

        debug!("capturing {url} at {}x{height}", self.width);
        self.capturer
            .capture(url, &target, self.width, height)
            .await?;
        Ok(target)
    }
}
