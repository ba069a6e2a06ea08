pub mod browser;
pub mod crawler;
pub mod error;
pub mod frontier;
pub mod links;
pub mod paths;
pub mod screenshot;

pub use browser::{BrowserDriver, ChromiumDriver};
pub use crawler::Crawler;
pub use error::CrawlError;
pub use frontier::UrlFrontier;
pub use screenshot::{HeadlessChromeCapturer, ScreenshotCapturer, ScreenshotService};
