use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Browser call failed: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Navigation to \"{url}\" failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Unusable value from browser: {0}")]
    Eval(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Screenshot of \"{url}\" timed out after {timeout:?}")]
    CaptureTimeout { url: String, timeout: Duration },

    #[error("Screenshot process for \"{url}\" exited with {status}")]
    CaptureFailed {
        url: String,
        status: std::process::ExitStatus,
    },

    #[error("Could not create directory \"{dir}\": {source}")]
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("Path \"{path}\" is not below \"{root}\"")]
    PathOutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Malformed frontier snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
