use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Could not load image \"{path}\": {source}")]
    LoadImage {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error(
        "Screenshots don't have an equal geometry. \
         Should be {expected_width}x{expected_height} but is {actual_width}x{actual_height}"
    )]
    GeometryMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Could not write diff artifact \"{path}\": {source}")]
    WriteArtifact {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error(transparent)]
    Crawl(#[from] sitediff_crawler::CrawlError),
}

pub type Result<T> = std::result::Result<T, CompareError>;
