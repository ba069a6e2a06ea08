//! Pixel comparison of same-URL screenshots across parallel directory trees.

use crate::error::{CompareError, Result};
use image::{Rgba, RgbaImage};
use sitediff_crawler::paths;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Differing pixels are painted in this color on the diff artifact.
const HIGHLIGHT: Rgba<u8> = Rgba([220, 30, 30, 255]);

/// Outcome of comparing one screenshot against its baseline counterpart.
/// Geometry mismatches and unreadable images are *not* an outcome, they
/// surface as [`CompareError`] so callers cannot mistake a broken pair for
/// a rendering change.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffOutcome {
    Identical,
    Different { metric: f64, diff_artifact: PathBuf },
}

/// Compares screenshots from one crawl against a baseline tree and writes
/// visual diffs into a third, parallel tree.
pub struct DiffEngine {
    screenshot_dir: PathBuf,
    baseline_dir: PathBuf,
    diff_dir: PathBuf,
}

impl DiffEngine {
    /// `screenshot_dir` is the root the candidates were captured into;
    /// `baseline_dir` holds the earlier run with identical relative layout;
    /// diff artifacts mirror the same layout below `diff_dir`.
    pub fn new(
        screenshot_dir: impl Into<PathBuf>,
        baseline_dir: impl Into<PathBuf>,
        diff_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            screenshot_dir: screenshot_dir.into(),
            baseline_dir: baseline_dir.into(),
            diff_dir: diff_dir.into(),
        }
    }

    /// Where the baseline counterpart of `screenshot` lives.
    pub fn baseline_for(&self, screenshot: &Path) -> Result<PathBuf> {
        Ok(paths::rebase(
            screenshot,
            &self.screenshot_dir,
            &self.baseline_dir,
        )?)
    }

    /// Where a diff artifact for `screenshot` would be written.
    pub fn diff_artifact_for(&self, screenshot: &Path) -> Result<PathBuf> {
        Ok(paths::rebase(screenshot, &self.screenshot_dir, &self.diff_dir)?)
    }

    /// Compare a freshly captured screenshot to its baseline counterpart.
    ///
    /// Both images must agree on pixel geometry. Any nonzero difference
    /// counts as [`DiffOutcome::Different`] and materializes a diff artifact;
    /// there is no tolerance band.
    pub fn compare(&self, screenshot: &Path) -> Result<DiffOutcome> {
        let baseline_path = self.baseline_for(screenshot)?;
        let candidate = load_rgba(screenshot)?;
        let baseline = load_rgba(&baseline_path)?;

        if candidate.dimensions() != baseline.dimensions() {
            return Err(CompareError::GeometryMismatch {
                expected_width: baseline.width(),
                expected_height: baseline.height(),
                actual_width: candidate.width(),
                actual_height: candidate.height(),
            });
        }

        let metric = root_mean_square_error(&baseline, &candidate);
        debug!("compared {}: rmse {metric}", screenshot.display());

        if metric > 0.0 {
            let artifact = self.diff_artifact_for(screenshot)?;
            if let Some(parent) = artifact.parent() {
                paths::create_dir(parent)?;
            }
            render_diff(&baseline, &candidate)
                .save(&artifact)
                .map_err(|source| CompareError::WriteArtifact {
                    path: artifact.clone(),
                    source,
                })?;
            Ok(DiffOutcome::Different {
                metric,
                diff_artifact: artifact,
            })
        } else {
            Ok(DiffOutcome::Identical)
        }
    }
}

fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let loaded = image::open(path).map_err(|source| CompareError::LoadImage {
        path: path.to_owned(),
        source,
    })?;
    Ok(loaded.to_rgba8())
}

/// Root-mean-square error over all RGBA channels, normalized to `0.0..=1.0`.
/// Zero means pixel-identical; every deviation, however small, is positive.
fn root_mean_square_error(baseline: &RgbaImage, candidate: &RgbaImage) -> f64 {
    let mut sum = 0.0_f64;
    for (expected, actual) in baseline.pixels().zip(candidate.pixels()) {
        for channel in 0..4 {
            let delta = (f64::from(expected.0[channel]) - f64::from(actual.0[channel])) / 255.0;
            sum += delta * delta;
        }
    }
    let samples = f64::from(baseline.width()) * f64::from(baseline.height()) * 4.0;
    (sum / samples).sqrt()
}

/// Visual diff: changed pixels in a highlight color on top of a washed-out
/// rendition of the candidate, so the context stays recognizable.
fn render_diff(baseline: &RgbaImage, candidate: &RgbaImage) -> RgbaImage {
    let mut artifact = RgbaImage::new(candidate.width(), candidate.height());
    for (x, y, output) in artifact.enumerate_pixels_mut() {
        let expected = baseline.get_pixel(x, y);
        let actual = candidate.get_pixel(x, y);
        *output = if expected == actual {
            let Rgba([r, g, b, _]) = *actual;
            Rgba([wash(r), wash(g), wash(b), 255])
        } else {
            HIGHLIGHT
        };
    }
    artifact
}

fn wash(channel: u8) -> u8 {
    255 - (255 - channel) / 3
}
