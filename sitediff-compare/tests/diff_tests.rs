// Diff engine tests over generated PNG fixtures in parallel directory trees.

use image::{Rgba, RgbaImage};
use sitediff_compare::{CompareError, DiffEngine, DiffOutcome};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const RELATIVE: &str = "https/example.test/a.png";

struct Fixture {
    _dir: TempDir,
    compare_root: PathBuf,
    baseline_root: PathBuf,
    diff_root: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let fixture = Self {
            compare_root: dir.path().join("compare"),
            baseline_root: dir.path().join("base"),
            diff_root: dir.path().join("diffResult"),
            _dir: dir,
        };
        std::fs::create_dir_all(&fixture.compare_root).unwrap();
        std::fs::create_dir_all(&fixture.baseline_root).unwrap();
        fixture
    }

    fn engine(&self) -> DiffEngine {
        DiffEngine::new(&self.compare_root, &self.baseline_root, &self.diff_root)
    }

    fn write(&self, root: &Path, img: &RgbaImage) -> PathBuf {
        let path = root.join(RELATIVE);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        img.save(&path).unwrap();
        path
    }
}

fn flat(width: u32, height: u32, pixel: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(pixel))
}

#[test]
fn identical_screenshots_compare_as_identical() {
    let fixture = Fixture::new();
    let img = flat(8, 6, [120, 130, 140, 255]);
    fixture.write(&fixture.baseline_root, &img);
    let candidate = fixture.write(&fixture.compare_root, &img);

    let outcome = fixture.engine().compare(&candidate).unwrap();
    assert_eq!(outcome, DiffOutcome::Identical);
    assert!(!fixture.diff_root.exists());
}

#[test]
fn single_changed_pixel_is_different_and_produces_an_artifact() {
    let fixture = Fixture::new();
    let baseline = flat(8, 6, [120, 130, 140, 255]);
    let mut changed = baseline.clone();
    changed.put_pixel(3, 2, Rgba([121, 130, 140, 255]));

    fixture.write(&fixture.baseline_root, &baseline);
    let candidate = fixture.write(&fixture.compare_root, &changed);

    let outcome = fixture.engine().compare(&candidate).unwrap();
    let DiffOutcome::Different {
        metric,
        diff_artifact,
    } = outcome
    else {
        panic!("expected a difference, got {outcome:?}");
    };

    assert!(metric > 0.0);
    assert_eq!(diff_artifact, fixture.diff_root.join(RELATIVE));
    let artifact = image::open(&diff_artifact).unwrap().to_rgba8();
    assert_eq!(artifact.dimensions(), (8, 6));
}

#[test]
fn metric_is_deterministic_across_runs() {
    let fixture = Fixture::new();
    let baseline = flat(8, 6, [120, 130, 140, 255]);
    let mut changed = baseline.clone();
    changed.put_pixel(0, 0, Rgba([0, 0, 0, 255]));

    fixture.write(&fixture.baseline_root, &baseline);
    let candidate = fixture.write(&fixture.compare_root, &changed);

    let engine = fixture.engine();
    let first = engine.compare(&candidate).unwrap();
    let second = engine.compare(&candidate).unwrap();
    assert_eq!(first, second);
}

#[test]
fn geometry_mismatch_is_an_error_naming_both_geometries() {
    let fixture = Fixture::new();
    fixture.write(&fixture.baseline_root, &flat(8, 6, [9, 9, 9, 255]));
    let candidate = fixture.write(&fixture.compare_root, &flat(8, 7, [9, 9, 9, 255]));

    let error = fixture.engine().compare(&candidate).unwrap_err();
    assert!(matches!(error, CompareError::GeometryMismatch { .. }));
    let message = error.to_string();
    assert!(message.contains("8x6"), "missing baseline geometry: {message}");
    assert!(message.contains("8x7"), "missing candidate geometry: {message}");

    // A broken pair must not leave a diff artifact behind.
    assert!(!fixture.diff_root.exists());
}

#[test]
fn missing_baseline_is_a_load_error() {
    let fixture = Fixture::new();
    let candidate = fixture.write(&fixture.compare_root, &flat(4, 4, [1, 2, 3, 255]));

    let error = fixture.engine().compare(&candidate).unwrap_err();
    assert!(matches!(error, CompareError::LoadImage { .. }));
}

#[test]
fn candidate_outside_the_screenshot_tree_is_rejected() {
    let fixture = Fixture::new();
    let stray = fixture._dir.path().join("elsewhere.png");
    flat(4, 4, [1, 2, 3, 255]).save(&stray).unwrap();

    let error = fixture.engine().compare(&stray).unwrap_err();
    assert!(matches!(error, CompareError::Crawl(_)));
}
