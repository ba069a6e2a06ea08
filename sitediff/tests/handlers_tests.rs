use sitediff::handlers::*;
use sitediff_crawler::UrlFrontier;
use std::path::{Path, PathBuf};

#[test]
fn test_resolve_root_keeps_absolute_paths() {
    let root = resolve_root("/srv/sitediff");
    assert_eq!(root, PathBuf::from("/srv/sitediff"));
}

#[test]
fn test_resolve_root_default_is_the_working_directory() {
    let root = resolve_root(".");
    assert_eq!(root, std::env::current_dir().unwrap());
}

#[test]
fn test_resolve_dir_joins_relative_options_onto_the_root() {
    let dir = resolve_dir(Path::new("/srv/sitediff"), "output/base");
    assert_eq!(dir, PathBuf::from("/srv/sitediff/output/base"));
}

#[test]
fn test_resolve_dir_leaves_absolute_options_alone() {
    let dir = resolve_dir(Path::new("/srv/sitediff"), "/var/screenshots");
    assert_eq!(dir, PathBuf::from("/var/screenshots"));
}

#[test]
fn test_recovery_file_path_maps_the_base_url_into_the_screenshot_dir() {
    let path = recovery_file_path(Path::new("/out/base"), "https://example.test/").unwrap();
    assert_eq!(path, PathBuf::from("/out/base/https/example.test.json"));
}

#[test]
fn test_recovery_file_path_rejects_garbage_urls() {
    assert!(recovery_file_path(Path::new("/out/base"), "not a url").is_err());
}

#[test]
fn test_recover_file_wire_format_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("https/example.test.json");
    std::fs::create_dir_all(snapshot.parent().unwrap()).unwrap();
    std::fs::write(
        &snapshot,
        serde_json::json!({
            "finishedUrls": ["https://example.test/", "/a"],
            "upcomingUrls": ["/b", "/c", "/d"],
        })
        .to_string(),
    )
    .unwrap();

    let frontier = UrlFrontier::load(&snapshot).unwrap();
    assert_eq!(frontier.visited(), ["https://example.test/", "/a"]);
    assert_eq!(frontier.pending().collect::<Vec<_>>(), ["/b", "/c", "/d"]);
    assert_eq!(frontier.next_url(), Some("/b"));
}
