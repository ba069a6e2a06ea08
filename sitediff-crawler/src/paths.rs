use crate::error::{CrawlError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Map a URL to the relative artifact path used below every output root.
///
/// The path joins scheme, host, slash-trimmed URL path and query, skipping
/// components that are empty after trimming, and appends `.suffix` to the
/// last one. The same URL always maps to the same path, which is what keeps
/// the screenshot, baseline and diff trees aligned across runs.
pub fn target_path(url: &str, suffix: &str) -> Result<PathBuf> {
    let parsed = Url::parse(url)?;

    let scheme = parsed.scheme();
    let host = parsed.host_str().unwrap_or("");
    let path = parsed.path();
    let query = parsed.query().unwrap_or("");

    let components: Vec<&str> = [scheme, host, path, query]
        .into_iter()
        .map(|component| component.trim_matches(['/', ' ']))
        .filter(|component| !component.is_empty())
        .collect();

    let mut target = PathBuf::new();
    let (last, init) = components
        .split_last()
        .expect("scheme component is never empty");
    for component in init {
        target.push(component);
    }
    target.push(format!("{last}.{suffix}"));
    Ok(target)
}

/// Swap the `from_root` prefix of `path` for `to_root`.
///
/// Used to find a screenshot's counterpart in a parallel directory tree
/// (candidate <-> baseline <-> diff output).
pub fn rebase(path: &Path, from_root: &Path, to_root: &Path) -> Result<PathBuf> {
    let relative = path
        .strip_prefix(from_root)
        .map_err(|_| CrawlError::PathOutsideRoot {
            path: path.to_owned(),
            root: from_root.to_owned(),
        })?;
    Ok(to_root.join(relative))
}

/// Create a directory and all parents. Failure here is an environment
/// fault and aborts the run.
pub fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| CrawlError::CreateDir {
        dir: dir.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_path_joins_scheme_host_path_and_query() {
        let path = target_path("https://x.test/a/b?c=d", "png").unwrap();
        assert_eq!(path, PathBuf::from("https/x.test/a/b/c=d.png"));
    }

    #[test]
    fn target_path_is_deterministic() {
        let first = target_path("https://x.test/a/b?c=d", "png").unwrap();
        let second = target_path("https://x.test/a/b?c=d", "png").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn bare_base_url_maps_to_scheme_and_host_only() {
        let path = target_path("https://x.test/", "png").unwrap();
        assert_eq!(path, PathBuf::from("https/x.test.png"));
    }

    #[test]
    fn suffix_is_appended_to_the_final_component() {
        let path = target_path("https://x.test/nested/page/", "json").unwrap();
        assert_eq!(path, PathBuf::from("https/x.test/nested/page.json"));
    }

    #[test]
    fn distinct_urls_map_to_distinct_paths() {
        let by_query = target_path("https://x.test/a?p=1", "png").unwrap();
        let plain = target_path("https://x.test/a", "png").unwrap();
        let other_scheme = target_path("http://x.test/a", "png").unwrap();
        assert_ne!(by_query, plain);
        assert_ne!(plain, other_scheme);
    }

    #[test]
    fn rebase_replaces_the_root_prefix() {
        let rebased = rebase(
            Path::new("/out/compare/https/x.test/a.png"),
            Path::new("/out/compare"),
            Path::new("/out/base"),
        )
        .unwrap();
        assert_eq!(rebased, PathBuf::from("/out/base/https/x.test/a.png"));
    }

    #[test]
    fn rebase_rejects_paths_outside_the_root() {
        let result = rebase(
            Path::new("/elsewhere/a.png"),
            Path::new("/out/compare"),
            Path::new("/out/base"),
        );
        assert!(matches!(result, Err(CrawlError::PathOutsideRoot { .. })));
    }
}
