use tracing::debug;
use url::{ParseError, Url};

/// Filter raw anchor hrefs down to links on the crawled site.
///
/// A candidate counts as internal when its host component is empty (a
/// relative reference) or exactly matches the host of `base_url`. Internal
/// links are returned exactly as found; everything else - external hosts,
/// blank attributes, unparseable strings - is dropped without comment.
/// Order is preserved and nothing is deduplicated here, that is the
/// frontier's job.
pub fn internal_links<S: AsRef<str>>(hrefs: &[S], base_url: &str) -> Vec<String> {
    let base = Url::parse(base_url).ok();
    let base_host = base
        .as_ref()
        .and_then(|url| url.host_str())
        .map(str::to_owned);

    hrefs
        .iter()
        .filter_map(|href| classify(href.as_ref(), base.as_ref(), base_host.as_deref()))
        .collect()
}

fn classify(href: &str, base: Option<&Url>, base_host: Option<&str>) -> Option<String> {
    if href.trim().is_empty() {
        return None;
    }

    match Url::parse(href) {
        Ok(parsed) => match parsed.host_str() {
            None => Some(href.to_owned()),
            Some(host) if Some(host) == base_host => Some(href.to_owned()),
            Some(host) => {
                debug!("dropping external link to {host}: {href}");
                None
            }
        },
        // Relative references have no host, but must still resolve against
        // the base to rule out garbage attributes.
        Err(ParseError::RelativeUrlWithoutBase) => {
            base?.join(href).ok()?;
            Some(href.to_owned())
        }
        Err(_) => {
            debug!("dropping malformed link: {href}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://x.test/";

    #[test]
    fn relative_link_is_internal_and_kept_as_is() {
        let links = internal_links(&["/about"], BASE);
        assert_eq!(links, ["/about"]);
    }

    #[test]
    fn absolute_link_on_same_host_is_internal() {
        let links = internal_links(&["https://x.test/contact"], BASE);
        assert_eq!(links, ["https://x.test/contact"]);
    }

    #[test]
    fn external_host_is_dropped() {
        let links = internal_links(&["https://evil.test/x"], BASE);
        assert!(links.is_empty());
    }

    #[test]
    fn subdomain_is_not_the_same_host() {
        let links = internal_links(&["https://www.x.test/"], BASE);
        assert!(links.is_empty());
    }

    #[test]
    fn malformed_and_blank_candidates_are_dropped_silently() {
        let links = internal_links(&["", "   ", "https://x with spaces/"], BASE);
        assert!(links.is_empty());
    }

    #[test]
    fn order_is_preserved_and_duplicates_survive() {
        let links = internal_links(&["/b", "/a", "/b"], BASE);
        assert_eq!(links, ["/b", "/a", "/b"]);
    }
}
