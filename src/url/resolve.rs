use url::Url;

/// Resolves a reference found in a document against the page's URL
///
/// Resolution follows the standard base + reference rules: absolute
/// references replace the base, relative ones are merged with the base path,
/// and query/fragment handling is left to the `url` crate.
///
/// Returns `None` when the reference cannot be resolved or when it resolves to
/// something other than an HTTP(S) URL (`mailto:`, `javascript:`, `data:`, ...),
/// since there is nothing to fetch behind those.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use gleaner::url::resolve_reference;
///
/// let base = Url::parse("http://example.com/docs/index.html").unwrap();
/// assert_eq!(
///     resolve_reference(&base, "guide.html").unwrap().as_str(),
///     "http://example.com/docs/guide.html"
/// );
/// assert!(resolve_reference(&base, "mailto:someone@example.com").is_none());
/// ```
pub fn resolve_reference(base: &Url, reference: &str) -> Option<Url> {
    match base.join(reference) {
        Ok(resolved) if is_fetchable(&resolved) => Some(resolved),
        Ok(resolved) => {
            tracing::trace!("Dropping non-HTTP reference {}", resolved);
            None
        }
        Err(e) => {
            tracing::debug!("Dropping unresolvable reference '{}': {}", reference, e);
            None
        }
    }
}

/// Returns true for URLs the crawler knows how to fetch
pub fn is_fetchable(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/a/b/page.html?x=1#top").unwrap()
    }

    #[test]
    fn test_absolute_reference_overrides_base() {
        let resolved = resolve_reference(&base_url(), "https://other.com/page").unwrap();
        assert_eq!(resolved.as_str(), "https://other.com/page");
    }

    #[test]
    fn test_root_relative_reference() {
        let resolved = resolve_reference(&base_url(), "/other").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/other");
    }

    #[test]
    fn test_path_relative_reference() {
        let resolved = resolve_reference(&base_url(), "other.html").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/a/b/other.html");

        let resolved = resolve_reference(&base_url(), "../up.html").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/a/up.html");
    }

    #[test]
    fn test_scheme_relative_reference() {
        let resolved = resolve_reference(&base_url(), "//cdn.example.net/x.png").unwrap();
        assert_eq!(resolved.as_str(), "https://cdn.example.net/x.png");
    }

    #[test]
    fn test_query_and_fragment_references() {
        let resolved = resolve_reference(&base_url(), "?y=2").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/a/b/page.html?y=2");

        let resolved = resolve_reference(&base_url(), "#section").unwrap();
        assert_eq!(
            resolved.as_str(),
            "https://example.com/a/b/page.html?x=1#section"
        );
    }

    #[test]
    fn test_empty_reference_is_the_page_itself() {
        let resolved = resolve_reference(&base_url(), "").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/a/b/page.html?x=1");
    }

    #[test]
    fn test_values_are_not_case_normalized() {
        let resolved = resolve_reference(&base_url(), "/Docs/README.md").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/Docs/README.md");
    }

    #[test]
    fn test_non_http_schemes_dropped() {
        assert!(resolve_reference(&base_url(), "mailto:test@example.com").is_none());
        assert!(resolve_reference(&base_url(), "javascript:void(0)").is_none());
        assert!(resolve_reference(&base_url(), "tel:+1234567890").is_none());
        assert!(resolve_reference(&base_url(), "data:text/plain,hi").is_none());
    }

    #[test]
    fn test_malformed_reference_dropped() {
        assert!(resolve_reference(&base_url(), "http://[::1").is_none());
        assert!(resolve_reference(&base_url(), "https://exa mple.com/").is_none());
    }
}
