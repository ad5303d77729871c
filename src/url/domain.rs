use url::Url;

/// Returns the host segment used to namespace saved files
///
/// The host is lowercased and keeps an explicit port, so two sites served
/// from the same machine on different ports land in disjoint directories.
/// Returns `None` for URLs without a host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use gleaner::url::host_segment;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(host_segment(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(host_segment(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn host_segment(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}
