// src/utils/url.rs

//! URL manipulation utilities.

/// Turn a scraped link into an absolute URL.
///
/// Root-relative links (`/job/1`) are prefixed with `base_url`; anything else
/// is assumed to be absolute already and returned unchanged.
///
/// # Examples
/// ```
/// use jobscan::utils::url::normalize_href;
///
/// assert_eq!(
///     normalize_href("https://example.com", "/job/1"),
///     "https://example.com/job/1"
/// );
/// assert_eq!(
///     normalize_href("https://example.com", "https://other.com/job/2"),
///     "https://other.com/job/2"
/// );
/// ```
pub fn normalize_href(base_url: &str, href: &str) -> String {
    if href.starts_with('/') {
        format!("{base_url}{href}")
    } else {
        href.to_string()
    }
}

/// Append an offset query parameter to a search URL.
///
/// Uses `&` when the URL already has a query string and `?` otherwise. A
/// trailing `#fragment` stays at the end.
pub fn paginate(search_url: &str, param: &str, offset: usize) -> String {
    let (base, fragment) = match search_url.find('#') {
        Some(idx) => search_url.split_at(idx),
        None => (search_url, ""),
    };
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{param}={offset}{fragment}")
}
