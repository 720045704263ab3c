use url::Url;

/// Resolves a potentially relative href against a base URL.
///
/// Absolute hrefs are returned trimmed but otherwise untouched, so the same
/// href found by different scans yields the same string. Relative and
/// protocol-relative hrefs are joined onto `base_url`; if that is not
/// possible the trimmed href is returned as-is.
pub fn resolve_url(href: &str, base_url: Option<&str>) -> String {
    let href = href.trim();

    if Url::parse(href).is_ok() {
        return href.to_owned();
    }

    base_url
        .and_then(|base| Url::parse(base.trim()).ok())
        .and_then(|base| base.join(href).ok())
        .map(String::from)
        .unwrap_or_else(|| href.to_owned())
}
