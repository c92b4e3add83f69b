//! Relative-reference resolution for `href`/`src` values.

use url::Url;

/// Resolve `raw` against `base`.
///
/// Absolute values come back verbatim (trimmed). Relative ones follow standard
/// reference resolution: `//host/x` takes the base scheme, `/x` the base
/// origin, `x` is joined to the base path. A value that cannot be resolved is
/// logged and returned unchanged.
///
/// ```
/// use shelf_web::sanitize::resolve_url;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/blog/post.html").unwrap();
/// assert_eq!(resolve_url(&base, "img/a.png"), "https://example.com/blog/img/a.png");
/// assert_eq!(resolve_url(&base, "/a.png"), "https://example.com/a.png");
/// assert_eq!(resolve_url(&base, "//cdn.example.net/a.png"), "https://cdn.example.net/a.png");
/// assert_eq!(resolve_url(&base, "http://other.org/x?y=1"), "http://other.org/x?y=1");
/// ```
pub fn resolve_url(base: &Url, raw: &str) -> String {
    let raw = raw.trim();
    if is_absolute(raw) {
        return raw.to_string();
    }
    match base.join(raw) {
        Ok(url) => url.to_string(),
        Err(err) => {
            tracing::warn!(value = raw, base = %base, error = %err, "sanitize.url.unresolved");
            raw.to_string()
        }
    }
}

/// Schemes whose absolute form always carries an authority.
const SPECIAL_SCHEMES: &[&str] = &["http", "https", "ws", "wss", "ftp", "file"];

/// Parses on its own and, for special schemes, has `//` after the colon.
/// `https:foo` parses but a browser resolves it against the page.
fn is_absolute(raw: &str) -> bool {
    let Ok(url) = Url::parse(raw) else {
        return false;
    };
    if !SPECIAL_SCHEMES.contains(&url.scheme()) {
        return true;
    }
    let rest = raw.get(url.scheme().len() + 1..).unwrap_or_default();
    let mut slashes = rest.chars().take(2).filter(|c| matches!(c, '/' | '\\'));
    slashes.next().is_some() && slashes.next().is_some()
}

/// Scheme of an absolute URL string, lowercased.
pub fn scheme_of(value: &str) -> Option<String> {
    Url::parse(value).ok().map(|u| u.scheme().to_ascii_lowercase())
}
