//! Link-safety attribute values shared by the sanitizer and the block renderer.

/// Opens the link in a new browsing context.
pub const SAFE_LINK_TARGET: &str = "_blank";

/// No `window.opener` back-reference and no `Referer` leakage.
pub const SAFE_LINK_REL: &str = "noopener noreferrer";

/// True for `href` values that must not be marked as out-of-page links:
/// in-page fragments and script pseudo-protocol links.
///
/// ```
/// use shelf_common::links::is_local_or_script_href;
///
/// assert!(is_local_or_script_href("#notes"));
/// assert!(is_local_or_script_href(" JavaScript:alert(1)"));
/// assert!(!is_local_or_script_href("https://example.com/"));
/// ```
pub fn is_local_or_script_href(href: &str) -> bool {
    let href = href.trim_start();
    if href.starts_with('#') {
        return true;
    }
    // Browsers ignore embedded whitespace/control chars in the scheme.
    let scheme: String = href
        .chars()
        .take_while(|c| *c != ':')
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    href.contains(':') && matches!(scheme.as_str(), "javascript" | "vbscript")
}
