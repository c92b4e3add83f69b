//! Title, description and lead image from document metadata.
//!
//! Each field is an ordered list of candidate evaluators; the first one that
//! yields a non-empty value wins, otherwise the field's default applies.

use scraper::{Html, Selector};
use serde::Serialize;
use shelf_common::text::{collapse_whitespace, truncate_chars};
use std::sync::LazyLock;
use url::Url;

pub const UNTITLED: &str = "Untitled Article";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedMetadata {
    pub title: String,
    pub description: String,
    /// Always absolute when present.
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct MetadataLimits {
    pub title_max_chars: usize,
    pub description_max_chars: usize,
}

impl Default for MetadataLimits {
    fn default() -> Self {
        Self {
            title_max_chars: 200,
            description_max_chars: 500,
        }
    }
}

type Candidate = fn(&Html) -> Option<String>;
type ImageCandidate = fn(&Html, &Url) -> Option<String>;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        static $name: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($css).expect("valid metadata selector"));
    };
}

selector!(OG_TITLE, r#"meta[property="og:title"]"#);
selector!(TWITTER_TITLE, r#"meta[name="twitter:title"], meta[property="twitter:title"]"#);
selector!(TITLE, "title");
selector!(OG_DESCRIPTION, r#"meta[property="og:description"]"#);
selector!(
    TWITTER_DESCRIPTION,
    r#"meta[name="twitter:description"], meta[property="twitter:description"]"#
);
selector!(META_DESCRIPTION, r#"meta[name="description"]"#);
selector!(OG_IMAGE, r#"meta[property="og:image"]"#);
selector!(TWITTER_IMAGE, r#"meta[name="twitter:image"], meta[property="twitter:image"]"#);

fn meta_content(doc: &Html, sel: &Selector) -> Option<String> {
    doc.select(sel)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

fn og_title(doc: &Html) -> Option<String> {
    meta_content(doc, &OG_TITLE)
}

fn twitter_title(doc: &Html) -> Option<String> {
    meta_content(doc, &TWITTER_TITLE)
}

fn title_element(doc: &Html) -> Option<String> {
    doc.select(&TITLE)
        .map(|el| el.text().collect::<String>())
        .find(|t| !t.trim().is_empty())
}

fn og_description(doc: &Html) -> Option<String> {
    meta_content(doc, &OG_DESCRIPTION)
}

fn twitter_description(doc: &Html) -> Option<String> {
    meta_content(doc, &TWITTER_DESCRIPTION)
}

fn meta_description(doc: &Html) -> Option<String> {
    meta_content(doc, &META_DESCRIPTION)
}

const TITLE_CHAIN: &[Candidate] = &[og_title, twitter_title, title_element];
const DESCRIPTION_CHAIN: &[Candidate] = &[og_description, twitter_description, meta_description];
const IMAGE_CHAIN: &[ImageCandidate] = &[og_image, twitter_image];

/// First non-empty (after trimming) result of `chain`.
pub fn first_non_empty(doc: &Html, chain: &[Candidate]) -> Option<String> {
    chain
        .iter()
        .filter_map(|candidate| candidate(doc))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

/// Resolve `raw` against `base`, accepting only absolute http(s) results.
pub fn absolute_http_url(base: &Url, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let resolved = base.join(raw).ok()?;
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

/// An unresolvable image value counts as empty so the chain moves on.
fn resolved_image(doc: &Html, sel: &Selector, base: &Url) -> Option<String> {
    doc.select(sel)
        .filter_map(|el| el.value().attr("content"))
        .find_map(|v| absolute_http_url(base, v))
}

fn og_image(doc: &Html, base: &Url) -> Option<String> {
    resolved_image(doc, &OG_IMAGE, base)
}

fn twitter_image(doc: &Html, base: &Url) -> Option<String> {
    resolved_image(doc, &TWITTER_IMAGE, base)
}

fn image(doc: &Html, base: &Url) -> Option<String> {
    IMAGE_CHAIN.iter().find_map(|candidate| candidate(doc, base))
}

/// Never fails; missing fields fall back to their defaults.
pub fn extract_metadata(doc: &Html, base: &Url, limits: MetadataLimits) -> ExtractedMetadata {
    let title = first_non_empty(doc, TITLE_CHAIN)
        .map(|t| truncate_chars(&collapse_whitespace(&t), limits.title_max_chars))
        .unwrap_or_else(|| UNTITLED.to_string());
    let description = first_non_empty(doc, DESCRIPTION_CHAIN)
        .map(|d| truncate_chars(&d, limits.description_max_chars))
        .unwrap_or_default();
    let image_url = image(doc, base);

    tracing::debug!(
        title_len = title.chars().count(),
        description_len = description.chars().count(),
        has_image = image_url.is_some(),
        "metadata.extracted"
    );

    ExtractedMetadata {
        title,
        description,
        image_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/posts/one").unwrap()
    }

    fn meta(head: &str) -> ExtractedMetadata {
        let html = Html::parse_document(&format!("<html><head>{head}</head><body></body></html>"));
        extract_metadata(&html, &base(), MetadataLimits::default())
    }

    #[test]
    fn social_card_fields_win() {
        let m = meta(
            r#"<title>Doc title</title>
            <meta property="og:title" content=" OG title ">
            <meta name="twitter:title" content="Tw title">
            <meta property="og:description" content="OG desc">
            <meta name="description" content="Plain desc">
            <meta property="og:image" content="/img/lead.png">"#,
        );
        assert_eq!(m.title, "OG title");
        assert_eq!(m.description, "OG desc");
        assert_eq!(m.image_url.as_deref(), Some("https://example.com/img/lead.png"));
    }

    #[test]
    fn falls_through_empty_candidates() {
        let m = meta(
            r#"<meta property="og:title" content="   ">
            <meta name="twitter:title" content="Tw title">
            <meta name="twitter:description" content="Tw desc">"#,
        );
        assert_eq!(m.title, "Tw title");
        assert_eq!(m.description, "Tw desc");
        assert_eq!(m.image_url, None);
    }

    #[test]
    fn title_element_then_default() {
        assert_eq!(meta("<title>\n  Hello  </title>").title, "Hello");
        assert_eq!(meta("").title, UNTITLED);
        assert_eq!(meta("").description, "");
    }

    #[test]
    fn generic_description_is_truncated() {
        let long = "d".repeat(700);
        let m = meta(&format!(r#"<meta name="description" content="{long}">"#));
        assert_eq!(m.description, "d".repeat(500));
    }

    #[test]
    fn title_is_truncated_to_limit() {
        let m = meta(&format!("<title>{}</title>", "t".repeat(250)));
        assert_eq!(m.title.chars().count(), 200);
    }

    #[test]
    fn image_resolution_forms() {
        let b = base();
        assert_eq!(
            absolute_http_url(&b, "//cdn.example.net/a.jpg").as_deref(),
            Some("https://cdn.example.net/a.jpg")
        );
        assert_eq!(
            absolute_http_url(&b, "lead.jpg").as_deref(),
            Some("https://example.com/posts/lead.jpg")
        );
        assert_eq!(absolute_http_url(&b, "data:image/png;base64,AA"), None);
        assert_eq!(absolute_http_url(&b, "  "), None);
    }

    #[test]
    fn unusable_og_image_falls_back_to_twitter() {
        let m = meta(
            r#"<meta property="og:image" content="javascript:alert(1)">
            <meta name="twitter:image" content="https://img.example.org/t.png">"#,
        );
        assert_eq!(m.image_url.as_deref(), Some("https://img.example.org/t.png"));
    }
}
