//! Main-content isolation.
//!
//! Three tiers, tried in order over one filtered working copy:
//!
//! 1. density scoring ([`score`]): the best container must carry at least
//!    `min_content_length` characters and must not be the page body itself
//! 2. structural selectors ([`fallback::SELECTOR_CANDIDATES`])
//! 3. paragraph harvesting, which yields plain text
//!
//! Nothing here fails: exhausting every tier yields [`ContentCandidate::Empty`].

pub mod clean;
pub mod fallback;
pub mod score;

use scraper::{ElementRef, Selector};
use shelf_config::ExtractConfig;
use std::sync::LazyLock;

use crate::document::ParsedDocument;
use crate::dom::Dom;
use crate::sanitize::SanitizePolicy;

static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid body selector"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentCandidate {
    /// Unsanitized markup from the scoring or selector tier.
    Markup(String),
    /// Harvested paragraphs separated by blank lines.
    PlainText(String),
    Empty,
}

#[derive(Debug, Clone, Copy)]
pub struct ReadabilityOptions {
    pub min_content_length: usize,
    pub max_top_candidates: usize,
}

impl Default for ReadabilityOptions {
    fn default() -> Self {
        Self {
            min_content_length: 250,
            max_top_candidates: 5,
        }
    }
}

impl From<&ExtractConfig> for ReadabilityOptions {
    fn from(cfg: &ExtractConfig) -> Self {
        Self {
            min_content_length: cfg.min_content_length,
            max_top_candidates: cfg.max_top_candidates,
        }
    }
}

fn content_root(doc: &ParsedDocument) -> ElementRef<'_> {
    doc.html
        .select(&BODY)
        .next()
        .unwrap_or_else(|| doc.html.root_element())
}

fn primary(dom: &Dom, opts: &ReadabilityOptions) -> Option<String> {
    let stats = score::TextStats::compute(dom);
    let scores = score::score_candidates(dom, &stats);
    let top = score::select_top(dom, &scores, opts.max_top_candidates)?;

    let tag = dom.tag(top.id).unwrap_or_default();
    let text_len = dom.normalized_text(top.id).chars().count();
    tracing::debug!(
        candidates = scores.len(),
        top_tag = tag,
        top_score = top.score,
        text_len,
        "extract.primary.top"
    );
    if matches!(tag, "body" | "html") || text_len < opts.min_content_length {
        return None;
    }

    let parts = score::merge_siblings(dom, &stats, &scores, &top);
    let mut markup = String::from("<div>");
    for id in parts {
        markup.push_str(&dom.outer_html(id));
    }
    markup.push_str("</div>");
    Some(markup)
}

/// Locate the main content of `doc`.
pub fn extract_content(
    doc: &ParsedDocument,
    opts: &ReadabilityOptions,
    policy: &SanitizePolicy,
) -> ContentCandidate {
    let dom = clean::working_copy(content_root(doc), &doc.url, policy);

    if let Some(markup) = primary(&dom, opts) {
        tracing::debug!(tier = "scoring", bytes = markup.len(), "extract.tier.selected");
        return ContentCandidate::Markup(markup);
    }
    if let Some((selector, markup)) = fallback::select_structural(&dom) {
        tracing::debug!(tier = "selector", selector, bytes = markup.len(), "extract.tier.selected");
        return ContentCandidate::Markup(markup);
    }
    if let Some(text) = fallback::harvest_paragraphs(&dom) {
        tracing::debug!(tier = "paragraphs", bytes = text.len(), "extract.tier.selected");
        return ContentCandidate::PlainText(text);
    }

    tracing::info!(url = %doc.url, "extract.content.unavailable");
    ContentCandidate::Empty
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn extract(html: &str) -> ContentCandidate {
        let doc = ParsedDocument::from_html(html, Url::parse("https://example.com/a/b").unwrap());
        extract_content(&doc, &ReadabilityOptions::default(), &SanitizePolicy::default())
    }

    const PARA: &str = "Readers come for the story, and the story is told in long paragraphs, with commas, clauses, and plenty of words.";

    #[test]
    fn scoring_tier_finds_article_container() {
        let html = format!(
            r#"<html><body><nav><a href="/">Home</a><a href="/about">About</a></nav>
            <div class="sidebar"><p>{PARA}</p></div>
            <div id="story"><p>{PARA}</p><p>{PARA}</p><p>{PARA}</p></div>
            <footer>Copyright</footer></body></html>"#
        );
        let ContentCandidate::Markup(markup) = extract(&html) else {
            panic!("expected markup");
        };
        assert!(markup.contains(r#"id="story""#));
        assert!(!markup.contains("Home"));
        assert!(!markup.contains("Copyright"));
        assert!(!markup.contains("sidebar"));
    }

    #[test]
    fn selector_tier_when_scoring_is_too_short() {
        let html = "<body><div class=\"content\"><h2>Notes</h2><ul>\
            <li>One short bullet about a topic</li><li>Another short bullet here</li>\
            <li>A third bullet to pass the length bar</li><li>And a fourth one</li></ul></div></body>";
        let ContentCandidate::Markup(markup) = extract(html) else {
            panic!("expected markup");
        };
        assert!(markup.starts_with(r#"<div class="content">"#));
    }

    #[test]
    fn harvests_bare_paragraphs() {
        let html = "<body><p>First paragraph with enough text.</p>\
            <p>Second paragraph with enough text.</p></body>";
        assert_eq!(
            extract(html),
            ContentCandidate::PlainText(
                "First paragraph with enough text.\n\nSecond paragraph with enough text.".into()
            )
        );
    }

    #[test]
    fn bare_body_text_is_kept_as_markup() {
        let text = "Plain words straight in the body with no wrapping element. ".repeat(5);
        let ContentCandidate::Markup(markup) = extract(&format!("<html><body>{text}</body></html>"))
        else {
            panic!("expected markup");
        };
        assert!(markup.contains("Plain words straight in the body"));
    }

    #[test]
    fn empty_when_nothing_usable() {
        assert_eq!(extract("<body><span>hi</span></body>"), ContentCandidate::Empty);
        assert_eq!(extract(""), ContentCandidate::Empty);
    }
}
