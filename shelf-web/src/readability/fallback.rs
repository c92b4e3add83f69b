//! Structural selector tier and paragraph harvesting.

use crate::dom::{Dom, NodeId};

/// Text a structural candidate must exceed, in characters.
pub const MIN_SELECTOR_TEXT: usize = 100;

/// Text a harvested paragraph must exceed, in characters.
pub const MIN_HARVEST_TEXT: usize = 20;

type Predicate = fn(&Dom, NodeId) -> bool;

fn article(dom: &Dom, id: NodeId) -> bool {
    dom.is_tag(id, "article")
}

fn article_class(dom: &Dom, id: NodeId) -> bool {
    dom.has_class(id, "article")
}

fn article_body_class(dom: &Dom, id: NodeId) -> bool {
    dom.has_class(id, "article-body")
}

fn article_body_itemprop(dom: &Dom, id: NodeId) -> bool {
    dom.attr(id, "itemprop") == Some("articleBody")
}

fn main_element(dom: &Dom, id: NodeId) -> bool {
    dom.is_tag(id, "main")
}

fn main_role(dom: &Dom, id: NodeId) -> bool {
    dom.attr(id, "role").is_some_and(|r| r.eq_ignore_ascii_case("main"))
}

fn main_content_class(dom: &Dom, id: NodeId) -> bool {
    dom.has_class(id, "main-content")
}

fn content_class(dom: &Dom, id: NodeId) -> bool {
    dom.has_class(id, "content")
}

fn post_class(dom: &Dom, id: NodeId) -> bool {
    dom.has_class(id, "post")
}

fn entry_class(dom: &Dom, id: NodeId) -> bool {
    dom.has_class(id, "entry")
}

fn post_content_class(dom: &Dom, id: NodeId) -> bool {
    dom.has_class(id, "post-content")
}

fn entry_content_class(dom: &Dom, id: NodeId) -> bool {
    dom.has_class(id, "entry-content")
}

/// A body made of nothing but bare paragraphs is left to harvesting, which
/// yields the same text without pretending a container was recognised. Text
/// sitting directly in the body keeps it a candidate.
fn body_element(dom: &Dom, id: NodeId) -> bool {
    if !dom.is_tag(id, "body") {
        return false;
    }
    let children = dom.children(id);
    let has_own_text = children
        .iter()
        .filter_map(|c| dom.text(*c))
        .any(|t| !t.trim().is_empty());
    let mut elements = children.iter().filter(|c| dom.tag(**c).is_some()).peekable();
    let only_paragraphs = elements.peek().is_some() && elements.all(|c| dom.is_tag(*c, "p"));
    has_own_text || !only_paragraphs
}

/// Tried in order; within one entry, matches are tried in document order.
pub const SELECTOR_CANDIDATES: &[(&str, Predicate)] = &[
    ("article", article),
    (".article", article_class),
    (".article-body", article_body_class),
    ("[itemprop=articleBody]", article_body_itemprop),
    ("main", main_element),
    ("[role=main]", main_role),
    (".main-content", main_content_class),
    (".content", content_class),
    (".post", post_class),
    (".entry", entry_class),
    (".post-content", post_content_class),
    (".entry-content", entry_content_class),
    ("body", body_element),
];

/// First structural candidate with more than [`MIN_SELECTOR_TEXT`] chars,
/// serialized as markup.
pub fn select_structural(dom: &Dom) -> Option<(&'static str, String)> {
    SELECTOR_CANDIDATES.iter().find_map(|(name, pred)| {
        dom.elements()
            .filter(|id| pred(dom, *id))
            .find(|id| dom.normalized_text(*id).chars().count() > MIN_SELECTOR_TEXT)
            .map(|id| {
                let markup = if dom.is_tag(id, "body") {
                    dom.inner_html(id)
                } else {
                    dom.outer_html(id)
                };
                (*name, markup)
            })
    })
}

/// Paragraph text longer than [`MIN_HARVEST_TEXT`], in document order,
/// separated by blank lines.
pub fn harvest_paragraphs(dom: &Dom) -> Option<String> {
    let paragraphs: Vec<String> = dom
        .elements()
        .filter(|id| dom.is_tag(*id, "p"))
        .map(|id| dom.normalized_text(id))
        .filter(|t| t.chars().count() > MIN_HARVEST_TEXT)
        .collect();
    (!paragraphs.is_empty()).then(|| paragraphs.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn dom_of(html: &str) -> Dom {
        let doc = Html::parse_document(html);
        Dom::from_element(doc.root_element(), |_| true)
    }

    fn long(word: &str) -> String {
        format!("{word} ").repeat(30)
    }

    #[test]
    fn article_beats_later_candidates() {
        let dom = dom_of(&format!(
            r#"<body><div class="content">{}</div><article>{}</article></body>"#,
            long("content"),
            long("article")
        ));
        let (name, markup) = select_structural(&dom).unwrap();
        assert_eq!(name, "article");
        assert!(markup.starts_with("<article>"));
    }

    #[test]
    fn short_matches_are_skipped() {
        let dom = dom_of(&format!(
            r#"<body><article>tiny</article><div class="post">{}</div></body>"#,
            long("post")
        ));
        let (name, _) = select_structural(&dom).unwrap();
        assert_eq!(name, ".post");
    }

    #[test]
    fn second_match_of_same_selector_is_considered() {
        let dom = dom_of(&format!(
            r#"<body><main>short</main><main id="m2">{}</main><div>x</div></body>"#,
            long("main")
        ));
        let (name, markup) = select_structural(&dom).unwrap();
        assert_eq!(name, "main");
        assert!(markup.contains("m2"));
    }

    #[test]
    fn body_of_bare_paragraphs_is_not_a_candidate() {
        let dom = dom_of(&format!("<body><p>{}</p><p>{}</p></body>", long("a"), long("b")));
        assert!(select_structural(&dom).is_none());
    }

    #[test]
    fn body_with_mixed_children_is_a_candidate() {
        let dom = dom_of(&format!("<body><div>{}</div><p>x</p></body>", long("a")));
        let (name, markup) = select_structural(&dom).unwrap();
        assert_eq!(name, "body");
        assert!(markup.starts_with("<div>"));
    }

    #[test]
    fn body_of_bare_text_is_a_candidate() {
        let dom = dom_of(&format!("<html><body>{}</body></html>", long("words")));
        let (name, markup) = select_structural(&dom).unwrap();
        assert_eq!(name, "body");
        assert!(markup.starts_with("words words"));
    }

    #[test]
    fn body_text_beside_paragraphs_keeps_body_a_candidate() {
        let dom = dom_of(&format!("<body>{}<p>x</p></body>", long("loose")));
        let (name, _) = select_structural(&dom).unwrap();
        assert_eq!(name, "body");
    }

    #[test]
    fn harvest_keeps_long_paragraphs_in_order() {
        let dom = dom_of(
            "<body><p>The first paragraph is long enough.</p><p>too short</p>\
             <div><p>The second paragraph is nested inside.</p></div></body>",
        );
        assert_eq!(
            harvest_paragraphs(&dom).unwrap(),
            "The first paragraph is long enough.\n\nThe second paragraph is nested inside."
        );
        assert!(harvest_paragraphs(&dom_of("<body><p>short</p></body>")).is_none());
    }
}
