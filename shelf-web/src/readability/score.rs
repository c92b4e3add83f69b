//! Density scoring over the working copy.
//!
//! Paragraph-like elements award points to up to five ancestors; the best
//! ancestor after a link-density penalty becomes the article container, and
//! qualifying siblings are merged back in document order.

use regex::Regex;
use shelf_common::text::collapse_whitespace;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::dom::{Dom, NodeId};

static POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)article|body|content|entry|hentry|h-entry|main|page|pagination|post|text|blog|story")
        .expect("valid positive-class regex")
});

static NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)-ad-|hidden|^hid$| hid$| hid |^hid |banner|combx|comment|com-|contact|footer|gdpr|masthead|media|meta|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|widget")
        .expect("valid negative-class regex")
});

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.( |$)").expect("valid sentence-end regex"));

/// Children that stop a `div`/`section` from being scored as a paragraph.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dl", "div", "figure", "footer", "form", "h1",
    "h2", "h3", "h4", "h5", "h6", "header", "hr", "main", "nav", "ol", "p", "pre", "section",
    "table", "ul",
];

const MIN_PARAGRAPH_CHARS: usize = 25;
const ANCESTOR_DEPTH: usize = 5;
const MIN_ALTERNATIVE_CANDIDATES: usize = 3;

/// Character counts per node, whitespace-collapsed per text node.
pub struct TextStats {
    text: Vec<usize>,
    link: Vec<usize>,
}

impl TextStats {
    pub fn compute(dom: &Dom) -> Self {
        let n = dom.len();
        let mut in_link = vec![false; n];
        let mut text = vec![0usize; n];
        let mut link = vec![0usize; n];

        // Ids are assigned in preorder, so parents precede children.
        for id in 0..n {
            let parent_in_link = dom.parent(id).is_some_and(|p| in_link[p]);
            in_link[id] = parent_in_link || dom.is_tag(id, "a");
            if let Some(t) = dom.text(id) {
                let len = collapse_whitespace(t).chars().count();
                text[id] = len;
                if in_link[id] {
                    link[id] = len;
                }
            }
        }
        for id in (1..n).rev() {
            if let Some(p) = dom.parent(id) {
                text[p] += text[id];
                link[p] += link[id];
            }
        }
        Self { text, link }
    }

    pub fn text_len(&self, id: NodeId) -> usize {
        self.text[id]
    }

    pub fn link_density(&self, id: NodeId) -> f64 {
        match self.text[id] {
            0 => 0.0,
            t => self.link[id] as f64 / t as f64,
        }
    }
}

fn class_weight(dom: &Dom, id: NodeId) -> f64 {
    let mut weight = 0.0;
    for attr in ["class", "id"] {
        if let Some(v) = dom.attr(id, attr).filter(|v| !v.is_empty()) {
            if NEGATIVE.is_match(v) {
                weight -= 25.0;
            }
            if POSITIVE.is_match(v) {
                weight += 25.0;
            }
        }
    }
    weight
}

fn initial_score(dom: &Dom, id: NodeId) -> f64 {
    let tag_score = match dom.tag(id).unwrap_or_default() {
        "div" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "li" | "dl" | "dd" | "dt" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        "article" => 10.0,
        "main" => 8.0,
        "section" => 3.0,
        _ => 0.0,
    };
    tag_score + class_weight(dom, id)
}

fn is_scorable(dom: &Dom, id: NodeId) -> bool {
    match dom.tag(id) {
        Some("p" | "pre" | "td") => true,
        Some("div" | "section") => !dom
            .children(id)
            .iter()
            .any(|c| dom.tag(*c).is_some_and(|t| BLOCK_TAGS.contains(&t))),
        _ => false,
    }
}

fn ancestor_divider(level: usize) -> f64 {
    match level {
        0 => 1.0,
        1 => 2.0,
        l => (l * 3) as f64,
    }
}

/// Scores every ancestor of every qualifying paragraph.
pub fn score_candidates(dom: &Dom, stats: &TextStats) -> HashMap<NodeId, f64> {
    let mut scores: HashMap<NodeId, f64> = HashMap::new();

    for id in dom.elements().filter(|id| is_scorable(dom, *id)) {
        let text = dom.normalized_text(id);
        let len = text.chars().count();
        if len < MIN_PARAGRAPH_CHARS {
            continue;
        }
        let commas = text.matches(',').count() as f64;
        let content_score = 1.0 + commas + (len as f64 / 100.0).floor().min(3.0);

        for (level, ancestor) in dom.ancestors(id).take(ANCESTOR_DEPTH).enumerate() {
            let entry = scores
                .entry(ancestor)
                .or_insert_with(|| initial_score(dom, ancestor));
            *entry += content_score / ancestor_divider(level);
        }
    }

    for (id, score) in scores.iter_mut() {
        *score *= 1.0 - stats.link_density(*id);
    }
    scores
}

/// Outcome of the scoring tier.
pub struct TopCandidate {
    pub id: NodeId,
    pub score: f64,
}

/// Highest-scoring container, moved up to a shared ancestor when several
/// near-best candidates live under it.
pub fn select_top(
    dom: &Dom,
    scores: &HashMap<NodeId, f64>,
    max_top_candidates: usize,
) -> Option<TopCandidate> {
    let mut ranked: Vec<(NodeId, f64)> = scores.iter().map(|(k, v)| (*k, *v)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(max_top_candidates.max(1));

    let (mut top, top_score) = *ranked.first()?;

    let alternatives: Vec<Vec<NodeId>> = ranked[1..]
        .iter()
        .filter(|(_, s)| *s / top_score >= 0.75)
        .map(|(id, _)| dom.ancestors(*id).collect())
        .collect();

    if alternatives.len() >= MIN_ALTERNATIVE_CANDIDATES {
        let mut parent = dom.parent(top);
        while let Some(p) = parent.filter(|p| *p != Dom::ROOT && !dom.is_tag(*p, "body")) {
            let sharing = alternatives.iter().filter(|a| a.contains(&p)).count();
            if sharing >= MIN_ALTERNATIVE_CANDIDATES {
                top = p;
                break;
            }
            parent = dom.parent(p);
        }
    }

    let score = scores.get(&top).copied().unwrap_or(top_score);
    Some(TopCandidate { id: top, score })
}

/// Top candidate plus siblings that look like part of the same article.
pub fn merge_siblings(
    dom: &Dom,
    stats: &TextStats,
    scores: &HashMap<NodeId, f64>,
    top: &TopCandidate,
) -> Vec<NodeId> {
    let Some(parent) = dom.parent(top.id) else {
        return vec![top.id];
    };
    let threshold = (top.score * 0.2).max(10.0);
    let top_class = dom.attr(top.id, "class").filter(|c| !c.is_empty());

    dom.children(parent)
        .iter()
        .copied()
        .filter(|sib| dom.tag(*sib).is_some())
        .filter(|sib| {
            if *sib == top.id {
                return true;
            }
            let mut bonus = 0.0;
            if top_class.is_some() && dom.attr(*sib, "class") == top_class {
                bonus += top.score * 0.2;
            }
            if scores.get(sib).is_some_and(|s| s + bonus >= threshold) {
                return true;
            }
            if dom.is_tag(*sib, "p") {
                let len = stats.text_len(*sib);
                let density = stats.link_density(*sib);
                let text = dom.normalized_text(*sib);
                return (len > 80 && density < 0.25)
                    || (len > 0 && len <= 80 && density == 0.0 && SENTENCE_END.is_match(&text));
            }
            false
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn dom_of(html: &str) -> Dom {
        let doc = Html::parse_document(html);
        Dom::from_element(doc.root_element(), |_| true)
    }

    fn by_id(dom: &Dom, id_attr: &str) -> NodeId {
        dom.find_first(|d, id| d.attr(id, "id") == Some(id_attr)).unwrap()
    }

    const PARA: &str = "This paragraph has enough words, commas, and length to be counted as prose by the scorer.";

    #[test]
    fn text_stats_track_link_text() {
        let dom = dom_of(r#"<body><div id="d">abcd <a href="/">efgh</a></div></body>"#);
        let stats = TextStats::compute(&dom);
        let d = by_id(&dom, "d");
        assert_eq!(stats.text_len(d), 8);
        assert!((stats.link_density(d) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn parents_collect_more_than_grandparents() {
        let dom = dom_of(&format!(
            r#"<body><div id="outer"><div id="inner"><p>{PARA}</p></div></div></body>"#
        ));
        let stats = TextStats::compute(&dom);
        let scores = score_candidates(&dom, &stats);
        let inner = scores[&by_id(&dom, "inner")];
        let outer = scores[&by_id(&dom, "outer")];
        assert!(inner > outer);
    }

    #[test]
    fn short_paragraphs_do_not_score() {
        let dom = dom_of(r#"<body><div id="d"><p>too short</p></div></body>"#);
        let stats = TextStats::compute(&dom);
        assert!(score_candidates(&dom, &stats).is_empty());
    }

    #[test]
    fn class_weight_prefers_content_over_sidebar() {
        let dom = dom_of(&format!(
            r#"<body><div id="a" class="post-body"><p>{PARA}</p></div>
            <div id="b" class="promo"><p>{PARA}</p></div></body>"#
        ));
        let stats = TextStats::compute(&dom);
        let scores = score_candidates(&dom, &stats);
        let top = select_top(&dom, &scores, 5).unwrap();
        assert_eq!(top.id, by_id(&dom, "a"));
    }

    #[test]
    fn link_heavy_containers_lose() {
        let dom = dom_of(&format!(
            r#"<body><div id="links"><p><a href="/1">{PARA}</a></p></div>
            <div id="prose"><p>{PARA}</p></div></body>"#
        ));
        let stats = TextStats::compute(&dom);
        let scores = score_candidates(&dom, &stats);
        let top = select_top(&dom, &scores, 5).unwrap();
        assert_eq!(top.id, by_id(&dom, "prose"));
    }

    #[test]
    fn siblings_with_prose_are_merged() {
        let dom = dom_of(&format!(
            r#"<body><div id="wrap"><div id="main"><p>{PARA}</p><p>{PARA}</p></div>
            <p id="tail">{PARA}</p><ul id="menu"><li><a href="/">x</a></li></ul></div></body>"#
        ));
        let stats = TextStats::compute(&dom);
        let scores = score_candidates(&dom, &stats);
        let top = TopCandidate {
            id: by_id(&dom, "main"),
            score: scores[&by_id(&dom, "main")],
        };
        let merged = merge_siblings(&dom, &stats, &scores, &top);
        assert_eq!(merged, vec![by_id(&dom, "main"), by_id(&dom, "tail")]);
    }
}
