//! Plain text to display blocks.
//!
//! Text is normalized, split on blank lines, and each block is offered to
//! [`CLASSIFIERS`] in order; the first that accepts it decides its kind and
//! anything left over is a paragraph. The all-caps heading rule and the
//! quote-pair rule are loose by nature: short shouted sentences and quoted
//! one-liners are classified as headings and quotes.

use regex::Regex;
use std::sync::LazyLock;

use crate::blocks::ContentBlock;
use crate::inline::tokenize;

type Classifier = fn(&str) -> Option<ContentBlock>;

/// Precedence order: heading, list, quote. Paragraph is the fallback.
pub const CLASSIFIERS: &[Classifier] = &[heading, list, quote];

static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank-run regex"));

static MARKED_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(#{1,6})\s+(.+)$").expect("valid heading regex"));

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(\s|$)").expect("valid sentence-end regex"));

static BULLET_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*+•]\s+(.*)$").expect("valid bullet regex"));

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+(.*)$").expect("valid numbered regex"));

const QUOTE_PAIRS: &[(char, char)] = &[
    ('"', '"'),
    ('\'', '\''),
    ('“', '”'),
    ('‘', '’'),
    ('«', '»'),
];

/// Unify line endings, trim every line, and squeeze blank-line runs.
pub fn normalize(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let trimmed = unified.lines().map(str::trim).collect::<Vec<_>>().join("\n");
    BLANK_RUNS.replace_all(&trimmed, "\n\n").trim().to_string()
}

/// `#`-marked or short all-caps heading.
pub fn heading(block: &str) -> Option<ContentBlock> {
    if let Some(caps) = MARKED_HEADING.captures(block) {
        let level = caps[1].len() as u8;
        let text = caps[2].lines().map(str::trim).collect::<Vec<_>>().join(" ");
        return Some(ContentBlock::Heading {
            level,
            spans: tokenize(text.trim()),
        });
    }

    let len = block.chars().count();
    let starts_upper = block.chars().next().is_some_and(char::is_uppercase);
    let shouted = block.to_uppercase() == block;
    if block.contains('\n')
        || !(6..100).contains(&len)
        || SENTENCE_END.is_match(block)
        || !starts_upper
        || !shouted
    {
        return None;
    }
    let level = match len {
        l if l < 30 => 2,
        l if l < 50 => 3,
        _ => 4,
    };
    Some(ContentBlock::Heading {
        level,
        spans: tokenize(block),
    })
}

/// Every line bulleted or numbered; the first line decides ordering.
pub fn list(block: &str) -> Option<ContentBlock> {
    let mut ordered = None;
    let mut items = Vec::new();
    for line in block.lines() {
        let (is_numbered, text) = if let Some(c) = BULLET_ITEM.captures(line) {
            (false, c.get(1).map_or("", |m| m.as_str()))
        } else if let Some(c) = NUMBERED_ITEM.captures(line) {
            (true, c.get(1).map_or("", |m| m.as_str()))
        } else {
            return None;
        };
        ordered.get_or_insert(is_numbered);
        items.push(tokenize(text.trim()));
    }
    Some(ContentBlock::List {
        ordered: ordered?,
        items,
    })
}

/// `>`-prefixed block, or one wrapped in a matching quote pair.
pub fn quote(block: &str) -> Option<ContentBlock> {
    if block.starts_with('>') {
        let text = block
            .lines()
            .map(|line| line.strip_prefix('>').unwrap_or(line).trim())
            .collect::<Vec<_>>()
            .join("\n");
        return Some(ContentBlock::Quote {
            spans: tokenize(text.trim()),
        });
    }

    let mut chars = block.chars();
    let (first, last) = (chars.next()?, chars.next_back()?);
    QUOTE_PAIRS
        .iter()
        .find(|(open, close)| first == *open && last == *close)
        .map(|_| {
            let inner = &block[first.len_utf8()..block.len() - last.len_utf8()];
            ContentBlock::Quote {
                spans: tokenize(inner.trim()),
            }
        })
}

fn classify(block: &str) -> ContentBlock {
    CLASSIFIERS
        .iter()
        .find_map(|classifier| classifier(block))
        .unwrap_or_else(|| ContentBlock::Paragraph {
            spans: tokenize(block),
        })
}

/// Segment plain text into display blocks. Pure and total: any input,
/// including the empty string, maps to some (possibly empty) sequence.
pub fn segment(text: &str) -> Vec<ContentBlock> {
    let blocks: Vec<ContentBlock> = normalize(text)
        .split("\n\n")
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(classify)
        .collect();
    tracing::trace!(blocks = blocks.len(), "render.segment");
    blocks
}
