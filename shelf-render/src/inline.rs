//! Inline span tokenizer.
//!
//! One left-to-right scan with a single alternation; at any position bold
//! wins over italic, italic over a bare URL. Text between matches becomes
//! `Plain`.

use regex::Regex;
use std::sync::LazyLock;

use crate::blocks::InlineSpan;

static INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\*\*(?P<bold>[^*\n]+?)\*\*",
        r"|\*(?P<star>[^*\s](?:[^*\n]*?[^*\s])?)\*",
        r"|_(?P<under>[^_\s](?:[^_\n]*?[^_\s])?)_",
        r"|(?P<url>https?://[^\s<>]+)",
    ))
    .expect("valid inline regex")
});

/// Characters that end a sentence rather than a URL.
const URL_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"'];

/// Drop trailing punctuation, and closing parens that have no opener inside
/// the URL.
fn trim_url(url: &str) -> &str {
    let mut end = url.len();
    loop {
        let s = &url[..end];
        let Some(last) = s.chars().last() else {
            return s;
        };
        let unbalanced_paren =
            last == ')' && s.matches(')').count() > s.matches('(').count();
        if URL_TRAILING.contains(&last) || unbalanced_paren {
            end -= last.len_utf8();
        } else {
            return s;
        }
    }
}

fn push_plain(spans: &mut Vec<InlineSpan>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(InlineSpan::Plain(prev)) = spans.last_mut() {
        prev.push_str(text);
    } else {
        spans.push(InlineSpan::Plain(text.to_string()));
    }
}

/// Split `text` into inline spans. Never fails; empty input gives no spans.
///
/// ```
/// use shelf_render::{tokenize, InlineSpan};
///
/// assert_eq!(
///     tokenize("a **b** c"),
///     vec![
///         InlineSpan::Plain("a ".into()),
///         InlineSpan::Bold("b".into()),
///         InlineSpan::Plain(" c".into()),
///     ]
/// );
/// ```
pub fn tokenize(text: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for caps in INLINE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        push_plain(&mut spans, &text[cursor..whole.start()]);
        cursor = whole.end();

        if let Some(m) = caps.name("bold") {
            spans.push(InlineSpan::Bold(m.as_str().to_string()));
        } else if let Some(m) = caps.name("star").or_else(|| caps.name("under")) {
            spans.push(InlineSpan::Italic(m.as_str().to_string()));
        } else if let Some(m) = caps.name("url") {
            let url = trim_url(m.as_str());
            if url.len() <= "https://".len() {
                push_plain(&mut spans, m.as_str());
                continue;
            }
            spans.push(InlineSpan::Link {
                text: url.to_string(),
                url: url.to_string(),
            });
            cursor = m.start() + url.len();
        }
    }
    push_plain(&mut spans, &text[cursor..]);
    spans
}
