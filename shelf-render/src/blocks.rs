//! Display block model produced by the segmenter.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum InlineSpan {
    Plain(String),
    Bold(String),
    Italic(String),
    /// A bare URL; label and target are the same literal text.
    Link { text: String, url: String },
}

impl InlineSpan {
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(t) | Self::Bold(t) | Self::Italic(t) => t,
            Self::Link { text, .. } => text,
        }
    }

    fn to_source(&self) -> String {
        match self {
            Self::Plain(t) => t.clone(),
            Self::Bold(t) => format!("**{t}**"),
            Self::Italic(t) => format!("*{t}*"),
            Self::Link { url, .. } => url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading { level: u8, spans: Vec<InlineSpan> },
    Paragraph { spans: Vec<InlineSpan> },
    List { ordered: bool, items: Vec<Vec<InlineSpan>> },
    Quote { spans: Vec<InlineSpan> },
}

fn spans_source(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::to_source).collect()
}

impl ContentBlock {
    /// Short name used in logs and JSON.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "heading",
            Self::Paragraph { .. } => "paragraph",
            Self::List { .. } => "list",
            Self::Quote { .. } => "quote",
        }
    }

    /// Re-emit the block in marker form; segmenting the output yields a
    /// block of the same kind.
    ///
    /// ```
    /// use shelf_render::{segment, ContentBlock};
    ///
    /// let block = &segment("1. first\n2. **second**")[0];
    /// assert_eq!(block.to_source(), "1. first\n2. **second**");
    /// ```
    pub fn to_source(&self) -> String {
        match self {
            Self::Heading { level, spans } => {
                format!("{} {}", "#".repeat(usize::from(*level)), spans_source(spans))
            }
            Self::Paragraph { spans } => spans_source(spans),
            Self::List { ordered, items } => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let marker = if *ordered {
                        format!("{}.", i + 1)
                    } else {
                        "-".to_string()
                    };
                    format!("{marker} {}", spans_source(item))
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Quote { spans } => spans_source(spans)
                .split('\n')
                .map(|line| format!("> {line}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}
