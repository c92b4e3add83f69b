//! Blocks to HTML for the presentation layer.

use shelf_common::links::{SAFE_LINK_REL, SAFE_LINK_TARGET};
use shelf_common::text::{escape_attr, escape_html};

use crate::blocks::{ContentBlock, InlineSpan};

fn write_text(out: &mut String, text: &str) {
    let mut lines = text.split('\n');
    if let Some(first) = lines.next() {
        out.push_str(&escape_html(first));
    }
    for line in lines {
        out.push_str("<br>");
        out.push_str(&escape_html(line));
    }
}

fn write_spans(out: &mut String, spans: &[InlineSpan]) {
    for span in spans {
        match span {
            InlineSpan::Plain(t) => write_text(out, t),
            InlineSpan::Bold(t) => {
                out.push_str("<strong>");
                write_text(out, t);
                out.push_str("</strong>");
            }
            InlineSpan::Italic(t) => {
                out.push_str("<em>");
                write_text(out, t);
                out.push_str("</em>");
            }
            InlineSpan::Link { text, url } => {
                out.push_str(&format!(
                    r#"<a href="{}" target="{SAFE_LINK_TARGET}" rel="{SAFE_LINK_REL}">"#,
                    escape_attr(url)
                ));
                out.push_str(&escape_html(text));
                out.push_str("</a>");
            }
        }
    }
}

/// Escaped HTML, one element per block, newline separated.
///
/// ```
/// use shelf_render::{render_blocks_html, segment};
///
/// let html = render_blocks_html(&segment("## Hi\n\nRead https://e.com <now>"));
/// assert_eq!(
///     html,
///     "<h2>Hi</h2>\n<p>Read <a href=\"https://e.com\" target=\"_blank\" \
///      rel=\"noopener noreferrer\">https://e.com</a> &lt;now&gt;</p>"
/// );
/// ```
pub fn render_blocks_html(blocks: &[ContentBlock]) -> String {
    let mut out = String::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match block {
            ContentBlock::Heading { level, spans } => {
                let level = (*level).clamp(1, 6);
                out.push_str(&format!("<h{level}>"));
                write_spans(&mut out, spans);
                out.push_str(&format!("</h{level}>"));
            }
            ContentBlock::Paragraph { spans } => {
                out.push_str("<p>");
                write_spans(&mut out, spans);
                out.push_str("</p>");
            }
            ContentBlock::List { ordered, items } => {
                let tag = if *ordered { "ol" } else { "ul" };
                out.push_str(&format!("<{tag}>"));
                for item in items {
                    out.push_str("<li>");
                    write_spans(&mut out, item);
                    out.push_str("</li>");
                }
                out.push_str(&format!("</{tag}>"));
            }
            ContentBlock::Quote { spans } => {
                out.push_str("<blockquote><p>");
                write_spans(&mut out, spans);
                out.push_str("</p></blockquote>");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::segment;

    #[test]
    fn renders_each_block_kind() {
        let html = render_blocks_html(&segment(
            "# Top\n\n1. **one**\n2. _two_\n\n> line a\n> line b\n\nEnd.",
        ));
        assert_eq!(
            html,
            "<h1>Top</h1>\n<ol><li><strong>one</strong></li><li><em>two</em></li></ol>\n\
             <blockquote><p>line a<br>line b</p></blockquote>\n<p>End.</p>"
        );
    }

    #[test]
    fn escapes_markup_like_text() {
        let html = render_blocks_html(&segment("<img src=x onerror=alert(1)>"));
        assert_eq!(html, "<p>&lt;img src=x onerror=alert(1)&gt;</p>");
    }

    #[test]
    fn link_urls_are_attribute_escaped() {
        let html = render_blocks_html(&segment("https://e.com/?a=1&b=\"2\""));
        assert!(html.contains(r#"href="https://e.com/?a=1&amp;b=&quot;2""#));
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert_eq!(render_blocks_html(&[]), "");
    }
}
