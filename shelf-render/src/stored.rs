//! Which form a stored `content` string is in.
//!
//! The form is recorded next to the content when the article is saved and
//! read back here; the string itself is never sniffed. Extracted plain text
//! can legitimately start with `<p>` (decoded entities, `text/plain` bodies)
//! and must still be segmented and escaped.

use serde::{Deserialize, Serialize};

use crate::blocks::ContentBlock;
use crate::segment::segment;

/// Discriminator persisted with the content string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredForm {
    /// Output of the sanitizer.
    SafeMarkup,
    PlainText,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredContent<'a> {
    /// Nothing stored; the reader offers a link to the source instead.
    Unavailable,
    /// Sanitized at extraction time; render as-is.
    Markup(&'a str),
    Text(Vec<ContentBlock>),
}

impl<'a> StoredContent<'a> {
    /// ```
    /// use shelf_render::{StoredContent, StoredForm};
    ///
    /// assert_eq!(StoredContent::load(StoredForm::SafeMarkup, "  "), StoredContent::Unavailable);
    /// assert!(matches!(
    ///     StoredContent::load(StoredForm::SafeMarkup, "<p>hi</p>"),
    ///     StoredContent::Markup(_)
    /// ));
    /// assert!(matches!(
    ///     StoredContent::load(StoredForm::PlainText, "<p>hi</p>"),
    ///     StoredContent::Text(_)
    /// ));
    /// ```
    pub fn load(form: StoredForm, content: &'a str) -> Self {
        let trimmed = content.trim();
        match form {
            _ if trimmed.is_empty() => Self::Unavailable,
            StoredForm::Empty => Self::Unavailable,
            StoredForm::SafeMarkup => Self::Markup(trimmed),
            StoredForm::PlainText => Self::Text(segment(trimmed)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Markup(_) => "markup",
            Self::Text(_) => "text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::render_blocks_html;

    #[test]
    fn markup_is_taken_from_the_recorded_form() {
        assert!(matches!(
            StoredContent::load(StoredForm::SafeMarkup, "\n<DIV class=\"x\"><p>a</p></DIV>"),
            StoredContent::Markup(m) if m.starts_with("<DIV")
        ));
        assert!(matches!(
            StoredContent::load(StoredForm::SafeMarkup, "just words"),
            StoredContent::Markup("just words")
        ));
    }

    #[test]
    fn tag_shaped_text_stays_text() {
        for s in [
            "<img src=x onerror=alert(document.cookie)> then more",
            "<p><img src=x onerror=alert(1)></p>",
            "<script>x</script>",
        ] {
            let StoredContent::Text(blocks) = StoredContent::load(StoredForm::PlainText, s) else {
                panic!("{s} should be text");
            };
            let html = render_blocks_html(&blocks);
            assert!(!html.contains("<img"), "{html}");
            assert!(!html.contains("<script"), "{html}");
            assert!(html.contains("&lt;"), "{html}");
        }
    }

    #[test]
    fn empty_form_or_blank_content_is_unavailable() {
        assert_eq!(StoredContent::load(StoredForm::Empty, "stale"), StoredContent::Unavailable);
        assert_eq!(StoredContent::load(StoredForm::PlainText, " \n "), StoredContent::Unavailable);
    }

    #[test]
    fn text_is_segmented() {
        let StoredContent::Text(blocks) = StoredContent::load(StoredForm::PlainText, "# A\n\nb")
        else {
            panic!("expected text");
        };
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn form_names_match_storage() {
        assert_eq!(serde_json::to_value(StoredForm::SafeMarkup).unwrap(), "safe_markup");
        let form: StoredForm = serde_json::from_str("\"plain_text\"").unwrap();
        assert_eq!(form, StoredForm::PlainText);
    }
}
