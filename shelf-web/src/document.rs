//! Fetched and parsed document representations.

use scraper::Html;
use url::Url;

/// Bytes retrieved for one URL, decoded to text.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// URL the caller asked for.
    pub source_url: Url,
    /// URL after redirects; base for every relative reference in the body.
    pub final_url: Url,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawDocument {
    /// True when the server labelled the body `text/plain`.
    pub fn is_plain_text(&self) -> bool {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("text/plain"))
    }
}

/// Parsed HTML plus the URL it was served from.
pub struct ParsedDocument {
    pub html: Html,
    pub url: Url,
}

impl ParsedDocument {
    pub fn parse(raw: &RawDocument) -> Self {
        Self::from_html(&raw.body, raw.final_url.clone())
    }

    pub fn from_html(body: &str, url: Url) -> Self {
        Self {
            html: Html::parse_document(body),
            url,
        }
    }
}
