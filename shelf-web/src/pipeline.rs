//! URL in, article record out.
//!
//! [`Extractor::extract`] always returns an [`ArticleRecord`]: fetch failures
//! become a URL-derived title with [`FETCH_FAILED_DESCRIPTION`], extraction
//! failures become empty content.

use serde::{Deserialize, Serialize};
use shelf_config::ShelfConfig;
use shelf_http::HttpError;
use shelf_render::{StoredContent, StoredForm};
use std::sync::Arc;
use url::Url;

use crate::document::{ParsedDocument, RawDocument};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::metadata::{MetadataLimits, extract_metadata};
use crate::readability::{ContentCandidate, ReadabilityOptions, extract_content};
use crate::sanitize::{SanitizePolicy, Sanitizer};

pub const FETCH_FAILED_DESCRIPTION: &str = "Failed to fetch article content";

/// Main content, ready for storage. The variant is persisted with the string
/// (see [`ExtractedContent::form`]); plain text may look like markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExtractedContent {
    /// Sanitized fragment; every `a`/`img` URL is absolute.
    SafeMarkup(String),
    PlainText(String),
    Empty,
}

impl ExtractedContent {
    /// The string handed to storage; empty means "content not available".
    pub fn as_stored(&self) -> &str {
        match self {
            Self::SafeMarkup(s) | Self::PlainText(s) => s,
            Self::Empty => "",
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_stored().is_empty()
    }

    /// Discriminator stored beside [`Self::as_stored`].
    pub fn form(&self) -> StoredForm {
        match self {
            Self::SafeMarkup(_) => StoredForm::SafeMarkup,
            Self::PlainText(_) => StoredForm::PlainText,
            Self::Empty => StoredForm::Empty,
        }
    }
}

/// Everything the storage layer persists for one saved URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub content: ExtractedContent,
}

impl ArticleRecord {
    /// Content as the reader should display it.
    pub fn stored_content(&self) -> StoredContent<'_> {
        StoredContent::load(self.content.form(), self.content.as_stored())
    }
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub metadata: MetadataLimits,
    pub readability: ReadabilityOptions,
    pub policy: SanitizePolicy,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::from_config(&ShelfConfig::default())
    }
}

impl ExtractOptions {
    pub fn from_config(cfg: &ShelfConfig) -> Self {
        Self {
            metadata: MetadataLimits {
                title_max_chars: cfg.extract.title_max_chars,
                description_max_chars: cfg.extract.description_max_chars,
            },
            readability: ReadabilityOptions::from(&cfg.extract),
            policy: SanitizePolicy::from_config(&cfg.sanitize),
        }
    }
}

/// `host + path` of `url`, or the trimmed input when it is not a URL.
///
/// ```
/// use shelf_web::pipeline::url_title;
///
/// assert_eq!(url_title("https://example.invalid/x"), "example.invalid/x");
/// assert_eq!(url_title("https://example.com/"), "example.com/");
/// assert_eq!(url_title(" not a url "), "not a url");
/// ```
pub fn url_title(url: &str) -> String {
    match Url::parse(url.trim()) {
        Ok(u) => format!("{}{}", u.host_str().unwrap_or_default(), u.path()),
        Err(_) => url.trim().to_string(),
    }
}

/// Record saved when the page could not be retrieved.
pub fn degraded_record(url: &str) -> ArticleRecord {
    ArticleRecord {
        title: url_title(url),
        description: FETCH_FAILED_DESCRIPTION.to_string(),
        image_url: None,
        content: ExtractedContent::Empty,
    }
}

/// Metadata, readability and sanitization over one fetched document.
///
/// Synchronous: the parsed tree never lives across an await point.
pub fn process_document(raw: &RawDocument, opts: &ExtractOptions) -> ArticleRecord {
    if raw.is_plain_text() {
        let text = raw.body.trim();
        return ArticleRecord {
            title: url_title(raw.final_url.as_str()),
            description: String::new(),
            image_url: None,
            content: if text.is_empty() {
                ExtractedContent::Empty
            } else {
                ExtractedContent::PlainText(text.to_string())
            },
        };
    }

    let doc = ParsedDocument::parse(raw);
    let meta = extract_metadata(&doc.html, &doc.url, opts.metadata);
    let content = match extract_content(&doc, &opts.readability, &opts.policy) {
        ContentCandidate::Markup(fragment) => {
            let safe = Sanitizer::new(opts.policy.clone()).sanitize(&fragment, &doc.url);
            if safe.trim().is_empty() {
                ExtractedContent::Empty
            } else {
                ExtractedContent::SafeMarkup(safe)
            }
        }
        ContentCandidate::PlainText(text) => ExtractedContent::PlainText(text),
        ContentCandidate::Empty => ExtractedContent::Empty,
    };

    ArticleRecord {
        title: meta.title,
        description: meta.description,
        image_url: meta.image_url,
        content,
    }
}

/// Runs the whole pipeline; cheap to clone and share across tasks.
#[derive(Clone)]
pub struct Extractor {
    fetcher: Arc<dyn Fetcher>,
    options: ExtractOptions,
}

impl Extractor {
    pub fn new(fetcher: Arc<dyn Fetcher>, options: ExtractOptions) -> Self {
        Self { fetcher, options }
    }

    pub fn from_config(cfg: &ShelfConfig) -> Result<Self, HttpError> {
        let fetcher = HttpFetcher::from_config(&cfg.fetch)?;
        Ok(Self::new(Arc::new(fetcher), ExtractOptions::from_config(cfg)))
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Never fails; see the module docs for the degraded forms.
    pub async fn extract(&self, url: &str) -> ArticleRecord {
        let started = std::time::Instant::now();
        let raw = match self.fetcher.fetch(url).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(url, error = %err, "extract.fetch.failed");
                return degraded_record(url);
            }
        };

        let record = process_document(&raw, &self.options);
        tracing::info!(
            url,
            final_url = %raw.final_url,
            content = ?record.content.form(),
            has_image = record.image_url.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "extract.complete"
        );
        record
    }
}
