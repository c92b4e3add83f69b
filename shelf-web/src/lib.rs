//! Article acquisition and extraction.
//!
//! - Document retrieval behind the [`fetch::Fetcher`] trait (`fetch`)
//! - Fetched/parsed document types (`document`) and an index-based DOM
//!   arena for traversal without shared ownership (`dom`)
//! - Title/description/image fallback chains (`metadata`)
//! - Main-content isolation: scoring, selector tier, paragraph harvest
//!   (`readability`)
//! - Allowlist sanitization with relative-URL resolution (`sanitize`)
//! - The end-to-end, never-failing extraction pipeline (`pipeline`)

pub mod document;
pub mod dom;
pub mod fetch;
pub mod metadata;
pub mod pipeline;
pub mod readability;
pub mod sanitize;

pub use document::{ParsedDocument, RawDocument};
pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use metadata::{ExtractedMetadata, extract_metadata};
pub use pipeline::{ArticleRecord, ExtractOptions, ExtractedContent, Extractor};
pub use readability::{ContentCandidate, extract_content};
pub use sanitize::{Sanitizer, sanitize};
