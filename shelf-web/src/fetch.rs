//! Document retrieval behind a trait so the pipeline can be driven by a stub.

use async_trait::async_trait;
use shelf_config::FetchConfig;
use shelf_http::{HttpClient, HttpError, RequestOpts};
use std::time::Duration;
use thiserror::Error;

use crate::document::RawDocument;

#[derive(Debug, Error)]
#[error("failed to fetch {url}: {source}")]
pub struct FetchError {
    pub url: String,
    #[source]
    pub source: HttpError,
}

/// Retrieves one document per call. Implementations must not retry.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawDocument, FetchError>;
}

/// [`Fetcher`] backed by [`HttpClient`].
#[derive(Clone)]
pub struct HttpFetcher {
    client: HttpClient,
}

impl HttpFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn from_config(cfg: &FetchConfig) -> Result<Self, HttpError> {
        let client = HttpClient::new(&cfg.user_agent)?
            .with_timeout(Duration::from_secs(cfg.timeout_secs))
            .with_max_body_bytes(cfg.max_body_bytes);
        Ok(Self::new(client))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<RawDocument, FetchError> {
        let fail = |source: HttpError| FetchError {
            url: url.to_string(),
            source,
        };
        let source_url = url::Url::parse(url).map_err(|e| fail(HttpError::Url(e.to_string())))?;
        let doc = self
            .client
            .get_document(url, RequestOpts::default())
            .await
            .map_err(fail)?;
        let body = doc.text();

        tracing::debug!(
            source=%source_url,
            final_url=%doc.url,
            content_type=?doc.content_type,
            bytes=doc.body.len(),
            "fetch.complete"
        );

        Ok(RawDocument {
            source_url,
            final_url: doc.url,
            content_type: doc.content_type,
            body,
        })
    }
}
