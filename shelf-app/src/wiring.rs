use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use shelf_common::ShelfError;
use shelf_common::observability::{LogConfig, LogFormat};
use shelf_config::{LoggingConfig, ShelfConfig};
use shelf_render::{ContentBlock, StoredContent, render_blocks_html};
use shelf_web::{ArticleRecord, Extractor};
use std::path::{Path, PathBuf};

/// Map the `logging` config section onto the subscriber settings.
pub fn log_config(cfg: &LoggingConfig) -> Result<LogConfig, ShelfError> {
    let format: LogFormat = cfg.format.parse().map_err(ShelfError::Config)?;
    Ok(LogConfig {
        format,
        emit_stderr: cfg.stderr,
        log_dir: cfg.dir.as_ref().map(PathBuf::from),
        default_filter: cfg.filter.clone(),
        ..LogConfig::default()
    })
}

pub async fn run_extract(cfg: &ShelfConfig, url: &str) -> Result<Value> {
    let extractor = Extractor::from_config(cfg).context("building HTTP client")?;
    let record = extractor.extract(url).await;
    Ok(serde_json::to_value(record)?)
}

#[derive(Debug, Serialize)]
struct RenderOutput<'a> {
    form: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    markup: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    blocks: Option<&'a [ContentBlock]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<String>,
}

/// Describe a saved record's content the way the reader displays it.
pub fn render_content(record: &ArticleRecord) -> Result<Value> {
    let stored = record.stored_content();
    let output = match &stored {
        StoredContent::Unavailable => RenderOutput {
            form: stored.kind(),
            markup: None,
            blocks: None,
            html: None,
        },
        StoredContent::Markup(m) => RenderOutput {
            form: stored.kind(),
            markup: Some(*m),
            blocks: None,
            html: None,
        },
        StoredContent::Text(blocks) => RenderOutput {
            form: stored.kind(),
            markup: None,
            blocks: Some(blocks.as_slice()),
            html: Some(render_blocks_html(blocks)),
        },
    };
    Ok(serde_json::to_value(output)?)
}

/// Render an `ArticleRecord` JSON file as written by `shelf extract`.
pub fn run_render(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .map_err(ShelfError::from)
        .with_context(|| format!("reading {}", path.display()))?;
    let record: ArticleRecord = serde_json::from_str(&raw)
        .with_context(|| format!("parsing article record {}", path.display()))?;
    render_content(&record)
}
