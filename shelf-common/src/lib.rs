//! Common types and utilities shared across Shelf crates.
//!
//! This crate defines the observability setup, the shared error type, and the
//! small text/markup helpers that the extraction and rendering crates both
//! lean on. It is intentionally lightweight so every crate in the workspace
//! can depend on it without introducing heavy transitive costs.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`text`]: Whitespace collapsing, char-safe truncation, HTML escaping
//! - [`links`]: Attribute values that make an outbound link safe
//! - [`ShelfError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use shelf_common::text::truncate_chars;
//!
//! assert_eq!(truncate_chars("  héllo world  ", 5), "héllo");
//! ```

pub mod links;
pub mod observability;
pub mod text;

/// Error types used by the Shelf binaries and glue code.
///
/// The extraction pipeline itself degrades instead of failing, so this enum
/// only covers the edges: configuration, filesystem access, and caller input.
#[derive(thiserror::Error, Debug)]
pub enum ShelfError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading or writing a local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A caller supplied something we cannot work with (e.g. an unparseable URL).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient alias for results that use [`ShelfError`].
pub type Result<T> = std::result::Result<T, ShelfError>;
