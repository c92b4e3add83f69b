//! Render-time handling of stored article content.
//!
//! Stored content is either sanitized markup (displayed as-is) or plain text,
//! which is segmented here into typed blocks with inline spans.
//!
//! - [`segment`]: plain text to [`ContentBlock`]s
//! - [`stored`]: load stored content by its recorded form
//! - [`html`]: blocks to escaped HTML with safe links
//!
//! ```
//! use shelf_render::{ContentBlock, InlineSpan, segment};
//!
//! let blocks = segment("## Example");
//! assert_eq!(
//!     blocks,
//!     vec![ContentBlock::Heading { level: 2, spans: vec![InlineSpan::Plain("Example".into())] }]
//! );
//! ```

pub mod blocks;
pub mod html;
pub mod inline;
pub mod segment;
pub mod stored;

pub use blocks::{ContentBlock, InlineSpan};
pub use html::render_blocks_html;
pub use inline::tokenize;
pub use segment::segment;
pub use stored::{StoredContent, StoredForm};
