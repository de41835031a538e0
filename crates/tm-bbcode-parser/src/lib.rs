//! Parse bbcode and render it through pluggable tag processors.
//!
//! The pipeline:
//!
//! 1. [`lexer`] finds tag markers of known tags with one regex pass.
//! 2. [`validate`] pairs heads with tails and drops what can not be paired.
//! 3. [`tree`] builds an arena tree of text and tag nodes.
//! 4. [`render`] runs processors children first and collects metadata.
//!
//! The prepare pass ([`Document::prepare`]) is an alternative walk over the
//! same tree.
//!
//! ```
//! use tm_bbcode_parser::{BBCodeParser, TagOutput, TagRegistry};
//!
//! let mut registry = TagRegistry::new();
//! registry.register_fn("b", |tag| {
//!     Ok(TagOutput::trusted(format!("<b>{}</b>", tag.content())))
//! });
//!
//! let parser = BBCodeParser::new(registry);
//! let output = parser.render("[b]1 < 2[/b] [i]x[/i]").unwrap();
//! assert_eq!(output.html, "<b>1 &lt; 2</b> [i]x[/i]");
//! ```

pub mod attr;
pub mod config;
pub mod error;
pub mod lexer;
pub mod markup;
pub mod parser;
mod prepare;
pub mod processor;
pub mod registry;
pub mod render;
mod scanner;
pub mod token;
pub mod tree;
pub mod validate;

pub use config::ParserConfig;
pub use error::{ParseError, ProcessingError, ProcessorError};
pub use markup::{escape_html, trust_text, Escaper, Markup};
pub use parser::BBCodeParser;
pub use processor::{processor_fn, TagContext, TagOutput, TagProcessor};
pub use registry::TagRegistry;
pub use render::{RenderMetadata, RenderOutput, Renderer};
pub use tree::{Document, Node, NodeId, TagElement};

const OPEN: char = '[';
const CLOSE: char = ']';
const EQUAL: char = '=';
const BACKSLASH: char = '\\';

/// Render `data` with the tags in `registry` and default limits.
///
/// # Errors
///
/// Never with default limits, see [`BBCodeParser::render`].
pub fn render_bbcode(
    data: impl AsRef<str>,
    registry: &TagRegistry,
) -> Result<RenderOutput, ParseError> {
    BBCodeParser::new(registry.clone()).render(data.as_ref())
}
