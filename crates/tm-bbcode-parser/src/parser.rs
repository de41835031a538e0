use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::markup::{escape_html, Escaper};
use crate::registry::TagRegistry;
use crate::render::RenderOutput;
use crate::token::Token;
use crate::tree::Document;
use crate::validate::{drop_plain_content, limit_depth, validate};
use std::sync::Arc;
use tracing::trace;

/// Entry point: tokenize, pair, build and render bbcode.
///
/// Cheap to clone, the registry is shared.
#[derive(Clone, Debug)]
pub struct BBCodeParser {
    registry: Arc<TagRegistry>,
    config: ParserConfig,
    escaper: Escaper,
}

impl BBCodeParser {
    pub fn new(registry: TagRegistry) -> Self {
        Self::from_shared(Arc::new(registry))
    }

    pub fn from_shared(registry: Arc<TagRegistry>) -> Self {
        Self {
            registry,
            config: ParserConfig::default(),
            escaper: escape_html,
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `escaper` on text nodes and raw processor output instead of
    /// [`escape_html`].
    pub fn with_escaper(mut self, escaper: Escaper) -> Self {
        self.escaper = escaper;
        self
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// All markers of known tags, paired or not.
    pub fn scan(&self, text: &str) -> Vec<Token> {
        Lexer::new(text).scan(|name| self.registry.contains(name))
    }

    /// Paired markers within the depth limit, outside plain tags.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let tokens = drop_plain_content(validate(self.scan(text)), |name| {
            self.registry.is_plain(name)
        });
        let tokens = limit_depth(tokens, self.config.max_depth);
        trace!(count = tokens.len(), "paired tokens");
        tokens
    }

    /// Parse `text` into a [`Document`].
    ///
    /// # Errors
    ///
    /// [`ParseError::InputTooLong`] if `text` breaks the length limit.
    pub fn parse<'a>(&self, text: &'a str) -> Result<Document<'a>, ParseError> {
        self.config.check_input(text)?;
        let mut document = Document::build(text, self.tokenize(text), &self.registry);
        document.set_escaper(self.escaper);
        Ok(document)
    }

    /// Parse `text` produced by [`Document::prepare`].
    ///
    /// Processors see [`TagContext::prepared`] set and decode what they
    /// encoded.
    ///
    /// # Errors
    ///
    /// [`ParseError::InputTooLong`] if `text` breaks the length limit.
    ///
    /// [`TagContext::prepared`]: crate::processor::TagContext::prepared
    pub fn parse_prepared<'a>(&self, text: &'a str) -> Result<Document<'a>, ParseError> {
        let mut document = self.parse(text)?;
        document.set_prepared(true);
        Ok(document)
    }

    /// Parse and render `text`.
    ///
    /// # Errors
    ///
    /// [`ParseError::InputTooLong`] if `text` breaks the length limit.
    pub fn render(&self, text: &str) -> Result<RenderOutput, ParseError> {
        Ok(self.parse(text)?.render())
    }

    /// Parse and render prepared `text`.
    ///
    /// # Errors
    ///
    /// [`ParseError::InputTooLong`] if `text` breaks the length limit.
    pub fn render_prepared(&self, text: &str) -> Result<RenderOutput, ParseError> {
        Ok(self.parse_prepared(text)?.render())
    }

    /// Parse `text` and run the prepare pass on it.
    ///
    /// # Errors
    ///
    /// [`ParseError::InputTooLong`] if `text` breaks the length limit.
    pub fn prepare(&self, text: &str) -> Result<String, ParseError> {
        Ok(self.parse(text)?.prepare())
    }
}
