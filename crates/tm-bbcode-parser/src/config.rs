use crate::error::ParseError;
use serde::{Deserialize, Serialize};

/// Tags nested deeper than this are left as literal text.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Limits applied on each parse.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Deepest tag nesting level turned into tag nodes.
    ///
    /// Top level tags are at depth 1. Pairs below this level stay in the
    /// document as plain text.
    pub max_depth: usize,

    /// Longest input in bytes, no limit if `None`.
    pub max_input_len: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_len: None,
        }
    }
}

impl ParserConfig {
    /// Reject `text` if it breaks the length limit.
    ///
    /// # Errors
    ///
    /// [`ParseError::InputTooLong`] when `text` is longer than
    /// [`ParserConfig::max_input_len`].
    pub fn check_input(&self, text: &str) -> Result<(), ParseError> {
        match self.max_input_len {
            Some(max) if text.len() > max => Err(ParseError::InputTooLong {
                len: text.len(),
                max,
            }),
            _ => Ok(()),
        }
    }
}
