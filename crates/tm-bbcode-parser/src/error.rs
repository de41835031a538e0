use thiserror::Error;

/// Errors returned before a document is built.
///
/// Malformed bbcode is never an error, it degrades to literal text instead.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input is longer than [`ParserConfig::max_input_len`].
    ///
    /// [`ParserConfig::max_input_len`]: crate::config::ParserConfig::max_input_len
    #[error("input of {len} bytes exceeds the limit of {max} bytes")]
    InputTooLong { len: usize, max: usize },
}

/// Error raised by a [`TagProcessor`] on a single tag.
///
/// [`TagProcessor`]: crate::processor::TagProcessor
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// A required option or attribute is absent.
    #[error("missing {0}")]
    Missing(&'static str),

    /// An option, attribute or content value can not be used.
    #[error("invalid {what}: {value:?}")]
    InvalidValue { what: &'static str, value: String },

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ProcessorError {
    pub fn invalid(what: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            what,
            value: value.into(),
        }
    }

    pub fn other(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Other(error.into())
    }
}

/// A processor failure, bound to the tag it happened on.
///
/// The render engine records these in [`RenderOutput::errors`] and keeps going
/// with the tag's outer source in place of its output.
///
/// [`RenderOutput::errors`]: crate::render::RenderOutput::errors
#[derive(Debug, Error)]
#[error("failed to process tag [{tag}]: {source}")]
pub struct ProcessingError {
    /// Lowercase tag name.
    pub tag: String,

    /// Source text of the tag including its opening and closing markers.
    pub outer_source: String,

    #[source]
    pub source: ProcessorError,
}
