use crate::error::ProcessorError;
use crate::markup::Markup;
use crate::tree::{Document, TagElement};
use std::collections::{BTreeSet, HashMap};

/// Convert a tag node into output.
///
/// Implementations must not rely on render order beyond "children first" and
/// must be safe to share between threads: one registry can serve concurrent
/// parses.
pub trait TagProcessor: Send + Sync {
    /// Produce output for `tag`, whose children are already rendered into
    /// [`TagContext::content`].
    ///
    /// # Errors
    ///
    /// Any error makes the render engine fall back to the outer source of the
    /// tag and record a [`ProcessingError`].
    ///
    /// [`ProcessingError`]: crate::error::ProcessingError
    fn process(&self, tag: &TagContext<'_>) -> Result<TagOutput, ProcessorError>;

    /// Transform tag content before unrelated text filters run on the
    /// document.
    ///
    /// [`TagContext::content`] holds the prepared children here. Return `None`
    /// to keep them.
    fn prepare(&self, tag: &TagContext<'_>) -> Option<String> {
        let _ = tag;
        None
    }

    /// Whether tag content is plain text.
    ///
    /// Markers inside a plain tag are never parsed, so no processor runs on
    /// them and [`TagContext::content`] is the escaped source.
    fn plain(&self) -> bool {
        false
    }
}

/// [`TagProcessor`] made from a closure, see [`processor_fn`].
pub struct FnProcessor<F>(F);

impl<F> TagProcessor for FnProcessor<F>
where
    F: Fn(&TagContext<'_>) -> Result<TagOutput, ProcessorError> + Send + Sync,
{
    fn process(&self, tag: &TagContext<'_>) -> Result<TagOutput, ProcessorError> {
        (self.0)(tag)
    }
}

/// Wrap a closure as a [`TagProcessor`] without prepare step.
pub fn processor_fn<F>(f: F) -> FnProcessor<F>
where
    F: Fn(&TagContext<'_>) -> Result<TagOutput, ProcessorError> + Send + Sync,
{
    FnProcessor(f)
}

/// Result of processing one tag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagOutput {
    pub markup: Markup,

    /// Resources required by this output, like stylesheet ids.
    pub attachments: BTreeSet<String>,
}

impl TagOutput {
    /// Output already safe to use as html.
    pub fn trusted(html: impl Into<String>) -> Self {
        Markup::trusted(html).into()
    }

    /// Output that still needs escaping.
    pub fn raw(text: impl Into<String>) -> Self {
        Markup::raw(text).into()
    }

    pub fn with_attachment(mut self, attachment: impl Into<String>) -> Self {
        self.attachments.insert(attachment.into());
        self
    }

    pub fn with_attachments<I, S>(mut self, attachments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attachments
            .extend(attachments.into_iter().map(Into::into));
        self
    }
}

impl From<Markup> for TagOutput {
    fn from(markup: Markup) -> Self {
        Self {
            markup,
            attachments: BTreeSet::new(),
        }
    }
}

/// Read-only view of a tag node handed to processors.
#[derive(Clone, Copy)]
pub struct TagContext<'a> {
    element: &'a TagElement,

    /// Whole document source.
    source: &'a str,

    /// Rendered (or prepared) children.
    content: &'a str,

    prepared: bool,
}

impl<'a> TagContext<'a> {
    pub(crate) fn new(
        document: &'a Document<'_>,
        element: &'a TagElement,
        content: &'a str,
    ) -> Self {
        Self {
            element,
            source: document.source(),
            content,
            prepared: document.is_prepared(),
        }
    }

    /// Lowercase tag name.
    pub fn name(&self) -> &'a str {
        self.element.name()
    }

    /// Raw argument, like `=red` or ` width=10`.
    pub fn argument(&self) -> &'a str {
        self.element.argument()
    }

    pub fn option(&self) -> Option<&'a str> {
        self.element.option()
    }

    pub fn attributes(&self) -> &'a HashMap<String, String> {
        self.element.attributes()
    }

    pub fn attr(&self, key: &str) -> Option<&'a str> {
        self.element.attributes().get(key).map(String::as_str)
    }

    /// Rendered children when processing, prepared children when preparing.
    pub fn content(&self) -> &'a str {
        self.content
    }

    /// Source text between the opening and closing markers.
    pub fn source(&self) -> &'a str {
        &self.source[self.element.content_range()]
    }

    /// Source text including the opening and closing markers.
    pub fn outer_source(&self) -> &'a str {
        &self.source[self.element.outer_range()]
    }

    /// Whether the document was parsed from the output of a prepare pass.
    pub fn prepared(&self) -> bool {
        self.prepared
    }
}
