use tm_bbcode_parser::{ProcessorError, TagContext, TagOutput, TagProcessor};

/// Tag wrapping its content in one html element without attributes.
///
/// `[b]text[/b]` with element `b` gives `<b>text</b>`.
#[derive(Clone, Debug)]
pub struct SimpleTag {
    element: &'static str,
}

impl SimpleTag {
    pub const fn new(element: &'static str) -> Self {
        Self { element }
    }
}

impl TagProcessor for SimpleTag {
    fn process(&self, tag: &TagContext<'_>) -> Result<TagOutput, ProcessorError> {
        Ok(TagOutput::trusted(format!(
            "<{0}>{1}</{0}>",
            self.element,
            tag.content()
        )))
    }
}
