use tm_bbcode_parser::{escape_html, ProcessorError, TagContext, TagOutput, TagProcessor};

/// Tag `[quote]`, or `[quote=author]` to cite the author.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuoteTag;

impl TagProcessor for QuoteTag {
    fn process(&self, tag: &TagContext<'_>) -> Result<TagOutput, ProcessorError> {
        let cite = match tag.option().map(str::trim) {
            Some(author) if !author.is_empty() => {
                format!("<cite>{}</cite>", escape_html(author))
            }
            _ => String::new(),
        };

        Ok(
            TagOutput::trusted(format!("<blockquote>{cite}{}</blockquote>", tag.content()))
                .with_attachment("quote"),
        )
    }
}
