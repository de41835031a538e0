use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tm_bbcode_parser::{escape_html, ProcessorError, TagContext, TagOutput, TagProcessor};

/// Tag `[code]`, or `[code=lang]` to mark the language.
///
/// Content is never parsed as bbcode, it is shown as its source text and tags
/// inside it are not processed.
///
/// The prepare step base64 encodes the content so text filters running on the
/// prepared document can not touch it. Rendering a prepared document decodes
/// it again.
#[derive(Clone, Copy, Debug, Default)]
pub struct CodeTag;

impl CodeTag {
    fn decode(encoded: &str) -> Result<String, ProcessorError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(ProcessorError::other)?;
        String::from_utf8(bytes).map_err(ProcessorError::other)
    }
}

impl TagProcessor for CodeTag {
    fn process(&self, tag: &TagContext<'_>) -> Result<TagOutput, ProcessorError> {
        let code = if tag.prepared() {
            Self::decode(tag.source())?
        } else {
            tag.source().to_string()
        };

        let class = match tag.option().map(str::trim) {
            Some(lang) if !lang.is_empty() => {
                format!(r#" class="language-{}""#, escape_html(lang))
            }
            _ => String::new(),
        };

        Ok(TagOutput::trusted(format!(
            "<pre><code{class}>{}</code></pre>",
            escape_html(&code)
        ))
        .with_attachment("code"))
    }

    fn prepare(&self, tag: &TagContext<'_>) -> Option<String> {
        Some(STANDARD.encode(tag.source()))
    }

    fn plain(&self) -> bool {
        true
    }
}
