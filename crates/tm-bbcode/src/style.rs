use tm_bbcode_parser::{escape_html, ProcessorError, TagContext, TagOutput, TagProcessor};
use tm_bbcode_webcolor::WebColor;

/// Font size keywords for `[size=1]` to `[size=7]`.
const SIZE_KEYWORDS: [&str; 7] = [
    "x-small", "small", "medium", "large", "x-large", "xx-large", "xxx-large",
];

/// Largest size accepted in `px` or `pt`.
const MAX_ABSOLUTE_SIZE: u32 = 72;

/// Tag `[color=red]`.
///
/// Accepts named [`WebColor`]s and custom css colors, see
/// [`WebColor::Custom`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ColorTag;

impl TagProcessor for ColorTag {
    fn process(&self, tag: &TagContext<'_>) -> Result<TagOutput, ProcessorError> {
        let option = tag.option().ok_or(ProcessorError::Missing("color"))?;
        let color =
            WebColor::from_css(option).map_err(|_| ProcessorError::invalid("color", option))?;

        Ok(TagOutput::trusted(format!(
            r#"<span style="color: {}">{}</span>"#,
            escape_html(color.as_str()),
            tag.content()
        )))
    }
}

/// Tag `[size=N]`.
///
/// `N` is a level from 1 to 7, or a length in `px` or `pt`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SizeTag;

fn parse_size(value: &str) -> Option<String> {
    let value = value.trim();
    if let Ok(level) = value.parse::<usize>() {
        return SIZE_KEYWORDS
            .get(level.checked_sub(1)?)
            .map(|x| x.to_string());
    }

    let (number, unit) = match value.strip_suffix("px") {
        Some(number) => (number, "px"),
        None => (value.strip_suffix("pt")?, "pt"),
    };
    match number.parse::<u32>() {
        Ok(n) if (1..=MAX_ABSOLUTE_SIZE).contains(&n) => Some(format!("{n}{unit}")),
        _ => None,
    }
}

impl TagProcessor for SizeTag {
    fn process(&self, tag: &TagContext<'_>) -> Result<TagOutput, ProcessorError> {
        let option = tag.option().ok_or(ProcessorError::Missing("size"))?;
        let size = parse_size(option).ok_or_else(|| ProcessorError::invalid("size", option))?;

        Ok(TagOutput::trusted(format!(
            r#"<span style="font-size: {size}">{}</span>"#,
            tag.content()
        )))
    }
}
