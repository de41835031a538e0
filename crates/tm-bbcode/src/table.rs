use tm_bbcode_parser::attr::split_escaped;
use tm_bbcode_parser::{ProcessorError, TagContext, TagOutput, TagProcessor};
use tm_bbcode_webcolor::WebColor;

/// Parse a width like `300` (pixels) or `98%`.
fn parse_width(value: &str) -> Result<String, ProcessorError> {
    let value = value.trim();
    let (number, unit) = match value.strip_suffix('%') {
        Some(number) => (number, "%"),
        None => (value, "px"),
    };
    match number.parse::<u32>() {
        Ok(n) if unit != "%" || n <= 100 => Ok(format!("{n}{unit}")),
        _ => Err(ProcessorError::invalid("width", value)),
    }
}

fn parse_span(what: &'static str, value: &str) -> Result<u32, ProcessorError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ProcessorError::invalid(what, value)),
    }
}

/// Tag `[table][/table]`. Table itself.
///
/// Optional `[table=width]` or `[table=width,background]`, the background is
/// a [`WebColor`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TableTag;

impl TagProcessor for TableTag {
    fn process(&self, tag: &TagContext<'_>) -> Result<TagOutput, ProcessorError> {
        let mut styles = vec![];
        if let Some(option) = tag.option() {
            let values = split_escaped(option, ',');
            match values.as_slice() {
                [width] => styles.push(format!("width: {}", parse_width(width)?)),
                [width, background] => {
                    styles.push(format!("width: {}", parse_width(width)?));
                    let color = WebColor::from_css(background)
                        .map_err(|_| ProcessorError::invalid("background", background.as_str()))?;
                    styles.push(format!("background-color: {color}"));
                }
                _ => return Err(ProcessorError::invalid("table option", option)),
            }
        }

        let style = if styles.is_empty() {
            String::new()
        } else {
            format!(r#" style="{}""#, styles.join("; "))
        };
        Ok(
            TagOutput::trusted(format!("<table{style}>{}</table>", tag.content()))
                .with_attachment("table"),
        )
    }
}

/// Tag `[tr][/tr]`. Table row type.
#[derive(Clone, Copy, Debug, Default)]
pub struct TableRowTag;

impl TagProcessor for TableRowTag {
    fn process(&self, tag: &TagContext<'_>) -> Result<TagOutput, ProcessorError> {
        Ok(TagOutput::trusted(format!("<tr>{}</tr>", tag.content())))
    }
}

/// Tag `[td][/td]`. Cell in table.
///
/// * `[td=width]`
/// * `[td=colspan,rowspan,width]`
#[derive(Clone, Copy, Debug, Default)]
pub struct TableCellTag;

impl TagProcessor for TableCellTag {
    fn process(&self, tag: &TagContext<'_>) -> Result<TagOutput, ProcessorError> {
        let mut attributes = String::new();
        if let Some(option) = tag.option() {
            let values = split_escaped(option, ',');
            let width = match values.as_slice() {
                [width] => width,
                [colspan, rowspan, width] => {
                    let colspan = parse_span("colspan", colspan)?;
                    let rowspan = parse_span("rowspan", rowspan)?;
                    if colspan > 1 {
                        attributes.push_str(&format!(r#" colspan="{colspan}""#));
                    }
                    if rowspan > 1 {
                        attributes.push_str(&format!(r#" rowspan="{rowspan}""#));
                    }
                    width
                }
                _ => return Err(ProcessorError::invalid("cell option", option)),
            };
            attributes.push_str(&format!(r#" style="width: {}""#, parse_width(width)?));
        }

        Ok(TagOutput::trusted(format!(
            "<td{attributes}>{}</td>",
            tag.content()
        )))
    }
}
