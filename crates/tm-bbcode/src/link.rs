use tm_bbcode_parser::{escape_html, ProcessorError, TagContext, TagOutput, TagProcessor};

const SCHEMES: &[&str] = &["http://", "https://", "ftp://", "mailto:"];

/// Tag `[url]`.
///
/// * `[url]https://example.com[/url]`: link to its own text.
/// * `[url=https://example.com]text[/url]`: link with text.
///
/// Only absolute http(s), ftp and mailto links or site relative paths are
/// accepted.
#[derive(Clone, Copy, Debug, Default)]
pub struct UrlTag;

fn check_href(href: &str) -> Result<&str, ProcessorError> {
    let href = href.trim();
    if href.is_empty() {
        return Err(ProcessorError::Missing("url"));
    }

    let lower = href.to_ascii_lowercase();
    let relative = href.starts_with('/') && !href.starts_with("//");
    if relative || SCHEMES.iter().any(|x| lower.starts_with(x)) {
        Ok(href)
    } else {
        Err(ProcessorError::invalid("url", href))
    }
}

impl TagProcessor for UrlTag {
    fn process(&self, tag: &TagContext<'_>) -> Result<TagOutput, ProcessorError> {
        let (href, text) = match tag.option() {
            Some(option) => (check_href(option)?, tag.content().to_string()),
            None => {
                let href = check_href(tag.source())?;
                (href, escape_html(href).into_owned())
            }
        };

        Ok(TagOutput::trusted(format!(
            r#"<a href="{}" rel="nofollow">{}</a>"#,
            escape_html(href),
            text
        )))
    }
}
