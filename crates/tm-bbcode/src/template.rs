use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tm_bbcode_parser::{escape_html, ProcessorError, TagContext, TagOutput, TagProcessor};

/// Regex to match `{{ name }}` and `{{ attr.key }}` placeholders.
static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();

/// Values a template is rendered with.
#[derive(Clone, Copy, Debug)]
pub struct TemplateContext<'a> {
    pub option: Option<&'a str>,
    pub attributes: &'a HashMap<String, String>,

    /// Rendered content, already html.
    pub content: &'a str,

    /// Source text of the content.
    pub source: &'a str,
}

impl<'a> From<&TagContext<'a>> for TemplateContext<'a> {
    fn from(tag: &TagContext<'a>) -> Self {
        Self {
            option: tag.option(),
            attributes: tag.attributes(),
            content: tag.content(),
            source: tag.source(),
        }
    }
}

/// Backend turning a template and a tag into html.
pub trait TemplateEngine: Send + Sync {
    fn render(&self, template: &str, context: &TemplateContext<'_>) -> Result<String, ProcessorError>;
}

/// Minimal [`TemplateEngine`] substituting placeholders, nothing more.
///
/// | placeholder | value |
/// |-------------|-------|
/// | `{{ content }}` | rendered content |
/// | `{{ option }}` | escaped option, empty if absent |
/// | `{{ source }}` | escaped content source |
/// | `{{ attr.KEY }}` | escaped attribute `KEY`, empty if absent |
///
/// Any other placeholder is an error.
#[derive(Clone, Copy, Debug, Default)]
pub struct Placeholders;

impl TemplateEngine for Placeholders {
    fn render(&self, template: &str, context: &TemplateContext<'_>) -> Result<String, ProcessorError> {
        let re = PLACEHOLDER_RE.get_or_init(|| {
            Regex::new(r"\{\{\s*(?<name>[A-Za-z0-9_-]+)(?:\.(?<key>[A-Za-z0-9_-]+))?\s*\}\}")
                .expect("invalid placeholder regex")
        });

        let mut unknown = None;
        let html = re.replace_all(template, |caps: &Captures| {
            let name = &caps["name"];
            match (name, caps.name("key")) {
                ("content", None) => context.content.to_string(),
                ("option", None) => escape_html(context.option.unwrap_or_default()).into_owned(),
                ("source", None) => escape_html(context.source).into_owned(),
                ("attr", Some(key)) => context
                    .attributes
                    .get(key.as_str())
                    .map(|x| escape_html(x).into_owned())
                    .unwrap_or_default(),
                _ => {
                    unknown.get_or_insert_with(|| caps[0].to_string());
                    String::new()
                }
            }
        });

        match unknown {
            Some(placeholder) => Err(ProcessorError::invalid("placeholder", placeholder)),
            None => Ok(html.into_owned()),
        }
    }
}

/// User defined tag, as written in a tag set file.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct TagDefinition {
    pub name: String,
    pub template: String,

    #[serde(default)]
    pub attachments: Vec<String>,
}

/// Tag rendered through a template.
#[derive(Clone)]
pub struct TemplateTag {
    template: String,
    attachments: Vec<String>,
    engine: Arc<dyn TemplateEngine>,
}

impl TemplateTag {
    /// Template tag using the [`Placeholders`] engine.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            attachments: vec![],
            engine: Arc::new(Placeholders),
        }
    }

    pub fn with_engine(mut self, engine: Arc<dyn TemplateEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }
}

impl From<TagDefinition> for TemplateTag {
    fn from(definition: TagDefinition) -> Self {
        TemplateTag::new(definition.template).with_attachments(definition.attachments)
    }
}

impl TagProcessor for TemplateTag {
    fn process(&self, tag: &TagContext<'_>) -> Result<TagOutput, ProcessorError> {
        let html = self.engine.render(&self.template, &TemplateContext::from(tag))?;
        Ok(TagOutput::trusted(html).with_attachments(self.attachments.iter().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tm_bbcode_parser::{render_bbcode, TagRegistry};

    fn render(template: &str, text: &str) -> tm_bbcode_parser::RenderOutput {
        let mut registry = TagRegistry::new();
        registry
            .register("x", TemplateTag::new(template).with_attachments(vec!["x-css".into()]))
            .register("b", crate::SimpleTag::new("b"));
        render_bbcode(text, &registry).unwrap()
    }

    #[rstest]
    #[case("<p>{{ content }}</p>", "[x][b]1[/b][/x]", "<p><b>1</b></p>")]
    #[case("<p>{{option}}</p>", "[x=<y>]z[/x]", "<p>&lt;y&gt;</p>")]
    #[case("<p>{{ option }}</p>", "[x]z[/x]", "<p></p>")]
    #[case("<pre>{{ source }}</pre>", "[x][b]1[/b][/x]", "<pre>[b]1[/b]</pre>")]
    #[case(
        r#"<a title="{{ attr.title }}" data-n="{{ attr.n }}">{{ content }}</a>"#,
        r#"[x title="a \"b\""]c[/x]"#,
        r#"<a title="a &quot;b&quot;" data-n="">c</a>"#
    )]
    fn render_template(#[case] template: &str, #[case] text: &str, #[case] expected: &str) {
        let output = render(template, text);
        assert_eq!(output.html, expected);
        assert!(output.metadata.attachments.contains("x-css"));
    }

    #[rstest]
    #[case("{{ nothing }}")]
    #[case("{{ content.key }}")]
    #[case("{{ attr }}")]
    #[case("{{ Content }}")]
    #[case("<p>{{ my_value }}</p>")]
    fn unknown_placeholder(#[case] template: &str) {
        let output = render(template, "[x]y[/x]");
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.html, "[x]y[/x]");
        assert!(output.metadata.attachments.is_empty());
    }

    #[test]
    fn custom_engine() {
        struct Upper;

        impl TemplateEngine for Upper {
            fn render(
                &self,
                template: &str,
                context: &TemplateContext<'_>,
            ) -> Result<String, ProcessorError> {
                Ok(format!("{template}{}", context.content.to_uppercase()))
            }
        }

        let mut registry = TagRegistry::new();
        registry.register("x", TemplateTag::new("> ").with_engine(Arc::new(Upper)));
        assert_eq!(render_bbcode("[x]abc[/x]", &registry).unwrap().html, "> ABC");
    }

    #[test]
    fn definition_from_toml_shape() {
        let definition = TagDefinition {
            name: "spoiler".into(),
            template: "<details>{{ content }}</details>".into(),
            attachments: vec!["spoiler".into()],
        };
        let tag = TemplateTag::from(definition);
        assert_eq!(tag.attachments, vec!["spoiler".to_string()]);
    }
}
