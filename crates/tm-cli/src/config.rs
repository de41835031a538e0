use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tm_bbcode::{standard_tags, TagDefinition, TemplateTag};
use tm_bbcode_parser::lexer::is_tag_name;
use tm_bbcode_parser::{BBCodeParser, ParserConfig, TagRegistry};
use tokio::fs;
use tracing::{debug, warn};

fn default_standard() -> bool {
    true
}

/// Tag set loaded from a toml file.
///
/// ```toml
/// standard = true
/// disabled = ["size"]
///
/// [parser]
/// max_depth = 16
///
/// [[tag]]
/// name = "spoiler"
/// template = "<details>{{ content }}</details>"
/// attachments = ["spoiler"]
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TagSetConfig {
    /// Include the standard tags.
    #[serde(default = "default_standard")]
    pub(crate) standard: bool,

    #[serde(default)]
    pub(crate) parser: ParserConfig,

    /// Tags still recognized but rendered as their source.
    #[serde(default)]
    pub(crate) disabled: Vec<String>,

    /// User defined template tags, override standard tags of the same name.
    #[serde(default, rename = "tag")]
    pub(crate) tags: Vec<TagDefinition>,
}

impl Default for TagSetConfig {
    fn default() -> Self {
        Self {
            standard: true,
            parser: ParserConfig::default(),
            disabled: vec![],
            tags: vec![],
        }
    }
}

impl TagSetConfig {
    pub(crate) fn from_toml(data: &str) -> Result<Self> {
        let config: Self = toml::from_str(data).context("invalid tag set config")?;
        config.check_names()?;
        Ok(config)
    }

    /// Reject tag names that can never appear in a tag marker.
    fn check_names(&self) -> Result<()> {
        let names = self
            .tags
            .iter()
            .map(|x| x.name.as_str())
            .chain(self.disabled.iter().map(String::as_str));
        for name in names {
            if !is_tag_name(name) {
                bail!("invalid tag name {name:?}, expected ascii letters, digits or '_'");
            }
        }
        Ok(())
    }

    /// Load config from `path`, or the default config when `path` is `None`.
    pub(crate) async fn load(path: Option<&str>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let data = fs::read_to_string(path)
            .await
            .with_context(|| format!("when reading config file {path}"))?;
        Self::from_toml(data.as_str())
    }

    pub(crate) fn registry(&self) -> TagRegistry {
        let mut registry = if self.standard {
            standard_tags()
        } else {
            TagRegistry::new()
        };

        for definition in self.tags.iter().cloned() {
            debug!(name = definition.name.as_str(), "register template tag");
            let name = definition.name.clone();
            registry.register(name, TemplateTag::from(definition));
        }

        for name in self.disabled.iter() {
            if !registry.disable(name) {
                warn!(name = name.as_str(), "disabled tag is not defined, declare it");
                registry.declare(name);
            }
        }

        registry
    }

    pub(crate) fn parser(&self) -> BBCodeParser {
        BBCodeParser::new(self.registry()).with_config(self.parser.clone())
    }
}
