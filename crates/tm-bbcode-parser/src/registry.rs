use crate::error::ProcessorError;
use crate::processor::{processor_fn, TagContext, TagOutput, TagProcessor};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Known tag names and their processors.
///
/// A name can be known without processor, such tags are still parsed into the
/// tree but render as their own source.
#[derive(Clone, Default)]
pub struct TagRegistry {
    tags: HashMap<String, Option<Arc<dyn TagProcessor>>>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `processor` for tag `name`, replacing any previous one.
    ///
    /// Names are case-insensitive.
    pub fn register(
        &mut self,
        name: impl AsRef<str>,
        processor: impl TagProcessor + 'static,
    ) -> &mut Self {
        self.register_shared(name, Arc::new(processor))
    }

    pub fn register_shared(
        &mut self,
        name: impl AsRef<str>,
        processor: Arc<dyn TagProcessor>,
    ) -> &mut Self {
        self.tags
            .insert(name.as_ref().to_ascii_lowercase(), Some(processor));
        self
    }

    /// Register a closure as processor of tag `name`.
    pub fn register_fn<F>(&mut self, name: impl AsRef<str>, f: F) -> &mut Self
    where
        F: Fn(&TagContext<'_>) -> Result<TagOutput, ProcessorError> + Send + Sync + 'static,
    {
        self.register(name, processor_fn(f))
    }

    /// Make `name` a known tag without processor.
    pub fn declare(&mut self, name: impl AsRef<str>) -> &mut Self {
        self.tags
            .entry(name.as_ref().to_ascii_lowercase())
            .or_insert(None);
        self
    }

    /// Drop the processor of `name` but keep the tag known.
    ///
    /// Return false if the tag is unknown.
    pub fn disable(&mut self, name: impl AsRef<str>) -> bool {
        match self.tags.get_mut(&name.as_ref().to_ascii_lowercase()) {
            Some(processor) => {
                *processor = None;
                true
            }
            None => false,
        }
    }

    /// Forget `name` entirely, its markers will be plain text.
    pub fn remove(&mut self, name: impl AsRef<str>) -> bool {
        self.tags
            .remove(&name.as_ref().to_ascii_lowercase())
            .is_some()
    }

    /// Add all tags in `other`, overriding tags with the same name.
    pub fn extend(&mut self, other: TagRegistry) {
        self.tags.extend(other.tags);
    }

    /// Check `name` is a known tag. `name` shall be lowercase.
    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Processor of tag `name`, if any. `name` shall be lowercase.
    pub fn processor(&self, name: &str) -> Option<Arc<dyn TagProcessor>> {
        self.tags.get(name).cloned().flatten()
    }

    /// Check tag `name` has a processor treating its content as plain text.
    pub fn is_plain(&self, name: &str) -> bool {
        matches!(self.tags.get(name), Some(Some(processor)) if processor.plain())
    }

    /// Known tag names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.tags.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for name in self.names() {
            map.entry(&name, &self.tags[name].is_some());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold(tag: &TagContext<'_>) -> Result<TagOutput, ProcessorError> {
        Ok(TagOutput::trusted(format!("<b>{}</b>", tag.content())))
    }

    #[test]
    fn names_are_case_insensitive() {
        let mut registry = TagRegistry::new();
        registry.register_fn("B", bold);
        assert!(registry.contains("b"));
        assert!(!registry.contains("B"));
        assert!(registry.processor("b").is_some());
    }

    #[test]
    fn declared_tag_has_no_processor() {
        let mut registry = TagRegistry::new();
        registry.declare("spoiler");
        assert!(registry.contains("spoiler"));
        assert!(registry.processor("spoiler").is_none());
    }

    #[test]
    fn declare_keeps_existing_processor() {
        let mut registry = TagRegistry::new();
        registry.register_fn("b", bold).declare("b");
        assert!(registry.processor("b").is_some());
    }

    #[test]
    fn disable_and_remove() {
        let mut registry = TagRegistry::new();
        registry.register_fn("b", bold).register_fn("i", bold);
        assert!(registry.disable("b"));
        assert!(!registry.disable("u"));
        assert!(registry.contains("b"));
        assert!(registry.processor("b").is_none());
        assert!(registry.remove("i"));
        assert!(!registry.contains("i"));
        assert_eq!(registry.names(), vec!["b"]);
    }

    #[test]
    fn plain_tags() {
        struct Code;

        impl TagProcessor for Code {
            fn process(&self, tag: &TagContext<'_>) -> Result<TagOutput, ProcessorError> {
                Ok(TagOutput::raw(tag.source()))
            }

            fn plain(&self) -> bool {
                true
            }
        }

        let mut registry = TagRegistry::new();
        registry.register("code", Code).register_fn("b", bold).declare("q");
        assert!(registry.is_plain("code"));
        assert!(!registry.is_plain("b"));
        assert!(!registry.is_plain("q"));
        assert!(!registry.is_plain("x"));
        registry.disable("code");
        assert!(!registry.is_plain("code"));
    }

    #[test]
    fn debug_lists_names() {
        let mut registry = TagRegistry::new();
        registry.register_fn("b", bold).declare("a");
        assert_eq!(format!("{registry:?}"), r#"{"a": false, "b": true}"#);
    }
}
