//! Render engine.
//!
//! Rendering is depth-first, children before their parent and siblings from
//! left to right. Rendered nodes are cached by the [`Renderer`], so querying a
//! subtree twice does not run its processors twice.

use crate::error::ProcessingError;
use crate::processor::{TagContext, TagOutput};
use crate::tree::{Document, Node, NodeId, TagElement};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Side-channel data collected while rendering.
///
/// Merging is set union, so it is associative and [`Default`] is its identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenderMetadata {
    /// Resources declared by processed tags.
    pub attachments: BTreeSet<String>,

    /// Names of tags processed successfully.
    pub tags: BTreeSet<String>,
}

impl RenderMetadata {
    pub fn merge(&mut self, other: &RenderMetadata) {
        self.attachments.extend(other.attachments.iter().cloned());
        self.tags.extend(other.tags.iter().cloned());
    }

    pub fn merged(mut self, other: &RenderMetadata) -> Self {
        self.merge(other);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty() && self.tags.is_empty()
    }
}

/// Rendered subtree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedNode {
    pub html: String,

    /// Metadata of this node merged with all its descendants.
    pub metadata: RenderMetadata,
}

/// Result of rendering a whole document.
#[derive(Debug, Default, Serialize)]
pub struct RenderOutput {
    pub html: String,

    pub metadata: RenderMetadata,

    /// Processor failures. Each failed tag was rendered as its outer source.
    #[serde(skip)]
    pub errors: Vec<ProcessingError>,
}

/// Renders nodes of one document, caching results by [`NodeId`].
pub struct Renderer<'d, 'a> {
    document: &'d Document<'a>,
    cache: Vec<Option<RenderedNode>>,
    errors: Vec<ProcessingError>,
}

impl<'d, 'a> Renderer<'d, 'a> {
    pub fn new(document: &'d Document<'a>) -> Self {
        Self {
            document,
            cache: vec![None; document.len()],
            errors: vec![],
        }
    }

    /// Render node `id` and its subtree.
    pub fn render_node(&mut self, id: NodeId) -> &RenderedNode {
        let index = id.index();
        if self.cache[index].is_none() {
            let rendered = self.compute(id);
            self.cache[index] = Some(rendered);
        }
        self.cache[index].get_or_insert_with(RenderedNode::default)
    }

    /// Processor failures met so far.
    pub fn errors(&self) -> &[ProcessingError] {
        &self.errors
    }

    /// Render the whole document.
    pub fn finish(mut self) -> RenderOutput {
        let RenderedNode { html, metadata } = self.render_node(NodeId::ROOT).clone();
        RenderOutput {
            html,
            metadata,
            errors: self.errors,
        }
    }

    fn compute(&mut self, id: NodeId) -> RenderedNode {
        let document = self.document;
        match document.node(id) {
            Node::Text(range) => RenderedNode {
                html: (document.escaper)(&document.source()[range.clone()]).into_owned(),
                metadata: RenderMetadata::default(),
            },
            Node::Root { children } => self.render_children(children),
            Node::Tag(element) => self.render_tag(element),
        }
    }

    fn render_children(&mut self, children: &[NodeId]) -> RenderedNode {
        let mut result = RenderedNode::default();
        for child in children {
            let rendered = self.render_node(*child);
            result.html.push_str(&rendered.html);
            result.metadata.merge(&rendered.metadata);
        }
        result
    }

    fn render_tag(&mut self, element: &TagElement) -> RenderedNode {
        let document = self.document;
        let RenderedNode {
            html: content,
            mut metadata,
        } = self.render_children(element.children());

        let Some(processor) = element.processor() else {
            debug!(name = element.name(), "no processor, keep tag source");
            let html = self.outer_source(element, &content);
            return RenderedNode { html, metadata };
        };

        let html = match processor.process(&TagContext::new(document, element, &content)) {
            Ok(TagOutput {
                markup,
                attachments,
            }) => {
                metadata.attachments.extend(attachments);
                metadata.tags.insert(element.name().to_string());
                markup.escape(document.escaper)
            }
            Err(source) => {
                let error = ProcessingError {
                    tag: element.name().to_string(),
                    outer_source: document.outer_source(element).to_string(),
                    source,
                };
                warn!("{error}");
                self.errors.push(error);
                self.outer_source(element, &content)
            }
        };

        RenderedNode { html, metadata }
    }

    /// Rebuild the tag around its rendered content, with escaped markers.
    fn outer_source(&self, element: &TagElement, content: &str) -> String {
        let escaper = self.document.escaper;
        format!(
            "{}{}{}",
            escaper(self.document.open_source(element)),
            content,
            escaper(self.document.close_source(element)),
        )
    }
}

impl Document<'_> {
    /// Render the whole document.
    pub fn render(&self) -> RenderOutput {
        Renderer::new(self).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessorError;
    use crate::lexer::tokenize;
    use crate::registry::TagRegistry;
    use crate::validate::validate;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn registry() -> TagRegistry {
        let mut registry = TagRegistry::new();
        registry
            .register_fn("b", |tag| {
                Ok(TagOutput::trusted(format!("<b>{}</b>", tag.content())).with_attachment("bold"))
            })
            .register_fn("fail", |_| Err(ProcessorError::Missing("anything")))
            .declare("missing");
        registry
    }

    fn document<'a>(source: &'a str, registry: &TagRegistry) -> Document<'a> {
        let tokens = validate(tokenize(source, |x| registry.contains(x)));
        Document::build(source, tokens, registry)
    }

    #[test]
    fn failing_processor_is_isolated() {
        let registry = registry();
        let output = document("[b]a[/b][fail]<x>[b]y[/b][/fail][b]z[/b]", &registry).render();
        assert_eq!(
            output.html,
            "<b>a</b>[fail]&lt;x&gt;<b>y</b>[/fail]<b>z</b>"
        );
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.errors[0].tag, "fail");
        assert_eq!(output.errors[0].outer_source, "[fail]<x>[b]y[/b][/fail]");
        assert_eq!(output.metadata.tags, BTreeSet::from(["b".to_string()]));
    }

    #[test]
    fn missing_processor_escapes_markers() {
        let registry = registry();
        let output = document(r#"[missing a="<"]x[/missing]"#, &registry).render();
        assert_eq!(output.html, "[missing a=&quot;&lt;&quot;]x[/missing]");
        assert!(output.metadata.is_empty());
        assert!(output.errors.is_empty());
    }

    #[test]
    fn raw_output_is_escaped() {
        let mut registry = TagRegistry::new();
        registry.register_fn("plain", |tag| Ok(TagOutput::raw(tag.source())));
        let output = document("[plain]<i>[/plain]", &registry).render();
        assert_eq!(output.html, "&lt;i&gt;");
    }

    #[test]
    fn render_order_is_children_first() {
        let order = Arc::new(std::sync::Mutex::new(vec![]));
        let mut registry = TagRegistry::new();
        for name in ["a", "b", "c"] {
            let order = order.clone();
            registry.register_fn(name, move |tag| {
                order.lock().unwrap().push(tag.name().to_string());
                Ok(TagOutput::trusted(tag.content()))
            });
        }
        document("[a][b]1[/b][c]2[/c][/a]", &registry).render();
        assert_eq!(*order.lock().unwrap(), vec!["b", "c", "a"]);
    }

    #[test]
    fn renderer_caches_nodes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = TagRegistry::new();
        let counter = calls.clone();
        registry.register_fn("b", move |tag| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(TagOutput::trusted(tag.content()))
        });
        let document = document("[b]x[/b]", &registry);
        let mut renderer = Renderer::new(&document);
        let (id, _) = document.tags().next().unwrap();
        assert_eq!(renderer.render_node(id).html, "x");
        assert_eq!(renderer.render_node(id).html, "x");
        assert_eq!(renderer.finish().html, "x");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn metadata_merge_is_union() {
        let a = RenderMetadata {
            attachments: BTreeSet::from(["x".to_string()]),
            tags: BTreeSet::from(["b".to_string()]),
        };
        let b = RenderMetadata {
            attachments: BTreeSet::from(["y".to_string(), "x".to_string()]),
            tags: BTreeSet::new(),
        };
        let merged = RenderMetadata::default().merged(&a).merged(&b);
        assert_eq!(merged.attachments.len(), 2);
        assert_eq!(merged.tags.len(), 1);
        assert_eq!(a.clone().merged(&b), merged);
    }
}
