//! Arena tree of a parsed document.
//!
//! Nodes live in one `Vec` and refer to each other with [`NodeId`]. Each node
//! stores the id of its parent, containers also store the ordered ids of their
//! children.

use crate::attr::{parse_argument, TagArgument};
use crate::markup::{escape_html, Escaper};
use crate::processor::TagProcessor;
use crate::registry::TagRegistry;
use crate::token::Token;
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Index of a node in its [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node, present in every document.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// All types of nodes.
#[derive(Debug)]
pub enum Node {
    /// Wraps the whole document.
    Root { children: Vec<NodeId> },

    /// Plain text, a byte range of source.
    Text(Range<usize>),

    /// A paired tag.
    Tag(TagElement),
}

impl Node {
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Root { children } => children,
            Node::Tag(element) => &element.children,
            Node::Text(..) => &[],
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            Node::Root { children } => Some(children),
            Node::Tag(element) => Some(&mut element.children),
            Node::Text(..) => None,
        }
    }
}

/// Tag node data.
pub struct TagElement {
    /// Lowercase name.
    name: String,

    /// Raw argument as written in source.
    argument: String,

    option: Option<String>,

    attributes: HashMap<String, String>,

    /// Byte range of the opening marker.
    open: Range<usize>,

    /// Byte range of the closing marker.
    close: Range<usize>,

    children: Vec<NodeId>,

    /// Looked up by name when building, absent for declared-only tags.
    processor: Option<Arc<dyn TagProcessor>>,
}

impl TagElement {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn argument(&self) -> &str {
        &self.argument
    }

    pub fn option(&self) -> Option<&str> {
        self.option.as_deref()
    }

    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn processor(&self) -> Option<&Arc<dyn TagProcessor>> {
        self.processor.as_ref()
    }

    pub fn open_range(&self) -> Range<usize> {
        self.open.clone()
    }

    pub fn close_range(&self) -> Range<usize> {
        self.close.clone()
    }

    /// Range between the opening and closing markers.
    pub fn content_range(&self) -> Range<usize> {
        self.open.end..self.close.start
    }

    /// Range from the start of the opening marker to the end of the closing
    /// marker.
    pub fn outer_range(&self) -> Range<usize> {
        self.open.start..self.close.end
    }
}

impl fmt::Debug for TagElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagElement")
            .field("name", &self.name)
            .field("argument", &self.argument)
            .field("option", &self.option)
            .field("attributes", &self.attributes)
            .field("open", &self.open)
            .field("close", &self.close)
            .field("children", &self.children)
            .field("processor", &self.processor.is_some())
            .finish()
    }
}

#[derive(Debug)]
struct Entry {
    parent: Option<NodeId>,
    node: Node,
}

/// A parsed document, borrowing its source text.
pub struct Document<'a> {
    source: &'a str,
    nodes: Vec<Entry>,
    pub(crate) escaper: Escaper,
    prepared: bool,
}

impl<'a> Document<'a> {
    /// Build the tree from validated tokens.
    ///
    /// `tokens` must be paired and well nested, which is what
    /// [`validate`](crate::validate::validate) returns.
    pub fn build(source: &'a str, tokens: Vec<Token>, registry: &TagRegistry) -> Self {
        let mut document = Self {
            source,
            nodes: vec![Entry {
                parent: None,
                node: Node::Root { children: vec![] },
            }],
            escaper: escape_html,
            prepared: false,
        };

        let mut stack = vec![NodeId::ROOT];
        let mut index = 0;

        for token in tokens {
            let end = token.end();
            let top = stack.last().copied().unwrap_or(NodeId::ROOT);

            if token.is_tail() && stack.len() < 2 {
                debug_assert!(false, "tail without head: {token}");
                continue;
            }

            if token.start() > index {
                document.push_text(top, index..token.start());
            }

            if token.is_head() {
                let TagArgument { option, attributes } = parse_argument(&token.argument);
                let content_end = token.end() + token.content_len.unwrap_or_default();
                let processor = registry.processor(&token.name);
                let id = document.alloc(
                    Some(top),
                    Node::Tag(TagElement {
                        name: token.name,
                        argument: token.argument,
                        option,
                        attributes,
                        open: token.span.clone(),
                        close: content_end..content_end,
                        children: vec![],
                        processor,
                    }),
                );
                stack.push(id);
            } else if let Some(id) = stack.pop() {
                if let Node::Tag(element) = &mut document.nodes[id.0].node {
                    debug_assert_eq!(element.name, token.name, "tail does not match head");
                    element.close = token.span.clone();
                }
                let parent = stack.last().copied().unwrap_or(NodeId::ROOT);
                document.append(parent, id);
            }

            index = end;
        }

        if index < source.len() {
            let top = stack.last().copied().unwrap_or(NodeId::ROOT);
            document.push_text(top, index..source.len());
        }

        debug_assert_eq!(stack.len(), 1, "unbalanced tokens");
        while stack.len() > 1 {
            if let Some(id) = stack.pop() {
                let parent = stack.last().copied().unwrap_or(NodeId::ROOT);
                document.append(parent, id);
            }
        }

        document
    }

    pub(crate) fn set_escaper(&mut self, escaper: Escaper) {
        self.escaper = escaper;
    }

    pub(crate) fn set_prepared(&mut self, prepared: bool) {
        self.prepared = prepared;
    }

    fn alloc(&mut self, parent: Option<NodeId>, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Entry { parent, node });
        id
    }

    fn append(&mut self, parent: NodeId, child: NodeId) {
        if let Some(children) = self.nodes[parent.0].node.children_mut() {
            children.push(child);
        }
    }

    fn push_text(&mut self, parent: NodeId, range: Range<usize>) {
        let id = self.alloc(Some(parent), Node::Text(range));
        self.append(parent, id);
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Whether this document was parsed from prepared text.
    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Count of nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false, there is at least the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the node with `id`.
    ///
    /// # Panics
    ///
    /// If `id` does not come from this document.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0].node
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|x| x.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map_or(&[], |x| x.node.children())
    }

    /// Source text of a text node.
    pub fn text(&self, id: NodeId) -> Option<&'a str> {
        match self.nodes.get(id.0).map(|x| &x.node) {
            Some(Node::Text(range)) => Some(&self.source[range.clone()]),
            _ => None,
        }
    }

    /// Tag node with `id`, if it is one.
    pub fn tag(&self, id: NodeId) -> Option<&TagElement> {
        match self.nodes.get(id.0).map(|x| &x.node) {
            Some(Node::Tag(element)) => Some(element),
            _ => None,
        }
    }

    /// All tag nodes in document order.
    pub fn tags(&self) -> impl Iterator<Item = (NodeId, &TagElement)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, x)| match &x.node {
                Node::Tag(element) => Some((NodeId(i), element)),
                _ => None,
            })
    }

    /// Opening marker as written in source.
    pub fn open_source(&self, element: &TagElement) -> &'a str {
        &self.source[element.open_range()]
    }

    /// Closing marker as written in source.
    pub fn close_source(&self, element: &TagElement) -> &'a str {
        &self.source[element.close_range()]
    }

    pub fn content_source(&self, element: &TagElement) -> &'a str {
        &self.source[element.content_range()]
    }

    pub fn outer_source(&self, element: &TagElement) -> &'a str {
        &self.source[element.outer_range()]
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self.node(id) {
            Node::Root { .. } => writeln!(f, "{indent}root")?,
            Node::Text(range) => writeln!(f, "{indent}text {:?}", &self.source[range.clone()])?,
            Node::Tag(element) => {
                write!(f, "{indent}tag {}", element.name)?;
                if let Some(option) = &element.option {
                    write!(f, " option={option:?}")?;
                }
                let mut attributes = element.attributes.iter().collect::<Vec<_>>();
                attributes.sort();
                for (key, value) in attributes {
                    write!(f, " {key}={value:?}")?;
                }
                if element.processor.is_none() {
                    write!(f, " (no processor)")?;
                }
                writeln!(f)?;
            }
        }
        for child in self.children(id) {
            self.fmt_node(f, *child, depth + 1)?;
        }
        Ok(())
    }
}

/// Outline of the tree, one node per line.
impl fmt::Display for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, NodeId::ROOT, 0)
    }
}

impl fmt::Debug for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("source", &self.source)
            .field("nodes", &self.nodes)
            .field("prepared", &self.prepared)
            .finish()
    }
}
