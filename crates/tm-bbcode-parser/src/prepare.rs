//! Prepare pass.
//!
//! Runs before unrelated text filters (like a generic html escaper) go over
//! the document. Tags are re-emitted with their original markers so the
//! filtered text can be parsed again, and processors get a chance to armor
//! their content, e.g. by encoding it.

use crate::processor::TagContext;
use crate::tree::{Document, Node, NodeId};

impl Document<'_> {
    /// Produce the prepared form of the document, still in bbcode syntax.
    ///
    /// Without any processor implementing [`TagProcessor::prepare`], this is
    /// the source text unchanged.
    ///
    /// [`TagProcessor::prepare`]: crate::processor::TagProcessor::prepare
    pub fn prepare(&self) -> String {
        self.prepare_node(self.root())
    }

    fn prepare_node(&self, id: NodeId) -> String {
        match self.node(id) {
            Node::Text(range) => self.source()[range.clone()].to_string(),
            Node::Root { children } => children.iter().map(|x| self.prepare_node(*x)).collect(),
            Node::Tag(element) => {
                let content = element
                    .children()
                    .iter()
                    .map(|x| self.prepare_node(*x))
                    .collect::<String>();
                let prepared = element
                    .processor()
                    .and_then(|x| x.prepare(&TagContext::new(self, element, &content)));
                format!(
                    "{}{}{}",
                    self.open_source(element),
                    prepared.unwrap_or(content),
                    self.close_source(element)
                )
            }
        }
    }
}
