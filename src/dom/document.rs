//! In-memory arena document
//!
//! Nodes live in a flat `Vec` and refer to each other by [`NodeId`]. Nodes
//! that get detached (unwrapped markers) stay in the arena so outstanding
//! handles never dangle; they simply have no parent any more.

use std::fmt;

use super::DocumentTree;
use crate::error::{AnnotatorError, Result};

/// Handle to a node in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Container element with its attributes in source order
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    /// Text leaf
    Text(String),
    /// Highlight wrapper; transparent to paths and text offsets
    Marker,
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed document tree
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Document {
    /// Create a document with an empty root element
    pub fn new(root_tag: &str) -> Self {
        Self::with_root(NodeKind::Element {
            tag: root_tag.to_string(),
            attributes: Vec::new(),
        })
    }

    pub(crate) fn with_root(kind: NodeKind) -> Self {
        Self {
            nodes: vec![NodeData {
                kind,
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
        }
    }

    /// Append a new child element
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.append(
            parent,
            NodeKind::Element {
                tag: tag.to_string(),
                attributes: Vec::new(),
            },
        )
    }

    /// Append a new text leaf
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append(parent, NodeKind::Text(text.to_string()))
    }

    /// Append a node of any kind
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    /// Attributes of an element (empty for text and markers)
    pub fn attributes(&self, node: NodeId) -> &[(String, String)] {
        match &self.nodes[node.0].kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Text of the whole document
    pub fn text_content(&self) -> String {
        self.text_under(self.root)
    }

    /// Number of marker containers currently attached under the root
    pub fn marker_count(&self) -> usize {
        self.markers(self.root).len()
    }

    fn position_in_parent(&self, node: NodeId) -> Result<(NodeId, usize)> {
        let parent = self.nodes[node.0]
            .parent
            .ok_or_else(|| AnnotatorError::Tree(format!("node {} has no parent", node)))?;
        let index = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == node)
            .ok_or_else(|| {
                AnnotatorError::Tree(format!("node {} missing from parent {}", node, parent))
            })?;
        Ok((parent, index))
    }

    fn check(&self, node: NodeId) -> Result<()> {
        if node.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(AnnotatorError::Tree(format!("unknown node {}", node)))
        }
    }
}

impl DocumentTree for Document {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        self.root
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    fn is_marker(&self, node: NodeId) -> bool {
        matches!(
            self.nodes.get(node.0).map(|n| &n.kind),
            Some(NodeKind::Marker)
        )
    }

    fn split_text(&mut self, node: NodeId, offset: usize) -> Result<NodeId> {
        self.check(node)?;
        let text = match &self.nodes[node.0].kind {
            NodeKind::Text(text) => text,
            _ => {
                return Err(AnnotatorError::Tree(format!(
                    "cannot split non-text node {}",
                    node
                )))
            }
        };

        let len = text.chars().count();
        if offset > len {
            return Err(AnnotatorError::Tree(format!(
                "split offset {} beyond length {} of node {}",
                offset, len, node
            )));
        }
        let byte = text
            .char_indices()
            .nth(offset)
            .map(|(i, _)| i)
            .unwrap_or(text.len());
        let tail = text[byte..].to_string();

        let (parent, index) = self.position_in_parent(node)?;
        if let NodeKind::Text(text) = &mut self.nodes[node.0].kind {
            text.truncate(byte);
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind: NodeKind::Text(tail),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.insert(index + 1, id);
        Ok(id)
    }

    fn wrap_in_marker(&mut self, node: NodeId) -> Result<NodeId> {
        self.check(node)?;
        let (parent, index) = self.position_in_parent(node)?;

        let marker = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind: NodeKind::Marker,
            parent: Some(parent),
            children: vec![node],
        });
        self.nodes[parent.0].children[index] = marker;
        self.nodes[node.0].parent = Some(marker);
        Ok(marker)
    }

    fn unwrap_marker(&mut self, marker: NodeId) -> Result<()> {
        self.check(marker)?;
        if !self.is_marker(marker) {
            return Err(AnnotatorError::Tree(format!(
                "node {} is not a marker",
                marker
            )));
        }
        let (parent, index) = self.position_in_parent(marker)?;

        let children = std::mem::take(&mut self.nodes[marker.0].children);
        for &child in &children {
            self.nodes[child.0].parent = Some(parent);
        }
        self.nodes[parent.0]
            .children
            .splice(index..=index, children);
        self.nodes[marker.0].parent = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new("div");
        let p = doc.append_element(doc.root(), "p");
        let text = doc.append_text(p, "Hello world");
        (doc, p, text)
    }

    #[test]
    fn test_split_text_inserts_tail_after() {
        let (mut doc, p, text) = sample();
        let tail = doc.split_text(text, 6).unwrap();

        assert_eq!(doc.text(text), Some("Hello "));
        assert_eq!(doc.text(tail), Some("world"));
        assert_eq!(doc.children(p), vec![text, tail]);
        assert_eq!(doc.text_content(), "Hello world");
    }

    #[test]
    fn test_split_text_counts_characters() {
        let mut doc = Document::new("div");
        let text = doc.append_text(doc.root(), "héllo");
        let tail = doc.split_text(text, 2).unwrap();

        assert_eq!(doc.text(text), Some("hé"));
        assert_eq!(doc.text(tail), Some("llo"));
    }

    #[test]
    fn test_split_text_rejects_bad_offset() {
        let (mut doc, p, text) = sample();
        assert!(doc.split_text(text, 12).is_err());
        assert!(doc.split_text(p, 0).is_err());
        assert_eq!(doc.children(p).len(), 1);
    }

    #[test]
    fn test_wrap_and_unwrap_marker() {
        let (mut doc, p, text) = sample();
        let marker = doc.wrap_in_marker(text).unwrap();

        assert!(doc.is_marker(marker));
        assert_eq!(doc.children(p), vec![marker]);
        assert_eq!(doc.parent(text), Some(marker));
        assert_eq!(doc.addressable_parent(text), Some(p));
        assert_eq!(doc.logical_children(p), vec![text]);
        assert_eq!(doc.marker_count(), 1);

        doc.unwrap_marker(marker).unwrap();
        assert_eq!(doc.children(p), vec![text]);
        assert_eq!(doc.parent(text), Some(p));
        assert_eq!(doc.parent(marker), None);
        assert_eq!(doc.marker_count(), 0);
    }

    #[test]
    fn test_unwrap_rejects_non_marker() {
        let (mut doc, p, _) = sample();
        assert!(doc.unwrap_marker(p).is_err());
    }

    #[test]
    fn test_text_leaves_document_order() {
        let mut doc = Document::new("div");
        let root = doc.root();
        let p = doc.append_element(root, "p");
        let a = doc.append_text(p, "a");
        let b = doc.append_element(p, "b");
        let bb = doc.append_text(b, "b");
        let c = doc.append_text(root, "c");

        assert_eq!(doc.text_leaves(root), vec![a, bb, c]);
        assert_eq!(doc.common_ancestor(a, bb), Some(p));
        assert_eq!(doc.common_ancestor(bb, c), Some(root));
        assert!(doc.contains(p, bb));
        assert!(!doc.contains(b, a));
    }
}
