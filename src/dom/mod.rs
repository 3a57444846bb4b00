//! Document tree access
//!
//! The anchoring algorithms never talk to a concrete tree. They go through
//! [`DocumentTree`], which exposes just enough to list children, read text,
//! split text leaves and wrap/unwrap marker containers. [`Document`] is the
//! in-memory arena implementation used by the CLI and the tests; a host with
//! its own live tree implements the trait over that instead.
//!
//! Marker containers are real nodes in the tree but are invisible to paths
//! and text lengths. The provided methods on the trait (`logical_children`,
//! `addressable_parent`, `text_leaves`) are the marker-transparent views the
//! rest of the crate works with.

mod document;

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::Result;

pub use document::{Document, NodeId, NodeKind};

/// Mutable access to a document tree.
pub trait DocumentTree {
    /// Handle to a node. Handles stay valid across splits and wraps.
    type Node: Copy + Eq + Hash + Debug;

    /// The document root (always a container)
    fn root(&self) -> Self::Node;

    /// Physical parent, markers included
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Physical children in order, markers included
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Text content if `node` is a text leaf
    fn text(&self, node: Self::Node) -> Option<&str>;

    /// Tag name if `node` is an element (markers report `None`)
    fn tag_name(&self, node: Self::Node) -> Option<&str>;

    /// Whether `node` is a marker container
    fn is_marker(&self, node: Self::Node) -> bool;

    /// Split a text leaf at a character offset.
    ///
    /// The original node keeps `[0, offset)`; a new text node holding the rest
    /// is inserted as its next sibling and returned.
    fn split_text(&mut self, node: Self::Node, offset: usize) -> Result<Self::Node>;

    /// Replace `node` with a new marker container whose only child is `node`
    fn wrap_in_marker(&mut self, node: Self::Node) -> Result<Self::Node>;

    /// Replace a marker container with its children
    fn unwrap_marker(&mut self, marker: Self::Node) -> Result<()>;

    fn is_text(&self, node: Self::Node) -> bool {
        self.text(node).is_some()
    }

    /// Length in characters of a text leaf (0 for anything else)
    fn text_len(&self, node: Self::Node) -> usize {
        self.text(node).map(|t| t.chars().count()).unwrap_or(0)
    }

    /// Children with every marker replaced by its own logical children
    fn logical_children(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        for child in self.children(node) {
            if self.is_marker(child) {
                out.extend(self.logical_children(child));
            } else {
                out.push(child);
            }
        }
        out
    }

    /// Nearest ancestor that is not a marker container
    fn addressable_parent(&self, node: Self::Node) -> Option<Self::Node> {
        let mut current = self.parent(node)?;
        while self.is_marker(current) {
            current = self.parent(current)?;
        }
        Some(current)
    }

    /// Every text leaf under `node`, in document order
    fn text_leaves(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut leaves = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if self.is_text(current) {
                leaves.push(current);
            } else {
                stack.extend(self.children(current).into_iter().rev());
            }
        }
        leaves
    }

    /// Every marker container under `node`, outermost first
    fn markers(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut found = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if self.is_marker(current) {
                found.push(current);
            }
            stack.extend(self.children(current).into_iter().rev());
        }
        found
    }

    /// Concatenated text of every leaf under `node`
    fn text_under(&self, node: Self::Node) -> String {
        self.text_leaves(node)
            .into_iter()
            .filter_map(|leaf| self.text(leaf))
            .collect()
    }

    /// Whether `ancestor` is `node` or one of its physical ancestors
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Deepest node containing both `a` and `b`
    fn common_ancestor(&self, a: Self::Node, b: Self::Node) -> Option<Self::Node> {
        let mut current = Some(a);
        while let Some(n) = current {
            if self.contains(n, b) {
                return Some(n);
            }
            current = self.parent(n);
        }
        None
    }
}
