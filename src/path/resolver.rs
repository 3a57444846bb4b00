//! Path resolution
//!
//! Converts nodes to structural paths and back. [`TreeWalker`] walks the
//! tree by hand; a host with a native path-evaluation primitive can provide
//! its own [`PathResolver`] as long as markers stay excluded.

use super::types::*;
use crate::dom::DocumentTree;
use crate::error::{AnnotatorError, Result};

/// Outcome of resolving a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<N> {
    /// Every segment matched
    Found(N),
    /// A segment missed; `deepest` is the last node that did resolve
    Partial { deepest: N, unresolved: usize },
}

impl<N: Copy> Resolution<N> {
    /// The resolved node, or the deepest one reached on a miss
    pub fn node(&self) -> N {
        match *self {
            Resolution::Found(node) => node,
            Resolution::Partial { deepest, .. } => deepest,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    /// The resolved node, failing with `PathResolutionMiss` on a partial match
    pub fn exact(self, path: &StructuralPath) -> Result<N> {
        match self {
            Resolution::Found(node) => Ok(node),
            Resolution::Partial { unresolved, .. } => Err(AnnotatorError::PathResolutionMiss {
                path: path.to_string(),
                unresolved,
            }),
        }
    }
}

/// Node ⇄ structural path conversion
pub trait PathResolver {
    fn path_of<D: DocumentTree>(&self, doc: &D, node: D::Node) -> StructuralPath;

    fn resolve<D: DocumentTree>(&self, doc: &D, path: &StructuralPath) -> Resolution<D::Node>;
}

/// Reference resolver that walks logical (marker-free) children
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeWalker;

impl TreeWalker {
    pub fn new() -> Self {
        Self
    }
}

/// Tag identifier of a node as it appears in a path segment
fn segment_tag<D: DocumentTree>(doc: &D, node: D::Node) -> Option<&str> {
    if doc.is_text(node) {
        Some(TEXT_TAG)
    } else {
        doc.tag_name(node)
    }
}

impl PathResolver for TreeWalker {
    fn path_of<D: DocumentTree>(&self, doc: &D, node: D::Node) -> StructuralPath {
        let root = doc.root();
        let mut current = if doc.is_marker(node) {
            match doc.addressable_parent(node) {
                Some(parent) => parent,
                None => return StructuralPath::root(),
            }
        } else {
            node
        };

        let mut segments = Vec::new();
        while current != root {
            let Some(parent) = doc.addressable_parent(current) else {
                break;
            };
            let Some(tag) = segment_tag(doc, current) else {
                break;
            };
            let index = doc
                .logical_children(parent)
                .into_iter()
                .filter(|&sibling| segment_tag(doc, sibling) == Some(tag))
                .position(|sibling| sibling == current)
                .map(|i| i + 1)
                .unwrap_or(1);
            segments.push(PathSegment::new(tag, index));
            current = parent;
        }

        segments.reverse();
        StructuralPath::with_segments(segments)
    }

    fn resolve<D: DocumentTree>(&self, doc: &D, path: &StructuralPath) -> Resolution<D::Node> {
        let mut current = doc.root();
        for (depth, segment) in path.segments.iter().enumerate() {
            let next = segment.index.checked_sub(1).and_then(|nth| {
                doc.logical_children(current)
                    .into_iter()
                    .filter(|&child| segment_tag(doc, child) == Some(segment.tag.as_str()))
                    .nth(nth)
            });

            match next {
                Some(child) => current = child,
                None => {
                    return Resolution::Partial {
                        deepest: current,
                        unresolved: path.segments.len() - depth,
                    }
                }
            }
        }
        Resolution::Found(current)
    }
}
