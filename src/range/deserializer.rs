//! Range deserialization
//!
//! Resolves a stored range back into the current tree. Paths that no longer
//! match fully degrade to the deepest node that does; offsets past the end
//! of the available text clamp to the last leaf. Only a range with no text
//! left to anchor to fails, with `AnchorLost`.

use tracing::warn;

use super::normalizer::normalize;
use super::types::{NormalizedRange, Position, RawRange, SerializedRange};
use crate::dom::DocumentTree;
use crate::error::{AnnotatorError, Result};
use crate::path::{PathResolver, StructuralPath};

/// Resolve a stored range and normalize it against the current tree
pub fn deserialize<D: DocumentTree, R: PathResolver>(
    doc: &mut D,
    resolver: &R,
    serialized: &SerializedRange,
) -> Result<NormalizedRange<D::Node>> {
    let raw = locate(doc, resolver, serialized)?;
    normalize(doc, &raw)
}

/// Resolve a stored range to a raw range without mutating the tree
pub fn locate<D: DocumentTree, R: PathResolver>(
    doc: &D,
    resolver: &R,
    serialized: &SerializedRange,
) -> Result<RawRange<D::Node>> {
    let start_path = serialized.start_path()?;
    let end_path = serialized.end_path()?;

    let prefix = start_path.common_prefix(&end_path);
    let common = resolve_lenient(doc, resolver, &prefix);

    let start_node = resolve_lenient(doc, resolver, &start_path);
    let end_node = resolve_lenient(doc, resolver, &end_path);

    let start = locate_offset(doc, start_node, common, serialized.start_offset, &serialized.start)?;
    let end = locate_offset(doc, end_node, common, serialized.end_offset, &serialized.end)?;

    Ok(RawRange::new(start, end).with_common_ancestor(common))
}

fn resolve_lenient<D: DocumentTree, R: PathResolver>(
    doc: &D,
    resolver: &R,
    path: &StructuralPath,
) -> D::Node {
    let resolution = resolver.resolve(doc, path);
    if !resolution.is_exact() {
        warn!(path = %path, "Path resolved only partially, using deepest match");
    }
    resolution.node()
}

/// Find the leaf and in-leaf offset that is `target` characters into the
/// text under `node`.
///
/// A boundary between two leaves resolves to the end of the earlier one.
pub fn locate_offset<D: DocumentTree>(
    doc: &D,
    node: D::Node,
    fallback: D::Node,
    target: usize,
    path: &str,
) -> Result<Position<D::Node>> {
    let mut leaves = doc.text_leaves(node);
    if leaves.is_empty() {
        warn!(path, "No text under anchor, falling back to common ancestor");
        leaves = doc.text_leaves(fallback);
    }

    let mut accumulated = 0;
    for &leaf in &leaves {
        let len = doc.text_len(leaf);
        if accumulated + len >= target {
            return Ok(Position::new(leaf, target - accumulated));
        }
        accumulated += len;
    }

    let last = *leaves
        .last()
        .ok_or_else(|| AnnotatorError::AnchorLost(path.to_string()))?;
    warn!(
        path,
        target,
        available = accumulated,
        "Offset beyond available text, clamping to end"
    );
    Ok(Position::new(last, doc.text_len(last)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, NodeId};
    use crate::path::TreeWalker;
    use crate::range::serialize;

    /// `<div><p>Hello <b>world</b>!</p></div>`
    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new("div");
        let p = doc.append_element(doc.root(), "p");
        let hello = doc.append_text(p, "Hello ");
        let b = doc.append_element(p, "b");
        let world = doc.append_text(b, "world");
        doc.append_text(p, "!");
        (doc, p, hello, world)
    }

    fn stored(start: &str, start_offset: usize, end: &str, end_offset: usize) -> SerializedRange {
        SerializedRange {
            start: start.to_string(),
            end: end.to_string(),
            start_offset,
            end_offset,
        }
    }

    #[test]
    fn test_deserialize_scenario() {
        let (mut doc, p, _, _) = sample();
        let range = deserialize(&mut doc, &TreeWalker, &stored("p[1]", 4, "p[1]/b[1]", 3)).unwrap();

        assert_eq!(range.text(&doc), "o wor");
        assert_eq!(range.common_ancestor, p);

        let again = serialize(&doc, &TreeWalker, &range).unwrap();
        assert_eq!(again, stored("p[1]", 4, "p[1]/b[1]", 3));
    }

    #[test]
    fn test_locate_boundary_prefers_earlier_leaf() {
        let (doc, p, hello, _) = sample();
        let position = locate_offset(&doc, p, p, 6, "p[1]").unwrap();
        assert_eq!(position, Position::new(hello, 6));
    }

    #[test]
    fn test_locate_clamps_past_end() {
        let (doc, _, _, world) = sample();
        let b = doc.parent(world).unwrap();
        let position = locate_offset(&doc, b, b, 7, "p[1]/b[1]").unwrap();
        assert_eq!(position, Position::new(world, 5));
    }

    #[test]
    fn test_deserialize_degrades_partial_path() {
        let (mut doc, p, _, _) = sample();
        // the <i> never existed; start falls back to <p>
        let range = deserialize(&mut doc, &TreeWalker, &stored("p[1]/i[1]", 0, "p[1]", 5)).unwrap();
        assert_eq!(range.text(&doc), "Hello");
        assert_eq!(range.common_ancestor, p);
    }

    #[test]
    fn test_deserialize_anchor_lost() {
        let mut doc = Document::new("div");
        let p = doc.append_element(doc.root(), "p");
        doc.append_element(p, "img");

        let result = deserialize(&mut doc, &TreeWalker, &stored("p[1]/img[1]", 0, "p[1]", 2));
        assert!(matches!(result, Err(AnnotatorError::AnchorLost(_))));
    }

    #[test]
    fn test_deserialize_bad_path() {
        let (mut doc, _, _, _) = sample();
        let result = deserialize(&mut doc, &TreeWalker, &stored("p[", 0, "p[1]", 2));
        assert!(matches!(result, Err(AnnotatorError::PathParse(_))));
        assert_eq!(doc.text_leaves(doc.root()).len(), 3);
    }
}
