//! Range normalization
//!
//! Selection providers are inconsistent about where they put range
//! endpoints: some hand out text/text pairs, others container/container
//! pairs, others a mix. Normalization turns any of them into a
//! (start leaf, end leaf, container ancestor) triple, splitting text leaves
//! so that the range edges fall exactly on leaf boundaries.
//!
//! All checks run before the first split, so a range that fails leaves the
//! tree exactly as it found it.

use super::types::{NormalizedRange, Position, RawRange};
use crate::dom::DocumentTree;
use crate::error::{AnnotatorError, Result};

/// Resolve one endpoint to a (text leaf, character offset) position.
///
/// A container position points before the child at `offset`; past the last
/// child it means "end of the previous child", which is reached through the
/// last descendants rather than the first. Descending by first child there
/// would put the endpoint at the start of the previous child and drop the
/// rest of its text from the range.
fn resolve_endpoint<D: DocumentTree>(
    doc: &D,
    position: Position<D::Node>,
) -> Result<Position<D::Node>> {
    if doc.is_text(position.node) {
        let len = doc.text_len(position.node);
        if position.offset > len {
            return Err(AnnotatorError::InvalidRange(format!(
                "offset {} beyond text length {} of {:?}",
                position.offset, len, position.node
            )));
        }
        return Ok(position);
    }

    let children = doc.children(position.node);
    let (mut node, at_end) = match children.get(position.offset) {
        Some(&child) => (child, false),
        None => {
            let previous = position
                .offset
                .checked_sub(1)
                .and_then(|i| children.get(i))
                .copied()
                .ok_or_else(|| {
                    AnnotatorError::InvalidRange(format!(
                        "child offset {} out of bounds for {:?} with {} children",
                        position.offset,
                        position.node,
                        children.len()
                    ))
                })?;
            (previous, true)
        }
    };

    while !doc.is_text(node) {
        let descendants = doc.children(node);
        let next = if at_end {
            descendants.last()
        } else {
            descendants.first()
        };
        node = *next.ok_or_else(|| {
            AnnotatorError::InvalidRange(format!(
                "no text leaf reachable from {:?}",
                position.node
            ))
        })?;
    }

    let offset = if at_end { doc.text_len(node) } else { 0 };
    Ok(Position::new(node, offset))
}

/// Validate a raw range and resolve both endpoints without touching the tree.
///
/// A range that ends before it starts, or that covers no characters, is
/// rejected even when its endpoints sit in different leaves.
pub fn resolve_endpoints<D: DocumentTree>(
    doc: &D,
    raw: &RawRange<D::Node>,
) -> Result<(Position<D::Node>, Position<D::Node>)> {
    let start = resolve_endpoint(doc, raw.start)?;
    let end = resolve_endpoint(doc, raw.end)?;

    match covered_chars(doc, start, end) {
        Some(0) => Err(AnnotatorError::InvalidRange(format!(
            "range covers no text ({:?}:{} to {:?}:{})",
            start.node, start.offset, end.node, end.offset
        ))),
        Some(_) => Ok((start, end)),
        None => Err(AnnotatorError::InvalidRange(format!(
            "range end {:?}:{} does not follow its start {:?}:{}",
            end.node, end.offset, start.node, start.offset
        ))),
    }
}

/// Characters between two leaf positions, `None` if `end` precedes `start`
/// or the leaves share no ancestor
fn covered_chars<D: DocumentTree>(
    doc: &D,
    start: Position<D::Node>,
    end: Position<D::Node>,
) -> Option<usize> {
    if start.node == end.node {
        return end.offset.checked_sub(start.offset);
    }

    let ancestor = doc.common_ancestor(start.node, end.node)?;
    let leaves = doc.text_leaves(ancestor);
    let first = leaves.iter().position(|&leaf| leaf == start.node)?;
    let last = leaves.iter().position(|&leaf| leaf == end.node)?;
    if first > last {
        return None;
    }

    let between: usize = leaves[first + 1..last]
        .iter()
        .map(|&leaf| doc.text_len(leaf))
        .sum();
    Some(doc.text_len(start.node) - start.offset + between + end.offset)
}

/// Which side of a leaf boundary a document offset should land on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edge {
    /// Start of the following non-empty leaf
    Start,
    /// End of the preceding leaf
    End,
}

/// Offset of a leaf position from the beginning of the document text
pub(crate) fn document_offset<D: DocumentTree>(
    doc: &D,
    position: Position<D::Node>,
) -> Result<usize> {
    let leaves = doc.text_leaves(doc.root());
    let index = leaves
        .iter()
        .position(|&leaf| leaf == position.node)
        .ok_or_else(|| {
            AnnotatorError::InvalidRange(format!(
                "{:?} is not a text leaf of the document",
                position.node
            ))
        })?;
    let before: usize = leaves[..index].iter().map(|&leaf| doc.text_len(leaf)).sum();
    Ok(before + position.offset)
}

/// Leaf position `target` characters into the document text
pub(crate) fn document_position<D: DocumentTree>(
    doc: &D,
    target: usize,
    edge: Edge,
) -> Result<Position<D::Node>> {
    let mut accumulated = 0;
    for leaf in doc.text_leaves(doc.root()) {
        let reached = accumulated + doc.text_len(leaf);
        let found = match edge {
            Edge::Start => reached > target,
            Edge::End => reached >= target,
        };
        if found {
            return Ok(Position::new(leaf, target - accumulated));
        }
        accumulated = reached;
    }
    Err(AnnotatorError::InvalidRange(format!(
        "document offset {} beyond text length {}",
        target, accumulated
    )))
}

/// Normalize a raw range, splitting text leaves at its edges
pub fn normalize<D: DocumentTree>(
    doc: &mut D,
    raw: &RawRange<D::Node>,
) -> Result<NormalizedRange<D::Node>> {
    let (start, end) = resolve_endpoints(doc, raw)?;

    let ancestor = raw
        .common_ancestor
        .filter(|&hint| doc.contains(hint, start.node) && doc.contains(hint, end.node))
        .or_else(|| doc.common_ancestor(raw.start.node, raw.end.node))
        .ok_or_else(|| {
            AnnotatorError::InvalidRange(format!(
                "{:?} and {:?} share no ancestor",
                raw.start.node, raw.end.node
            ))
        })?;
    let common_ancestor = nearest_container(doc, ancestor)?;

    let start_leaf = if start.offset > 0 {
        doc.split_text(start.node, start.offset)?
    } else {
        start.node
    };

    let end_leaf = if start.node == end.node {
        let span = end.offset - start.offset;
        if span < doc.text_len(start_leaf) {
            doc.split_text(start_leaf, span)?;
        }
        start_leaf
    } else {
        if end.offset < doc.text_len(end.node) {
            doc.split_text(end.node, end.offset)?;
        }
        end.node
    };

    Ok(NormalizedRange {
        start: start_leaf,
        end: end_leaf,
        common_ancestor,
    })
}

fn nearest_container<D: DocumentTree>(doc: &D, node: D::Node) -> Result<D::Node> {
    let mut current = node;
    while doc.is_text(current) {
        current = doc.parent(current).ok_or_else(|| {
            AnnotatorError::InvalidRange(format!("text node {:?} has no container", node))
        })?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, NodeId};

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

    #[test]
    fn test_normalize_text_endpoints() {
        let (mut doc, p, hello, world) = sample();
        let raw = RawRange::new(Position::new(hello, 4), Position::new(world, 3));

        let range = normalize(&mut doc, &raw).unwrap();

        assert_eq!(doc.text(range.start), Some("o "));
        assert_eq!(doc.text(range.end), Some("wor"));
        assert_eq!(range.end, world);
        assert_eq!(range.common_ancestor, p);
        assert_eq!(range.text(&doc), "o wor");
        assert_eq!(doc.text_content(), "Hello world!");
    }

    #[test]
    fn test_normalize_same_leaf() {
        let (mut doc, _, hello, _) = sample();
        let raw = RawRange::new(Position::new(hello, 1), Position::new(hello, 4));

        let range = normalize(&mut doc, &raw).unwrap();

        assert_eq!(range.start, range.end);
        assert_eq!(doc.text(range.start), Some("ell"));
        assert_eq!(doc.text(hello), Some("H"));
        assert_eq!(doc.text_content(), "Hello world!");
    }

    #[test]
    fn test_normalize_container_endpoints() {
        let (mut doc, p, hello, _) = sample();
        // before "Hello " .. past the last child "!"
        let raw = RawRange::new(Position::new(p, 0), Position::new(p, 3));

        let range = normalize(&mut doc, &raw).unwrap();

        assert_eq!(range.start, hello);
        assert_eq!(doc.text(range.end), Some("!"));
        assert_eq!(range.text(&doc), "Hello world!");
        assert_eq!(range.common_ancestor, p);
    }

    #[test]
    fn test_normalize_end_of_previous_child_descends_last() {
        let mut doc = Document::new("div");
        let p = doc.append_element(doc.root(), "p");
        let hi = doc.append_text(p, "Hi ");
        let b = doc.append_element(p, "b");
        doc.append_text(b, "one");
        let two = doc.append_text(b, "two");

        let raw = RawRange::new(Position::new(hi, 0), Position::new(p, 2));
        let range = normalize(&mut doc, &raw).unwrap();

        assert_eq!(range.end, two);
        assert_eq!(range.text(&doc), "Hi onetwo");
        assert_eq!(range.common_ancestor, p);
    }

    #[test]
    fn test_normalize_mixed_endpoint_kinds() {
        let (mut doc, p, hello, _) = sample();
        let raw = RawRange::new(Position::new(hello, 2), Position::new(p, 2));

        let range = normalize(&mut doc, &raw).unwrap();
        // offset 2 of <p> points before "!", i.e. at the start of that leaf
        assert_eq!(range.text(&doc), "llo world");
        assert_eq!(doc.text(range.end), Some(""));
    }

    #[test]
    fn test_normalize_uses_valid_hint() {
        let (mut doc, p, hello, world) = sample();
        let raw = RawRange::new(Position::new(hello, 0), Position::new(world, 5))
            .with_common_ancestor(doc.root());

        let range = normalize(&mut doc, &raw).unwrap();
        assert_eq!(range.common_ancestor, doc.root());

        let b = doc.parent(world).unwrap();
        let raw = RawRange::new(Position::new(hello, 0), Position::new(world, 5))
            .with_common_ancestor(b);
        let range = normalize(&mut doc, &raw).unwrap();
        assert_eq!(range.common_ancestor, p);
    }

    #[test]
    fn test_invalid_ranges_leave_tree_untouched() {
        let (mut doc, p, hello, _) = sample();
        let empty = doc.append_element(p, "br");
        let before = doc.clone();

        let cases = [
            RawRange::new(Position::new(hello, 3), Position::new(hello, 3)),
            RawRange::new(Position::new(hello, 4), Position::new(hello, 2)),
            RawRange::new(Position::new(hello, 2), Position::new(hello, 99)),
            RawRange::new(Position::new(hello, 2), Position::new(p, 9)),
            RawRange::new(Position::new(hello, 2), Position::new(empty, 0)),
        ];
        for raw in cases {
            assert!(matches!(
                normalize(&mut doc, &raw),
                Err(AnnotatorError::InvalidRange(_))
            ));
        }
        assert_eq!(doc.text_leaves(doc.root()), before.text_leaves(before.root()));
        assert_eq!(doc.text_content(), "Hello world!");
    }

    #[test]
    fn test_zero_width_range_across_leaves_is_rejected() {
        let (mut doc, p, hello, world) = sample();
        let leaves_before = doc.text_leaves(doc.root());

        let cases = [
            // end of "Hello " to start of "world"
            RawRange::new(Position::new(hello, 6), Position::new(world, 0)),
            // "world" back to "Hello "
            RawRange::new(Position::new(world, 2), Position::new(hello, 1)),
            // child boundary before <b> to the start of "world"
            RawRange::new(Position::new(p, 1), Position::new(world, 0)),
        ];
        for raw in cases {
            assert!(matches!(
                normalize(&mut doc, &raw),
                Err(AnnotatorError::InvalidRange(_))
            ));
        }
        assert_eq!(doc.text_leaves(doc.root()), leaves_before);
    }

    #[test]
    fn test_document_offsets() {
        let (doc, _, hello, world) = sample();

        assert_eq!(document_offset(&doc, Position::new(hello, 4)).unwrap(), 4);
        assert_eq!(document_offset(&doc, Position::new(world, 3)).unwrap(), 9);

        assert_eq!(
            document_position(&doc, 6, Edge::End).unwrap(),
            Position::new(hello, 6)
        );
        assert_eq!(
            document_position(&doc, 6, Edge::Start).unwrap(),
            Position::new(world, 0)
        );
        assert!(document_position(&doc, 12, Edge::Start).is_err());
        assert!(document_position(&doc, 13, Edge::End).is_err());
    }
}
