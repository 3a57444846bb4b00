//! Range serialization
//!
//! Turns a normalized range into two (path, character offset) pairs. Each
//! endpoint is anchored to its nearest non-marker ancestor, and the offset is
//! counted over that ancestor's logical text, so the result does not change
//! when highlights are added or removed.

use super::types::{NormalizedRange, SerializedRange};
use crate::dom::DocumentTree;
use crate::error::{AnnotatorError, Result};
use crate::path::{PathResolver, StructuralPath};

/// Serialize a normalized range for storage
pub fn serialize<D: DocumentTree, R: PathResolver>(
    doc: &D,
    resolver: &R,
    range: &NormalizedRange<D::Node>,
) -> Result<SerializedRange> {
    let (start_path, start_offset) = anchor(doc, resolver, range.start)?;
    let (end_path, end_offset) = anchor(doc, resolver, range.end)?;

    Ok(SerializedRange::new(
        &start_path,
        start_offset,
        &end_path,
        end_offset + doc.text_len(range.end),
    ))
}

/// Path of the leaf's addressable ancestor, and the characters before the
/// leaf under it
fn anchor<D: DocumentTree, R: PathResolver>(
    doc: &D,
    resolver: &R,
    leaf: D::Node,
) -> Result<(StructuralPath, usize)> {
    let ancestor = doc.addressable_parent(leaf).ok_or_else(|| {
        AnnotatorError::InvalidRange(format!("leaf {:?} is not attached to the document", leaf))
    })?;

    let leaves = doc.text_leaves(ancestor);
    let index = leaves.iter().position(|&l| l == leaf).ok_or_else(|| {
        AnnotatorError::InvalidRange(format!("{:?} is not a text leaf", leaf))
    })?;
    let offset = leaves[..index].iter().map(|&l| doc.text_len(l)).sum();

    Ok((resolver.path_of(doc, ancestor), offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::html::highlight;
    use crate::path::TreeWalker;
    use crate::range::{normalize, Position, RawRange};

    #[test]
    fn test_serialize_scenario() {
        let mut doc = Document::new("div");
        let p = doc.append_element(doc.root(), "p");
        let hello = doc.append_text(p, "Hello ");
        let b = doc.append_element(p, "b");
        let world = doc.append_text(b, "world");
        doc.append_text(p, "!");

        let raw = RawRange::new(Position::new(hello, 4), Position::new(world, 3));
        let range = normalize(&mut doc, &raw).unwrap();
        let serialized = serialize(&doc, &TreeWalker, &range).unwrap();

        assert_eq!(serialized.start, "p[1]");
        assert_eq!(serialized.start_offset, 4);
        assert_eq!(serialized.end, "p[1]/b[1]");
        assert_eq!(serialized.end_offset, 3);
    }

    #[test]
    fn test_serialize_stable_under_markers() {
        let mut doc = Document::new("div");
        let p = doc.append_element(doc.root(), "p");
        let text = doc.append_text(p, "The quick brown fox");

        let raw = RawRange::new(Position::new(text, 4), Position::new(text, 15));
        let range = normalize(&mut doc, &raw).unwrap();
        let before = serialize(&doc, &TreeWalker, &range).unwrap();

        highlight(&mut doc, &range).unwrap();
        let after = serialize(&doc, &TreeWalker, &range).unwrap();

        assert_eq!(before, after);
        assert_eq!(after.start, after.end);
        assert_eq!(after.end_offset - after.start_offset, "quick brown".len());
    }

    #[test]
    fn test_serialize_counts_marked_leaves_once() {
        let mut doc = Document::new("div");
        let p = doc.append_element(doc.root(), "p");
        let first = doc.append_text(p, "abc");
        let second = doc.append_text(p, "def");
        doc.wrap_in_marker(first).unwrap();

        let range = NormalizedRange {
            start: second,
            end: second,
            common_ancestor: p,
        };
        let serialized = serialize(&doc, &TreeWalker, &range).unwrap();
        assert_eq!(serialized.start_offset, 3);
        assert_eq!(serialized.end_offset, 6);
    }
}
