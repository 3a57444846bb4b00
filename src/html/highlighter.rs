//! Highlight rendering
//!
//! Wraps every text leaf covered by a normalized range in its own marker
//! container. Leaves are neither merged nor split here; normalization has
//! already put the range edges on leaf boundaries.
//!
//! Highlighting a leaf that is already marked nests a second marker around
//! the first. Overlapping highlights are not supported.

use tracing::{debug, warn};

use crate::dom::DocumentTree;
use crate::error::Result;
use crate::range::NormalizedRange;

/// Wrap the leaves of `range` in marker containers, returning the markers
pub fn highlight<D: DocumentTree>(
    doc: &mut D,
    range: &NormalizedRange<D::Node>,
) -> Result<Vec<D::Node>> {
    let Some(leaves) = range.covered_leaves(doc) else {
        warn!(
            start = ?range.start,
            end = ?range.end,
            "Range endpoints not found under common ancestor, nothing highlighted"
        );
        return Ok(Vec::new());
    };

    let mut markers = Vec::with_capacity(leaves.len());
    for leaf in leaves {
        markers.push(doc.wrap_in_marker(leaf)?);
    }

    debug!(markers = markers.len(), "Highlighted range");
    Ok(markers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::range::{normalize, Position, RawRange};

    #[test]
    fn test_highlight_wraps_each_leaf() {
        let mut doc = Document::new("div");
        let p = doc.append_element(doc.root(), "p");
        let hello = doc.append_text(p, "Hello ");
        let b = doc.append_element(p, "b");
        let world = doc.append_text(b, "world");
        doc.append_text(p, "!");

        let raw = RawRange::new(Position::new(hello, 4), Position::new(world, 3));
        let range = normalize(&mut doc, &raw).unwrap();
        let markers = highlight(&mut doc, &range).unwrap();

        assert_eq!(markers.len(), 2);
        assert_eq!(doc.children(markers[0]), vec![range.start]);
        assert_eq!(doc.children(markers[1]), vec![range.end]);
        assert_eq!(doc.parent(markers[1]), Some(b));
        assert_eq!(doc.text_under(p), "Hello world!");
    }

    #[test]
    fn test_highlight_twice_nests_markers() {
        let mut doc = Document::new("div");
        let text = doc.append_text(doc.root(), "abc");
        let range = NormalizedRange {
            start: text,
            end: text,
            common_ancestor: doc.root(),
        };

        let first = highlight(&mut doc, &range).unwrap();
        let second = highlight(&mut doc, &range).unwrap();

        assert_eq!(doc.parent(second[0]), Some(first[0]));
        assert_eq!(doc.marker_count(), 2);
        assert_eq!(doc.text_content(), "abc");
    }

    #[test]
    fn test_highlight_detached_range_is_noop() {
        let mut doc = Document::new("div");
        let p = doc.append_element(doc.root(), "p");
        let inside = doc.append_text(p, "in");
        let outside = doc.append_text(doc.root(), "out");

        let range = NormalizedRange {
            start: inside,
            end: outside,
            common_ancestor: p,
        };
        assert!(highlight(&mut doc, &range).unwrap().is_empty());
        assert_eq!(doc.marker_count(), 0);
    }
}
