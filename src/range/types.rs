//! Range types
//!
//! The three shapes a selection takes on its way to storage: the raw
//! endpoint pair handed over by the selection provider, the normalized
//! leaf-to-leaf range, and the persistent path/offset form.

use serde::{Deserialize, Serialize};

use crate::dom::DocumentTree;
use crate::path::{parse, PathParseError, StructuralPath};

/// A point in the tree.
///
/// `offset` is a character offset for text leaves and a child index for
/// containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position<N> {
    pub node: N,
    pub offset: usize,
}

impl<N> Position<N> {
    pub fn new(node: N, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// Endpoint pair as supplied by the selection provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRange<N> {
    pub start: Position<N>,
    pub end: Position<N>,
    /// Container believed to hold both endpoints; ignored if it does not
    pub common_ancestor: Option<N>,
}

impl<N: Copy + Eq> RawRange<N> {
    pub fn new(start: Position<N>, end: Position<N>) -> Self {
        Self {
            start,
            end,
            common_ancestor: None,
        }
    }

    pub fn with_common_ancestor(mut self, ancestor: N) -> Self {
        self.common_ancestor = Some(ancestor);
        self
    }

    /// Whether both endpoints are the same point
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// A range whose endpoints are text leaves split exactly at its edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedRange<N> {
    /// First leaf, starting at the original start boundary
    pub start: N,
    /// Last leaf, ending at the original end boundary
    pub end: N,
    /// Container holding both leaves
    pub common_ancestor: N,
}

impl<N: Copy + Eq> NormalizedRange<N> {
    /// Leaves from `start` to `end` inclusive, in document order.
    ///
    /// Returns `None` if either endpoint is no longer under the common
    /// ancestor.
    pub fn covered_leaves<D: DocumentTree<Node = N>>(&self, doc: &D) -> Option<Vec<N>> {
        let leaves = doc.text_leaves(self.common_ancestor);
        let first = leaves.iter().position(|&leaf| leaf == self.start)?;
        let last = leaves.iter().position(|&leaf| leaf == self.end)?;
        let (lo, hi) = if first <= last {
            (first, last)
        } else {
            (last, first)
        };
        Some(leaves[lo..=hi].to_vec())
    }

    /// Concatenated text of the covered leaves
    pub fn text<D: DocumentTree<Node = N>>(&self, doc: &D) -> String {
        self.covered_leaves(doc)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|leaf| doc.text(leaf))
            .collect()
    }
}

/// Persistent form of a range: two (path, character offset) pairs.
///
/// Paths are kept as the strings they were stored with so that loading and
/// dumping returns them untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializedRange {
    /// Path of the start leaf's addressable ancestor
    pub start: String,
    /// Path of the end leaf's addressable ancestor
    pub end: String,
    /// Characters before the range start, under `start`
    #[serde(rename = "startOffset")]
    pub start_offset: usize,
    /// Characters up to the range end, under `end`
    #[serde(rename = "endOffset")]
    pub end_offset: usize,
}

impl SerializedRange {
    pub fn new(
        start: &StructuralPath,
        start_offset: usize,
        end: &StructuralPath,
        end_offset: usize,
    ) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
            start_offset,
            end_offset,
        }
    }

    pub fn start_path(&self) -> Result<StructuralPath, PathParseError> {
        parse(&self.start)
    }

    pub fn end_path(&self) -> Result<StructuralPath, PathParseError> {
        parse(&self.end)
    }
}

/// Current selection as reported by the selection provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<N> {
    pub ranges: Vec<RawRange<N>>,
    pub collapsed: bool,
}

impl<N: Copy + Eq> Selection<N> {
    pub fn new(ranges: Vec<RawRange<N>>, collapsed: bool) -> Self {
        Self { ranges, collapsed }
    }

    /// Single-range selection; collapsed if the range is
    pub fn from_range(range: RawRange<N>) -> Self {
        Self {
            collapsed: range.is_collapsed(),
            ranges: vec![range],
        }
    }

    pub fn empty() -> Self {
        Self {
            ranges: Vec::new(),
            collapsed: true,
        }
    }

    /// At least one range and not collapsed
    pub fn is_valid(&self) -> bool {
        !self.ranges.is_empty() && !self.collapsed
    }
}
