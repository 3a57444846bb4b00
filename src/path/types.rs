//! Structural path types
//!
//! A structural path locates a node from the document root by tag name and
//! 1-based index among same-tag siblings, e.g. `p[2]/b[1]`. Marker containers
//! never appear in a path and are never counted as siblings.

use std::fmt;

/// Tag identifier used for text leaves, as in XPath
pub const TEXT_TAG: &str = "text()";

/// A path from the document root to a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StructuralPath {
    /// Segments from the root downwards; empty for the root itself
    pub segments: Vec<PathSegment>,
}

/// One step of a structural path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    /// Element tag name, or [`TEXT_TAG`] for text leaves
    pub tag: String,
    /// 1-based index among same-tag siblings
    pub index: usize,
}

impl StructuralPath {
    /// The root path
    pub fn root() -> Self {
        Self::default()
    }

    pub fn with_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Longest run of leading segments shared with `other`
    pub fn common_prefix(&self, other: &StructuralPath) -> StructuralPath {
        let segments = self
            .segments
            .iter()
            .zip(other.segments.iter())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.clone())
            .collect();
        StructuralPath { segments }
    }
}

impl PathSegment {
    pub fn new(tag: impl Into<String>, index: usize) -> Self {
        Self {
            tag: tag.into(),
            index,
        }
    }

    pub fn text(index: usize) -> Self {
        Self::new(TEXT_TAG, index)
    }

    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }
}

impl fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.tag, self.index)
    }
}
