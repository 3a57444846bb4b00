//! Annotation types
//!
//! The stored shape is the persistence contract:
//! `{"text": ..., "ranges": [{"start", "end", "startOffset", "endOffset"}]}`.

use serde::{Deserialize, Serialize};

use crate::range::{RawRange, SerializedRange};

/// A note attached to one or more ranges of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Note text; empty for a bare highlight
    #[serde(default)]
    pub text: String,
    /// Anchors, fixed at registration
    #[serde(default)]
    pub ranges: Vec<SerializedRange>,
}

impl Annotation {
    pub fn new(text: impl Into<String>, ranges: Vec<SerializedRange>) -> Self {
        Self {
            text: text.into(),
            ranges,
        }
    }

    /// Annotation with no note text
    pub fn highlight(ranges: Vec<SerializedRange>) -> Self {
        Self::new(String::new(), ranges)
    }
}

/// Ranges handed to [`AnnotationStore::register`](super::AnnotationStore::register)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationRanges<N> {
    /// Fresh selection ranges; normalized, highlighted and serialized
    Raw(Vec<RawRange<N>>),
    /// Previously stored ranges; resolved and highlighted, kept verbatim
    Serialized(Vec<SerializedRange>),
}
