//! In-memory annotation store
//!
//! Sequences normalization, highlighting and (de)serialization. The store
//! owns the annotation list; the document is borrowed mutably for each call
//! and never kept.

use tracing::{debug, info, warn};

use super::types::{Annotation, AnnotationRanges};
use crate::dom::DocumentTree;
use crate::error::{AnnotatorError, Result};
use crate::html::highlight;
use crate::path::{PathResolver, TreeWalker};
use crate::range::{deserialize, normalize, resolve_endpoints, serialize};
use crate::range::{document_offset, document_position, Edge};
use crate::range::{RawRange, Selection, SerializedRange};

/// Annotation list plus the resolver used to anchor it
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore<R = TreeWalker> {
    annotations: Vec<Annotation>,
    resolver: R,
}

impl AnnotationStore<TreeWalker> {
    /// Create a store using the tree-walking resolver
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: PathResolver> AnnotationStore<R> {
    /// Create a store using a host-provided resolver
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            annotations: Vec::new(),
            resolver,
        }
    }

    /// Anchor and highlight `ranges`, then append the annotation.
    ///
    /// Raw ranges are replaced by their serialized form. Serialized ranges
    /// are stored exactly as given; any that can no longer be anchored are
    /// logged and left unhighlighted.
    pub fn register<D: DocumentTree>(
        &mut self,
        doc: &mut D,
        text: impl Into<String>,
        ranges: AnnotationRanges<D::Node>,
    ) -> Result<&Annotation> {
        let ranges = match ranges {
            AnnotationRanges::Raw(raw) => self.anchor_raw(doc, &raw)?,
            AnnotationRanges::Serialized(stored) => {
                self.anchor_stored(doc, &stored)?;
                stored
            }
        };

        let index = self.annotations.len();
        self.annotations.push(Annotation::new(text, ranges));
        debug!(index, "Registered annotation");
        Ok(&self.annotations[index])
    }

    /// Register the current selection, rejecting empty or collapsed ones
    pub fn create_annotation<D: DocumentTree>(
        &mut self,
        doc: &mut D,
        selection: &Selection<D::Node>,
        text: impl Into<String>,
    ) -> Result<&Annotation> {
        if !selection.is_valid() {
            return Err(AnnotatorError::InvalidRange(
                "selection is empty or collapsed".to_string(),
            ));
        }
        self.register(doc, text, AnnotationRanges::Raw(selection.ranges.clone()))
    }

    fn anchor_raw<D: DocumentTree>(
        &self,
        doc: &mut D,
        ranges: &[RawRange<D::Node>],
    ) -> Result<Vec<SerializedRange>> {
        if ranges.is_empty() {
            return Err(AnnotatorError::InvalidRange("no ranges selected".to_string()));
        }
        // Splitting for one range moves the leaves under the next, so every
        // range is pinned to document offsets before the first split.
        let mut anchors = Vec::with_capacity(ranges.len());
        for raw in ranges {
            if raw.is_collapsed() {
                return Err(AnnotatorError::InvalidRange("range is collapsed".to_string()));
            }
            let (start, end) = resolve_endpoints(doc, raw)?;
            let ancestor = raw
                .common_ancestor
                .filter(|&hint| doc.contains(hint, start.node) && doc.contains(hint, end.node))
                .or_else(|| doc.common_ancestor(raw.start.node, raw.end.node));
            anchors.push((
                document_offset(doc, start)?,
                document_offset(doc, end)?,
                ancestor,
            ));
        }

        let mut serialized = Vec::with_capacity(ranges.len());
        for (from, to, ancestor) in anchors {
            let mut raw = RawRange::new(
                document_position(doc, from, Edge::Start)?,
                document_position(doc, to, Edge::End)?,
            );
            if let Some(ancestor) = ancestor {
                raw = raw.with_common_ancestor(ancestor);
            }
            let range = normalize(doc, &raw)?;
            highlight(doc, &range)?;
            serialized.push(serialize(doc, &self.resolver, &range)?);
        }
        Ok(serialized)
    }

    fn anchor_stored<D: DocumentTree>(
        &self,
        doc: &mut D,
        ranges: &[SerializedRange],
    ) -> Result<()> {
        for stored in ranges {
            match deserialize(doc, &self.resolver, stored) {
                Ok(range) => {
                    highlight(doc, &range)?;
                }
                Err(e) if e.is_recoverable_anchor_error() => {
                    warn!(
                        start = %stored.start,
                        end = %stored.end,
                        error = %e,
                        "Could not anchor stored range"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Register each stored annotation in order
    pub fn load_annotations<D: DocumentTree>(
        &mut self,
        doc: &mut D,
        annotations: impl IntoIterator<Item = Annotation>,
    ) -> Result<usize> {
        let mut loaded = 0;
        for annotation in annotations {
            self.register(
                doc,
                annotation.text,
                AnnotationRanges::Serialized(annotation.ranges),
            )?;
            loaded += 1;
        }
        info!(loaded, "Loaded annotations");
        Ok(loaded)
    }

    /// Load annotations from their JSON array form
    pub fn load_json<D: DocumentTree>(&mut self, doc: &mut D, json: &str) -> Result<usize> {
        let annotations: Vec<Annotation> = serde_json::from_str(json)?;
        self.load_annotations(doc, annotations)
    }

    /// Snapshot of the annotations in insertion order
    pub fn dump_annotations(&self) -> Vec<Annotation> {
        self.annotations.clone()
    }

    /// Snapshot as a JSON array
    pub fn dump_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.annotations)?)
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Remove every marker from the document and forget all annotations.
    ///
    /// Returns the number of markers removed.
    pub fn clear_all<D: DocumentTree>(&mut self, doc: &mut D) -> Result<usize> {
        let markers = doc.markers(doc.root());
        for &marker in &markers {
            doc.unwrap_marker(marker)?;
        }
        self.annotations.clear();
        info!(markers = markers.len(), "Cleared all annotations");
        Ok(markers.len())
    }
}
