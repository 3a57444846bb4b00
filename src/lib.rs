//! Annotator Library
//!
//! Anchors text selections inside a mutable document tree so they can be
//! highlighted in place and persisted as (structural path, character offset)
//! pairs that resolve back to the same text after a reload.
//!
//! # Modules
//!
//! - `dom`: tree access trait and the in-memory arena document
//! - `path`: structural paths and their resolution
//! - `range`: normalization, serialization and deserialization of ranges
//! - `html`: highlight rendering and XHTML input/output
//! - `annotations`: the annotation store
//!
//! # Example
//!
//! ```ignore
//! use annotator::{AnnotationRanges, AnnotationStore, Position, RawRange};
//!
//! let mut doc = annotator::html::xhtml::parse("<div><p>Hello <b>world</b>!</p></div>", &marker)?;
//! let mut store = AnnotationStore::new();
//! store.register(&mut doc, "note", AnnotationRanges::Raw(vec![raw]))?;
//! let saved = store.dump_json()?;
//! ```

pub mod annotations;
pub mod config;
pub mod dom;
pub mod error;
pub mod html;
pub mod path;
pub mod range;

pub use annotations::{Annotation, AnnotationRanges, AnnotationStore};
pub use config::{AnnotatorConfig, MarkerSpec};
pub use dom::{Document, DocumentTree, NodeId};
pub use error::{AnnotatorError, Result};
pub use path::{PathResolver, Resolution, StructuralPath, TreeWalker};
pub use range::{NormalizedRange, Position, RawRange, Selection, SerializedRange};
