//! Annotation module
//!
//! Keeps the list of annotations and drives the anchoring pipeline for them.
//!
//! # Flows
//!
//! - Create: raw selection → normalize → highlight + serialize → append
//! - Load: stored range → deserialize → highlight → append (ranges verbatim)
//! - Clear: unwrap every marker, drop every annotation

mod store;
mod types;

pub use store::AnnotationStore;
pub use types::{Annotation, AnnotationRanges};
