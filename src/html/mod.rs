//! HTML processing module
//!
//! Highlight rendering into the document tree, plus XHTML loading and output
//! for the in-memory [`Document`](crate::dom::Document).

mod highlighter;
pub mod xhtml;

pub use highlighter::highlight;
