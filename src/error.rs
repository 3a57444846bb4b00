//! Error types for the annotator

use thiserror::Error;

use crate::path::PathParseError;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, AnnotatorError>;

/// Annotator error type
#[derive(Error, Debug)]
pub enum AnnotatorError {
    /// A selection that cannot be anchored (collapsed, empty, or no reachable text)
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// A structural path only partially matched the document
    #[error("Path '{path}' not found: {unresolved} segment(s) unresolved")]
    PathResolutionMiss { path: String, unresolved: usize },

    /// A stored range points at nodes with no text left under them
    #[error("Anchor lost: no text under '{0}'")]
    AnchorLost(String),

    /// Tree mutation was asked to do something the node cannot support
    #[error("Tree error: {0}")]
    Tree(String),

    #[error("Path parse error: {0}")]
    PathParse(#[from] PathParseError),

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnnotatorError {
    /// Errors a stored anchor can degrade to without failing a whole load
    pub fn is_recoverable_anchor_error(&self) -> bool {
        matches!(
            self,
            AnnotatorError::AnchorLost(_)
                | AnnotatorError::PathParse(_)
                | AnnotatorError::PathResolutionMiss { .. }
                | AnnotatorError::InvalidRange(_)
        )
    }
}
