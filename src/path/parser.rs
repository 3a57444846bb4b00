//! Structural path parser
//!
//! Grammar:
//! ```text
//! path    = ["/"] [segment *("/" segment)]
//! segment = tag "[" number "]"
//! tag     = name | "text()"
//! ```

use std::str::FromStr;

use super::types::*;
use thiserror::Error;

/// Path parsing errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathParseError {
    #[error("Empty segment at position {0}")]
    EmptySegment(usize),

    #[error("Missing '[' index in segment '{0}'")]
    MissingIndex(String),

    #[error("Segment '{0}' must end with ']'")]
    UnclosedBracket(String),

    #[error("Invalid index '{index}' in segment '{segment}'")]
    InvalidIndex { segment: String, index: String },

    #[error("Empty tag in segment '{0}'")]
    EmptyTag(String),
}

/// Parse a path string such as `p[1]/b[2]`
pub fn parse(input: &str) -> Result<StructuralPath, PathParseError> {
    let body = input.strip_prefix('/').unwrap_or(input);
    if body.is_empty() {
        return Ok(StructuralPath::root());
    }

    let mut path = StructuralPath::root();
    let mut position = input.len() - body.len();
    for raw in body.split('/') {
        if raw.is_empty() {
            return Err(PathParseError::EmptySegment(position));
        }
        path.push(parse_segment(raw)?);
        position += raw.len() + 1;
    }
    Ok(path)
}

/// Like [`parse`] but discards the error
pub fn try_parse(input: &str) -> Option<StructuralPath> {
    parse(input).ok()
}

fn parse_segment(raw: &str) -> Result<PathSegment, PathParseError> {
    let open = raw
        .rfind('[')
        .ok_or_else(|| PathParseError::MissingIndex(raw.to_string()))?;
    let digits = raw[open + 1..]
        .strip_suffix(']')
        .ok_or_else(|| PathParseError::UnclosedBracket(raw.to_string()))?;

    let tag = &raw[..open];
    if tag.is_empty() {
        return Err(PathParseError::EmptyTag(raw.to_string()));
    }

    let index: usize = digits
        .parse()
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| PathParseError::InvalidIndex {
            segment: raw.to_string(),
            index: digits.to_string(),
        })?;

    Ok(PathSegment::new(tag, index))
}

impl FromStr for StructuralPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
