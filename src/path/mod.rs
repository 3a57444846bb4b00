//! Structural paths
//!
//! Parsing, formatting and resolution of the marker-transparent paths used
//! to persist range anchors.
//!
//! ```text
//! p[2]/b[1]/text()[1]
//! │    │    └── first text leaf
//! │    └─────── first <b> among its siblings
//! └──────────── second <p> under the document root
//! ```

mod parser;
mod resolver;
mod types;

pub use types::{PathSegment, StructuralPath, TEXT_TAG};

pub use parser::{parse, try_parse, PathParseError};

pub use resolver::{PathResolver, Resolution, TreeWalker};
