//! Range anchoring
//!
//! ```text
//! RawRange ──normalize──▶ NormalizedRange ──serialize──▶ SerializedRange
//!                               ▲                               │
//!                               └─────────deserialize───────────┘
//! ```
//!
//! Normalization and deserialization mutate the tree (text splitting);
//! serialization only reads it.

mod deserializer;
mod normalizer;
mod serializer;
mod types;

pub use types::{NormalizedRange, Position, RawRange, Selection, SerializedRange};

pub use normalizer::{normalize, resolve_endpoints};
pub(crate) use normalizer::{document_offset, document_position, Edge};

pub use serializer::serialize;

pub use deserializer::{deserialize, locate, locate_offset};
