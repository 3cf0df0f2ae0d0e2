//! Canonical object encoding.
//!
//! Objects are encoded with bincode's default options: fields in declaration
//! order, fixed-width little-endian integers, length-prefixed sequences. The
//! encoding contains no maps, so it is deterministic and serves as the hash
//! pre-image for every key.

use serde::Serialize;

use mdag_types::{Link, Object};

use crate::error::{DagError, DagResult};

/// Borrowed view with the same field layout as [`Object`], so leaves can be
/// hashed without copying their content.
#[derive(Serialize)]
struct ObjectRef<'a> {
    links: &'a [Link],
    data: &'a [u8],
}

/// Encode an object to its canonical form.
pub fn encode(object: &Object) -> DagResult<Vec<u8>> {
    encode_parts(&object.links, &object.data)
}

/// Encode the object that would hold `links` and `data`.
pub fn encode_parts(links: &[Link], data: &[u8]) -> DagResult<Vec<u8>> {
    bincode::serialize(&ObjectRef { links, data })
        .map_err(|e| DagError::Serialization(e.to_string()))
}

/// Decode a structured node.
pub fn decode(bytes: &[u8]) -> DagResult<Object> {
    bincode::deserialize(bytes).map_err(|e| DagError::Serialization(e.to_string()))
}
