//! Error types for the DAG builder and reader.

use mdag_store::StoreError;
use mdag_types::{Digest, TypeError};

/// Errors that can occur while slicing or reading a DAG.
#[derive(Debug, thiserror::Error)]
pub enum DagError {
    /// The backing store failed. Builds are aborted, never retried.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Canonical encoding or decoding of an object failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A stored object carried malformed type data (bad digest, kind tag).
    #[error("invalid object data: {0}")]
    Type(#[from] TypeError),

    /// A key referenced by a link is absent from the store.
    #[error("missing block: {0:?}")]
    MissingBlock(Digest),

    /// Reassembled content does not match the size recorded in its link.
    #[error("size mismatch for {digest:?}: link says {expected}, content has {actual}")]
    SizeMismatch {
        /// The child whose content was reassembled.
        digest: Digest,
        /// Size recorded in the parent link.
        expected: u64,
        /// Length of the reassembled content.
        actual: u64,
    },

    /// A stored node is structurally inconsistent.
    #[error("corrupt node {digest:?}: {reason}")]
    Corrupt {
        /// The offending node.
        digest: Digest,
        /// What was wrong with it.
        reason: String,
    },

    /// The block tree did not cover the whole file.
    #[error("block tree covered {covered} of {expected} bytes")]
    IncompleteCoverage {
        /// File length.
        expected: u64,
        /// Bytes reachable from the root.
        covered: u64,
    },

    /// The slicing configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error while loading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for DAG results.
pub type DagResult<T> = Result<T, DagError>;
