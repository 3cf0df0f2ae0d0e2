//! Foundation types for mdag.
//!
//! This crate provides the value types shared by every other mdag crate.
//!
//! # Key Types
//!
//! - [`Digest`]: Content digest used as a store key
//! - [`Object`]: A DAG node: ordered links plus a data payload
//! - [`Link`]: Reference to a child node with its covered size
//! - [`KindTag`]: Fixed-width per-child tag stored in internal nodes
//! - [`Node`], [`FileNode`], [`DirNode`]: The file tree consumed by the builder
//! - [`MemFile`], [`MemDir`]: In-memory node implementations

pub mod digest;
pub mod error;
pub mod node;
pub mod object;

pub use digest::{Digest, DIGEST_LEN};
pub use error::TypeError;
pub use node::{DirNode, FileNode, MemDir, MemFile, MemNode, Node, NodeKind};
pub use object::{KindTag, Link, Object, KIND_TAG_WIDTH};
