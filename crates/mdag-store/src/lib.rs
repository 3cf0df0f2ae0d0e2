//! Content-addressed key-value storage for mdag.
//!
//! The DAG builder persists every leaf block and every node under the digest
//! of its canonical serialization. This crate defines the narrow contract the
//! builder relies on and ships two backends.
//!
//! # Storage Backends
//!
//! All backends implement the [`KvStore`] trait:
//!
//! - [`InMemoryStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsStore`] -- sharded directory store with atomic create-if-absent
//!
//! # Design Rules
//!
//! 1. Values are immutable once written (content addressing guarantees this).
//! 2. `put` of an existing key is a no-op, so a `has`-then-`put` pair from
//!    concurrent builders is harmless.
//! 3. The store never interprets values -- it is a pure key-value store.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use fs::FsStore;
pub use memory::{InMemoryStore, StoreStats};
pub use traits::KvStore;
