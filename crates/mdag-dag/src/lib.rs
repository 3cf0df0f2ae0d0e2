//! Content-addressed Merkle DAG builder.
//!
//! Slices an in-memory file/directory tree into a DAG and persists every
//! block and node in a [`KvStore`](mdag_store::KvStore) under the digest of
//! its canonical encoding.
//!
//! - Files up to [`LEAF_SIZE`] bytes become a single leaf whose key holds the
//!   raw bytes.
//! - Larger files become a tree of leaves under internal nodes of at most
//!   [`FANOUT`] children, built depth first over a moving cursor.
//! - Directories become nodes with one named link per entry, in iteration
//!   order.
//!
//! Every node is stored before its parent is built, and each key is checked
//! with `has` before `put`, so identical content is written once.
//!
//! # Example
//!
//! ```
//! use mdag_crypto::Blake3Hasher;
//! use mdag_dag::add;
//! use mdag_store::InMemoryStore;
//! use mdag_types::MemDir;
//!
//! let store = InMemoryStore::new();
//! let root = MemDir::new("root")
//!     .with_file("a.txt", b"aaaaaaaaaa".to_vec())
//!     .with_file("b.txt", b"bbbbbbbbbb".to_vec());
//! let digest = add(&store, &root, &mut Blake3Hasher::new()).unwrap();
//! assert_eq!(store.len(), 3);
//! println!("root: {digest}");
//! ```

pub mod builder;
pub mod codec;
pub mod config;
pub mod dag;
pub mod error;
pub mod planner;
pub mod reader;
pub mod tree;

pub use builder::{Block, Slicer};
pub use config::{HeightRule, SliceConfig, FANOUT, LEAF_SIZE};
pub use dag::{add, Dag};
pub use error::{DagError, DagResult};
pub use planner::ChunkPlan;
pub use reader::{list_directory, read_file, read_object, DirEntry};
pub use tree::Sliced;
