//! DAG entry point: slice a root node and return the digest of the tree.

use std::time::Instant;

use tracing::info;

use mdag_crypto::ContentHasher;
use mdag_store::KvStore;
use mdag_types::{Digest, Node};

use crate::builder::Slicer;
use crate::config::SliceConfig;
use crate::error::DagResult;
use crate::tree::Sliced;

/// Slices node trees into a store under one configuration.
#[derive(Clone, Debug, Default)]
pub struct Dag {
    config: SliceConfig,
}

impl Dag {
    /// Create a builder, rejecting unusable configurations.
    pub fn new(config: SliceConfig) -> DagResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SliceConfig {
        &self.config
    }

    /// A fresh hasher for the configured algorithm.
    pub fn hasher(&self) -> Box<dyn ContentHasher> {
        self.config.hasher()
    }

    /// Slice `node` into `store` and return the root object with its key.
    pub fn slice<S, H>(&self, store: &S, node: &dyn Node, hasher: &mut H) -> DagResult<Sliced>
    where
        S: KvStore + ?Sized,
        H: ContentHasher + ?Sized,
    {
        let start = Instant::now();
        let sliced = Slicer::new(store, hasher, &self.config)?.slice_node(node)?;
        info!(
            root = %sliced.digest.short_hex(),
            name = node.name(),
            bytes = sliced.size,
            duration_ms = start.elapsed().as_millis() as u64,
            "added node to DAG"
        );
        Ok(sliced)
    }

    /// Slice `node` into `store` and return the root digest.
    ///
    /// The root digest is the key the root object was stored under during
    /// the build. It is not recomputed.
    pub fn add<S, H>(&self, store: &S, node: &dyn Node, hasher: &mut H) -> DagResult<Digest>
    where
        S: KvStore + ?Sized,
        H: ContentHasher + ?Sized,
    {
        Ok(self.slice(store, node, hasher)?.digest)
    }
}

/// Slice `node` into `store` with the default configuration and return the
/// root digest.
pub fn add<S, H>(store: &S, node: &dyn Node, hasher: &mut H) -> DagResult<Digest>
where
    S: KvStore + ?Sized,
    H: ContentHasher + ?Sized,
{
    Dag::default().add(store, node, hasher)
}
