//! Block builder: splits one file's bytes into a multiway tree of leaves.
//!
//! The tree is built depth first with a moving cursor. Each child of an
//! internal node starts exactly where the previous child's coverage ended, so
//! the leaves of a file partition its bytes into disjoint, contiguous ranges
//! in order.
//!
//! Every leaf and node is hashed and persisted before its parent is built,
//! so a parent never references a key that is not yet in the store.

use tracing::{debug, trace};

use mdag_crypto::ContentHasher;
use mdag_store::KvStore;
use mdag_types::{Digest, KindTag, Link, Object};

use crate::codec;
use crate::config::SliceConfig;
use crate::error::DagResult;

/// A persisted subtree of one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// The subtree root: an internal node, or a bare leaf when the remaining
    /// bytes fit in one leaf.
    pub object: Object,
    /// Store key of `object`.
    pub digest: Digest,
    /// Number of file bytes covered by this subtree.
    pub covered: u64,
}

/// Builds and persists DAG objects against one store with one hasher.
///
/// The hasher is only ever used through [`ContentHasher::digest`], which
/// resets it first, so no digest depends on what was hashed before it.
pub struct Slicer<'a, S: ?Sized, H: ?Sized> {
    pub(crate) store: &'a S,
    pub(crate) hasher: &'a mut H,
    pub(crate) config: &'a SliceConfig,
}

impl<'a, S, H> Slicer<'a, S, H>
where
    S: KvStore + ?Sized,
    H: ContentHasher + ?Sized,
{
    /// Rejects configurations that [`SliceConfig::validate`] refuses.
    pub fn new(store: &'a S, hasher: &'a mut H, config: &'a SliceConfig) -> DagResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            hasher,
            config,
        })
    }

    /// Write `value` under `key` unless the store already has it.
    fn persist(&mut self, key: &Digest, value: &[u8]) -> DagResult<()> {
        if self.store.has(key)? {
            trace!(key = %key.short_hex(), "dedup hit");
            return Ok(());
        }
        self.store.put(key, value)?;
        debug!(key = %key.short_hex(), bytes = value.len(), "stored block");
        Ok(())
    }

    /// Hash a leaf holding `chunk` and persist the raw chunk under it.
    pub(crate) fn store_leaf(&mut self, chunk: &[u8]) -> DagResult<Digest> {
        let encoded = codec::encode_parts(&[], chunk)?;
        let digest = self.hasher.digest(&encoded);
        self.persist(&digest, chunk)?;
        Ok(digest)
    }

    /// Hash a structured node and persist its encoding under it.
    pub(crate) fn store_node(&mut self, object: &Object) -> DagResult<Digest> {
        let encoded = codec::encode(object)?;
        let digest = self.hasher.digest(&encoded);
        self.persist(&digest, &encoded)?;
        Ok(digest)
    }

    /// Build a subtree of `height` levels over `bytes[cursor..]`.
    ///
    /// Covers at most `fanout^height` leaves and stops early at the end of
    /// the buffer. `cursor` must be inside the buffer.
    pub fn build_blocks(&mut self, bytes: &[u8], cursor: usize, height: u32) -> DagResult<Block> {
        if height <= 1 {
            self.build_leaves(bytes, cursor)
        } else {
            self.build_internal(bytes, cursor, height)
        }
    }

    fn build_leaves(&mut self, bytes: &[u8], cursor: usize) -> DagResult<Block> {
        let leaf_size = self.config.leaf_size;
        let remaining = &bytes[cursor..];

        // A lone trailing chunk is linked directly as a leaf.
        if remaining.len() <= leaf_size {
            let digest = self.store_leaf(remaining)?;
            return Ok(Block {
                object: Object::leaf(remaining),
                digest,
                covered: remaining.len() as u64,
            });
        }

        let mut node = Object::new();
        let mut covered = 0u64;
        for chunk in remaining.chunks(leaf_size).take(self.config.fanout) {
            let digest = self.store_leaf(chunk)?;
            node.push_link(Link::chunk(digest, chunk.len() as u64), KindTag::Data);
            covered += chunk.len() as u64;
        }

        let digest = self.store_node(&node)?;
        debug!(
            node = %digest.short_hex(),
            leaves = node.links.len(),
            covered,
            "built leaf group"
        );
        Ok(Block {
            object: node,
            digest,
            covered,
        })
    }

    fn build_internal(&mut self, bytes: &[u8], cursor: usize, height: u32) -> DagResult<Block> {
        let mut node = Object::new();
        let mut offset = cursor;
        let mut covered = 0u64;

        for _ in 0..self.config.fanout {
            if offset >= bytes.len() {
                break;
            }
            let child = self.build_blocks(bytes, offset, height - 1)?;
            let tag = if child.object.is_leaf() {
                KindTag::Data
            } else {
                KindTag::Link
            };
            node.push_link(Link::chunk(child.digest, child.covered), tag);
            offset += child.covered as usize;
            covered += child.covered;
        }

        let digest = self.store_node(&node)?;
        debug!(
            node = %digest.short_hex(),
            height,
            children = node.links.len(),
            covered,
            "built internal node"
        );
        Ok(Block {
            object: node,
            digest,
            covered,
        })
    }
}
