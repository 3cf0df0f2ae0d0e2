//! Tree builder: turns files and directories into persisted DAG objects.

use tracing::debug;

use mdag_crypto::ContentHasher;
use mdag_store::KvStore;
use mdag_types::{Digest, DirNode, FileNode, KindTag, Link, Node, NodeKind, Object};

use crate::builder::Slicer;
use crate::error::{DagError, DagResult};
use crate::planner;

/// A persisted file or directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sliced {
    /// Root object of the slice.
    pub object: Object,
    /// Store key of `object`.
    pub digest: Digest,
    /// Bytes of original content covered.
    pub size: u64,
}

impl Sliced {
    /// Kind tag a parent directory records for this entry.
    fn entry_tag(&self, is_dir: bool) -> KindTag {
        if is_dir {
            KindTag::Tree
        } else if self.object.is_leaf() {
            KindTag::Data
        } else {
            KindTag::Link
        }
    }
}

impl<'a, S, H> Slicer<'a, S, H>
where
    S: KvStore + ?Sized,
    H: ContentHasher + ?Sized,
{
    /// Slice any node.
    pub fn slice_node(&mut self, node: &dyn Node) -> DagResult<Sliced> {
        match node.kind() {
            NodeKind::File(file) => self.slice_file(file),
            NodeKind::Dir(dir) => self.slice_directory(dir),
        }
    }

    /// Slice one file.
    ///
    /// Content that fits in one leaf becomes a single leaf with no links.
    /// Anything larger becomes a block tree rooted at an internal node.
    pub fn slice_file(&mut self, file: &dyn FileNode) -> DagResult<Sliced> {
        let bytes = file.bytes();
        let len = bytes.len() as u64;

        if bytes.len() <= self.config.leaf_size {
            let digest = self.store_leaf(bytes)?;
            return Ok(Sliced {
                object: Object::leaf(bytes),
                digest,
                size: len,
            });
        }

        let plan = planner::plan(len, self.config);
        debug!(
            file = file.name(),
            bytes = len,
            leaves = plan.leaf_count,
            height = plan.height,
            "slicing file"
        );
        let block = self.build_blocks(bytes, 0, plan.height)?;
        if block.covered != len {
            return Err(DagError::IncompleteCoverage {
                expected: len,
                covered: block.covered,
            });
        }

        Ok(Sliced {
            object: block.object,
            digest: block.digest,
            size: len,
        })
    }

    /// Slice a directory and everything below it.
    ///
    /// Entries are linked in the order the directory yields them; that order
    /// is part of the directory's digest.
    pub fn slice_directory(&mut self, dir: &dyn DirNode) -> DagResult<Sliced> {
        let mut tree = Object::new();

        for child in dir.children() {
            let (sliced, is_dir) = match child.kind() {
                NodeKind::File(file) => (self.slice_file(file)?, false),
                NodeKind::Dir(sub) => (self.slice_directory(sub)?, true),
            };
            let tag = sliced.entry_tag(is_dir);
            tree.push_link(Link::entry(child.name(), sliced.digest, child.size()), tag);
        }

        let digest = self.store_node(&tree)?;
        debug!(
            dir = dir.name(),
            tree = %digest.short_hex(),
            entries = tree.links.len(),
            "sliced directory"
        );
        Ok(Sliced {
            object: tree,
            digest,
            size: dir.size(),
        })
    }
}
