//! Reading content back out of a DAG.
//!
//! Stored values carry no type marker: a leaf key holds raw bytes and a node
//! key holds an encoded [`Object`]. The reader takes that knowledge from the
//! kind tags of the parent, and from the caller for the root.

use mdag_store::KvStore;
use mdag_types::{Digest, KindTag, Link, Object};

use crate::codec;
use crate::error::{DagError, DagResult};

fn fetch<S: KvStore + ?Sized>(store: &S, digest: &Digest) -> DagResult<Vec<u8>> {
    store.get(digest)?.ok_or(DagError::MissingBlock(*digest))
}

/// Fetch and decode a structured node (internal file node or directory).
pub fn read_object<S: KvStore + ?Sized>(store: &S, digest: &Digest) -> DagResult<Object> {
    codec::decode(&fetch(store, digest)?)
}

/// Pair each link of a node with its kind tag.
pub fn tagged_links(digest: &Digest, object: &Object) -> DagResult<Vec<(Link, KindTag)>> {
    let tags = object.kind_tags()?;
    if tags.len() != object.links.len() {
        return Err(DagError::Corrupt {
            digest: *digest,
            reason: format!("{} links but {} kind tags", object.links.len(), tags.len()),
        });
    }
    Ok(object.links.iter().cloned().zip(tags).collect())
}

/// Reassemble a file's content.
///
/// `is_leaf` says whether `digest` names a raw leaf (a file that fit in one
/// block, tagged `data` by its directory) or a block tree root.
pub fn read_file<S: KvStore + ?Sized>(store: &S, digest: &Digest, is_leaf: bool) -> DagResult<Vec<u8>> {
    if is_leaf {
        return fetch(store, digest);
    }
    let mut out = Vec::new();
    append_blocks(store, digest, &mut out)?;
    Ok(out)
}

fn append_blocks<S: KvStore + ?Sized>(store: &S, digest: &Digest, out: &mut Vec<u8>) -> DagResult<()> {
    let node = read_object(store, digest)?;
    for (link, tag) in tagged_links(digest, &node)? {
        let start = out.len();
        match tag {
            KindTag::Data => out.extend_from_slice(&fetch(store, &link.hash)?),
            KindTag::Link => append_blocks(store, &link.hash, out)?,
            KindTag::Tree => {
                return Err(DagError::Corrupt {
                    digest: *digest,
                    reason: "directory link inside a file".into(),
                })
            }
        }
        let actual = (out.len() - start) as u64;
        if actual != link.size {
            return Err(DagError::SizeMismatch {
                digest: link.hash,
                expected: link.size,
                actual,
            });
        }
    }
    Ok(())
}

/// One entry of a directory node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub link: Link,
    pub tag: KindTag,
}

/// List a directory node's entries in stored order.
pub fn list_directory<S: KvStore + ?Sized>(store: &S, digest: &Digest) -> DagResult<Vec<DirEntry>> {
    let node = read_object(store, digest)?;
    tagged_links(digest, &node)?
        .into_iter()
        .map(|(link, tag)| {
            let name = link.name.clone().ok_or_else(|| DagError::Corrupt {
                digest: *digest,
                reason: "unnamed directory entry".into(),
            })?;
            Ok(DirEntry { name, link, tag })
        })
        .collect()
}
