use std::fmt;

use serde::{Deserialize, Serialize};

use crate::digest::Digest;
use crate::error::TypeError;

/// Width in bytes of one kind tag in an internal node's `data` field.
pub const KIND_TAG_WIDTH: usize = 4;

/// Per-child tag recorded in the `data` field of internal and directory nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KindTag {
    /// The child is a leaf: its key holds raw file bytes.
    Data,
    /// The child is an internal node of a multi-block file.
    Link,
    /// The child is a directory node.
    Tree,
}

impl KindTag {
    /// The fixed-width wire form of this tag.
    pub const fn as_bytes(&self) -> &'static [u8; KIND_TAG_WIDTH] {
        match self {
            Self::Data => b"data",
            Self::Link => b"link",
            Self::Tree => b"tree",
        }
    }

    /// Parse one wire tag.
    pub fn from_bytes(bytes: [u8; KIND_TAG_WIDTH]) -> Result<Self, TypeError> {
        match &bytes {
            b"data" => Ok(Self::Data),
            b"link" => Ok(Self::Link),
            b"tree" => Ok(Self::Tree),
            _ => Err(TypeError::InvalidKindTag(bytes)),
        }
    }
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data => write!(f, "data"),
            Self::Link => write!(f, "link"),
            Self::Tree => write!(f, "tree"),
        }
    }
}

/// A reference from a node to one of its children.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Entry name. Only set for directory entries.
    pub name: Option<String>,
    /// Store key of the child.
    pub hash: Digest,
    /// Length of the original content covered by the child.
    pub size: u64,
}

impl Link {
    /// A link to an unnamed chunk of a file.
    pub fn chunk(hash: Digest, size: u64) -> Self {
        Self {
            name: None,
            hash,
            size,
        }
    }

    /// A link to a named directory entry.
    pub fn entry(name: impl Into<String>, hash: Digest, size: u64) -> Self {
        Self {
            name: Some(name.into()),
            hash,
            size,
        }
    }
}

/// A node of the Merkle DAG.
///
/// Objects come in two disjoint shapes:
///
/// - *leaf*: no links, `data` is raw file content;
/// - *internal*: one or more links, `data` holds one [`KindTag`] per link.
///
/// Directory nodes are internal nodes whose links are named. An empty
/// directory has neither links nor data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    pub links: Vec<Link>,
    pub data: Vec<u8>,
}

impl Object {
    /// Create an empty object, ready for [`push_link`](Self::push_link).
    pub fn new() -> Self {
        Self::default()
    }

    /// A leaf holding raw content.
    pub fn leaf(data: impl Into<Vec<u8>>) -> Self {
        Self {
            links: Vec::new(),
            data: data.into(),
        }
    }

    /// Returns `true` if this object carries content rather than links.
    pub fn is_leaf(&self) -> bool {
        self.links.is_empty()
    }

    /// Append a child link together with its kind tag.
    pub fn push_link(&mut self, link: Link, tag: KindTag) {
        self.links.push(link);
        self.data.extend_from_slice(tag.as_bytes());
    }

    /// Decode the per-child kind tags by fixed stride.
    pub fn kind_tags(&self) -> Result<Vec<KindTag>, TypeError> {
        if self.data.len() % KIND_TAG_WIDTH != 0 {
            return Err(TypeError::InvalidLength {
                expected: self.data.len().next_multiple_of(KIND_TAG_WIDTH),
                actual: self.data.len(),
            });
        }
        self.data
            .chunks_exact(KIND_TAG_WIDTH)
            .map(|chunk| {
                let mut tag = [0u8; KIND_TAG_WIDTH];
                tag.copy_from_slice(chunk);
                KindTag::from_bytes(tag)
            })
            .collect()
    }

    /// Sum of the sizes of all links.
    pub fn links_size(&self) -> u64 {
        self.links.iter().map(|l| l.size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest(b: u8) -> Digest {
        Digest::from_hash([b; 32])
    }

    #[test]
    fn leaf_has_no_links() {
        let leaf = Object::leaf(b"hello".to_vec());
        assert!(leaf.is_leaf());
        assert_eq!(leaf.data, b"hello");
        assert_eq!(leaf.links_size(), 0);
    }

    #[test]
    fn push_link_appends_tag() {
        let mut obj = Object::new();
        obj.push_link(Link::chunk(digest(1), 10), KindTag::Data);
        obj.push_link(Link::chunk(digest(2), 20), KindTag::Link);
        obj.push_link(Link::entry("sub", digest(3), 30), KindTag::Tree);

        assert!(!obj.is_leaf());
        assert_eq!(obj.data, b"datalinktree");
        assert_eq!(
            obj.kind_tags().unwrap(),
            vec![KindTag::Data, KindTag::Link, KindTag::Tree]
        );
        assert_eq!(obj.links_size(), 60);
    }

    #[test]
    fn kind_tags_rejects_unknown_tag() {
        let obj = Object {
            links: vec![Link::chunk(digest(1), 1)],
            data: b"blob".to_vec(),
        };
        assert_eq!(
            obj.kind_tags().unwrap_err(),
            TypeError::InvalidKindTag(*b"blob")
        );
    }

    #[test]
    fn kind_tags_rejects_ragged_data() {
        let obj = Object {
            links: vec![Link::chunk(digest(1), 1)],
            data: b"datal".to_vec(),
        };
        assert!(matches!(
            obj.kind_tags(),
            Err(TypeError::InvalidLength { actual: 5, .. })
        ));
    }

    #[test]
    fn empty_object_has_no_tags() {
        assert!(Object::new().kind_tags().unwrap().is_empty());
    }

    #[test]
    fn link_constructors() {
        let chunk = Link::chunk(digest(4), 7);
        assert!(chunk.name.is_none());
        let entry = Link::entry("a.txt", digest(4), 7);
        assert_eq!(entry.name.as_deref(), Some("a.txt"));
        assert_eq!(chunk.hash, entry.hash);
    }

    #[test]
    fn tag_display_matches_wire_form() {
        for tag in [KindTag::Data, KindTag::Link, KindTag::Tree] {
            assert_eq!(tag.to_string().as_bytes(), tag.as_bytes());
        }
    }
}
