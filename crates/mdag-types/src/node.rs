//! File/directory node model consumed by the DAG builder.
//!
//! The builder never owns the tree it slices. Callers expose their own file
//! system representation through [`Node`], [`FileNode`] and [`DirNode`];
//! [`MemFile`], [`MemDir`] and [`MemNode`] are an in-memory implementation
//! for embedding and tests.

/// Capabilities shared by files and directories.
pub trait Node {
    /// Entry name within the parent directory.
    fn name(&self) -> &str;

    /// Size in bytes reported for this node.
    fn size(&self) -> u64;

    /// Narrow this node to its concrete capability set.
    fn kind(&self) -> NodeKind<'_>;
}

/// The closed set of node capabilities.
pub enum NodeKind<'a> {
    File(&'a dyn FileNode),
    Dir(&'a dyn DirNode),
}

/// A file whose full content is addressable in memory.
pub trait FileNode: Node {
    fn bytes(&self) -> &[u8];
}

/// A directory with a fixed child order.
pub trait DirNode: Node {
    /// Forward-only iteration over the children. The order yielded here is
    /// the order recorded in the directory's links and therefore in its
    /// digest.
    fn children(&self) -> Box<dyn Iterator<Item = &dyn Node> + '_>;
}

/// An in-memory file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemFile {
    name: String,
    content: Vec<u8>,
}

impl MemFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

impl Node for MemFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.content.len() as u64
    }

    fn kind(&self) -> NodeKind<'_> {
        NodeKind::File(self)
    }
}

impl FileNode for MemFile {
    fn bytes(&self) -> &[u8] {
        &self.content
    }
}

/// An in-memory directory. Children are yielded in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemDir {
    name: String,
    children: Vec<MemNode>,
}

impl MemDir {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Append a file entry.
    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.children.push(MemNode::File(MemFile::new(name, content)));
        self
    }

    /// Append a subdirectory entry.
    pub fn with_dir(mut self, dir: MemDir) -> Self {
        self.children.push(MemNode::Dir(dir));
        self
    }

    /// Append any node.
    pub fn push(&mut self, node: MemNode) {
        self.children.push(node);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Node for MemDir {
    fn name(&self) -> &str {
        &self.name
    }

    /// Recursive sum of the contained file sizes.
    fn size(&self) -> u64 {
        self.children.iter().map(Node::size).sum()
    }

    fn kind(&self) -> NodeKind<'_> {
        NodeKind::Dir(self)
    }
}

impl DirNode for MemDir {
    fn children(&self) -> Box<dyn Iterator<Item = &dyn Node> + '_> {
        Box::new(self.children.iter().map(|c| c as &dyn Node))
    }
}

/// Either kind of in-memory node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemNode {
    File(MemFile),
    Dir(MemDir),
}

impl Node for MemNode {
    fn name(&self) -> &str {
        match self {
            Self::File(f) => f.name(),
            Self::Dir(d) => d.name(),
        }
    }

    fn size(&self) -> u64 {
        match self {
            Self::File(f) => f.size(),
            Self::Dir(d) => d.size(),
        }
    }

    fn kind(&self) -> NodeKind<'_> {
        match self {
            Self::File(f) => f.kind(),
            Self::Dir(d) => d.kind(),
        }
    }
}

impl From<MemFile> for MemNode {
    fn from(file: MemFile) -> Self {
        Self::File(file)
    }
}

impl From<MemDir> for MemNode {
    fn from(dir: MemDir) -> Self {
        Self::Dir(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemDir {
        MemDir::new("root")
            .with_file("a.txt", b"aaaaaaaaaa".to_vec())
            .with_dir(MemDir::new("sub").with_file("b.txt", b"bbb".to_vec()))
            .with_file("c.txt", Vec::new())
    }

    #[test]
    fn file_exposes_bytes_and_size() {
        let file = MemFile::new("x", b"12345".to_vec());
        assert_eq!(file.size(), 5);
        match file.kind() {
            NodeKind::File(f) => assert_eq!(f.bytes(), b"12345"),
            NodeKind::Dir(_) => panic!("expected file"),
        }
    }

    #[test]
    fn dir_size_is_recursive_sum() {
        assert_eq!(sample().size(), 13);
        assert_eq!(MemDir::new("empty").size(), 0);
    }

    #[test]
    fn children_keep_insertion_order() {
        let dir = sample();
        let names: Vec<&str> = dir.children().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a.txt", "sub", "c.txt"]);
    }

    #[test]
    fn kind_dispatch_through_mem_node() {
        let node: MemNode = MemDir::new("d").into();
        assert!(matches!(node.kind(), NodeKind::Dir(_)));
        let node: MemNode = MemFile::new("f", b"x".to_vec()).into();
        assert!(matches!(node.kind(), NodeKind::File(_)));
    }

    #[test]
    fn push_and_len() {
        let mut dir = MemDir::new("d");
        assert!(dir.is_empty());
        dir.push(MemFile::new("f", b"x".to_vec()).into());
        assert_eq!(dir.len(), 1);
    }
}
