//! Filesystem-backed store.
//!
//! Values live in a 256-way sharded directory tree, git style:
//! `{root}/{first 2 hex chars}/{remaining 62 hex chars}`.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, trace};

use mdag_types::Digest;

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;

/// Directory-backed key-value store.
///
/// Writes go to a temporary file in the target shard and are then linked into
/// place without clobbering, so a concurrent writer of the same key either
/// wins or finds the finished value. Readers never observe partial values.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn value_path(&self, key: &Digest) -> PathBuf {
        let hex = key.to_hex();
        let (prefix, rest) = hex.split_at(2);
        self.root.join(prefix).join(rest)
    }

    /// All keys currently stored, sorted.
    pub fn keys(&self) -> StoreResult<Vec<Digest>> {
        let mut keys = Vec::new();
        for shard in fs::read_dir(&self.root)? {
            let shard = shard?;
            if !shard.file_type()?.is_dir() {
                continue;
            }
            let prefix = shard.file_name().to_string_lossy().into_owned();
            for entry in fs::read_dir(shard.path())? {
                let entry = entry?;
                let name = entry.file_name().to_string_lossy().into_owned();
                // Leftover temp files and foreign files are not keys.
                if let Ok(key) = Digest::from_hex(&format!("{prefix}{name}")) {
                    keys.push(key);
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

impl KvStore for FsStore {
    fn has(&self, key: &Digest) -> StoreResult<bool> {
        Ok(self.value_path(key).try_exists()?)
    }

    fn put(&self, key: &Digest, value: &[u8]) -> StoreResult<()> {
        let path = self.value_path(key);
        let Some(shard) = path.parent() else {
            return Err(StoreError::Backend(format!("no shard for {}", path.display())));
        };
        fs::create_dir_all(shard)?;

        let mut tmp = NamedTempFile::new_in(shard)?;
        tmp.write_all(value)?;
        tmp.as_file().sync_all()?;

        match tmp.persist_noclobber(&path) {
            Ok(_) => {
                debug!(key = %key.short_hex(), bytes = value.len(), "wrote value");
                Ok(())
            }
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                trace!(key = %key.short_hex(), "value already present");
                Ok(())
            }
            Err(e) => Err(e.error.into()),
        }
    }

    fn get(&self, key: &Digest) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(self.value_path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdag_crypto::{Blake3Hasher, ContentHasher};
    use tempfile::TempDir;

    fn key(content: &[u8]) -> Digest {
        Blake3Hasher::new().digest(content)
    }

    #[test]
    fn put_get_has() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::open(dir.path()).unwrap();
        let k = key(b"file content");

        assert!(!store.has(&k).unwrap());
        store.put(&k, b"file content").unwrap();
        assert!(store.has(&k).unwrap());
        assert_eq!(store.get(&k).unwrap().unwrap(), b"file content");
    }

    #[test]
    fn values_are_sharded_by_prefix() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::open(dir.path()).unwrap();
        let k = key(b"sharded");
        store.put(&k, b"sharded").unwrap();

        let hex = k.to_hex();
        let expected = dir.path().join(&hex[..2]).join(&hex[2..]);
        assert!(expected.is_file());
    }

    #[test]
    fn second_put_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::open(dir.path()).unwrap();
        let k = key(b"twice");
        store.put(&k, b"twice").unwrap();
        store.put(&k, b"twice").unwrap();
        assert_eq!(store.keys().unwrap(), vec![k]);
    }

    #[test]
    fn get_missing_returns_none() {
        let dir = TempDir::new().unwrap();
        let store = FsStore::open(dir.path()).unwrap();
        assert!(store.get(&key(b"nope")).unwrap().is_none());
    }

    #[test]
    fn keys_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let k1 = key(b"one");
        let k2 = key(b"two");
        {
            let store = FsStore::open(dir.path()).unwrap();
            store.put(&k1, b"one").unwrap();
            store.put(&k2, b"two").unwrap();
        }
        let reopened = FsStore::open(dir.path()).unwrap();
        let mut expected = vec![k1, k2];
        expected.sort();
        assert_eq!(reopened.keys().unwrap(), expected);
    }

    #[test]
    fn concurrent_writers_of_same_key() {
        use std::thread;

        let dir = TempDir::new().unwrap();
        let store = FsStore::open(dir.path()).unwrap();
        let k = key(b"raced");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || store.put(&k, b"raced").unwrap())
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }

        assert_eq!(store.get(&k).unwrap().unwrap(), b"raced");
        assert_eq!(store.keys().unwrap().len(), 1);
    }
}
