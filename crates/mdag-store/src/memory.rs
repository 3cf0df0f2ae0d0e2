use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use mdag_types::Digest;

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;

/// Call counters for an [`InMemoryStore`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of `has` calls.
    pub has_calls: u64,
    /// Number of `put` calls.
    pub put_calls: u64,
    /// Number of `put` calls that found the key already present.
    pub redundant_puts: u64,
}

/// In-memory, HashMap-based key-value store.
///
/// Intended for tests and embedding. Values are held behind a `RwLock` for
/// safe concurrent access and cloned on read. Every call is counted so tests
/// can assert on the dedup behaviour of a build.
pub struct InMemoryStore {
    entries: RwLock<HashMap<Digest, Vec<u8>>>,
    has_calls: AtomicU64,
    put_calls: AtomicU64,
    redundant_puts: AtomicU64,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            has_calls: AtomicU64::new(0),
            put_calls: AtomicU64::new(0),
            redundant_puts: AtomicU64::new(0),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total bytes across all stored values.
    pub fn total_bytes(&self) -> u64 {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|v| v.len() as u64)
            .sum()
    }

    /// Sorted list of all stored keys.
    pub fn keys(&self) -> Vec<Digest> {
        let map = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<Digest> = map.keys().copied().collect();
        keys.sort();
        keys
    }

    /// Snapshot of the call counters.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            has_calls: self.has_calls.load(Ordering::Relaxed),
            put_calls: self.put_calls.load(Ordering::Relaxed),
            redundant_puts: self.redundant_puts.load(Ordering::Relaxed),
        }
    }

    /// Remove all entries and reset the counters.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.has_calls.store(0, Ordering::Relaxed);
        self.put_calls.store(0, Ordering::Relaxed);
        self.redundant_puts.store(0, Ordering::Relaxed);
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for InMemoryStore {
    fn has(&self, key: &Digest) -> StoreResult<bool> {
        self.has_calls.fetch_add(1, Ordering::Relaxed);
        let map = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.contains_key(key))
    }

    fn put(&self, key: &Digest, value: &[u8]) -> StoreResult<()> {
        self.put_calls.fetch_add(1, Ordering::Relaxed);
        let mut map = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        // Content addressing guarantees an existing key already maps to the
        // same value.
        if map.contains_key(key) {
            self.redundant_puts.fetch_add(1, Ordering::Relaxed);
        } else {
            map.insert(*key, value.to_vec());
        }
        Ok(())
    }

    fn get(&self, key: &Digest) -> StoreResult<Option<Vec<u8>>> {
        let map = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(key).cloned())
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("entry_count", &self.len())
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdag_crypto::{Blake3Hasher, ContentHasher};

    fn key(content: &[u8]) -> Digest {
        Blake3Hasher::new().digest(content)
    }

    // -----------------------------------------------------------------------
    // Core operations
    // -----------------------------------------------------------------------

    #[test]
    fn put_and_get() {
        let store = InMemoryStore::new();
        let k = key(b"hello world");
        store.put(&k, b"hello world").unwrap();
        assert_eq!(store.get(&k).unwrap().as_deref(), Some(&b"hello world"[..]));
    }

    #[test]
    fn has_for_missing_and_present() {
        let store = InMemoryStore::new();
        let k = key(b"present");
        assert!(!store.has(&k).unwrap());
        store.put(&k, b"present").unwrap();
        assert!(store.has(&k).unwrap());
    }

    #[test]
    fn get_missing_returns_none() {
        let store = InMemoryStore::new();
        assert!(store.get(&key(b"missing")).unwrap().is_none());
    }

    // -----------------------------------------------------------------------
    // Idempotency and counters
    // -----------------------------------------------------------------------

    #[test]
    fn put_is_idempotent() {
        let store = InMemoryStore::new();
        let k = key(b"same");
        store.put(&k, b"same").unwrap();
        store.put(&k, b"same").unwrap();
        assert_eq!(store.len(), 1);

        let stats = store.stats();
        assert_eq!(stats.put_calls, 2);
        assert_eq!(stats.redundant_puts, 1);
    }

    #[test]
    fn has_calls_are_counted() {
        let store = InMemoryStore::new();
        let k = key(b"x");
        store.has(&k).unwrap();
        store.has(&k).unwrap();
        assert_eq!(store.stats().has_calls, 2);
        assert_eq!(store.stats().put_calls, 0);
    }

    // -----------------------------------------------------------------------
    // Utility methods
    // -----------------------------------------------------------------------

    #[test]
    fn len_total_bytes_and_clear() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());
        store.put(&key(b"12345"), b"12345").unwrap();
        store.put(&key(b"123456789"), b"123456789").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.total_bytes(), 14);

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.stats(), StoreStats::default());
    }

    #[test]
    fn keys_are_sorted() {
        let store = InMemoryStore::new();
        for content in [&b"aaa"[..], b"bbb", b"ccc"] {
            store.put(&key(content), content).unwrap();
        }
        let keys = store.keys();
        assert_eq!(keys.len(), 3);
        for w in keys.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn shared_through_arc_across_threads() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let k = key(b"shared data");
                    if !store.has(&k).unwrap() {
                        store.put(&k, b"shared data").unwrap();
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread should not panic");
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn debug_format() {
        let store = InMemoryStore::new();
        store.put(&key(b"x"), b"x").unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryStore"));
        assert!(debug.contains("entry_count"));
    }
}
