use mdag_types::Digest;

use crate::error::StoreResult;

/// Content-addressed key-value store.
///
/// The DAG builder only ever calls [`has`](Self::has) followed, when the key
/// is absent, by [`put`](Self::put). Implementations must satisfy:
/// - `put` is idempotent: writing the same value under the same key again
///   (possibly from a concurrent builder) leaves the store unchanged.
/// - The store never interprets values. Leaf keys hold raw file bytes while
///   node keys hold serialized objects; the caller knows which is which.
/// - All I/O errors are propagated, never silently ignored.
pub trait KvStore: Send + Sync {
    /// Check whether a key exists.
    fn has(&self, key: &Digest) -> StoreResult<bool>;

    /// Store a value under its content key.
    fn put(&self, key: &Digest, value: &[u8]) -> StoreResult<()>;

    /// Read a value. Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &Digest) -> StoreResult<Option<Vec<u8>>>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn has(&self, key: &Digest) -> StoreResult<bool> {
        (**self).has(key)
    }

    fn put(&self, key: &Digest, value: &[u8]) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn get(&self, key: &Digest) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }
}

impl<S: KvStore + ?Sized> KvStore for std::sync::Arc<S> {
    fn has(&self, key: &Digest) -> StoreResult<bool> {
        (**self).has(key)
    }

    fn put(&self, key: &Digest, value: &[u8]) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn get(&self, key: &Digest) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }
}
