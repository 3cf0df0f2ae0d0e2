use serde::{Deserialize, Serialize};
use sha2::Digest as _;

use mdag_types::Digest;

/// Stateful content hasher.
///
/// Mirrors the classic accumulator interface: [`reset`](Self::reset) clears
/// all state, [`write`](Self::write) feeds bytes, [`sum`](Self::sum) reads the
/// digest of everything written since the last reset without consuming it.
///
/// Callers computing an independent digest should use
/// [`digest`](Self::digest), which always resets first.
pub trait ContentHasher {
    /// Discard all accumulated input.
    fn reset(&mut self);

    /// Feed bytes into the running computation.
    fn write(&mut self, data: &[u8]);

    /// Digest of all input written since the last reset.
    fn sum(&self) -> Digest;

    /// Digest of exactly `data`, independent of any earlier input.
    fn digest(&mut self, data: &[u8]) -> Digest {
        self.reset();
        self.write(data);
        self.sum()
    }
}

impl<H: ContentHasher + ?Sized> ContentHasher for Box<H> {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn write(&mut self, data: &[u8]) {
        (**self).write(data)
    }

    fn sum(&self) -> Digest {
        (**self).sum()
    }

    fn digest(&mut self, data: &[u8]) -> Digest {
        (**self).digest(data)
    }
}

/// BLAKE3 content hasher.
#[derive(Clone, Debug, Default)]
pub struct Blake3Hasher {
    inner: blake3::Hasher,
}

impl Blake3Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentHasher for Blake3Hasher {
    fn reset(&mut self) {
        self.inner.reset();
    }

    fn write(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    fn sum(&self) -> Digest {
        Digest::from_hash(*self.inner.finalize().as_bytes())
    }
}

/// SHA-256 content hasher.
#[derive(Clone, Default)]
pub struct Sha256Hasher {
    inner: sha2::Sha256,
}

impl Sha256Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for Sha256Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sha256Hasher").finish_non_exhaustive()
    }
}

impl ContentHasher for Sha256Hasher {
    fn reset(&mut self) {
        sha2::Digest::reset(&mut self.inner);
    }

    fn write(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    fn sum(&self) -> Digest {
        let out = self.inner.clone().finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&out);
        Digest::from_hash(hash)
    }
}

/// Selectable hash function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Blake3,
    Sha256,
}

impl HashAlgorithm {
    /// A fresh hasher for this algorithm.
    pub fn hasher(&self) -> Box<dyn ContentHasher> {
        match self {
            Self::Blake3 => Box::new(Blake3Hasher::new()),
            Self::Sha256 => Box::new(Sha256Hasher::new()),
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blake3 => write!(f, "blake3"),
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}
