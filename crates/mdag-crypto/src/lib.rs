//! Content hashing for mdag.
//!
//! Every key in an mdag store is produced by a [`ContentHasher`]. The trait
//! keeps the reset/write/sum shape of a streaming digest but exposes
//! [`ContentHasher::digest`] as the one-shot entry point, which resets before
//! hashing so no computation sees input left over from a previous one.
//!
//! All hashers wrap established libraries; there is no custom cryptography.

pub mod hasher;

pub use hasher::{Blake3Hasher, ContentHasher, HashAlgorithm, Sha256Hasher};
