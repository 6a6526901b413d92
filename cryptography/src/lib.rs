//! Hash arbitrary messages into fixed-size digests.
//!
//! Merkle primitives in this workspace are not hardcoded to a specific hash function. Keccak-256
//! is the default because commitments are most often checked by EVM contracts, but any [Hasher]
//! producing a [Digest] may be used.

use rand::{CryptoRng, RngCore};
use std::{
    fmt::{Debug, Display},
    hash::Hash,
    ops::Deref,
};
use thiserror::Error;

pub mod keccak256;
pub use keccak256::Keccak256;
pub mod sha256;
pub use sha256::Sha256;

/// Errors that can occur when interacting with cryptographic primitives.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("invalid digest length")]
    InvalidDigestLength,
}

/// A fixed-size output of a [Hasher].
///
/// Digests are totally ordered by their bytes (lexicographic), which is the order used when
/// sorting leaves and sibling pairs.
pub trait Digest:
    Copy
    + Send
    + Sync
    + 'static
    + Eq
    + Ord
    + Hash
    + Debug
    + Display
    + AsRef<[u8]>
    + Deref<Target = [u8]>
    + for<'a> TryFrom<&'a [u8], Error = Error>
{
    /// Length of the digest in bytes.
    const SIZE: usize;

    /// Generate a random [Digest].
    ///
    /// # Warning
    ///
    /// This function is typically used for testing and is not recommended
    /// for production use.
    fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self;
}

/// Interface that merkleme crates rely on for hashing.
///
/// This trait is required to implement the `Clone` trait because it is often
/// part of a struct that is cloned. In practice, implementations do not actually
/// clone the hasher state but users should not rely on this behavior and call `reset`
/// after cloning.
pub trait Hasher: Clone + Send + Sync + 'static {
    /// Digest generated by the hasher.
    type Digest: Digest;

    /// Create a new hasher.
    fn new() -> Self;

    /// Append message to previously recorded data.
    fn update(&mut self, message: &[u8]);

    /// Hash all recorded data and reset the hasher
    /// to the initial state.
    fn finalize(&mut self) -> Self::Digest;

    /// Reset the hasher without generating a hash.
    ///
    /// This function does not need to be called after `finalize`.
    fn reset(&mut self);

    /// Return result of hashing nothing.
    fn empty() -> Self::Digest {
        Self::new().finalize()
    }

    /// Hash a single message with a fresh hasher.
    fn hash(message: &[u8]) -> Self::Digest {
        let mut hasher = Self::new();
        hasher.update(message);
        hasher.finalize()
    }
}
