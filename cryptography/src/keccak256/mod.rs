//! Keccak-256 implementation of the `Hasher` trait.
//!
//! This is the original Keccak submission (as used by Ethereum), not the finalized NIST SHA3-256.
//! Commitments built with it can be checked by contracts using the `keccak256` builtin.
//!
//! # Example
//! ```rust
//! use merkleme_cryptography::{Hasher, Keccak256};
//!
//! // Create a new Keccak-256 hasher
//! let mut hasher = Keccak256::new();
//!
//! // Update the hasher with some messages
//! hasher.update(b"hello,");
//! hasher.update(b"world!");
//!
//! // Finalize the hasher to get the digest
//! let digest = hasher.finalize();
//!
//! // Print the digest
//! println!("digest: {:?}", digest);
//! ```

use crate::{Error, Hasher};
use merkleme_utils::hex_prefixed;
use rand::{CryptoRng, RngCore};
use sha3::{Digest as _, Keccak256 as IKeccak256};
use std::{
    fmt::{Debug, Display},
    ops::Deref,
};

const DIGEST_LENGTH: usize = 32;

/// Generate a Keccak-256 digest from a message.
pub fn hash(message: &[u8]) -> Digest {
    let array: [u8; DIGEST_LENGTH] = IKeccak256::digest(message).into();
    Digest::from(array)
}

/// Keccak-256 hasher.
#[derive(Debug)]
pub struct Keccak256 {
    hasher: IKeccak256,
}

impl Default for Keccak256 {
    fn default() -> Self {
        <Self as Hasher>::new()
    }
}

impl Clone for Keccak256 {
    fn clone(&self) -> Self {
        // We manually implement `Clone` to avoid cloning the hasher state.
        Self::default()
    }
}

impl Hasher for Keccak256 {
    type Digest = Digest;

    fn new() -> Self {
        Self {
            hasher: IKeccak256::new(),
        }
    }

    fn update(&mut self, message: &[u8]) {
        self.hasher.update(message);
    }

    fn finalize(&mut self) -> Self::Digest {
        let finalized = self.hasher.finalize_reset();
        let array: [u8; DIGEST_LENGTH] = finalized.into();
        Self::Digest::from(array)
    }

    fn reset(&mut self) {
        self.hasher = IKeccak256::new();
    }
}

/// Digest of a Keccak-256 hashing operation.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Digest([u8; DIGEST_LENGTH]);

impl From<[u8; DIGEST_LENGTH]> for Digest {
    fn from(value: [u8; DIGEST_LENGTH]) -> Self {
        Self(value)
    }
}

impl TryFrom<&[u8]> for Digest {
    type Error = Error;
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let array: [u8; DIGEST_LENGTH] =
            value.try_into().map_err(|_| Error::InvalidDigestLength)?;
        Ok(Self(array))
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Deref for Digest {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex_prefixed(&self.0))
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex_prefixed(&self.0))
    }
}

impl crate::Digest for Digest {
    const SIZE: usize = DIGEST_LENGTH;

    fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut array = [0u8; DIGEST_LENGTH];
        rng.fill_bytes(&mut array);
        Self(array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Digest as _;
    use merkleme_utils::hex;

    const HELLO_DIGEST: &str = "47173285a8d7341e5e972fc677286384f802f8ef42a5ec5f03bbfa254cb01fad";
    const EMPTY_DIGEST: &str = "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470";

    #[test]
    fn test_keccak256() {
        let msg = b"hello world";

        // Generate initial hash
        let mut hasher = Keccak256::new();
        hasher.update(msg);
        let digest = hasher.finalize();
        assert!(Digest::try_from(digest.as_ref()).is_ok());
        assert_eq!(hex(digest.as_ref()), HELLO_DIGEST);

        // Reuse hasher
        hasher.update(msg);
        let digest = hasher.finalize();
        assert_eq!(hex(digest.as_ref()), HELLO_DIGEST);

        // Test simple hasher
        let hash = hash(msg);
        assert_eq!(hex(hash.as_ref()), HELLO_DIGEST);
    }

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(hex(&Keccak256::empty()), EMPTY_DIGEST);
    }

    #[test]
    fn test_keccak256_len() {
        assert_eq!(Digest::SIZE, DIGEST_LENGTH);
    }

    #[test]
    fn test_display_is_prefixed() {
        let digest = hash(b"hello world");
        assert_eq!(format!("{}", digest), format!("0x{}", HELLO_DIGEST));
        assert_eq!(format!("{:?}", digest), format!("0x{}", HELLO_DIGEST));
    }

    #[test]
    fn test_ordering_is_bytewise() {
        let low = Digest::from([0u8; DIGEST_LENGTH]);
        let mut high = [0u8; DIGEST_LENGTH];
        high[0] = 1;
        let high = Digest::from(high);
        let mut last = [0u8; DIGEST_LENGTH];
        last[DIGEST_LENGTH - 1] = 0xff;
        let last = Digest::from(last);
        assert!(low < last);
        assert!(last < high);
    }
}
