//! Verify inclusion proofs against a root and convert them to and from their hex form.

use crate::{hasher::Standard, summary::display, Error};
use merkleme_cryptography::{Digest, Hasher};
use merkleme_utils::{from_hex_formatted, hex_prefixed};
use serde::{Deserialize, Serialize};

/// The maximum number of siblings a proof can carry.
///
/// A tree over at most `usize::MAX` leaves is never more than this many layers deep.
pub const MAX_DEPTH: usize = usize::BITS as usize;

/// An inclusion proof for a single member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof<D: Digest> {
    /// The raw member value the proof was generated for.
    pub leaf_value: Vec<u8>,
    /// The leaf digest of `leaf_value`.
    pub leaf_hash: D,
    /// Sibling digests ordered from the leaf layer towards the root.
    pub siblings: Vec<D>,
}

impl<D: Digest> Proof<D> {
    /// Return true if `value` is included in the tree with the given `root`.
    ///
    /// The leaf digest is recomputed from `value` (the `leaf_hash` carried by the proof is not
    /// trusted).
    ///
    /// # Errors
    ///
    /// Returns [Error::MalformedProof] if the proof has more than [MAX_DEPTH] siblings.
    pub fn verify<H: Hasher<Digest = D>>(
        &self,
        hasher: &mut H,
        value: &[u8],
        root: &D,
    ) -> Result<bool, Error> {
        verify(hasher, value, &self.siblings, root)
    }

    /// Like [Proof::verify], but also requires the proof to have exactly `depth` siblings (the
    /// depth of a tree built with [crate::Odd::Duplicate]).
    pub fn verify_with_depth<H: Hasher<Digest = D>>(
        &self,
        hasher: &mut H,
        value: &[u8],
        root: &D,
        depth: usize,
    ) -> Result<bool, Error> {
        if self.siblings.len() != depth {
            return Err(Error::MalformedProof("sibling count does not match depth"));
        }
        self.verify(hasher, value, root)
    }
}

/// Fold `siblings` into the leaf digest of `value` and compare the result with `root`.
///
/// Each step hashes the sorted pair of the accumulated digest and the next sibling, so no
/// position information is needed.
///
/// # Errors
///
/// Returns [Error::MalformedProof] if there are more than [MAX_DEPTH] siblings.
pub fn verify<H: Hasher>(
    hasher: &mut H,
    value: &[u8],
    siblings: &[H::Digest],
    root: &H::Digest,
) -> Result<bool, Error> {
    if siblings.len() > MAX_DEPTH {
        return Err(Error::MalformedProof("too many siblings"));
    }

    let mut standard = Standard::new(hasher);
    let mut digest = standard.leaf_digest(value);
    for sibling in siblings {
        digest = standard.node_digest(&digest, sibling);
    }
    Ok(digest == *root)
}

/// Parse a hex digest, with or without a `0x` prefix.
///
/// # Errors
///
/// Returns [Error::MalformedProof] if `hex` is not valid hex or decodes to the wrong length.
pub fn parse_digest<D: Digest>(hex: &str) -> Result<D, Error> {
    let bytes = from_hex_formatted(hex).ok_or(Error::MalformedProof("invalid hex"))?;
    Ok(D::try_from(bytes.as_slice())?)
}

/// A [Proof] with every field rendered as a string, for exchange with external verifiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HexProof {
    /// The member value (as UTF-8 when possible, otherwise `0x`-prefixed hex).
    pub leaf_value: String,
    /// The raw member bytes as `0x`-prefixed hex.
    pub leaf_hex: String,
    /// The leaf digest as `0x`-prefixed hex.
    pub leaf_hash: String,
    /// Sibling digests as `0x`-prefixed hex, ordered from the leaf layer towards the root.
    pub proof: Vec<String>,
}

impl<D: Digest> From<&Proof<D>> for HexProof {
    fn from(proof: &Proof<D>) -> Self {
        Self {
            leaf_value: display(&proof.leaf_value),
            leaf_hex: hex_prefixed(&proof.leaf_value),
            leaf_hash: hex_prefixed(proof.leaf_hash.as_ref()),
            proof: proof
                .siblings
                .iter()
                .map(|sibling| hex_prefixed(sibling.as_ref()))
                .collect(),
        }
    }
}

impl HexProof {
    /// Decode into a [Proof] over the digests of `H`.
    ///
    /// # Errors
    ///
    /// Returns [Error::MalformedProof] if any field is not valid hex, any digest has the wrong
    /// length, there are more than [MAX_DEPTH] siblings, or `leaf_hash` is not the digest of the
    /// bytes in `leaf_hex`.
    pub fn decode<H: Hasher>(&self) -> Result<Proof<H::Digest>, Error> {
        if self.proof.len() > MAX_DEPTH {
            return Err(Error::MalformedProof("too many siblings"));
        }
        let leaf_value =
            from_hex_formatted(&self.leaf_hex).ok_or(Error::MalformedProof("invalid hex"))?;
        let leaf_hash: H::Digest = parse_digest(&self.leaf_hash)?;
        let siblings = self
            .proof
            .iter()
            .map(|sibling| parse_digest(sibling))
            .collect::<Result<Vec<H::Digest>, Error>>()?;
        if H::hash(&leaf_value) != leaf_hash {
            return Err(Error::MalformedProof("leaf hash does not match leaf"));
        }
        Ok(Proof {
            leaf_value,
            leaf_hash,
            siblings,
        })
    }
}
