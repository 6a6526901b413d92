//! Commit to a set of members and prove (or disprove) that a value belongs to it.
//!
//! # Terminology
//!
//! The tree is built over the hashes of raw member values (the "leaves"). Leaves are sorted in
//! ascending byte order to form layer 0. Every following layer is built by hashing consecutive
//! pairs of the layer below until a single digest, the "root", remains.
//!
//! Pairs are always hashed in sorted order (the smaller digest first), so the digest of a parent
//! does not depend on which child is on the left. Because leaves and pairs are both sorted, the
//! root is a function of the multiset of members alone, irrespective of the order in which they
//! were supplied. It also means an inclusion proof does not need to carry any position
//! information: a verifier folds the sibling digests into the leaf digest, sorting each pair.
//!
//! When a layer has an odd number of nodes, its last node is paired with itself
//! ([Odd::Duplicate]) unless the tree is configured to carry it to the next layer unchanged
//! ([Odd::Promote]).
//!
//! # Example
//!
//! Three members `a`, `b` and `c`, whose hashes sort as `h(a) < h(b) < h(c)`:
//!
//! ```text
//!    Layer
//!      2                  root
//!                       /      \
//!      1       H(h(a), h(b))   H(h(c), h(c))
//!               /     \          /     \
//!      0      h(a)   h(b)      h(c)   (h(c))
//! ```
//!
//! The proof for `b` is `[h(a), H(h(c), h(c))]`.
//!
//! ```rust
//! use merkleme_cryptography::{Hasher, Keccak256};
//! use merkleme_merkle::Tree;
//!
//! let tree = Tree::<Keccak256>::new(["alice", "bob", "carol"]).unwrap();
//! let proof = tree.prove(b"bob").unwrap();
//! assert!(proof.verify(&mut Keccak256::new(), b"bob", &tree.root()).unwrap());
//! assert!(!proof.verify(&mut Keccak256::new(), b"mallory", &tree.root()).unwrap());
//! ```

use thiserror::Error;

mod hasher;
pub use hasher::Standard;
pub mod proof;
pub use proof::{parse_digest, verify, HexProof, Proof, MAX_DEPTH};
pub mod summary;
pub use summary::{Commitment, LeafEntry, Summary};
pub mod tree;
pub use tree::{Builder, Odd, Tree};

/// Errors that can occur when building, proving against, or verifying a tree.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("no leaves provided")]
    Empty,
    #[error("value does not exist within the list")]
    NotFound,
    #[error("malformed proof: {0}")]
    MalformedProof(&'static str),
    #[error("distinct values hash to the same leaf: {0}")]
    HashCollision(String),
    #[error("leaf index out of bounds: {0}")]
    IndexOutOfBounds(usize),
}

impl From<merkleme_cryptography::Error> for Error {
    fn from(err: merkleme_cryptography::Error) -> Self {
        match err {
            merkleme_cryptography::Error::InvalidDigestLength => {
                Error::MalformedProof("invalid digest length")
            }
        }
    }
}
