//! Decorator for a cryptographic hasher that implements the sorted-pair hashing logic.

use merkleme_cryptography::Hasher as CHasher;

/// The standard hasher to use with a sorted-pair tree for computing leaf and node digests.
///
/// Leaves are hashed from their raw bytes with no domain separation, and nodes from the
/// concatenation of their two children in ascending order. This matches what EVM verifiers (e.g.
/// OpenZeppelin's `MerkleProof`) recompute on-chain.
pub struct Standard<'a, H: CHasher> {
    hasher: &'a mut H,
}

impl<'a, H: CHasher> Standard<'a, H> {
    /// Creates a new [Standard] hasher.
    pub fn new(hasher: &'a mut H) -> Self {
        Self { hasher }
    }

    /// Computes the digest of a leaf from the raw member value it represents.
    pub fn leaf_digest(&mut self, element: &[u8]) -> H::Digest {
        self.hasher.update(element);
        self.hasher.finalize()
    }

    /// Computes the digest of a node given the digests of its children, in either order.
    pub fn node_digest(&mut self, a: &H::Digest, b: &H::Digest) -> H::Digest {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        self.hasher.update(first.as_ref());
        self.hasher.update(second.as_ref());
        self.hasher.finalize()
    }

    /// Access the inner [CHasher] hasher.
    pub fn inner(&mut self) -> &mut H {
        self.hasher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use merkleme_cryptography::{Digest as _, Keccak256, Sha256};
    use merkleme_utils::union;
    use rand::{rngs::StdRng, SeedableRng};

    fn test_node_digest_is_symmetric<H: CHasher>() {
        let mut rng = StdRng::seed_from_u64(0);
        let a = H::Digest::random(&mut rng);
        let b = H::Digest::random(&mut rng);

        let mut hasher = H::new();
        let mut standard = Standard::new(&mut hasher);
        let ab = standard.node_digest(&a, &b);
        let ba = standard.node_digest(&b, &a);
        assert_eq!(ab, ba);

        // The smaller digest is hashed first
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        assert_eq!(ab, H::hash(&union(low.as_ref(), high.as_ref())));
        assert_ne!(ab, H::hash(&union(high.as_ref(), low.as_ref())));
    }

    fn test_leaf_digest_is_plain_hash<H: CHasher>() {
        let mut hasher = H::new();
        let mut standard = Standard::new(&mut hasher);
        assert_eq!(standard.leaf_digest(b"alice"), H::hash(b"alice"));

        // The inner hasher is left reset
        standard.inner().update(b"bob");
        assert_eq!(standard.inner().finalize(), H::hash(b"bob"));
    }

    #[test]
    fn test_standard_keccak256() {
        test_node_digest_is_symmetric::<Keccak256>();
        test_leaf_digest_is_plain_hash::<Keccak256>();
    }

    #[test]
    fn test_standard_sha256() {
        test_node_digest_is_symmetric::<Sha256>();
        test_leaf_digest_is_plain_hash::<Sha256>();
    }

    #[test]
    fn test_node_digest_of_duplicate() {
        let leaf = Keccak256::hash(b"carol");
        let mut hasher = Keccak256::new();
        let mut standard = Standard::new(&mut hasher);
        assert_eq!(
            standard.node_digest(&leaf, &leaf),
            Keccak256::hash(&union(leaf.as_ref(), leaf.as_ref()))
        );
    }
}
