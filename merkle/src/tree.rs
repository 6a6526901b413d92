//! Build a sorted-pair Merkle tree from raw member values and generate inclusion proofs.

use crate::{hasher::Standard, summary::LeafEntry, Commitment, Error, Proof};
use merkleme_cryptography::Hasher;
use merkleme_utils::hex_prefixed;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How to handle the last node of a layer with an odd number of nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Odd {
    /// Pair the last node with itself.
    #[default]
    Duplicate,
    /// Carry the last node to the next layer unchanged (what `merkletreejs` does unless
    /// `duplicateOdd` is set).
    Promote,
}

/// Accumulates raw member values and builds a [Tree] over them.
pub struct Builder<H: Hasher> {
    hasher: H,
    odd: Odd,
    leaves: Vec<(H::Digest, Vec<u8>, usize)>,
}

impl<H: Hasher> Builder<H> {
    /// Create a new [Builder] with room for `leaves` members.
    pub fn new(leaves: usize) -> Self {
        Self {
            hasher: H::new(),
            odd: Odd::default(),
            leaves: Vec::with_capacity(leaves),
        }
    }

    /// Set how the last node of an odd layer is handled.
    pub fn odd(mut self, odd: Odd) -> Self {
        self.odd = odd;
        self
    }

    /// Hash and record a member value. Values may be added in any order.
    pub fn add(&mut self, value: &[u8]) {
        let digest = Standard::new(&mut self.hasher).leaf_digest(value);
        let input = self.leaves.len();
        self.leaves.push((digest, value.to_vec(), input));
    }

    /// Build the tree.
    ///
    /// # Errors
    ///
    /// Returns [Error::Empty] if no values were added and [Error::HashCollision] if two distinct
    /// values produced the same leaf digest.
    pub fn build(self) -> Result<Tree<H>, Error> {
        let Self {
            mut hasher,
            odd,
            mut leaves,
        } = self;
        if leaves.is_empty() {
            return Err(Error::Empty);
        }

        // Sort by digest, breaking ties by value so repeated members end up adjacent.
        leaves.sort_unstable_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        for pair in leaves.windows(2) {
            if pair[0].0 == pair[1].0 && pair[0].1 != pair[1].1 {
                return Err(Error::HashCollision(hex_prefixed(pair[0].0.as_ref())));
            }
        }

        let mut digests = Vec::with_capacity(leaves.len());
        let mut values = Vec::with_capacity(leaves.len());
        let mut inputs = Vec::with_capacity(leaves.len());
        for (digest, value, input) in leaves {
            digests.push(digest);
            values.push(value);
            inputs.push(input);
        }

        // Hash pairs until a single digest remains.
        let mut standard = Standard::new(&mut hasher);
        let mut layers = vec![digests];
        loop {
            let current = &layers[layers.len() - 1];
            if current.len() == 1 {
                break;
            }
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for chunk in current.chunks(2) {
                match (chunk, odd) {
                    ([left, right], _) => next.push(standard.node_digest(left, right)),
                    ([last], Odd::Duplicate) => next.push(standard.node_digest(last, last)),
                    ([last], Odd::Promote) => next.push(*last),
                    _ => unreachable!("chunks hold one or two digests"),
                }
            }
            layers.push(next);
        }

        let tree = Tree {
            odd,
            values,
            inputs,
            layers,
        };
        debug!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            root = %tree.root(),
            "built tree"
        );
        Ok(tree)
    }
}

/// An immutable sorted-pair Merkle tree.
///
/// A [Tree] is read-only once built and can be shared across threads to generate proofs
/// concurrently.
#[derive(Clone, Debug)]
pub struct Tree<H: Hasher> {
    odd: Odd,

    // Raw member values, in layer 0 order.
    values: Vec<Vec<u8>>,

    // The position at which each layer 0 leaf was supplied to the builder.
    inputs: Vec<usize>,

    // Layer 0 holds the sorted leaf digests, the last layer holds only the root.
    layers: Vec<Vec<H::Digest>>,
}

impl<H: Hasher> Tree<H> {
    /// Build a tree over `values` with the default [Odd::Duplicate] policy.
    pub fn new<I, V>(values: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = V>,
        V: AsRef<[u8]>,
    {
        Self::with_odd(values, Odd::default())
    }

    /// Build a tree over `values` with the given [Odd] policy.
    pub fn with_odd<I, V>(values: I, odd: Odd) -> Result<Self, Error>
    where
        I: IntoIterator<Item = V>,
        V: AsRef<[u8]>,
    {
        let values = values.into_iter();
        let mut builder = Builder::<H>::new(values.size_hint().0).odd(odd);
        for value in values {
            builder.add(value.as_ref());
        }
        builder.build()
    }

    /// Return the root digest.
    pub fn root(&self) -> H::Digest {
        // A built tree always has at least one layer with exactly one node at the top.
        self.layers[self.layers.len() - 1][0]
    }

    /// Return the number of leaves (including repeated members).
    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    /// Return the number of layers, including the leaves and the root.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Return the number of layers above the leaves (0 for a single leaf).
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Return the [Odd] policy the tree was built with.
    pub fn odd_policy(&self) -> Odd {
        self.odd
    }

    /// Return the sorted leaf digests.
    pub fn leaves(&self) -> &[H::Digest] {
        &self.layers[0]
    }

    /// Return the digests of a layer, if it exists.
    pub fn layer(&self, layer: usize) -> Option<&[H::Digest]> {
        self.layers.get(layer).map(Vec::as_slice)
    }

    /// Return the digest of the node at `index` within `layer`, if it exists.
    pub fn node(&self, layer: usize, index: usize) -> Option<H::Digest> {
        self.layers.get(layer)?.get(index).copied()
    }

    /// Return the raw member value of the leaf at `index`, if it exists.
    pub fn value(&self, index: usize) -> Option<&[u8]> {
        self.values.get(index).map(Vec::as_slice)
    }

    /// Return the index of a leaf digest in layer 0, if present.
    ///
    /// If a member was supplied more than once, any one of its indices may be returned.
    pub fn leaf_index(&self, digest: &H::Digest) -> Option<usize> {
        self.layers[0].binary_search(digest).ok()
    }

    /// Generate an inclusion proof for a raw member value.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if `value` is not a member.
    pub fn prove(&self, value: &[u8]) -> Result<Proof<H::Digest>, Error> {
        let digest = H::hash(value);
        let index = self.leaf_index(&digest).ok_or(Error::NotFound)?;
        self.prove_index(index)
    }

    /// Generate an inclusion proof for the leaf at `index` in layer 0.
    ///
    /// # Errors
    ///
    /// Returns [Error::IndexOutOfBounds] if `index` is not less than the leaf count.
    pub fn prove_index(&self, index: usize) -> Result<Proof<H::Digest>, Error> {
        let leaf_hash = self
            .node(0, index)
            .ok_or(Error::IndexOutOfBounds(index))?;
        let leaf_value = self.values[index].clone();

        // Walk up to (but excluding) the root layer, collecting the sibling at each step.
        let mut siblings = Vec::with_capacity(self.depth());
        let mut position = index;
        for layer in &self.layers[..self.depth()] {
            let sibling = if position % 2 == 1 {
                Some(&layer[position - 1])
            } else {
                match (layer.get(position + 1), self.odd) {
                    (Some(right), _) => Some(right),
                    (None, Odd::Duplicate) => Some(&layer[position]),
                    (None, Odd::Promote) => None,
                }
            };
            if let Some(sibling) = sibling {
                siblings.push(*sibling);
            }
            position /= 2;
        }

        Ok(Proof {
            leaf_value,
            leaf_hash,
            siblings,
        })
    }

    /// Return the root as a publishable [Commitment].
    pub fn commitment(&self) -> Commitment {
        Commitment::new(&self.root())
    }

    /// Return each member and its leaf digest, in the order members were supplied.
    pub fn summary(&self) -> Vec<LeafEntry> {
        let mut entries = vec![None; self.leaf_count()];
        for (index, input) in self.inputs.iter().enumerate() {
            entries[*input] = Some(LeafEntry::new(&self.values[index], &self.layers[0][index]));
        }
        entries.into_iter().flatten().collect()
    }
}
