//! Publishable descriptions of a built tree.
//!
//! A [Commitment] is what a verifier needs (the root). A [Summary] additionally maps every member
//! to its leaf digest so that anyone holding the member list can audit the commitment.

use crate::Tree;
use merkleme_cryptography::Hasher;
use merkleme_utils::hex_prefixed;
use serde::{Deserialize, Serialize};

/// Render a raw member value for humans: as-is when it is UTF-8, otherwise `0x`-prefixed hex.
pub(crate) fn display(value: &[u8]) -> String {
    match std::str::from_utf8(value) {
        Ok(value) => value.to_string(),
        Err(_) => hex_prefixed(value),
    }
}

/// The root of a tree, as `0x`-prefixed hex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commitment {
    pub root_hash: String,
}

impl Commitment {
    pub fn new(root: &impl AsRef<[u8]>) -> Self {
        Self {
            root_hash: hex_prefixed(root.as_ref()),
        }
    }
}

/// A member and its leaf digest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafEntry {
    #[serde(rename = "Leaf")]
    pub leaf: String,
    #[serde(rename = "Hash")]
    pub hash: String,
}

impl LeafEntry {
    pub fn new(value: &[u8], digest: &impl AsRef<[u8]>) -> Self {
        Self {
            leaf: display(value),
            hash: hex_prefixed(digest.as_ref()),
        }
    }
}

/// Everything needed to publish a tree: its shape, root, and member table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub root_hash: String,
    pub leaf_count: usize,
    pub layer_count: usize,
    pub depth: usize,
    pub leaves: Vec<LeafEntry>,
}

impl<H: Hasher> From<&Tree<H>> for Summary {
    fn from(tree: &Tree<H>) -> Self {
        Self {
            root_hash: tree.commitment().root_hash,
            leaf_count: tree.leaf_count(),
            layer_count: tree.layer_count(),
            depth: tree.depth(),
            leaves: tree.summary(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use merkleme_cryptography::Keccak256;

    #[test]
    fn test_display() {
        assert_eq!(display(b"alice"), "alice");
        assert_eq!(display(&[0xff, 0x00]), "0xff00");
        assert_eq!(display(b""), "");
    }

    #[test]
    fn test_leaf_entry_json() {
        let entry = LeafEntry::new(b"alice", &Keccak256::hash(b"alice"));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["Leaf"], "alice");
        assert_eq!(json["Hash"], hex_prefixed(&Keccak256::hash(b"alice")));
    }

    #[test]
    fn test_summary() {
        let tree = Tree::<Keccak256>::new(["carol", "alice", "bob", "dave", "erin"]).unwrap();
        let summary = Summary::from(&tree);
        assert_eq!(summary.leaf_count, 5);
        assert_eq!(summary.layer_count, 4);
        assert_eq!(summary.depth, 3);
        assert_eq!(summary.root_hash, hex_prefixed(&tree.root()));
        assert_eq!(summary.leaves[0].leaf, "carol");

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["rootHash"], summary.root_hash);
        assert_eq!(json["leafCount"], 5);
        assert_eq!(json["leaves"][4]["Leaf"], "erin");

        let commitment = serde_json::to_value(tree.commitment()).unwrap();
        assert_eq!(commitment, serde_json::json!({ "rootHash": summary.root_hash }));
    }
}
