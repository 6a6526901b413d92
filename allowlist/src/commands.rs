//! Generate commitments, prove membership, and verify proofs for an allowlist.
//!
//! Every command is a pure function of a [Config] and already-resolved members. Members are kept
//! as supplied in every output (even when [crate::Encoding::Hex] hashes their decoded bytes).

use crate::{encode_all, Config, Error, Hash};
use merkleme_cryptography::{Hasher, Keccak256, Sha256};
use merkleme_merkle::{parse_digest, Commitment, HexProof, Summary, Tree};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::{info, warn};

pub const GENERATE_CMD: &str = "generate";
pub const PROVE_CMD: &str = "prove";
pub const VERIFY_CMD: &str = "verify";

/// File the members are published to.
pub const WHITELIST_FILE: &str = "whitelist.json";

/// File the [Commitment] is published to.
pub const ROOT_FILE: &str = "root.json";

/// File the member table is published to.
pub const SUMMARY_FILE: &str = "summary.json";

/// Result of [prove] for a value that is not a member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Missing {
    pub leaf: String,
    pub error_msg: String,
}

/// Result of [prove].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    Found(HexProof),
    Missing(Missing),
}

/// Result of [verify].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub valid: bool,
}

fn build<H: Hasher, S: AsRef<str>>(config: &Config, members: &[S]) -> Result<Tree<H>, Error> {
    let encoded = encode_all(config.encoding, members)?;
    Ok(Tree::<H>::with_odd(&encoded, config.odd)?)
}

fn summarize<H: Hasher, S: AsRef<str>>(config: &Config, members: &[S]) -> Result<Summary, Error> {
    let tree = build::<H, S>(config, members)?;
    let mut summary = Summary::from(&tree);
    for (entry, member) in summary.leaves.iter_mut().zip(members) {
        entry.leaf = member.as_ref().to_string();
    }
    Ok(summary)
}

/// Build a tree over `members` and return its [Summary].
pub fn generate<S: AsRef<str>>(config: &Config, members: &[S]) -> Result<Summary, Error> {
    let summary = match config.hash {
        Hash::Keccak256 => summarize::<Keccak256, S>(config, members)?,
        Hash::Sha256 => summarize::<Sha256, S>(config, members)?,
    };
    info!(
        root = summary.root_hash.as_str(),
        leaves = summary.leaf_count,
        layers = summary.layer_count,
        depth = summary.depth,
        "generated tree"
    );
    Ok(summary)
}

/// Write the members, the [Commitment], and the member table of `summary` to `directory`.
pub fn publish<S: AsRef<str>>(
    directory: &Path,
    members: &[S],
    summary: &Summary,
) -> Result<(), Error> {
    fs::create_dir_all(directory)?;
    let members: Vec<&str> = members.iter().map(AsRef::as_ref).collect();
    write_json(&directory.join(WHITELIST_FILE), &members)?;
    let commitment = Commitment {
        root_hash: summary.root_hash.clone(),
    };
    write_json(&directory.join(ROOT_FILE), &commitment)?;
    write_json(&directory.join(SUMMARY_FILE), &summary.leaves)?;
    info!(directory = %directory.display(), "published tree");
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), Error> {
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

fn prove_with<H: Hasher, S: AsRef<str>>(
    config: &Config,
    members: &[S],
    value: &[u8],
) -> Result<HexProof, Error> {
    let tree = build::<H, S>(config, members)?;
    let proof = tree.prove(value)?;
    Ok(HexProof::from(&proof))
}

/// Build a tree over `members` and generate a proof that `leaf` is one of them.
///
/// A non-member is reported as [Outcome::Missing] rather than an error.
pub fn prove<S: AsRef<str>>(config: &Config, members: &[S], leaf: &str) -> Result<Outcome, Error> {
    let value = config.encoding.encode(leaf)?;
    let result = match config.hash {
        Hash::Keccak256 => prove_with::<Keccak256, S>(config, members, &value),
        Hash::Sha256 => prove_with::<Sha256, S>(config, members, &value),
    };
    match result {
        Ok(mut proof) => {
            proof.leaf_value = leaf.to_string();
            info!(leaf, siblings = proof.proof.len(), "generated proof");
            Ok(Outcome::Found(proof))
        }
        Err(Error::Merkle(merkleme_merkle::Error::NotFound)) => {
            warn!(leaf, "value does not exist within the list");
            Ok(Outcome::Missing(Missing {
                leaf: leaf.to_string(),
                error_msg: merkleme_merkle::Error::NotFound.to_string(),
            }))
        }
        Err(e) => Err(e),
    }
}

fn verify_with<H: Hasher, S: AsRef<str>>(
    value: &[u8],
    root: &str,
    proof: &[S],
) -> Result<bool, Error> {
    let root = parse_digest::<H::Digest>(root)?;
    let siblings = proof
        .iter()
        .map(|sibling| parse_digest::<H::Digest>(sibling.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(merkleme_merkle::verify(&mut H::new(), value, &siblings, &root)?)
}

/// Check that `leaf` is included under `root` given the hex sibling digests in `proof`.
pub fn verify<S: AsRef<str>>(
    config: &Config,
    leaf: &str,
    root: &str,
    proof: &[S],
) -> Result<Verdict, Error> {
    let value = config.encoding.encode(leaf)?;
    let valid = match config.hash {
        Hash::Keccak256 => verify_with::<Keccak256, S>(&value, root, proof)?,
        Hash::Sha256 => verify_with::<Sha256, S>(&value, root, proof)?,
    };
    info!(leaf, root, valid, "verified proof");
    Ok(Verdict { valid })
}

/// Check a [HexProof] (as printed by [prove]) against `root`.
///
/// Every field of the proof must agree: `leaf_value` must encode to the bytes in `leaf_hex`, and
/// `leaf_hash` must be their digest. Otherwise the proof is rejected as malformed.
pub fn verify_hex(config: &Config, proof: &HexProof, root: &str) -> Result<Verdict, Error> {
    let value = config.encoding.encode(&proof.leaf_value)?;
    let valid = match config.hash {
        Hash::Keccak256 => verify_decoded::<Keccak256>(proof, &value, root)?,
        Hash::Sha256 => verify_decoded::<Sha256>(proof, &value, root)?,
    };
    info!(leaf = proof.leaf_value.as_str(), root, valid, "verified proof");
    Ok(Verdict { valid })
}

fn verify_decoded<H: Hasher>(proof: &HexProof, value: &[u8], root: &str) -> Result<bool, Error> {
    let proof = proof.decode::<H>()?;
    if proof.leaf_value != value {
        return Err(merkleme_merkle::Error::MalformedProof("leaf value does not match leaf").into());
    }
    let root = parse_digest::<H::Digest>(root)?;
    Ok(proof.verify(&mut H::new(), value, &root)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Encoding;
    use merkleme_macros::test_traced;
    use merkleme_merkle::Odd;
    use test_case::test_case;

    const MEMBERS: [&str; 4] = [
        "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4",
        "0xAb8483F64d9C6d1EcF9b849Ae677dD3315835cb2",
        "0x4B20993Bc481177ec7E8f571ceCaE8A9e22C02db",
        "0x78731D3Ca6b7E34aC0F824c42a7cC18A495cabaB",
    ];

    fn config(hash: Hash, encoding: Encoding, odd: Odd) -> Config {
        Config {
            hash,
            encoding,
            odd,
            ..Default::default()
        }
    }

    #[test_traced]
    fn test_generate_hex_addresses() {
        let config = config(Hash::Keccak256, Encoding::Hex, Odd::Duplicate);
        let summary = generate(&config, &MEMBERS).unwrap();
        assert_eq!(
            summary.root_hash,
            "0x72066fb8c1630aa899ff153c790564a027aa1d8dafb1ea26e35eabb5f8b1c684"
        );
        assert_eq!(summary.leaf_count, 4);
        assert_eq!(summary.depth, 2);

        // Members are reported as supplied.
        assert_eq!(summary.leaves[0].leaf, MEMBERS[0]);
        assert_eq!(
            summary.leaves[0].hash,
            "0x5931b4ed56ace4c46b68524cb5bcbf4195f1bbaacbe5228fbd090546c88dd229"
        );
    }

    #[test]
    fn test_generate_utf8_addresses() {
        let config = Config::default();
        let summary = generate(&config, &MEMBERS).unwrap();
        assert_eq!(
            summary.root_hash,
            "0xa5443f859afffa3aea9d37d9ea365de2365c9e0c94d80a322317dc0ac52418cf"
        );
    }

    #[test]
    fn test_generate_errors() {
        let config = Config::default();
        let empty: [&str; 0] = [];
        assert!(matches!(
            generate(&config, &empty),
            Err(Error::Merkle(merkleme_merkle::Error::Empty))
        ));

        let config = config_hex();
        assert!(matches!(
            generate(&config, &["0x01", "carol"]),
            Err(Error::InvalidMember(_))
        ));
    }

    fn config_hex() -> Config {
        config(Hash::Keccak256, Encoding::Hex, Odd::Duplicate)
    }

    #[test_case(Hash::Keccak256, Encoding::Hex, Odd::Duplicate; "keccak hex duplicate")]
    #[test_case(Hash::Keccak256, Encoding::Utf8, Odd::Promote; "keccak utf8 promote")]
    #[test_case(Hash::Sha256, Encoding::Utf8, Odd::Duplicate; "sha256 utf8 duplicate")]
    #[test_case(Hash::Sha256, Encoding::Hex, Odd::Promote; "sha256 hex promote")]
    fn test_prove_then_verify(hash: Hash, encoding: Encoding, odd: Odd) {
        let config = config(hash, encoding, odd);
        let members = &MEMBERS[..3];
        let summary = generate(&config, members).unwrap();
        for member in members {
            let proof = match prove(&config, members, member).unwrap() {
                Outcome::Found(proof) => proof,
                Outcome::Missing(missing) => panic!("missing {}", missing.leaf),
            };
            assert_eq!(proof.leaf_value, *member);
            let verdict = verify(&config, member, &summary.root_hash, &proof.proof).unwrap();
            assert!(verdict.valid);
            assert!(verify_hex(&config, &proof, &summary.root_hash).unwrap().valid);

            // A member outside the list does not verify with the same proof.
            let verdict = verify(&config, MEMBERS[3], &summary.root_hash, &proof.proof).unwrap();
            assert!(!verdict.valid);
        }
    }

    #[test_traced]
    fn test_prove_missing() {
        let config = config_hex();
        let outcome = prove(&config, &MEMBERS[..3], MEMBERS[3]).unwrap();
        assert_eq!(
            outcome,
            Outcome::Missing(Missing {
                leaf: MEMBERS[3].to_string(),
                error_msg: "value does not exist within the list".to_string(),
            })
        );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["errorMsg"], "value does not exist within the list");
        assert_eq!(json["leaf"], MEMBERS[3]);
    }

    #[test]
    fn test_prove_output_shape() {
        let config = config_hex();
        let outcome = prove(&config, &MEMBERS, MEMBERS[0]).unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["leafValue"], MEMBERS[0]);
        assert_eq!(json["leafHex"], "0x5b38da6a701c568545dcfcb03fcb875f56beddc4");
        assert_eq!(
            json["proof"],
            serde_json::json!([
                "0x04a10bfd00977f54cc3450c9b25c9b3a502a089eba0097ba35fc33c4ea5fcb54",
                "0x15741c8b25909041ecad0ee5d2f28d0e58d97827f3ec0f5c6b9ebdbb9a1c46ef",
            ])
        );
    }

    #[test]
    fn test_verify_malformed() {
        let config = Config::default();
        let root = generate(&config, &MEMBERS).unwrap().root_hash;
        assert!(matches!(
            verify(&config, MEMBERS[0], &root, &["0x1234"]),
            Err(Error::Merkle(merkleme_merkle::Error::MalformedProof(_)))
        ));
        assert!(matches!(
            verify(&config, MEMBERS[0], "0xnothex", &[] as &[&str]),
            Err(Error::Merkle(merkleme_merkle::Error::MalformedProof(_)))
        ));
    }

    #[test]
    fn test_publish() {
        let config = Config::default();
        let summary = generate(&config, &MEMBERS).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        publish(&out, &MEMBERS, &summary).unwrap();

        let whitelist: Vec<String> =
            serde_json::from_slice(&fs::read(out.join(WHITELIST_FILE)).unwrap()).unwrap();
        assert_eq!(whitelist, MEMBERS);

        let root: serde_json::Value =
            serde_json::from_slice(&fs::read(out.join(ROOT_FILE)).unwrap()).unwrap();
        assert_eq!(root, serde_json::json!({ "rootHash": summary.root_hash }));

        let table: serde_json::Value =
            serde_json::from_slice(&fs::read(out.join(SUMMARY_FILE)).unwrap()).unwrap();
        assert_eq!(table[2]["Leaf"], MEMBERS[2]);
        assert_eq!(table[2]["Hash"], summary.leaves[2].hash);
    }

    #[test_traced]
    fn test_verify_hex_rejects_inconsistent_fields() {
        let config = config_hex();
        let summary = generate(&config, &MEMBERS).unwrap();
        let proof = match prove(&config, &MEMBERS, MEMBERS[1]).unwrap() {
            Outcome::Found(proof) => proof,
            Outcome::Missing(missing) => panic!("missing {}", missing.leaf),
        };
        assert!(verify_hex(&config, &proof, &summary.root_hash).unwrap().valid);

        // A forged leaf hash is rejected.
        let mut forged = proof.clone();
        forged.leaf_hash = format!("0x{}", "00".repeat(32));
        assert!(matches!(
            verify_hex(&config, &forged, &summary.root_hash),
            Err(Error::Merkle(merkleme_merkle::Error::MalformedProof(_)))
        ));

        // Claiming a different member than the proven bytes is rejected.
        let mut relabeled = proof.clone();
        relabeled.leaf_value = MEMBERS[3].to_string();
        assert!(matches!(
            verify_hex(&config, &relabeled, &summary.root_hash),
            Err(Error::Merkle(merkleme_merkle::Error::MalformedProof(_)))
        ));

        // Both at once (a non-member dressed up with a member's proof).
        let mut both = proof;
        both.leaf_value = MEMBERS[3].to_string();
        both.leaf_hash = format!("0x{}", "00".repeat(32));
        assert!(verify_hex(&config, &both, &summary.root_hash).is_err());
    }
}
