//! Resolve allowlists and publish their Merkle commitments and inclusion proofs.
//!
//! An allowlist is a named [Category] of members. A [Provider] resolves a category to its raw
//! members (from memory, the environment, or a file), [Encoding] turns each member into the bytes
//! that are hashed, and the [commands] build a `merkleme_merkle::Tree` over them to produce a
//! commitment, a proof, or a verdict.
//!
//! # Example
//!
//! ```rust
//! use merkleme_allowlist::{commands, Category, Config, Provider, Static};
//!
//! let config = Config::default();
//! let provider = Static::default().with(Category::Og, ["alice", "bob", "carol"]);
//! let members = provider.resolve(Category::Og).unwrap();
//!
//! let summary = commands::generate(&config, &members).unwrap();
//! let proof = match commands::prove(&config, &members, "bob").unwrap() {
//!     commands::Outcome::Found(proof) => proof,
//!     commands::Outcome::Missing(_) => unreachable!(),
//! };
//! let verdict = commands::verify(&config, "bob", &summary.root_hash, &proof.proof).unwrap();
//! assert!(verdict.valid);
//! ```

use std::path::PathBuf;
use thiserror::Error;

mod category;
pub use category::Category;
pub mod commands;
mod config;
pub use config::{parse_odd, Config, Hash};
mod member;
pub use member::{encode_all, Encoding};
pub mod provider;
pub use provider::{parse_cid, read_list, Chain, Env, File, Provider, Static};

/// Errors that can occur when resolving an allowlist or committing to it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("merkle error: {0}")]
    Merkle(#[from] merkleme_merkle::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read {0:?}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("no list available for category: {0}")]
    Unresolved(Category),
    #[error("invalid member: {0}")]
    InvalidMember(String),
    #[error("invalid category: {0}")]
    InvalidCategory(String),
    #[error("invalid option: {0}")]
    InvalidOption(String),
}
