//! Resolve a [Category] to its raw members.
//!
//! Resolution happens before any tree is built, so commitments and proofs are pure functions of
//! the members a [Provider] returns.

use crate::{Category, Error};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Resolves the members of an allowlist category.
pub trait Provider {
    /// Return the members of `category`, or [Error::Unresolved] if this provider has no (or an
    /// empty) list for it.
    fn resolve(&self, category: Category) -> Result<Vec<String>, Error>;
}

/// Lists held in memory.
#[derive(Clone, Debug, Default)]
pub struct Static {
    lists: BTreeMap<Category, Vec<String>>,
}

impl Static {
    pub fn new(lists: BTreeMap<Category, Vec<String>>) -> Self {
        Self { lists }
    }

    /// Set the members of `category`.
    pub fn with<I, S>(mut self, category: Category, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lists
            .insert(category, members.into_iter().map(Into::into).collect());
        self
    }
}

impl Provider for Static {
    fn resolve(&self, category: Category) -> Result<Vec<String>, Error> {
        match self.lists.get(&category) {
            Some(members) if !members.is_empty() => Ok(members.clone()),
            _ => Err(Error::Unresolved(category)),
        }
    }
}

/// Split a comma-separated list, trimming whitespace and dropping empty entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|member| !member.is_empty())
        .map(str::to_string)
        .collect()
}

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Lists read from comma-separated environment variables (see [Category::env_var]).
pub struct Env {
    lookup: Lookup,
}

impl Env {
    /// Read from the process environment.
    pub fn new() -> Self {
        Self::with_lookup(|key| std::env::var(key).ok())
    }

    /// Read variables through `lookup` instead of the process environment.
    pub fn with_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for Env {
    fn resolve(&self, category: Category) -> Result<Vec<String>, Error> {
        let key = category.env_var();
        let raw = (self.lookup)(key).ok_or(Error::Unresolved(category))?;
        let members = split_list(&raw);
        if members.is_empty() {
            return Err(Error::Unresolved(category));
        }
        debug!(%category, key, members = members.len(), "resolved list from environment");
        Ok(members)
    }
}

/// Return the content identifier of a content URI (its last `/`-separated segment).
///
/// `https://gateway.example/ipfs/QmHash` and `ipfs://QmHash` both yield `QmHash`.
pub fn parse_cid(uri: &str) -> &str {
    let uri = uri.trim().trim_end_matches('/');
    uri.rsplit('/').next().unwrap_or(uri)
}

/// Read a JSON array of members from `path`.
pub fn read_list(path: &Path) -> Result<Vec<String>, Error> {
    let bytes = fs::read(path).map_err(|e| Error::Read(path.to_path_buf(), e))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Lists stored as JSON arrays on disk.
///
/// Each category maps to a file path. Lists published under a content URI are looked up by their
/// content identifier inside a directory (see [File::with_uri]).
#[derive(Clone, Debug, Default)]
pub struct File {
    paths: BTreeMap<Category, PathBuf>,
}

impl File {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `category` from `path`.
    pub fn with_path(mut self, category: Category, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(category, path.into());
        self
    }

    /// Read `category` from the file named after the content identifier of `uri` in `directory`.
    pub fn with_uri(self, category: Category, directory: &Path, uri: &str) -> Self {
        let path = directory.join(parse_cid(uri));
        self.with_path(category, path)
    }
}

impl Provider for File {
    fn resolve(&self, category: Category) -> Result<Vec<String>, Error> {
        let path = self.paths.get(&category).ok_or(Error::Unresolved(category))?;
        let members = read_list(path)?;
        debug!(%category, path = %path.display(), members = members.len(), "resolved list from file");
        Ok(members)
    }
}

/// Tries providers in order and returns the first list that resolves.
#[derive(Default)]
pub struct Chain {
    providers: Vec<Box<dyn Provider + Send + Sync>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider to try after the existing ones.
    pub fn push(mut self, provider: impl Provider + Send + Sync + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl Provider for Chain {
    fn resolve(&self, category: Category) -> Result<Vec<String>, Error> {
        let mut last = Error::Unresolved(category);
        for (index, provider) in self.providers.iter().enumerate() {
            match provider.resolve(category) {
                Ok(members) => {
                    info!(%category, provider = index, members = members.len(), "resolved list");
                    return Ok(members);
                }
                Err(e) => {
                    debug!(%category, provider = index, error = ?e, "provider failed");
                    last = e;
                }
            }
        }
        Err(last)
    }
}
