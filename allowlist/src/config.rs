use crate::{Category, Chain, Encoding, Env, Error, File, Static};
use merkleme_merkle::Odd;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::info;

/// The hash function used for leaves and nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hash {
    #[default]
    Keccak256,
    Sha256,
}

impl FromStr for Hash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keccak256" | "keccak" => Ok(Hash::Keccak256),
            "sha256" => Ok(Hash::Sha256),
            _ => Err(Error::InvalidOption(format!("hash: {}", s))),
        }
    }
}

/// Parse an [Odd] policy from `duplicate` or `promote`.
pub fn parse_odd(s: &str) -> Result<Odd, Error> {
    match s.to_ascii_lowercase().as_str() {
        "duplicate" => Ok(Odd::Duplicate),
        "promote" => Ok(Odd::Promote),
        _ => Err(Error::InvalidOption(format!("odd: {}", s))),
    }
}

/// Allowlist configuration, usually read from YAML.
///
/// ```yaml
/// hash: keccak256
/// encoding: hex
/// odd: duplicate
/// lists:
///   og:
///     - "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4"
/// directory: ./lists
/// sources:
///   degen: https://gateway.pinata.cloud/ipfs/QmList
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub hash: Hash,
    pub encoding: Encoding,
    pub odd: Odd,

    /// Members listed inline.
    pub lists: BTreeMap<Category, Vec<String>>,

    /// Directory holding lists named by content identifier.
    pub directory: Option<PathBuf>,

    /// Content URIs of lists stored in `directory`.
    pub sources: BTreeMap<Category, String>,
}

impl Config {
    /// Load a configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let config_file = fs::File::open(path).map_err(|e| Error::Read(path.to_path_buf(), e))?;
        let config: Config = serde_yaml::from_reader(config_file)?;
        info!(
            path = %path.display(),
            hash = ?config.hash,
            encoding = ?config.encoding,
            lists = config.lists.len(),
            sources = config.sources.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Resolve lists from inline lists first, then the process environment, then `sources`.
    pub fn provider(&self) -> Chain {
        self.provider_with_env(Env::new())
    }

    /// Like [Config::provider], but reading environment variables through `env`.
    pub fn provider_with_env(&self, env: Env) -> Chain {
        let chain = Chain::new()
            .push(Static::new(self.lists.clone()))
            .push(env);
        match &self.directory {
            Some(directory) => {
                let file = self
                    .sources
                    .iter()
                    .fold(File::new(), |file, (category, uri)| {
                        file.with_uri(*category, directory, uri)
                    });
                chain.push(file)
            }
            None => chain,
        }
    }
}
