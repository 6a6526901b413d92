use crate::Error;
use merkleme_utils::{from_hex_formatted, is_prefixed_hex};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a member string is turned into the bytes that are hashed into a leaf.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Hash the UTF-8 bytes of the string.
    #[default]
    Utf8,
    /// Decode `0x`-prefixed hex (e.g. an address) and hash the decoded bytes.
    ///
    /// This is what EVM contracts do when they compute `keccak256(abi.encodePacked(address))`.
    Hex,
}

impl Encoding {
    /// Return the bytes to hash for `member`.
    pub fn encode(self, member: &str) -> Result<Vec<u8>, Error> {
        match self {
            Encoding::Utf8 => Ok(member.as_bytes().to_vec()),
            Encoding::Hex => {
                let member = member.trim();
                if !is_prefixed_hex(member) {
                    return Err(Error::InvalidMember(member.to_string()));
                }
                from_hex_formatted(member).ok_or_else(|| Error::InvalidMember(member.to_string()))
            }
        }
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "hex" => Ok(Encoding::Hex),
            _ => Err(Error::InvalidOption(format!("encoding: {}", s))),
        }
    }
}

/// Encode every member, failing on the first one that cannot be encoded.
pub fn encode_all<S: AsRef<str>>(encoding: Encoding, members: &[S]) -> Result<Vec<Vec<u8>>, Error> {
    members
        .iter()
        .map(|member| encoding.encode(member.as_ref()))
        .collect()
}
