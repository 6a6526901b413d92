//! Leverage common functionality across the merkleme crates.

/// Prefix used when exchanging hex with external verifiers (e.g. contracts expecting `bytes32`).
pub const HEX_PREFIX: &str = "0x";

/// Converts bytes to a hexadecimal string.
pub fn hex(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes.iter() {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Converts bytes to a lowercase hexadecimal string prefixed with [HEX_PREFIX].
pub fn hex_prefixed(bytes: &[u8]) -> String {
    let mut prefixed = String::with_capacity(HEX_PREFIX.len() + bytes.len() * 2);
    prefixed.push_str(HEX_PREFIX);
    prefixed.push_str(&hex(bytes));
    prefixed
}

/// Converts a hexadecimal string to bytes.
pub fn from_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| match hex.get(i..i + 2) {
            Some(pair) => u8::from_str_radix(pair, 16).ok(),
            None => None,
        })
        .collect()
}

/// Converts a hexadecimal string to bytes, stripping whitespace and/or a `0x` (or `0X`) prefix.
/// Used to accept hashes pasted from block explorers or contract calls without modification.
pub fn from_hex_formatted(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.replace(['\t', '\n', '\r', ' '], "");
    let res = hex
        .strip_prefix(HEX_PREFIX)
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(&hex);
    from_hex(res)
}

/// Returns true if `value` is a `0x`-prefixed string of hexadecimal digits of even length.
pub fn is_prefixed_hex(value: &str) -> bool {
    match value.strip_prefix(HEX_PREFIX) {
        Some(digits) => digits.len() % 2 == 0 && digits.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

/// Computes the union of two byte slices.
pub fn union(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut union = Vec::with_capacity(a.len() + b.len());
    union.extend_from_slice(a);
    union.extend_from_slice(b);
    union
}
