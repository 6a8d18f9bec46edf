//! Address, hashing and signature helpers.

use alloy_primitives::{keccak256, Address};
use serde::Serialize;

use crate::error::{ControllerError, ControllerResult};

// =============================================================================
// Addresses
// =============================================================================

/// Parse an address, enforcing the EIP-55 checksum on mixed-case input.
///
/// The `0x` prefix is optional. All-lowercase and all-uppercase hex are
/// accepted without a checksum.
pub fn parse_address(value: &str) -> Option<Address> {
    let value = value.trim();
    let hex = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let address: Address = format!("0x{}", hex.to_ascii_lowercase()).parse().ok()?;

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && address.to_checksum(None) != format!("0x{}", hex) {
        return None;
    }
    Some(address)
}

/// Whether `value` is a usable Ethereum address.
pub fn is_address(value: &str) -> bool {
    parse_address(value).is_some()
}

/// Compare two addresses regardless of case. Invalid input never matches.
pub fn same_address(a: &str, b: &str) -> bool {
    match (parse_address(a), parse_address(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Shorten an address for display: `0x1234...abcd`.
pub fn ellipse_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

// =============================================================================
// Hashing and signatures
// =============================================================================

/// Keccak-256 of a UTF-8 message, as `solidityKeccak256(['string'], [msg])`.
pub fn hash_message(message: &str) -> [u8; 32] {
    keccak256(message.as_bytes()).0
}

/// `0x`-prefixed lowercase hex.
pub fn to_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// An ECDSA signature split into its on-chain components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitSignature {
    /// Recovery id, normalised to 27 or 28.
    pub v: u8,
    /// `0x`-prefixed 32-byte `r`.
    pub r: String,
    /// `0x`-prefixed 32-byte `s`.
    pub s: String,
}

/// Split a 65-byte (`r || s || v`) or 64-byte EIP-2098 compact signature.
pub fn split_signature(signature: &str) -> ControllerResult<SplitSignature> {
    let raw = signature.trim();
    let raw = raw.strip_prefix("0x").unwrap_or(raw);
    let bytes = hex::decode(raw).map_err(|e| ControllerError::InvalidSignature(e.to_string()))?;

    match bytes.len() {
        65 => {
            let v = match bytes[64] {
                0 | 1 => bytes[64] + 27,
                27 | 28 => bytes[64],
                other => {
                    return Err(ControllerError::InvalidSignature(format!(
                        "invalid recovery id {}",
                        other
                    )))
                }
            };
            Ok(SplitSignature {
                v,
                r: to_hex(&bytes[..32]),
                s: to_hex(&bytes[32..64]),
            })
        }
        64 => {
            let mut vs = bytes[32..].to_vec();
            let v = 27 + (vs[0] >> 7);
            vs[0] &= 0x7f;
            Ok(SplitSignature {
                v,
                r: to_hex(&bytes[..32]),
                s: to_hex(&vs),
            })
        }
        len => Err(ControllerError::InvalidSignature(format!(
            "expected 64 or 65 bytes, got {}",
            len
        ))),
    }
}
