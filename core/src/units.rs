//! Ether unit conversion and quantity decoding.

use alloy_primitives::U256;
use serde_json::Value;
use thiserror::Error;

/// Decimals of ether and of the LIB token.
pub const ETHER_DECIMALS: usize = 18;

/// Errors while parsing a decimal amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitsError {
    /// Not a decimal number.
    #[error("Invalid decimal amount: {0:?}")]
    Invalid(String),

    /// More fractional digits than the unit supports.
    #[error("Too many decimal places in {0:?}")]
    TooManyDecimals(String),

    /// Does not fit in 256 bits.
    #[error("Amount overflows uint256: {0:?}")]
    Overflow(String),
}

/// Format a base-unit amount with `decimals` fractional digits.
///
/// Trailing zeros are trimmed but at least one fractional digit is kept,
/// so one ether renders as `"1.0"`.
pub fn format_units(value: U256, decimals: usize) -> String {
    let digits = value.to_string();
    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{}.0", whole)
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Format wei as ether.
pub fn format_ether(value: U256) -> String {
    format_units(value, ETHER_DECIMALS)
}

/// Parse a decimal amount into base units.
pub fn parse_units(amount: &str, decimals: usize) -> Result<U256, UnitsError> {
    let trimmed = amount.trim();
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (trimmed, ""),
    };

    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(UnitsError::Invalid(amount.to_string()));
    }
    if fraction.len() > decimals {
        return Err(UnitsError::TooManyDecimals(amount.to_string()));
    }

    let combined = format!("{}{}{}", whole, fraction, "0".repeat(decimals - fraction.len()));
    let combined = combined.trim_start_matches('0');
    if combined.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(combined, 10).map_err(|_| UnitsError::Overflow(amount.to_string()))
}

/// Parse an ether amount into wei.
pub fn parse_ether(amount: &str) -> Result<U256, UnitsError> {
    parse_units(amount, ETHER_DECIMALS)
}

/// Decode a numeric contract return value.
///
/// Accepts JSON numbers, decimal strings, `0x` hex strings and the
/// `{ "type": "BigNumber", "hex": "0x.." }` shape ethers.js serialises to.
pub fn parse_quantity(value: &Value) -> Option<U256> {
    match value {
        Value::Number(n) => n.as_u64().map(U256::from),
        Value::String(s) => {
            let s = s.trim();
            match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                Some("") => Some(U256::ZERO),
                Some(hex) => U256::from_str_radix(hex, 16).ok(),
                None => U256::from_str_radix(s, 10).ok(),
            }
        }
        Value::Object(map) => map.get("hex").and_then(parse_quantity),
        _ => None,
    }
}

/// Encode an amount as a contract call argument.
pub fn quantity_arg(value: U256) -> Value {
    Value::String(value.to_string())
}
