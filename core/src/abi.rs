//! Contract ABIs shipped with the dashboard.
//!
//! The JSON documents are embedded at compile time and handed verbatim to
//! the provider when a contract handle is bound.

use serde_json::Value;

/// Book library contract ABI.
pub const BOOK_LIBRARY_ABI: &str = include_str!("../abi/BookLibrary.json");

/// LIB token (ERC-20 with permit) ABI.
pub const LIB_TOKEN_ABI: &str = include_str!("../abi/LIB.json");

/// ETH/LIB wrapper contract ABI.
pub const WRAPPER_ABI: &str = include_str!("../abi/WrapperContract.json");

/// Names of the ABI entries of the given `kind` ("function", "event").
pub fn entry_names(abi: &str, kind: &str) -> Vec<String> {
    let entries: Vec<Value> = match serde_json::from_str(abi) {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("Malformed ABI document: {}", e);
            return Vec::new();
        }
    };
    entries
        .iter()
        .filter(|entry| entry.get("type").and_then(Value::as_str) == Some(kind))
        .filter_map(|entry| entry.get("name").and_then(Value::as_str).map(str::to_string))
        .collect()
}
