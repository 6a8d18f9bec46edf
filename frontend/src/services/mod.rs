//! Browser implementations of the controller seams.
//!
//! # Services
//!
//! - [`wallet`] - Web3Modal connector and the ethers.js-backed provider
//! - [`contract`] - ethers.js contract handles and event listeners
//! - [`platform`] - task spawning, toasts, reload and the clock
//!
//! # JavaScript Bindings
//!
//! All wallet and contract access goes through `src/js/ethereum.js`, which
//! expects ethers.js v5 and Web3Modal as page globals.

pub mod contract;
pub mod platform;
pub mod wallet;

pub use contract::*;
pub use platform::*;
pub use wallet::*;

use library_dapp::{ChainError, ChainResult};
use serde_json::Value;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

/// Convert a value thrown by `ethereum.js` into a [`ChainError`].
pub(crate) fn js_error(err: JsValue) -> ChainError {
    match serde_wasm_bindgen::from_value::<Value>(err.clone()) {
        Ok(value) => ChainError::from_value(value),
        Err(_) => ChainError::msg(
            err.as_string()
                .unwrap_or_else(|| "Unknown JS error".to_string()),
        ),
    }
}

/// Await a promise from `ethereum.js`.
pub(crate) async fn resolve(promise: js_sys::Promise) -> ChainResult<JsValue> {
    JsFuture::from(promise).await.map_err(js_error)
}

/// Await a promise that resolves to a string.
pub(crate) async fn resolve_string(promise: js_sys::Promise) -> ChainResult<String> {
    let value = resolve(promise).await?;
    value
        .as_string()
        .ok_or_else(|| ChainError::msg(format!("Expected a string from the wallet, got {:?}", value)))
}

/// Await a promise that resolves to a JSON string and parse it.
pub(crate) async fn resolve_json<T: serde::de::DeserializeOwned>(
    promise: js_sys::Promise,
) -> ChainResult<T> {
    let json = resolve_string(promise).await?;
    serde_json::from_str(&json)
        .map_err(|e| ChainError::msg(format!("Invalid JSON from the wallet: {}", e)))
}
