//! Error types for the Book Library dApp.
//!
//! - [`ChainError`] - failures reported by the wallet, provider or a contract
//! - [`ConfigError`] - invalid build-time configuration
//! - [`ControllerError`] - top-level errors of controller operations
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::units::UnitsError;

// =============================================================================
// Chain Errors
// =============================================================================

/// Nested payload carried by a provider error.
///
/// Wallets wrap the revert reason in an `error` object (ethers.js) or a
/// `data` object (raw JSON-RPC); both expose a `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NestedMessage {
    #[serde(default)]
    pub message: Option<String>,
}

/// A failure reported by the provider, the wallet or a contract call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ChainError {
    /// Top-level message.
    pub message: String,
    /// Provider error code (numeric JSON-RPC codes are stringified).
    pub code: Option<String>,
    /// Nested `error` payload.
    pub error: Option<NestedMessage>,
    /// Nested `data` payload.
    pub data: Option<NestedMessage>,
}

impl ChainError {
    /// Plain error with no nested payload.
    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Error carrying a nested `error.message`.
    pub fn with_error(message: impl Into<String>, nested: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: Some(NestedMessage {
                message: Some(nested.into()),
            }),
            ..Self::default()
        }
    }

    /// Error carrying only a nested `data.message`.
    pub fn with_data(message: impl Into<String>, nested: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: Some(NestedMessage {
                message: Some(nested.into()),
            }),
            ..Self::default()
        }
    }

    /// Error for a contract response that could not be decoded.
    pub fn invalid_response(method: &str, value: &Value) -> Self {
        Self::msg(format!("Unexpected response from {}: {}", method, value))
    }

    /// Build an error from the plain object thrown by the JavaScript side.
    ///
    /// Strings become the message; objects are searched for `message`,
    /// `code`, `error` and `data`. A `data` field that is not an object
    /// (raw revert bytes, for instance) is dropped.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(message) => Self::msg(message),
            Value::Object(map) => {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .or_else(|| map.get("reason").and_then(Value::as_str).map(str::to_string))
                    .unwrap_or_else(|| "Unknown provider error".to_string());
                let code = map.get("code").and_then(|code| match code {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                });
                let nested = |key: &str| {
                    map.get(key)
                        .filter(|v| v.is_object())
                        .and_then(|v| serde_json::from_value::<NestedMessage>(v.clone()).ok())
                };
                Self {
                    message,
                    code,
                    error: nested("error"),
                    data: nested("data"),
                }
            }
            Value::Null => Self::msg("Unknown provider error"),
            other => Self::msg(other.to_string()),
        }
    }

    /// Message to show the user: `error.message`, else `data.message`.
    ///
    /// `None` when neither payload is present; such errors are only logged.
    pub fn display_message(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return error.message.clone();
        }
        self.data.as_ref().and_then(|data| data.message.clone())
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors in build-time configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable was not set at build time.
    #[error("Missing configuration value: {0}")]
    Missing(&'static str),

    /// A configured address is not a valid Ethereum address.
    #[error("Invalid address for {name}: {value}")]
    InvalidAddress { name: &'static str, value: String },
}

// =============================================================================
// Controller Errors (top-level)
// =============================================================================

/// Top-level errors returned by controller operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// Provider or contract failure.
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    /// No wallet session is active.
    #[error("Wallet is not connected")]
    NotConnected,

    /// The contract was not bound for this session.
    #[error("Contract {0} is not available")]
    ContractUnavailable(&'static str),

    /// Signature bytes could not be split into `v`, `r`, `s`.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Wallet connection failed.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A fixed amount could not be converted to base units.
    #[error("Amount error: {0}")]
    Units(#[from] UnitsError),

    /// The library holds no books.
    #[error("The library has no books")]
    EmptyLibrary,
}

impl ControllerError {
    /// Message to surface in the error banner, if any.
    pub fn display_message(&self) -> Option<String> {
        match self {
            ControllerError::Chain(err) => err.display_message(),
            _ => None,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for provider and contract calls.
pub type ChainResult<T> = Result<T, ChainError>;

/// Result type for controller operations.
pub type ControllerResult<T> = Result<T, ControllerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_field_takes_precedence() {
        let err = ChainError::from_value(json!({
            "message": "cannot estimate gas",
            "code": "UNPREDICTABLE_GAS_LIMIT",
            "error": { "message": "execution reverted: No copies left" },
            "data": { "message": "ignored" }
        }));
        assert_eq!(err.code.as_deref(), Some("UNPREDICTABLE_GAS_LIMIT"));
        assert_eq!(
            err.display_message().as_deref(),
            Some("execution reverted: No copies left")
        );
    }

    #[test]
    fn test_data_message_only() {
        let err = ChainError::from_value(json!({
            "code": -32603,
            "message": "Internal JSON-RPC error.",
            "data": { "code": 3, "message": "execution reverted: Not borrowed" }
        }));
        assert_eq!(err.code.as_deref(), Some("-32603"));
        assert_eq!(
            err.display_message().as_deref(),
            Some("execution reverted: Not borrowed")
        );
    }

    #[test]
    fn test_no_nested_payload_has_no_display_message() {
        let err = ChainError::from_value(json!({ "message": "user rejected", "data": "0x08c379a0" }));
        assert_eq!(err.message, "user rejected");
        assert!(err.data.is_none());
        assert_eq!(err.display_message(), None);

        let err = ChainError::from_value(json!("plain failure"));
        assert_eq!(err.to_string(), "plain failure");
    }

    #[test]
    fn test_controller_error_conversion() {
        let err: ControllerError = ChainError::with_data("rpc", "reverted").into();
        assert!(err.to_string().contains("rpc"));
        assert_eq!(err.display_message().as_deref(), Some("reverted"));
        assert_eq!(ControllerError::NotConnected.display_message(), None);
    }
}
