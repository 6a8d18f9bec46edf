//! Application configuration.
//!
//! The book-library address and the Infura project id come from the
//! frontend build environment. The remaining values are fixed amounts and
//! the demo payloads used by the signature buttons.

use crate::error::ConfigError;
use crate::utils::is_address;

/// Chain assumed before a wallet reports one.
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// ETH sent to the wrapper by "Buy LIBToken" and the signed wrap demo.
pub const WRAP_VALUE_ETH: &str = "0.1";

/// LIB exchanged back to ETH by the owner's unwrap button.
pub const UNWRAP_VALUE_LIB: &str = "0.01";

/// Lifetime of a borrow permit, in seconds.
pub const PERMIT_VALIDITY_SECS: u64 = 60 * 60;

/// EIP-712 domain version of the LIB token.
pub const PERMIT_DOMAIN_VERSION: &str = "1";

/// Message signed before approving a borrow on someone else's behalf.
pub const BORROW_APPROVAL_MESSAGE: &str = "Allow borrow this book from another acc";

/// Message signed by the "Sign a message" button.
pub const WRAP_APPROVAL_MESSAGE: &str = "Allow wrapping tokens on my behalf";

/// Receiver used by the signed borrow and signed wrap demos.
pub const DEMO_RECEIVER: &str = "0xD9995BAE12FEe327256FFec1e3184d492bD94C31";

/// Pre-signed borrow approval replayed by "Borrow signed book".
pub const DEMO_BORROW_SIGNATURE: &str = "0xdf12d86b2bb09c2fa316f5dae7e98dc9c67b945337cf8d49065127081ca28b223e338b0936860e5ec5c1cfbc1caed5f9814687e1d5c85865a5169729541428bc1c";

/// Hash matching [`DEMO_BORROW_SIGNATURE`].
pub const DEMO_BORROW_HASH: &str =
    "0xf25626ca4e6854665dd796172b32bc4cf05721a036483fdb896d0fd11189d99b";

/// Pre-signed wrap approval replayed by "Wrap tokens with signing".
pub const DEMO_WRAP_SIGNATURE: &str = "0x1100b2ba29fe21ceeda4351f7dad1d2481c1abca7d207dd2ce01b9015e58e3ef6bb065cc984d61883f6f28aeb4450459262d85e8239e34f9241d91c15129cbaa1c";

/// Hash matching [`DEMO_WRAP_SIGNATURE`].
pub const DEMO_WRAP_HASH: &str =
    "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470";

/// Runtime configuration of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DappConfig {
    /// Configured book-library contract address. May be invalid; the
    /// controller then runs without contract handles.
    pub book_library_address: String,
    /// Infura project id for WalletConnect.
    pub infura_id: Option<String>,
    /// Chain used before the wallet reports one.
    pub default_chain_id: u64,
}

impl DappConfig {
    /// Create a configuration for the given library address.
    pub fn new(book_library_address: impl Into<String>) -> Self {
        Self {
            book_library_address: book_library_address.into(),
            infura_id: None,
            default_chain_id: DEFAULT_CHAIN_ID,
        }
    }

    /// Set the Infura project id.
    pub fn with_infura_id(mut self, infura_id: impl Into<String>) -> Self {
        let id = infura_id.into();
        self.infura_id = (!id.is_empty()).then_some(id);
        self
    }

    /// Build from optional build-time values.
    ///
    /// A missing library address is an error; an invalid one is accepted
    /// and reported by [`DappConfig::validate`].
    pub fn from_build_env(
        book_library_address: Option<&str>,
        infura_id: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let address = book_library_address.ok_or(ConfigError::Missing("BOOK_LIBRARY_ADDRESS"))?;
        let mut config = Self::new(address.trim());
        if let Some(id) = infura_id {
            config = config.with_infura_id(id.trim());
        }
        Ok(config)
    }

    /// Whether the configured library address can be bound.
    pub fn has_valid_library_address(&self) -> bool {
        is_address(&self.book_library_address)
    }

    /// Check the configuration, reporting the first problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.has_valid_library_address() {
            return Err(ConfigError::InvalidAddress {
                name: "BOOK_LIBRARY_ADDRESS",
                value: self.book_library_address.clone(),
            });
        }
        Ok(())
    }
}
