//! Application configuration.
//!
//! `BOOK_LIBRARY_ADDRESS` and `INFURA_ID` are read at build time from the
//! environment or a `.env` file (see `build.rs`).

use library_dapp::DappConfig;

/// Book library contract address.
pub const BOOK_LIBRARY_ADDRESS: Option<&str> = option_env!("BOOK_LIBRARY_ADDRESS");

/// Infura project id for WalletConnect.
pub const INFURA_ID: Option<&str> = option_env!("INFURA_ID");

/// Page title.
pub const APP_NAME: &str = "Book Library";

/// How long a toast stays on screen.
pub const TOAST_DURATION_MS: u32 = 5_000;

/// Maximum toasts shown at once.
pub const MAX_TOASTS: usize = 5;

/// Build the controller configuration.
///
/// A missing or invalid address is logged; the dashboard still starts and
/// connects without contracts.
pub fn load_config() -> DappConfig {
    let config = match DappConfig::from_build_env(BOOK_LIBRARY_ADDRESS, INFURA_ID) {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ {}", e);
            DappConfig::new("")
        }
    };
    if let Err(e) = config.validate() {
        log::warn!("⚠️ {}", e);
    }
    config
}
