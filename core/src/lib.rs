//! # Library dApp - borrow and return books tracked on Ethereum
//!
//! The core of the Book Library dashboard: contract bindings, state and the
//! controller that drives them. It knows nothing about the browser; the
//! frontend plugs a wallet in through the traits in [`provider`].
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Component  │────▶│ Controller  │────▶│  Contracts  │────▶│  Provider   │
//! │  (Leptos)   │◀────│ (AppState)  │◀────│  (typed)    │◀────│  (wallet)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Build-time configuration and fixed amounts
//! - [`provider`] - Wallet, contract and platform seams
//! - [`contracts`] - Typed bindings for the library, token and wrapper
//! - [`controller`] - Session lifecycle, actions and event handling
//! - [`state`] - Application state
//! - [`view`] - Render decisions for the book lists
//! - [`permit`] - EIP-712 permit construction
//! - [`chains`] - Supported networks
//! - [`units`] - Ether unit conversion
//! - [`utils`] - Addresses, hashing and signatures

// Core modules
pub mod error;
pub mod config;

// Chain access
pub mod abi;
pub mod chains;
pub mod contracts;
pub mod provider;

// Application
pub mod controller;
pub mod permit;
pub mod state;
pub mod view;

// Helpers
pub mod units;
pub mod utils;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use alloy_primitives::U256;
pub use config::DappConfig;
pub use controller::Controller;
pub use error::{ChainError, ChainResult, ConfigError, ControllerError, ControllerResult};
pub use provider::{
    ContractEvent, ContractHandle, EventFilter, EventListener, ListenerId, Platform, Provider,
    ProviderEvent, ProviderListener, Receipt, SentTransaction, TxOverrides, WalletConnector,
};
pub use state::{AppState, Balances, Book, BusyFlag, BusyFlags, ErrorState};
pub use view::{BookListKind, BookListView};
