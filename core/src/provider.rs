//! Seams between the controller and the outside world.
//!
//! The browser build implements these traits on top of the injected wallet
//! and ethers.js; tests implement them with an in-memory chain.
//!
//! # Traits
//!
//! - [`WalletConnector`] - wallet selection modal and cached-provider handling
//! - [`Provider`] - a connected wallet: accounts, network, signing, balances
//! - [`ContractHandle`] - a contract bound to the provider's signer
//! - [`Platform`] - task spawning, toasts, page reload and the clock

use std::rc::Rc;

use alloy_primitives::U256;
use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ChainResult;

// =============================================================================
// Transactions
// =============================================================================

/// Extra transaction fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxOverrides {
    /// Wei attached to a payable call.
    pub value: Option<U256>,
}

impl TxOverrides {
    /// Attach `value` wei.
    pub fn with_value(value: U256) -> Self {
        Self { value: Some(value) }
    }
}

/// A transaction accepted by the wallet but not yet mined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentTransaction {
    pub hash: String,
}

/// Confirmation record of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: String,
    /// `1` on success, `0` when the transaction reverted.
    pub status: u64,
    #[serde(default)]
    pub block_hash: Option<String>,
}

impl Receipt {
    /// Whether the transaction succeeded.
    pub fn is_success(&self) -> bool {
        self.status == 1
    }
}

// =============================================================================
// Events
// =============================================================================

/// Identifies a registered listener so it can be removed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A decoded contract log delivered to a listener.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractEvent {
    pub name: String,
    /// Event arguments in ABI order.
    pub args: Vec<Value>,
    pub block_hash: Option<String>,
    pub transaction_hash: Option<String>,
}

/// Positional argument filter; `None` matches anything.
pub type EventFilter = Vec<Option<Value>>;

/// Callback invoked for each matching contract event.
pub type EventListener = Rc<dyn Fn(ContractEvent)>;

/// Notifications raised by the wallet itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The selected accounts changed; empty when the wallet was locked.
    AccountsChanged(Vec<String>),
    /// The wallet switched networks.
    ChainChanged(u64),
    /// The wallet session was closed.
    Disconnected,
}

/// Callback invoked for each provider event.
pub type ProviderListener = Rc<dyn Fn(ProviderEvent)>;

// =============================================================================
// Traits
// =============================================================================

/// A contract bound to the active signer.
#[async_trait(?Send)]
pub trait ContractHandle {
    /// Contract address.
    fn address(&self) -> String;

    /// Read-only call; numeric results come back as decimal strings.
    async fn call(&self, method: &str, args: Vec<Value>) -> ChainResult<Value>;

    /// Submit a state-changing transaction signed by the wallet.
    async fn send(
        &self,
        method: &str,
        args: Vec<Value>,
        overrides: TxOverrides,
    ) -> ChainResult<SentTransaction>;

    /// Register a listener for `event`, optionally filtered by argument.
    fn on(&self, event: &str, filter: EventFilter, listener: EventListener) -> ListenerId;

    /// Remove a listener registered with [`ContractHandle::on`].
    fn off(&self, id: ListenerId);
}

/// A connected wallet.
#[async_trait(?Send)]
pub trait Provider {
    /// Address currently selected in the wallet, if it exposes one.
    fn selected_address(&self) -> Option<String>;

    /// Accounts the wallet shares with the page.
    async fn accounts(&self) -> ChainResult<Vec<String>>;

    /// Current network id.
    async fn chain_id(&self) -> ChainResult<u64>;

    /// ETH balance of `address`, in wei.
    async fn get_balance(&self, address: &str) -> ChainResult<U256>;

    /// Wait until `tx` is mined.
    async fn wait_for_transaction(&self, tx: &SentTransaction) -> ChainResult<Receipt>;

    /// `personal_sign` over raw bytes; returns the signature hex.
    async fn sign_message(&self, message: &[u8]) -> ChainResult<String>;

    /// Raw JSON-RPC request (`eth_signTypedData_v4`, ...).
    async fn send_rpc(&self, method: &str, params: Vec<Value>) -> ChainResult<Value>;

    /// Bind a contract at `address` with the given ABI JSON to this signer.
    fn contract(&self, address: &str, abi: &'static str) -> Rc<dyn ContractHandle>;

    /// Listen to wallet events. `None` if the wallet cannot emit them.
    fn on(&self, listener: ProviderListener) -> Option<ListenerId>;

    /// Remove a listener registered with [`Provider::on`].
    fn off(&self, id: ListenerId);
}

/// Opens the wallet selection modal and remembers the choice.
#[async_trait(?Send)]
pub trait WalletConnector {
    /// Whether a previous session can be restored without prompting.
    fn has_cached_provider(&self) -> bool;

    /// Prompt for (or restore) a wallet and return its provider.
    async fn connect(&self) -> ChainResult<Rc<dyn Provider>>;

    /// Forget the cached wallet choice and any WalletConnect session.
    async fn clear_cached_provider(&self);
}

/// Host services the controller needs from its environment.
pub trait Platform {
    /// Run a future on the single UI thread.
    fn spawn_local(&self, future: LocalBoxFuture<'static, ()>);

    /// Show a short toast notification.
    fn notify(&self, message: &str);

    /// Reload the page.
    fn reload(&self);

    /// Wall-clock time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}
