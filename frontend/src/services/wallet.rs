//! Web3Modal wallet connection and the ethers.js-backed provider.
//!
//! Web3Modal offers the injected wallet (MetaMask, ...) and WalletConnect
//! (configured with the Infura project id) and caches the last choice so
//! the page can reconnect silently.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use library_dapp::chains::get_chain_data;
use library_dapp::units::parse_quantity;
use library_dapp::utils::to_hex;
use library_dapp::{
    ChainError, ChainResult, ContractHandle, DappConfig, ListenerId, Provider, ProviderEvent,
    ProviderListener, Receipt, SentTransaction, WalletConnector, U256,
};
use serde::Deserialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::contract::{remove_listener, JsContract};
use super::{resolve, resolve_json, resolve_string};

// =============================================================================
// Connector
// =============================================================================

/// Wallet selection through Web3Modal.
pub struct Web3ModalConnector;

impl Web3ModalConnector {
    /// Initialise Web3Modal for the configured default network.
    pub fn new(config: &DappConfig) -> Self {
        let chain = get_chain_data(config.default_chain_id);
        let infura_id = config.infura_id.as_deref().unwrap_or_default();
        if infura_id.is_empty() {
            log::warn!("⚠️ INFURA_ID is not set, WalletConnect is disabled");
        }
        init_web3_modal(
            chain.network,
            infura_id,
            chain.chain_id as f64,
            &chain.rpc_url_with(infura_id),
        );
        Self
    }
}

#[async_trait(?Send)]
impl WalletConnector for Web3ModalConnector {
    fn has_cached_provider(&self) -> bool {
        has_cached_provider()
    }

    async fn connect(&self) -> ChainResult<Rc<dyn Provider>> {
        let session = resolve(connect()).await?;
        Ok(Rc::new(JsProvider::new(session)))
    }

    async fn clear_cached_provider(&self) {
        if let Err(e) = resolve(clear_cached_provider()).await {
            log::warn!("Could not clear cached provider: {}", e);
        }
    }
}

// =============================================================================
// Provider
// =============================================================================

/// Wallet event payload produced by `onProviderEvents`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderPayload {
    kind: String,
    #[serde(default)]
    accounts: Vec<String>,
    chain_id: Option<u64>,
}

impl ProviderPayload {
    fn into_event(self) -> Option<ProviderEvent> {
        match self.kind.as_str() {
            "accountsChanged" => Some(ProviderEvent::AccountsChanged(self.accounts)),
            "chainChanged" => self.chain_id.map(ProviderEvent::ChainChanged),
            "disconnect" => Some(ProviderEvent::Disconnected),
            _ => None,
        }
    }
}

/// A connected wallet: the EIP-1193 provider wrapped in an ethers
/// `Web3Provider` and its signer.
pub struct JsProvider {
    session: JsValue,
    listeners: RefCell<HashMap<ListenerId, Closure<dyn FnMut(String)>>>,
}

impl JsProvider {
    pub fn new(session: JsValue) -> Self {
        Self {
            session,
            listeners: RefCell::new(HashMap::new()),
        }
    }
}

#[async_trait(?Send)]
impl Provider for JsProvider {
    fn selected_address(&self) -> Option<String> {
        selected_address(&self.session)
    }

    async fn accounts(&self) -> ChainResult<Vec<String>> {
        resolve_json(list_accounts(&self.session)).await
    }

    async fn chain_id(&self) -> ChainResult<u64> {
        let value = resolve(get_chain_id(&self.session)).await?;
        value
            .as_f64()
            .map(|id| id as u64)
            .ok_or_else(|| ChainError::msg("Wallet returned a non-numeric chain id"))
    }

    async fn get_balance(&self, address: &str) -> ChainResult<U256> {
        let balance = resolve_string(get_balance(&self.session, address)).await?;
        let value = Value::String(balance);
        parse_quantity(&value).ok_or_else(|| ChainError::invalid_response("getBalance", &value))
    }

    async fn wait_for_transaction(&self, tx: &SentTransaction) -> ChainResult<Receipt> {
        resolve_json(wait_for_transaction(&self.session, &tx.hash)).await
    }

    async fn sign_message(&self, message: &[u8]) -> ChainResult<String> {
        resolve_string(sign_message(&self.session, &to_hex(message))).await
    }

    async fn send_rpc(&self, method: &str, params: Vec<Value>) -> ChainResult<Value> {
        let params = Value::Array(params).to_string();
        resolve_json(send_rpc(&self.session, method, &params)).await
    }

    fn contract(&self, address: &str, abi: &'static str) -> Rc<dyn ContractHandle> {
        Rc::new(JsContract::new(bind_contract(&self.session, address, abi), address))
    }

    fn on(&self, listener: ProviderListener) -> Option<ListenerId> {
        let callback = Closure::wrap(Box::new(move |payload: String| {
            match serde_json::from_str::<ProviderPayload>(&payload) {
                Ok(payload) => {
                    if let Some(event) = payload.into_event() {
                        listener(event);
                    }
                }
                Err(e) => log::error!("❌ Malformed wallet event: {}", e),
            }
        }) as Box<dyn FnMut(String)>);

        let handle = on_provider_events(&self.session, callback.as_ref().unchecked_ref())?;
        let id = ListenerId(handle as u64);
        self.listeners.borrow_mut().insert(id, callback);
        Some(id)
    }

    fn off(&self, id: ListenerId) {
        remove_listener(id.0 as f64);
        self.listeners.borrow_mut().remove(&id);
    }
}

/// JavaScript functions from ethereum.js
#[wasm_bindgen(module = "/src/js/ethereum.js")]
extern "C" {
    #[wasm_bindgen(js_name = "initWeb3Modal")]
    fn init_web3_modal(network: &str, infura_id: &str, chain_id: f64, rpc_url: &str);

    #[wasm_bindgen(js_name = "hasCachedProvider")]
    fn has_cached_provider() -> bool;

    #[wasm_bindgen(js_name = "connect")]
    fn connect() -> js_sys::Promise;

    #[wasm_bindgen(js_name = "clearCachedProvider")]
    fn clear_cached_provider() -> js_sys::Promise;

    #[wasm_bindgen(js_name = "selectedAddress")]
    fn selected_address(session: &JsValue) -> Option<String>;

    #[wasm_bindgen(js_name = "listAccounts")]
    fn list_accounts(session: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_name = "getChainId")]
    fn get_chain_id(session: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(js_name = "getBalance")]
    fn get_balance(session: &JsValue, address: &str) -> js_sys::Promise;

    #[wasm_bindgen(js_name = "waitForTransaction")]
    fn wait_for_transaction(session: &JsValue, hash: &str) -> js_sys::Promise;

    #[wasm_bindgen(js_name = "signMessage")]
    fn sign_message(session: &JsValue, hex_bytes: &str) -> js_sys::Promise;

    #[wasm_bindgen(js_name = "sendRpc")]
    fn send_rpc(session: &JsValue, method: &str, params_json: &str) -> js_sys::Promise;

    #[wasm_bindgen(js_name = "bindContract")]
    fn bind_contract(session: &JsValue, address: &str, abi_json: &str) -> JsValue;

    #[wasm_bindgen(js_name = "onProviderEvents")]
    fn on_provider_events(session: &JsValue, callback: &js_sys::Function) -> Option<f64>;
}
