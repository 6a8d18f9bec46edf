//! Contract handles backed by `ethers.Contract`.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use library_dapp::{
    ChainResult, ContractEvent, ContractHandle, EventFilter, EventListener, ListenerId,
    SentTransaction, TxOverrides,
};
use serde::Deserialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::{resolve_json, resolve_string};

/// Event payload produced by `onContractEvent`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventPayload {
    name: String,
    #[serde(default)]
    args: Vec<Value>,
    block_hash: Option<String>,
    transaction_hash: Option<String>,
}

impl From<EventPayload> for ContractEvent {
    fn from(payload: EventPayload) -> Self {
        ContractEvent {
            name: payload.name,
            args: payload.args,
            block_hash: payload.block_hash,
            transaction_hash: payload.transaction_hash,
        }
    }
}

/// A contract bound to the connected signer.
pub struct JsContract {
    contract: JsValue,
    address: String,
    listeners: RefCell<HashMap<ListenerId, Closure<dyn FnMut(String)>>>,
}

impl JsContract {
    pub fn new(contract: JsValue, address: &str) -> Self {
        Self {
            contract,
            address: address.to_string(),
            listeners: RefCell::new(HashMap::new()),
        }
    }
}

#[async_trait(?Send)]
impl ContractHandle for JsContract {
    fn address(&self) -> String {
        self.address.clone()
    }

    async fn call(&self, method: &str, args: Vec<Value>) -> ChainResult<Value> {
        let args = Value::Array(args).to_string();
        resolve_json(call_contract(&self.contract, method, &args)).await
    }

    async fn send(
        &self,
        method: &str,
        args: Vec<Value>,
        overrides: TxOverrides,
    ) -> ChainResult<SentTransaction> {
        let args = Value::Array(args).to_string();
        let value = overrides.value.map(|value| value.to_string());
        log::debug!("📤 {}.{}({})", self.address, method, args);
        let hash = resolve_string(send_transaction(&self.contract, method, &args, value.as_deref())).await?;
        Ok(SentTransaction { hash })
    }

    fn on(&self, event: &str, filter: EventFilter, listener: EventListener) -> ListenerId {
        let filter = serde_json::to_string(&filter).unwrap_or_else(|_| "[]".to_string());
        let event_name = event.to_string();
        let callback = Closure::wrap(Box::new(move |payload: String| {
            match serde_json::from_str::<EventPayload>(&payload) {
                Ok(payload) => listener(payload.into()),
                Err(e) => log::error!("❌ Malformed {} event: {}", event_name, e),
            }
        }) as Box<dyn FnMut(String)>);

        let handle = on_contract_event(&self.contract, event, &filter, callback.as_ref().unchecked_ref());
        let id = ListenerId(handle as u64);
        self.listeners.borrow_mut().insert(id, callback);
        id
    }

    fn off(&self, id: ListenerId) {
        remove_listener(id.0 as f64);
        self.listeners.borrow_mut().remove(&id);
    }
}

/// JavaScript functions from ethereum.js
#[wasm_bindgen(module = "/src/js/ethereum.js")]
extern "C" {
    #[wasm_bindgen(js_name = "callContract")]
    fn call_contract(contract: &JsValue, method: &str, args_json: &str) -> js_sys::Promise;

    #[wasm_bindgen(js_name = "sendTransaction")]
    fn send_transaction(
        contract: &JsValue,
        method: &str,
        args_json: &str,
        value: Option<&str>,
    ) -> js_sys::Promise;

    #[wasm_bindgen(js_name = "onContractEvent")]
    fn on_contract_event(
        contract: &JsValue,
        event: &str,
        filter_json: &str,
        callback: &js_sys::Function,
    ) -> f64;

    #[wasm_bindgen(js_name = "removeListener")]
    pub(crate) fn remove_listener(handle: f64);
}
