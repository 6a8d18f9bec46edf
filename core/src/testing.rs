//! In-memory chain used by the controller tests.
//!
//! [`MockChain`] simulates the library, token and wrapper contracts closely
//! enough to exercise every controller path: inventory, loans, balances,
//! reverts (with the nested payload shapes wallets produce), receipts and
//! synchronous event delivery.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use alloy_primitives::U256;
use async_trait::async_trait;
use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use futures::task::LocalSpawnExt;
use serde_json::{json, Value};

use crate::config::DappConfig;
use crate::controller::Controller;
use crate::error::{ChainError, ChainResult};
use crate::provider::{
    ContractEvent, ContractHandle, EventFilter, EventListener, ListenerId, Platform, Provider,
    ProviderEvent, ProviderListener, Receipt, SentTransaction, TxOverrides, WalletConnector,
};
use crate::state::AppState;
use crate::units::parse_quantity;
use crate::utils::{hash_message, to_hex};

pub const LIBRARY: &str = "0x1000000000000000000000000000000000000001";
pub const TOKEN: &str = "0x2000000000000000000000000000000000000002";
pub const WRAPPER: &str = "0x3000000000000000000000000000000000000003";
pub const OWNER: &str = "0x4000000000000000000000000000000000000004";
pub const READER: &str = "0x5000000000000000000000000000000000000005";

/// Signature returned by every mock signing request.
pub const MOCK_SIGNATURE: &str = "0x111111111111111111111111111111111111111111111111111111111111111122222222222222222222222222222222222222222222222222222222222222221b";

/// Shape of the error produced when a transaction reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertStyle {
    /// ethers.js style: `{ message, error: { message } }`.
    Nested,
    /// Raw JSON-RPC style: `{ message, data: { message } }`.
    DataOnly,
    /// No nested payload at all.
    Bare,
}

struct Registered {
    id: ListenerId,
    contract: String,
    event: String,
    filter: EventFilter,
    listener: EventListener,
}

/// Simulated chain state shared by every mock handle.
pub struct MockChain {
    books: RefCell<Vec<(String, String, u64)>>,
    loans: RefCell<HashSet<(String, String)>>,
    lib_balances: RefCell<HashMap<String, U256>>,
    eth_balances: RefCell<HashMap<String, U256>>,
    nonces: RefCell<HashMap<String, U256>>,
    rent_price: U256,
    token_address: RefCell<String>,
    next_id: Cell<u64>,
    receipts: RefCell<HashMap<String, u64>>,
    revert_receipts: Cell<bool>,
    revert_style: Cell<RevertStyle>,
    listeners: RefCell<Vec<Registered>>,
    provider_listeners: RefCell<Vec<(ListenerId, ProviderListener)>>,
    /// Contract reads wait on this until it resolves.
    gate: RefCell<Option<Shared<oneshot::Receiver<()>>>>,
    /// Every transaction sent: (contract, method, args, overrides).
    pub sent: RefCell<Vec<(String, String, Vec<Value>, TxOverrides)>>,
    /// Every raw RPC request.
    pub rpc_requests: RefCell<Vec<(String, Vec<Value>)>>,
    /// Every `personal_sign` payload.
    pub signed: RefCell<Vec<Vec<u8>>>,
}

fn key(address: &str) -> String {
    address.to_ascii_lowercase()
}

fn arg_str(args: &[Value], index: usize) -> String {
    args.get(index)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn arg_u256(args: &[Value], index: usize) -> U256 {
    args.get(index).and_then(parse_quantity).unwrap_or_default()
}

impl MockChain {
    pub fn new() -> Rc<Self> {
        let chain = Self {
            books: RefCell::new(Vec::new()),
            loans: RefCell::new(HashSet::new()),
            lib_balances: RefCell::new(HashMap::new()),
            eth_balances: RefCell::new(HashMap::new()),
            nonces: RefCell::new(HashMap::new()),
            rent_price: U256::from(10_000_000_000_000_000u64),
            token_address: RefCell::new(TOKEN.to_string()),
            next_id: Cell::new(1),
            receipts: RefCell::new(HashMap::new()),
            revert_receipts: Cell::new(false),
            revert_style: Cell::new(RevertStyle::Nested),
            listeners: RefCell::new(Vec::new()),
            provider_listeners: RefCell::new(Vec::new()),
            gate: RefCell::new(None),
            sent: RefCell::new(Vec::new()),
            rpc_requests: RefCell::new(Vec::new()),
            signed: RefCell::new(Vec::new()),
        };
        chain.set_lib_balance(READER, U256::from(1_000_000_000_000_000_000u64));
        chain.set_eth_balance(LIBRARY, U256::from(500_000_000_000_000_000u64));
        Rc::new(chain)
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    // -------------------------------------------------------------------------
    // Test setup
    // -------------------------------------------------------------------------

    /// Park every contract read until the returned sender fires or drops.
    pub fn hold_calls(&self) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        *self.gate.borrow_mut() = Some(gate.shared());
        release
    }

    /// Seed a book without going through a transaction.
    pub fn seed_book(&self, title: &str, copies: u64) -> String {
        let id = to_hex(hash_message(title));
        self.books.borrow_mut().push((id.clone(), title.to_string(), copies));
        id
    }

    /// Seed an active loan.
    pub fn seed_loan(&self, user: &str, book_id: &str) {
        self.loans.borrow_mut().insert((key(user), book_id.to_string()));
    }

    pub fn set_lib_balance(&self, address: &str, amount: U256) {
        self.lib_balances.borrow_mut().insert(key(address), amount);
    }

    pub fn set_eth_balance(&self, address: &str, amount: U256) {
        self.eth_balances.borrow_mut().insert(key(address), amount);
    }

    pub fn lib_balance(&self, address: &str) -> U256 {
        self.lib_balances.borrow().get(&key(address)).copied().unwrap_or_default()
    }

    pub fn eth_balance(&self, address: &str) -> U256 {
        self.eth_balances.borrow().get(&key(address)).copied().unwrap_or_default()
    }

    pub fn copies_of(&self, book_id: &str) -> Option<u64> {
        self.books
            .borrow()
            .iter()
            .find(|(id, _, _)| id == book_id)
            .map(|(_, _, copies)| *copies)
    }

    pub fn has_loan(&self, user: &str, book_id: &str) -> bool {
        self.loans.borrow().contains(&(key(user), book_id.to_string()))
    }

    /// Make the library report this token address.
    pub fn set_token_address(&self, address: &str) {
        *self.token_address.borrow_mut() = address.to_string();
    }

    /// Mine future transactions with status `0`.
    pub fn revert_receipts(&self, revert: bool) {
        self.revert_receipts.set(revert);
    }

    pub fn set_revert_style(&self, style: RevertStyle) {
        self.revert_style.set(style);
    }

    /// Number of contract listeners still registered.
    pub fn contract_listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Number of provider listeners still registered.
    pub fn provider_listener_count(&self) -> usize {
        self.provider_listeners.borrow().len()
    }

    pub fn sent_methods(&self) -> Vec<String> {
        self.sent.borrow().iter().map(|(_, method, _, _)| method.clone()).collect()
    }

    // -------------------------------------------------------------------------
    // Event delivery
    // -------------------------------------------------------------------------

    /// Deliver a contract event to every matching listener.
    pub fn emit(&self, contract: &str, event: &str, args: Vec<Value>) {
        let matching: Vec<EventListener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|l| key(&l.contract) == key(contract) && l.event == event)
            .filter(|l| {
                l.filter.iter().enumerate().all(|(i, expected)| match expected {
                    None => true,
                    Some(expected) => match (expected.as_str(), args.get(i).and_then(Value::as_str)) {
                        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                        _ => Some(expected) == args.get(i),
                    },
                })
            })
            .map(|l| l.listener.clone())
            .collect();

        let block = self.next_id();
        for listener in matching {
            listener(ContractEvent {
                name: event.to_string(),
                args: args.clone(),
                block_hash: Some(format!("0xb{:063x}", block)),
                transaction_hash: None,
            });
        }
    }

    /// Deliver a wallet event to every provider listener.
    pub fn emit_provider(&self, event: ProviderEvent) {
        let listeners: Vec<ProviderListener> = self
            .provider_listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(event.clone());
        }
    }

    // -------------------------------------------------------------------------
    // Contract simulation
    // -------------------------------------------------------------------------

    fn revert(&self, reason: &str) -> ChainError {
        let detail = format!("execution reverted: {}", reason);
        match self.revert_style.get() {
            RevertStyle::Nested => ChainError::with_error("cannot estimate gas", detail),
            RevertStyle::DataOnly => ChainError::with_data("Internal JSON-RPC error.", detail),
            RevertStyle::Bare => ChainError::msg(detail),
        }
    }

    fn call(&self, contract: &str, method: &str, args: &[Value]) -> ChainResult<Value> {
        let contract = key(contract);
        if contract == key(LIBRARY) {
            return match method {
                "getCount" => Ok(json!(self.books.borrow().len().to_string())),
                "bookKeys" => {
                    let index = arg_u256(args, 0).to::<usize>();
                    self.books
                        .borrow()
                        .get(index)
                        .map(|(id, _, _)| json!(id))
                        .ok_or_else(|| self.revert("index out of bounds"))
                }
                "books" => {
                    let id = arg_str(args, 0);
                    let books = self.books.borrow();
                    let (title, copies) = books
                        .iter()
                        .find(|(book_id, _, _)| *book_id == id)
                        .map(|(_, title, copies)| (title.clone(), *copies))
                        .unwrap_or_default();
                    Ok(json!({ "bookName": title, "numberOfCopies": copies }))
                }
                "userBorrowedBooks" => {
                    let borrowed = self.has_loan(&arg_str(args, 0), &arg_str(args, 1));
                    Ok(json!(if borrowed { 1 } else { 0 }))
                }
                "rentPrice" => Ok(json!(self.rent_price.to_string())),
                "owner" => Ok(json!(OWNER)),
                "LIBToken" => Ok(json!(self.token_address.borrow().clone())),
                "wrapperContract" => Ok(json!(WRAPPER)),
                other => Err(ChainError::msg(format!("no method {} on library", other))),
            };
        }
        if contract == key(TOKEN) {
            return match method {
                "balanceOf" => Ok(json!(self.lib_balance(&arg_str(args, 0)).to_string())),
                "name" => Ok(json!("LIBToken")),
                "nonces" => {
                    let nonce = self
                        .nonces
                        .borrow()
                        .get(&key(&arg_str(args, 0)))
                        .copied()
                        .unwrap_or_default();
                    Ok(json!(nonce.to_string()))
                }
                other => Err(ChainError::msg(format!("no method {} on token", other))),
            };
        }
        Err(ChainError::msg(format!("call to non-contract {}", contract)))
    }

    fn execute(
        &self,
        contract: &str,
        sender: &str,
        method: &str,
        args: &[Value],
        overrides: &TxOverrides,
    ) -> ChainResult<Vec<(String, String, Vec<Value>)>> {
        let contract = key(contract);
        let mut events = Vec::new();

        if contract == key(LIBRARY) {
            match method {
                "addBook" => {
                    if key(sender) != key(OWNER) {
                        return Err(self.revert("Ownable: caller is not the owner"));
                    }
                    let title = arg_str(args, 0);
                    let copies = arg_u256(args, 1).to::<u64>();
                    let id = to_hex(hash_message(&title));
                    let mut books = self.books.borrow_mut();
                    match books.iter_mut().find(|(book_id, _, _)| *book_id == id) {
                        Some(book) => book.2 += copies,
                        None => books.push((id.clone(), title.clone(), copies)),
                    }
                    events.push((LIBRARY.to_string(), "NewBookAdded".to_string(), vec![json!(id), json!(title), json!(copies)]));
                }
                "borrowBookById" | "borrowWithSignature" => {
                    let (id, borrower) = if method == "borrowBookById" {
                        (arg_str(args, 0), sender.to_string())
                    } else {
                        (arg_str(args, 5), arg_str(args, 4))
                    };
                    let copies = self
                        .copies_of(&id)
                        .ok_or_else(|| self.revert("Book does not exist"))?;
                    if copies == 0 {
                        return Err(self.revert("No copies left"));
                    }
                    if self.has_loan(&borrower, &id) {
                        return Err(self.revert("Book already borrowed"));
                    }
                    if method == "borrowBookById" {
                        let balance = self.lib_balance(&borrower);
                        if balance < self.rent_price {
                            return Err(self.revert("ERC20: transfer amount exceeds balance"));
                        }
                        self.set_lib_balance(&borrower, balance - self.rent_price);
                        let library_balance = self.lib_balance(LIBRARY);
                        self.set_lib_balance(LIBRARY, library_balance + self.rent_price);
                        let mut nonces = self.nonces.borrow_mut();
                        let nonce = nonces.entry(key(&borrower)).or_default();
                        *nonce += U256::from(1u64);
                        events.push((TOKEN.to_string(), "Transfer".to_string(), vec![json!(borrower), json!(LIBRARY), json!(self.rent_price.to_string())]));
                    }
                    if let Some(book) = self.books.borrow_mut().iter_mut().find(|(b, _, _)| *b == id) {
                        book.2 -= 1;
                    }
                    self.seed_loan(&borrower, &id);
                    events.push((LIBRARY.to_string(), "BookBorrowed".to_string(), vec![json!(id), json!(borrower)]));
                }
                "returnBookById" => {
                    let id = arg_str(args, 0);
                    if !self.has_loan(sender, &id) {
                        return Err(self.revert("You have not borrowed this book"));
                    }
                    self.loans.borrow_mut().remove(&(key(sender), id.clone()));
                    if let Some(book) = self.books.borrow_mut().iter_mut().find(|(b, _, _)| *b == id) {
                        book.2 += 1;
                    }
                    events.push((LIBRARY.to_string(), "BookReturned".to_string(), vec![json!(id), json!(sender)]));
                }
                "exchangeTokens" => {
                    if key(sender) != key(OWNER) {
                        return Err(self.revert("Ownable: caller is not the owner"));
                    }
                    let amount = arg_u256(args, 0);
                    let balance = self.lib_balance(LIBRARY);
                    if balance < amount {
                        return Err(self.revert("Not enough LIB"));
                    }
                    self.set_lib_balance(LIBRARY, balance - amount);
                    self.set_eth_balance(LIBRARY, self.eth_balance(LIBRARY) + amount);
                    events.push((LIBRARY.to_string(), "UnwrapInBookContract".to_string(), vec![json!(amount.to_string())]));
                }
                "withdraw" => {
                    if key(sender) != key(OWNER) {
                        return Err(self.revert("Ownable: caller is not the owner"));
                    }
                    let amount = arg_u256(args, 0);
                    let balance = self.eth_balance(LIBRARY);
                    if balance < amount {
                        return Err(self.revert("Not enough ETH"));
                    }
                    self.set_eth_balance(LIBRARY, balance - amount);
                    self.set_eth_balance(OWNER, self.eth_balance(OWNER) + amount);
                }
                other => return Err(ChainError::msg(format!("no method {} on library", other))),
            }
            return Ok(events);
        }

        if contract == key(TOKEN) {
            return match method {
                "approve" => Ok(events),
                other => Err(ChainError::msg(format!("no method {} on token", other))),
            };
        }

        if contract == key(WRAPPER) {
            let value = overrides.value.unwrap_or_default();
            let receiver = match method {
                "wrap" => sender.to_string(),
                "wrapWithSignature" => arg_str(args, 4),
                other => return Err(ChainError::msg(format!("no method {} on wrapper", other))),
            };
            if value.is_zero() {
                return Err(self.revert("Wrapping 0 ETH"));
            }
            self.set_lib_balance(&receiver, self.lib_balance(&receiver) + value);
            self.set_eth_balance(WRAPPER, self.eth_balance(WRAPPER) + value);
            events.push((TOKEN.to_string(), "Transfer".to_string(), vec![json!(WRAPPER), json!(receiver), json!(value.to_string())]));
            return Ok(events);
        }

        Err(ChainError::msg(format!("transaction to non-contract {}", contract)))
    }

    fn send(
        &self,
        contract: &str,
        sender: &str,
        method: &str,
        args: Vec<Value>,
        overrides: TxOverrides,
    ) -> ChainResult<SentTransaction> {
        let events = self.execute(contract, sender, method, &args, &overrides)?;
        self.sent
            .borrow_mut()
            .push((contract.to_string(), method.to_string(), args, overrides));

        let hash = format!("0x{:064x}", self.next_id());
        let status = if self.revert_receipts.get() { 0 } else { 1 };
        self.receipts.borrow_mut().insert(hash.clone(), status);

        for (contract, event, args) in events {
            self.emit(&contract, &event, args);
        }
        Ok(SentTransaction { hash })
    }
}

// =============================================================================
// Handles
// =============================================================================

/// A contract handle backed by [`MockChain`].
pub struct MockContract {
    chain: Rc<MockChain>,
    address: String,
    sender: String,
}

#[async_trait(?Send)]
impl ContractHandle for MockContract {
    fn address(&self) -> String {
        self.address.clone()
    }

    async fn call(&self, method: &str, args: Vec<Value>) -> ChainResult<Value> {
        let gate = self.chain.gate.borrow().clone();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.chain.call(&self.address, method, &args)
    }

    async fn send(
        &self,
        method: &str,
        args: Vec<Value>,
        overrides: TxOverrides,
    ) -> ChainResult<SentTransaction> {
        self.chain.send(&self.address, &self.sender, method, args, overrides)
    }

    fn on(&self, event: &str, filter: EventFilter, listener: EventListener) -> ListenerId {
        let id = ListenerId(self.chain.next_id());
        self.chain.listeners.borrow_mut().push(Registered {
            id,
            contract: self.address.clone(),
            event: event.to_string(),
            filter,
            listener,
        });
        id
    }

    fn off(&self, id: ListenerId) {
        self.chain.listeners.borrow_mut().retain(|l| l.id != id);
    }
}

/// A wallet connected to [`MockChain`] as `account`.
pub struct MockProvider {
    chain: Rc<MockChain>,
    account: String,
    chain_id: Cell<u64>,
}

impl MockProvider {
    pub fn switch_chain(&self, chain_id: u64) {
        self.chain_id.set(chain_id);
    }
}

#[async_trait(?Send)]
impl Provider for MockProvider {
    fn selected_address(&self) -> Option<String> {
        Some(self.account.clone())
    }

    async fn accounts(&self) -> ChainResult<Vec<String>> {
        Ok(vec![self.account.clone()])
    }

    async fn chain_id(&self) -> ChainResult<u64> {
        Ok(self.chain_id.get())
    }

    async fn get_balance(&self, address: &str) -> ChainResult<U256> {
        Ok(self.chain.eth_balance(address))
    }

    async fn wait_for_transaction(&self, tx: &SentTransaction) -> ChainResult<Receipt> {
        let status = self
            .chain
            .receipts
            .borrow()
            .get(&tx.hash)
            .copied()
            .ok_or_else(|| ChainError::msg(format!("unknown transaction {}", tx.hash)))?;
        Ok(Receipt {
            transaction_hash: tx.hash.clone(),
            status,
            block_hash: None,
        })
    }

    async fn sign_message(&self, message: &[u8]) -> ChainResult<String> {
        self.chain.signed.borrow_mut().push(message.to_vec());
        Ok(MOCK_SIGNATURE.to_string())
    }

    async fn send_rpc(&self, method: &str, params: Vec<Value>) -> ChainResult<Value> {
        self.chain
            .rpc_requests
            .borrow_mut()
            .push((method.to_string(), params));
        match method {
            "eth_signTypedData_v4" => Ok(json!(MOCK_SIGNATURE)),
            other => Err(ChainError::msg(format!("unsupported rpc {}", other))),
        }
    }

    fn contract(&self, address: &str, _abi: &'static str) -> Rc<dyn ContractHandle> {
        Rc::new(MockContract {
            chain: self.chain.clone(),
            address: address.to_string(),
            sender: self.account.clone(),
        })
    }

    fn on(&self, listener: ProviderListener) -> Option<ListenerId> {
        let id = ListenerId(self.chain.next_id());
        self.chain.provider_listeners.borrow_mut().push((id, listener));
        Some(id)
    }

    fn off(&self, id: ListenerId) {
        self.chain
            .provider_listeners
            .borrow_mut()
            .retain(|(existing, _)| *existing != id);
    }
}

/// Connector that always yields a [`MockProvider`] for one account.
pub struct MockConnector {
    chain: Rc<MockChain>,
    account: String,
    pub cached: Cell<bool>,
    pub cleared: Cell<u32>,
    pub fail_with: RefCell<Option<ChainError>>,
}

impl MockConnector {
    pub fn new(chain: Rc<MockChain>, account: &str) -> Rc<Self> {
        Rc::new(Self {
            chain,
            account: account.to_string(),
            cached: Cell::new(false),
            cleared: Cell::new(0),
            fail_with: RefCell::new(None),
        })
    }
}

#[async_trait(?Send)]
impl WalletConnector for MockConnector {
    fn has_cached_provider(&self) -> bool {
        self.cached.get()
    }

    async fn connect(&self) -> ChainResult<Rc<dyn Provider>> {
        if let Some(err) = self.fail_with.borrow_mut().take() {
            return Err(err);
        }
        self.cached.set(true);
        Ok(Rc::new(MockProvider {
            chain: self.chain.clone(),
            account: self.account.clone(),
            chain_id: Cell::new(4),
        }))
    }

    async fn clear_cached_provider(&self) {
        self.cached.set(false);
        self.cleared.set(self.cleared.get() + 1);
    }
}

/// Platform that queues spawned work on a [`LocalPool`].
pub struct MockPlatform {
    spawner: LocalSpawner,
    pub notifications: RefCell<Vec<String>>,
    pub reloads: Cell<u32>,
}

impl Platform for MockPlatform {
    fn spawn_local(&self, future: LocalBoxFuture<'static, ()>) {
        self.spawner
            .spawn_local(future)
            .expect("local pool accepts tasks");
    }

    fn notify(&self, message: &str) {
        self.notifications.borrow_mut().push(message.to_string());
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }

    fn now_millis(&self) -> u64 {
        1_700_000_000_000
    }
}

// =============================================================================
// Harness
// =============================================================================

/// A controller wired to a fresh mock chain.
pub struct Harness {
    pub pool: LocalPool,
    pub chain: Rc<MockChain>,
    pub connector: Rc<MockConnector>,
    pub platform: Rc<MockPlatform>,
    pub controller: Controller,
    /// Number of state notifications observed.
    pub updates: Rc<Cell<usize>>,
}

impl Harness {
    /// Harness for `account` with the library configured at `library`.
    pub fn new(account: &str, library: &str) -> Self {
        let pool = LocalPool::new();
        let chain = MockChain::new();
        let connector = MockConnector::new(chain.clone(), account);
        let platform = Rc::new(MockPlatform {
            spawner: pool.spawner(),
            notifications: RefCell::new(Vec::new()),
            reloads: Cell::new(0),
        });
        let controller = Controller::new(DappConfig::new(library), connector.clone(), platform.clone());
        let updates = Rc::new(Cell::new(0));
        let counter = updates.clone();
        controller.subscribe(move |_: &AppState| counter.set(counter.get() + 1));
        Self {
            pool,
            chain,
            connector,
            platform,
            controller,
            updates,
        }
    }

    /// Harness for a regular reader with a valid library address.
    pub fn reader() -> Self {
        Self::new(READER, LIBRARY)
    }

    /// Harness for the contract owner.
    pub fn owner() -> Self {
        Self::new(OWNER, LIBRARY)
    }

    /// Run spawned event handlers until nothing is left to do.
    pub fn settle(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Connect and drain the resulting work.
    pub fn connect(&mut self) {
        let controller = self.controller.clone();
        self.pool
            .run_until(controller.connect())
            .expect("mock wallet connects");
        self.settle();
    }

    pub fn state(&self) -> AppState {
        self.controller.state()
    }
}
