//! The application controller.
//!
//! [`Controller`] owns the session and the [`AppState`], runs every user
//! action against the contracts and keeps the state in sync with on-chain
//! events. Views register an observer with [`Controller::subscribe`] and
//! re-render from the snapshot they receive.
//!
//! All work happens on one thread. State lives in a `RefCell` that is never
//! borrowed across an `.await`; event listeners hold a `Weak` reference and
//! hand their refresh to [`Platform::spawn_local`].

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::{Rc, Weak};

use alloy_primitives::U256;
use serde_json::Value;

use crate::abi::{BOOK_LIBRARY_ABI, LIB_TOKEN_ABI, WRAPPER_ABI};
use crate::config::{
    DappConfig, BORROW_APPROVAL_MESSAGE, DEMO_BORROW_HASH, DEMO_BORROW_SIGNATURE, DEMO_RECEIVER,
    DEMO_WRAP_HASH, DEMO_WRAP_SIGNATURE, PERMIT_VALIDITY_SECS, UNWRAP_VALUE_LIB, WRAP_VALUE_ETH,
};
use crate::contracts::{get_contract, BookLibrary, LibToken, WrapperContract};
use crate::error::{ChainError, ChainResult, ControllerError, ControllerResult};
use crate::permit::{PermitRequest, PermitSignature};
use crate::provider::{
    ContractEvent, ContractHandle, EventListener, ListenerId, Platform, Provider, ProviderEvent,
    ProviderListener, Receipt, SentTransaction, WalletConnector,
};
use crate::state::{AppState, Book, BusyFlag};
use crate::units::{format_ether, parse_ether, parse_quantity};
use crate::utils::{
    hash_message, is_address, parse_address, same_address, split_signature, to_hex,
};

/// Callback invoked with a snapshot after every state change.
pub type Observer = Rc<dyn Fn(&AppState)>;

// =============================================================================
// Session
// =============================================================================

/// Handles bound for one wallet connection.
#[derive(Clone)]
struct Session {
    provider: Rc<dyn Provider>,
    book_library: Option<BookLibrary>,
    token: Option<LibToken>,
    wrapper: Option<WrapperContract>,
}

/// A listener registered for the current session.
enum Subscription {
    Provider(Rc<dyn Provider>, ListenerId),
    Contract(Rc<dyn ContractHandle>, ListenerId),
}

impl Subscription {
    fn cancel(self) {
        match self {
            Subscription::Provider(provider, id) => provider.off(id),
            Subscription::Contract(handle, id) => handle.off(id),
        }
    }
}

/// Contract events the dashboard reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DappEvent {
    BookAdded,
    BookBorrowed,
    BookReturned,
    TransferToLibrary,
    Permitted,
    UnwrapInBook,
    UnwrapInWrapper,
}

// =============================================================================
// Controller
// =============================================================================

struct Inner {
    config: DappConfig,
    connector: Rc<dyn WalletConnector>,
    platform: Rc<dyn Platform>,
    state: RefCell<AppState>,
    session: RefCell<Option<Session>>,
    subscriptions: RefCell<Vec<Subscription>>,
    observers: RefCell<Vec<Observer>>,
    /// Bumped whenever the listeners of a session are torn down.
    generation: Cell<u64>,
}

/// Shared handle to the dashboard controller.
#[derive(Clone)]
pub struct Controller {
    inner: Rc<Inner>,
}

impl Controller {
    pub fn new(
        config: DappConfig,
        connector: Rc<dyn WalletConnector>,
        platform: Rc<dyn Platform>,
    ) -> Self {
        let state = AppState {
            chain_id: config.default_chain_id,
            ..AppState::default()
        };
        Self {
            inner: Rc::new(Inner {
                config,
                connector,
                platform,
                state: RefCell::new(state),
                session: RefCell::new(None),
                subscriptions: RefCell::new(Vec::new()),
                observers: RefCell::new(Vec::new()),
                generation: Cell::new(0),
            }),
        }
    }

    pub fn config(&self) -> &DappConfig {
        &self.inner.config
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.inner.state.borrow().clone()
    }

    /// Register a callback run after every state change.
    pub fn subscribe(&self, observer: impl Fn(&AppState) + 'static) {
        self.inner.observers.borrow_mut().push(Rc::new(observer));
    }

    fn update(&self, f: impl FnOnce(&mut AppState)) {
        let snapshot = {
            let mut state = self.inner.state.borrow_mut();
            f(&mut state);
            state.clone()
        };
        let observers: Vec<Observer> = self.inner.observers.borrow().clone();
        for observer in observers {
            observer(&snapshot);
        }
    }

    /// Whether no reset or reconnect happened since `generation` was read.
    fn is_current(&self, generation: u64) -> bool {
        let current = self.inner.generation.get() == generation;
        if !current {
            log::debug!("Dropping a refresh from a closed session");
        }
        current
    }

    fn set_busy(&self, flag: BusyFlag, busy: bool) {
        self.update(|state| state.busy.set(flag, busy));
    }

    // -------------------------------------------------------------------------
    // Errors
    // -------------------------------------------------------------------------

    /// Show `message` in the error banner. Empty messages are ignored.
    pub fn set_error_message(&self, message: &str) {
        if message.is_empty() {
            return;
        }
        let message = message.to_string();
        self.update(|state| {
            state.error.flag = true;
            state.error.message = Some(message);
        });
    }

    pub fn clear_error(&self) {
        self.update(|state| {
            state.error.flag = false;
            state.error.message = None;
        });
    }

    fn report_error(&self, action: &str, err: &ControllerError) {
        log::error!("❌ {} failed: {}", action, err);
        if let Some(message) = err.display_message() {
            self.set_error_message(&message);
        }
    }

    // -------------------------------------------------------------------------
    // Session access
    // -------------------------------------------------------------------------

    fn session(&self) -> ControllerResult<Session> {
        self.inner
            .session
            .borrow()
            .clone()
            .ok_or(ControllerError::NotConnected)
    }

    fn provider(&self) -> ControllerResult<Rc<dyn Provider>> {
        Ok(self.session()?.provider)
    }

    fn library(&self) -> ControllerResult<BookLibrary> {
        self.session()?
            .book_library
            .ok_or(ControllerError::ContractUnavailable("BookLibrary"))
    }

    fn token(&self) -> ControllerResult<LibToken> {
        self.session()?
            .token
            .ok_or(ControllerError::ContractUnavailable("LIBToken"))
    }

    fn wrapper(&self) -> ControllerResult<WrapperContract> {
        self.session()?
            .wrapper
            .ok_or(ControllerError::ContractUnavailable("WrapperContract"))
    }

    // -------------------------------------------------------------------------
    // Connection lifecycle
    // -------------------------------------------------------------------------

    /// Reconnect without prompting when the wallet choice is cached.
    pub async fn connect_cached(&self) -> ControllerResult<()> {
        if !self.inner.connector.has_cached_provider() {
            log::debug!("No cached wallet provider");
            return Ok(());
        }
        self.connect().await
    }

    /// Connect a wallet, bind the contracts, load everything and subscribe
    /// to events.
    pub async fn connect(&self) -> ControllerResult<()> {
        log::info!("🔌 Connecting wallet...");
        self.unsubscribe_all();
        self.update(|state| state.fetching = true);

        let established = self.establish_session().await;
        self.update(|state| state.fetching = false);
        if let Err(err) = established {
            self.report_error("connect", &err);
            return Err(err);
        }

        if let Err(err) = self.refresh_all().await {
            self.report_error("initial refresh", &err);
        }
        self.subscribe_to_events();
        Ok(())
    }

    async fn establish_session(&self) -> ControllerResult<()> {
        let provider = self.inner.connector.connect().await?;

        let address = match provider.selected_address() {
            Some(address) => address,
            None => provider
                .accounts()
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| ControllerError::Wallet("no account available".into()))?,
        };
        let chain_id = provider.chain_id().await?;
        log::info!("✅ Wallet connected: {} on chain {}", address, chain_id);

        let mut session = Session {
            provider: provider.clone(),
            book_library: None,
            token: None,
            wrapper: None,
        };
        let mut owner = None;

        let library_address = self.inner.config.book_library_address.clone();
        if let Some(parsed) = parse_address(&library_address) {
            let library_address = parsed.to_checksum(None);
            let library = BookLibrary::new(get_contract(&*provider, &library_address, BOOK_LIBRARY_ABI));

            let token_address = library.lib_token().await?;
            if is_address(&token_address) {
                session.token = Some(LibToken::new(get_contract(&*provider, &token_address, LIB_TOKEN_ABI)));
            } else {
                log::warn!("Library reports an invalid token address: {}", token_address);
            }

            owner = Some(library.owner().await?);

            let wrapper_address = library.wrapper_contract().await?;
            if is_address(&wrapper_address) {
                session.wrapper = Some(WrapperContract::new(get_contract(&*provider, &wrapper_address, WRAPPER_ABI)));
            } else {
                log::warn!("Library reports an invalid wrapper address: {}", wrapper_address);
            }

            session.book_library = Some(library);
        } else {
            log::warn!(
                "BOOK_LIBRARY_ADDRESS {:?} is not a valid address; contracts are disabled",
                library_address
            );
        }

        let user_is_owner = owner
            .as_deref()
            .map(|owner| same_address(owner, &address))
            .unwrap_or(false);
        let book_library_address = session.book_library.as_ref().map(BookLibrary::address);
        let token_address = session.token.as_ref().map(LibToken::address);
        let wrapper_address = session.wrapper.as_ref().map(WrapperContract::address);

        *self.inner.session.borrow_mut() = Some(session);
        self.update(|state| {
            state.connected = true;
            state.address = address;
            state.chain_id = chain_id;
            state.book_library_address = book_library_address;
            state.token_address = token_address;
            state.wrapper_address = wrapper_address;
            state.contract_owner = owner;
            state.user_is_contract_owner = user_is_owner;
        });
        Ok(())
    }

    /// Forget the wallet, drop every listener, reset state and reload.
    pub async fn reset(&self) {
        log::info!("🔌 Resetting session");
        self.inner.connector.clear_cached_provider().await;
        self.unsubscribe_all();
        self.inner.session.borrow_mut().take();
        let chain_id = self.inner.config.default_chain_id;
        self.update(|state| {
            *state = AppState {
                chain_id,
                ..AppState::default()
            }
        });
        self.inner.platform.reload();
    }

    /// Alias of [`Controller::reset`].
    pub async fn disconnect(&self) {
        self.reset().await
    }

    // -------------------------------------------------------------------------
    // Refreshes
    // -------------------------------------------------------------------------

    /// Reload everything that depends on a bound contract.
    pub async fn refresh_all(&self) -> ControllerResult<()> {
        let session = self.session()?;
        if session.book_library.is_some() {
            self.refresh_available_books().await?;
            self.refresh_borrowed_books().await?;
            self.refresh_rent_price().await?;
        }
        if session.token.is_some() {
            self.refresh_user_balance().await?;
            self.refresh_contract_balances().await?;
        }
        Ok(())
    }

    /// All book keys in contract index order.
    pub async fn get_book_ids(&self) -> ControllerResult<Vec<String>> {
        let library = self.library()?;
        Ok(book_ids(&library).await?)
    }

    /// Reload the inventory.
    pub async fn refresh_available_books(&self) -> ControllerResult<()> {
        let library = self.library()?;
        let generation = self.inner.generation.get();
        self.set_busy(BusyFlag::BooksList, true);
        let loaded = load_books(&library).await;
        if !self.is_current(generation) {
            return Ok(());
        }
        self.set_busy(BusyFlag::BooksList, false);
        let books = loaded?;
        log::debug!("Loaded {} books", books.len());
        self.update(|state| state.available_books = books);
        Ok(())
    }

    /// Reload the books held by the connected address.
    pub async fn refresh_borrowed_books(&self) -> ControllerResult<()> {
        let library = self.library()?;
        let address = self.inner.state.borrow().address.clone();
        let generation = self.inner.generation.get();
        self.set_busy(BusyFlag::BorrowedBooksList, true);
        let loaded = load_borrowed_books(&library, &address).await;
        if !self.is_current(generation) {
            return Ok(());
        }
        self.set_busy(BusyFlag::BorrowedBooksList, false);
        let books = loaded?;
        self.update(|state| state.borrowed_books = books);
        Ok(())
    }

    /// Reload the connected user's LIB balance.
    pub async fn refresh_user_balance(&self) -> ControllerResult<()> {
        let token = self.token()?;
        let address = self.inner.state.borrow().address.clone();
        let generation = self.inner.generation.get();
        let balance = token.balance_of(&address).await?;
        if !self.is_current(generation) {
            return Ok(());
        }
        self.update(|state| state.balances.user_lib = Some(format_ether(balance)));
        Ok(())
    }

    /// Reload the library's LIB and ETH balances and the wrapper's ETH.
    pub async fn refresh_contract_balances(&self) -> ControllerResult<()> {
        let token = self.token()?;
        let library = self.library()?;
        let provider = self.provider()?;
        let library_address = library.address();
        let generation = self.inner.generation.get();

        let library_lib = token.balance_of(&library_address).await?;
        let library_eth = provider.get_balance(&library_address).await?;
        let wrapper_eth = match self.session()?.wrapper {
            Some(wrapper) => Some(provider.get_balance(&wrapper.address()).await?),
            None => None,
        };
        if !self.is_current(generation) {
            return Ok(());
        }

        self.update(|state| {
            state.balances.library_lib = Some(format_ether(library_lib));
            state.balances.library_eth = Some(format_ether(library_eth));
            state.balances.wrapper_eth = wrapper_eth.map(format_ether);
        });
        Ok(())
    }

    pub async fn refresh_rent_price(&self) -> ControllerResult<()> {
        let library = self.library()?;
        let generation = self.inner.generation.get();
        let price = library.rent_price().await?;
        if !self.is_current(generation) {
            return Ok(());
        }
        self.update(|state| state.rent_price = Some(price));
        Ok(())
    }

    async fn refresh_balances(&self) {
        if let Err(err) = self.refresh_user_balance().await {
            log::error!("❌ Refreshing user balance failed: {}", err);
        }
        if let Err(err) = self.refresh_contract_balances().await {
            log::error!("❌ Refreshing contract balances failed: {}", err);
        }
    }

    async fn current_rent_price(&self) -> ControllerResult<U256> {
        let cached = self.inner.state.borrow().rent_price;
        match cached {
            Some(price) => Ok(price),
            None => {
                self.refresh_rent_price().await?;
                self.inner
                    .state
                    .borrow()
                    .rent_price
                    .ok_or(ControllerError::ContractUnavailable("BookLibrary"))
            }
        }
    }

    // -------------------------------------------------------------------------
    // Transactions
    // -------------------------------------------------------------------------

    /// Send, record the hash, wait for the receipt and report failures.
    ///
    /// The busy flag is cleared on every path. A mined-but-reverted receipt
    /// is only logged.
    async fn run_transaction<Fut>(
        &self,
        action: &'static str,
        flag: Option<BusyFlag>,
        send: Fut,
    ) -> Option<Receipt>
    where
        Fut: Future<Output = ControllerResult<SentTransaction>>,
    {
        log::info!("📤 {}...", action);
        if let Some(flag) = flag {
            self.set_busy(flag, true);
        }
        let outcome = self.confirm(send).await;
        if let Some(flag) = flag {
            self.set_busy(flag, false);
        }

        match outcome {
            Ok(receipt) if receipt.is_success() => {
                log::info!("✅ {} confirmed: {}", action, receipt.transaction_hash);
                Some(receipt)
            }
            Ok(receipt) => {
                log::warn!(
                    "⚠️ {} mined with status {}: {}",
                    action,
                    receipt.status,
                    receipt.transaction_hash
                );
                Some(receipt)
            }
            Err(err) => {
                self.report_error(action, &err);
                None
            }
        }
    }

    async fn confirm<Fut>(&self, send: Fut) -> ControllerResult<Receipt>
    where
        Fut: Future<Output = ControllerResult<SentTransaction>>,
    {
        let tx = send.await?;
        log::info!("⏳ Waiting for {}", tx.hash);
        let hash = tx.hash.clone();
        self.update(|state| state.transaction_hash = Some(hash));
        let provider = self.provider()?;
        Ok(provider.wait_for_transaction(&tx).await?)
    }

    /// Add `quantity` copies of `title` (owner only).
    pub async fn add_book(&self, title: &str, quantity: u64) {
        self.run_transaction("addBook", Some(BusyFlag::AddBook), self.send_add_book(title, quantity))
            .await;
    }

    async fn send_add_book(&self, title: &str, quantity: u64) -> ControllerResult<SentTransaction> {
        let library = self.library()?;
        Ok(library.add_book(title, quantity).await?)
    }

    /// Borrow `book_id`, paying the rent through a signed permit.
    pub async fn borrow_book(&self, book_id: &str) {
        self.run_transaction("borrowBookById", Some(BusyFlag::BorrowBook), self.send_borrow_book(book_id))
            .await;
    }

    async fn send_borrow_book(&self, book_id: &str) -> ControllerResult<SentTransaction> {
        let library = self.library()?;
        let rent_price = self.current_rent_price().await?;
        let permit = self.on_attempt_to_approve().await?;
        Ok(library.borrow_book_by_id(book_id, rent_price, &permit).await?)
    }

    /// Return a borrowed book.
    pub async fn return_book(&self, book_id: &str) {
        self.run_transaction("returnBookById", Some(BusyFlag::ReturnBook), self.send_return_book(book_id))
            .await;
    }

    async fn send_return_book(&self, book_id: &str) -> ControllerResult<SentTransaction> {
        let library = self.library()?;
        Ok(library.return_book_by_id(book_id).await?)
    }

    /// Wrap 0.1 ETH into LIB for the connected user.
    pub async fn buy_tokens(&self) {
        self.run_transaction("wrap", Some(BusyFlag::ChangingBalances), self.send_wrap())
            .await;
        self.refresh_balances().await;
    }

    async fn send_wrap(&self) -> ControllerResult<SentTransaction> {
        let wrapper = self.wrapper()?;
        let value = parse_ether(WRAP_VALUE_ETH)?;
        Ok(wrapper.wrap(value).await?)
    }

    /// Exchange 0.01 LIB held by the library back into ETH (owner only).
    pub async fn unwrap_tokens(&self) {
        self.run_transaction("exchangeTokens", Some(BusyFlag::ChangingBalances), self.send_exchange())
            .await;
        self.refresh_balances().await;
    }

    async fn send_exchange(&self) -> ControllerResult<SentTransaction> {
        let library = self.library()?;
        let amount = parse_ether(UNWRAP_VALUE_LIB)?;
        Ok(library.exchange_tokens(amount).await?)
    }

    /// Withdraw the library's whole ETH balance to the owner.
    pub async fn withdraw_funds(&self) {
        self.run_transaction("withdraw", Some(BusyFlag::ChangingBalances), self.send_withdraw())
            .await;
        self.refresh_balances().await;
    }

    async fn send_withdraw(&self) -> ControllerResult<SentTransaction> {
        let library = self.library()?;
        let provider = self.provider()?;
        let balance = provider.get_balance(&library.address()).await?;
        Ok(library.withdraw(balance).await?)
    }

    // -------------------------------------------------------------------------
    // Signatures
    // -------------------------------------------------------------------------

    /// Sign an EIP-2612 permit letting the library spend the rent price.
    pub async fn on_attempt_to_approve(&self) -> ControllerResult<PermitSignature> {
        let provider = self.provider()?;
        let token = self.token()?;
        let library = self.library()?;
        let owner = self.inner.state.borrow().address.clone();

        let nonce = token.nonces(&owner).await?;
        let token_name = token.name().await?;
        let value = self.current_rent_price().await?;
        let deadline = self.inner.platform.now_millis() / 1000 + PERMIT_VALIDITY_SECS;

        let request = PermitRequest {
            token_name,
            token_address: token.address(),
            owner,
            spender: library.address(),
            value,
            nonce,
            deadline,
        };
        log::debug!("Requesting permit signature, nonce {}", nonce);
        let signature = provider
            .send_rpc("eth_signTypedData_v4", request.rpc_params())
            .await?;
        let signature = signature
            .as_str()
            .ok_or_else(|| ControllerError::InvalidSignature(signature.to_string()))?;
        Ok(PermitSignature::new(split_signature(signature)?, deadline))
    }

    async fn sign_and_store(&self, message: &str) -> ControllerResult<()> {
        let provider = self.provider()?;
        let hash = hash_message(message);
        let signature = provider.sign_message(&hash).await?;
        let hashed = to_hex(hash);
        log::info!("✍️ Signed {}: {}", hashed, signature);
        self.update(|state| {
            state.hashed_message = Some(hashed);
            state.signed_message = Some(signature);
        });
        Ok(())
    }

    /// Hash and sign `message`, keeping both for display.
    pub async fn sign_wrap_message(&self, message: &str) {
        if let Err(err) = self.sign_and_store(message).await {
            self.report_error("signMessage", &err);
        }
    }

    /// Sign the borrow approval message, then approve the rent price.
    pub async fn sign_for_borrowing_book(&self) {
        if let Err(err) = self.sign_and_store(BORROW_APPROVAL_MESSAGE).await {
            self.report_error("signForBorrowingBook", &err);
            return;
        }
        self.run_transaction("approve", None, self.send_approve()).await;
    }

    async fn send_approve(&self) -> ControllerResult<SentTransaction> {
        let token = self.token()?;
        let library = self.library()?;
        let rent_price = self.current_rent_price().await?;
        Ok(token.approve(&library.address(), rent_price).await?)
    }

    /// Replay the stored borrow approval for the first book.
    pub async fn borrow_signed_book(&self) {
        self.run_transaction("borrowWithSignature", None, self.send_signed_borrow())
            .await;
    }

    async fn send_signed_borrow(&self) -> ControllerResult<SentTransaction> {
        let library = self.library()?;
        let book_id = book_ids(&library)
            .await?
            .into_iter()
            .next()
            .ok_or(ControllerError::EmptyLibrary)?;
        let signature = split_signature(DEMO_BORROW_SIGNATURE)?;
        Ok(library
            .borrow_with_signature(DEMO_BORROW_HASH, &signature, DEMO_RECEIVER, &book_id)
            .await?)
    }

    /// Replay the stored wrap approval with 0.1 ETH.
    pub async fn wrap_with_signed_message(&self) {
        self.run_transaction("wrapWithSignature", None, self.send_signed_wrap())
            .await;
    }

    async fn send_signed_wrap(&self) -> ControllerResult<SentTransaction> {
        let wrapper = self.wrapper()?;
        let signature = split_signature(DEMO_WRAP_SIGNATURE)?;
        let value = parse_ether(WRAP_VALUE_ETH)?;
        Ok(wrapper
            .wrap_with_signature(DEMO_WRAP_HASH, &signature, DEMO_RECEIVER, value)
            .await?)
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    fn unsubscribe_all(&self) {
        self.inner.generation.set(self.inner.generation.get() + 1);
        let subscriptions = std::mem::take(&mut *self.inner.subscriptions.borrow_mut());
        if !subscriptions.is_empty() {
            log::debug!("Removing {} listeners", subscriptions.len());
        }
        for subscription in subscriptions {
            subscription.cancel();
        }
    }

    fn subscribe_to_events(&self) {
        let session = match self.session() {
            Ok(session) => session,
            Err(_) => return,
        };
        let mut subscriptions = Vec::new();

        if let Some(id) = session.provider.on(self.provider_listener()) {
            subscriptions.push(Subscription::Provider(session.provider.clone(), id));
        }

        if let Some(library) = &session.book_library {
            for (event, kind) in [
                ("NewBookAdded", DappEvent::BookAdded),
                ("BookBorrowed", DappEvent::BookBorrowed),
                ("BookReturned", DappEvent::BookReturned),
                ("UnwrapInBookContract", DappEvent::UnwrapInBook),
            ] {
                let id = library.on(event, self.contract_listener(kind));
                subscriptions.push(Subscription::Contract(library.handle().clone(), id));
            }

            if let Some(token) = &session.token {
                let id = token.on_transfer_to(
                    &library.address(),
                    self.contract_listener(DappEvent::TransferToLibrary),
                );
                subscriptions.push(Subscription::Contract(token.handle().clone(), id));
                let id = token.on("LogPermitted", self.contract_listener(DappEvent::Permitted));
                subscriptions.push(Subscription::Contract(token.handle().clone(), id));
            }
        }

        if let Some(wrapper) = &session.wrapper {
            let id = wrapper.on(
                "UnwrapInWrapperContract",
                self.contract_listener(DappEvent::UnwrapInWrapper),
            );
            subscriptions.push(Subscription::Contract(wrapper.handle().clone(), id));
        }

        log::debug!("Registered {} listeners", subscriptions.len());
        self.inner.subscriptions.borrow_mut().extend(subscriptions);
    }

    /// Upgrade a listener's weak reference if its session is still current.
    fn live(inner: &Weak<Inner>, generation: u64) -> Option<Controller> {
        let inner = inner.upgrade()?;
        if inner.generation.get() != generation {
            log::debug!("Ignoring event from a closed session");
            return None;
        }
        Some(Controller { inner })
    }

    fn contract_listener(&self, kind: DappEvent) -> EventListener {
        let inner = Rc::downgrade(&self.inner);
        let generation = self.inner.generation.get();
        Rc::new(move |event: ContractEvent| {
            if let Some(controller) = Self::live(&inner, generation) {
                let platform = controller.inner.platform.clone();
                platform.spawn_local(Box::pin(async move {
                    controller.handle_contract_event(kind, event).await;
                }));
            }
        })
    }

    fn provider_listener(&self) -> ProviderListener {
        let inner = Rc::downgrade(&self.inner);
        let generation = self.inner.generation.get();
        Rc::new(move |event: ProviderEvent| {
            if let Some(controller) = Self::live(&inner, generation) {
                let platform = controller.inner.platform.clone();
                platform.spawn_local(Box::pin(async move {
                    controller.handle_provider_event(event).await;
                }));
            }
        })
    }

    fn log_refresh(what: &str, result: ControllerResult<()>) {
        if let Err(err) = result {
            log::error!("❌ Refreshing {} failed: {}", what, err);
        }
    }

    async fn handle_contract_event(&self, kind: DappEvent, event: ContractEvent) {
        log::debug!("📥 {} {:?}", event.name, event.args);
        match kind {
            DappEvent::BookAdded => {
                Self::log_refresh("books", self.refresh_available_books().await);
                self.inner.platform.notify("Book added");
            }
            DappEvent::BookBorrowed => {
                Self::log_refresh("books", self.refresh_available_books().await);
                Self::log_refresh("borrowed books", self.refresh_borrowed_books().await);
                Self::log_refresh("user balance", self.refresh_user_balance().await);
                Self::log_refresh("contract balances", self.refresh_contract_balances().await);
                self.inner.platform.notify("Book borrowed");
            }
            DappEvent::BookReturned => {
                Self::log_refresh("books", self.refresh_available_books().await);
                Self::log_refresh("borrowed books", self.refresh_borrowed_books().await);
                self.inner.platform.notify("Book returned");
            }
            DappEvent::TransferToLibrary => {
                let reference = event
                    .block_hash
                    .or(event.transaction_hash)
                    .unwrap_or_default();
                self.inner.platform.notify(&reference);
            }
            DappEvent::Permitted => {
                log::debug!("LogPermitted: {:?}", event.args);
            }
            DappEvent::UnwrapInBook | DappEvent::UnwrapInWrapper => {
                let amount = event
                    .args
                    .first()
                    .and_then(parse_quantity)
                    .map(format_ether)
                    .unwrap_or_default();
                log::debug!("{}: {} ETH", event.name, amount);
            }
        }
    }

    async fn handle_provider_event(&self, event: ProviderEvent) {
        match event {
            ProviderEvent::AccountsChanged(accounts) => match accounts.into_iter().next() {
                None => {
                    log::info!("Wallet locked");
                    self.reset().await;
                }
                Some(address) => {
                    log::info!("👤 Account changed: {}", address);
                    self.update(|state| {
                        state.user_is_contract_owner = state
                            .contract_owner
                            .as_deref()
                            .map(|owner| same_address(owner, &address))
                            .unwrap_or(false);
                        state.address = address;
                    });
                    if self.library().is_ok() {
                        Self::log_refresh("borrowed books", self.refresh_borrowed_books().await);
                    }
                    if self.token().is_ok() {
                        Self::log_refresh("user balance", self.refresh_user_balance().await);
                    }
                }
            },
            ProviderEvent::ChainChanged(reported) => {
                let chain_id = match self.provider() {
                    Ok(provider) => provider.chain_id().await.unwrap_or(reported),
                    Err(_) => reported,
                };
                log::info!("🔗 Chain changed: {}", chain_id);
                self.update(|state| state.chain_id = chain_id);
            }
            ProviderEvent::Disconnected => {
                log::info!("Wallet disconnected");
                self.reset().await;
            }
        }
    }
}

// =============================================================================
// Contract reads
// =============================================================================

async fn book_ids(library: &BookLibrary) -> ChainResult<Vec<String>> {
    let count = library.get_count().await?;
    if usize::try_from(count).is_err() {
        return Err(ChainError::invalid_response("getCount", &Value::from(count)));
    }
    let mut ids = Vec::new();
    for index in 0..count {
        ids.push(library.book_key(index).await?);
    }
    Ok(ids)
}

async fn load_books(library: &BookLibrary) -> ChainResult<Vec<Book>> {
    let mut books = Vec::new();
    for id in book_ids(library).await? {
        books.push(library.book(&id).await?);
    }
    Ok(books)
}

async fn load_borrowed_books(library: &BookLibrary, user: &str) -> ChainResult<Vec<Book>> {
    let mut books = Vec::new();
    for id in book_ids(library).await? {
        if library.user_borrowed_book(user, &id).await? {
            books.push(library.book(&id).await?);
        }
    }
    Ok(books)
}
