//! Book Library - Frontend Rust/Leptos Application
//!
//! A WebAssembly dashboard for borrowing and returning books tracked by
//! the book library contract.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (network, address, disconnect)                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Dashboard                                                   │
//! │  ├── ConnectButton (when disconnected)                       │
//! │  ├── AddBookForm (contract owner only)                       │
//! │  ├── BooksList (available / borrowed)                        │
//! │  ├── BalancesPanel                                           │
//! │  ├── SignaturePanel                                          │
//! │  └── ErrorMessage                                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Toasts                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! All chain logic lives in the `library_dapp` [`Controller`]; this crate
//! mirrors its state into a signal and turns clicks into controller calls.
//!
//! # Modules
//!
//! - [`config`] - Build-time configuration
//! - [`types`] - View-only types (toasts)
//! - [`components`] - UI components
//! - [`services`] - Wallet, contract and platform bindings

use std::future::Future;
use std::rc::Rc;

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use library_dapp::config::WRAP_APPROVAL_MESSAGE;
use library_dapp::{AppState, BookListKind, Controller};

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::Toast;

// Components
pub use components::*;

// Services
pub use services::{BrowserPlatform, JsContract, JsProvider, Web3ModalConnector};

// =============================================================================
// Application
// =============================================================================

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text=APP_NAME/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=Dashboard/>
                </Routes>
            </main>
        </Router>
    }
}

/// Turn an async controller call into a callback that spawns it.
fn dispatch<T, F, Fut>(controller: &Controller, action: F) -> Callback<T>
where
    T: 'static,
    F: Fn(Controller, T) -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    let controller = controller.clone();
    Callback::new(move |arg: T| spawn_local(action(controller.clone(), arg)))
}

#[component]
fn Dashboard() -> impl IntoView {
    let (toasts, set_toasts) = create_signal(Vec::<Toast>::new());

    let config = load_config();
    let connector = Rc::new(Web3ModalConnector::new(&config));
    let platform = Rc::new(BrowserPlatform::new(set_toasts));
    let controller = Controller::new(config, connector, platform);

    let (state, set_state) = create_signal(controller.state());
    controller.subscribe(move |snapshot: &AppState| set_state.set(snapshot.clone()));
    provide_context(controller.clone());

    // Reconnect silently when Web3Modal remembers a wallet
    {
        let controller = controller.clone();
        spawn_local(async move {
            if let Err(e) = controller.connect_cached().await {
                log::warn!("⚠️ Cached wallet reconnect failed: {}", e);
            }
        });
    }

    let on_connect = dispatch(&controller, |c, ()| async move {
        if let Err(e) = c.connect().await {
            log::error!("❌ Wallet connection failed: {}", e);
        }
    });
    let on_disconnect = dispatch(&controller, |c, ()| async move { c.disconnect().await });
    let on_add_book = dispatch(&controller, |c, (title, quantity): (String, u64)| async move {
        c.add_book(&title, quantity).await
    });
    let on_borrow = dispatch(&controller, |c, id: String| async move { c.borrow_book(&id).await });
    let on_return = dispatch(&controller, |c, id: String| async move { c.return_book(&id).await });
    let on_buy = dispatch(&controller, |c, ()| async move { c.buy_tokens().await });
    let on_unwrap = dispatch(&controller, |c, ()| async move { c.unwrap_tokens().await });
    let on_withdraw = dispatch(&controller, |c, ()| async move { c.withdraw_funds().await });
    let on_sign = dispatch(&controller, |c, ()| async move {
        c.sign_wrap_message(WRAP_APPROVAL_MESSAGE).await
    });
    let on_wrap_signed =
        dispatch(&controller, |c, ()| async move { c.wrap_with_signed_message().await });
    let on_sign_borrow =
        dispatch(&controller, |c, ()| async move { c.sign_for_borrowing_book().await });
    let on_borrow_signed =
        dispatch(&controller, |c, ()| async move { c.borrow_signed_book().await });

    let on_clear_error = {
        let controller = controller.clone();
        Callback::new(move |()| controller.clear_error())
    };

    let fetching = move || state.with(|s| s.fetching);
    let connected = move || state.with(|s| s.connected);
    let owner = move || state.with(|s| s.user_is_contract_owner);

    view! {
        <Wrapper>
            <Header state=state on_disconnect=on_disconnect/>
            <div class="content">
                <Show
                    when=move || !fetching()
                    fallback=|| view! {
                        <Column center=true span_height=true>
                            <div class="container">
                                <Loader/>
                            </div>
                        </Column>
                    }
                >
                    <Column max_width=1000u32 center=true span_height=true>
                        <Show
                            when=connected
                            fallback=move || view! { <ConnectButton on_click=on_connect/> }
                        >
                            <Show when=owner fallback=|| view! {}>
                                <AddBookForm state=state on_submit=on_add_book/>
                            </Show>
                            <BooksList state=state kind=BookListKind::Available on_select=on_borrow/>
                            <BooksList state=state kind=BookListKind::Borrowed on_select=on_return/>
                            <BalancesPanel
                                state=state
                                on_buy=on_buy
                                on_unwrap=on_unwrap
                                on_withdraw=on_withdraw
                            />
                            <SignaturePanel
                                state=state
                                on_sign=on_sign
                                on_wrap_signed=on_wrap_signed
                                on_sign_borrow=on_sign_borrow
                                on_borrow_signed=on_borrow_signed
                            />
                            <hr/>
                        </Show>
                        <ErrorMessage state=state on_clear=on_clear_error/>
                    </Column>
                </Show>
            </div>
        </Wrapper>
        <Toasts toasts=toasts/>
    }
}
