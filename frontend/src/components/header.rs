use leptos::*;
use library_dapp::chains::get_chain_data;
use library_dapp::utils::ellipse_address;
use library_dapp::AppState;

#[component]
pub fn Header(state: ReadSignal<AppState>, #[prop(into)] on_disconnect: Callback<()>) -> impl IntoView {
    let connected = move || state.with(|s| s.connected);
    let network = move || state.with(|s| get_chain_data(s.chain_id).name);
    let address = move || state.with(|s| ellipse_address(&s.address));

    view! {
        <header>
            <div class="header-left">
                <a href="#" class="logo">"BOOK LIBRARY"</a>
                <Show when=connected fallback=|| view! {}>
                    <span class="badge">{network}</span>
                </Show>
            </div>
            <div class="header-right">
                <Show
                    when=connected
                    fallback=|| view! { <span class="wallet-status">"Not connected"</span> }
                >
                    <div class="wallet-status connected">
                        <span class="wallet-dot connected"></span>
                        <span>{address}</span>
                    </div>
                    <button class="disconnect" on:click=move |_| on_disconnect.call(())>
                        "Disconnect"
                    </button>
                </Show>
            </div>
        </header>
    }
}
