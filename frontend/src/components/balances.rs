//! Token and ETH balances with the buy, unwrap and withdraw buttons.

use leptos::*;
use library_dapp::AppState;

use crate::components::{Column, Loader};

fn shown(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

#[component]
pub fn BalancesPanel(
    state: ReadSignal<AppState>,
    #[prop(into)] on_buy: Callback<()>,
    #[prop(into)] on_unwrap: Callback<()>,
    #[prop(into)] on_withdraw: Callback<()>,
) -> impl IntoView {
    let changing = move || state.with(|s| s.busy.changing_balances);
    let owner = move || state.with(|s| s.user_is_contract_owner);
    let user_lib = move || state.with(|s| shown(&s.balances.user_lib));
    let library_lib = move || state.with(|s| shown(&s.balances.library_lib));
    let library_eth = move || state.with(|s| shown(&s.balances.library_eth));
    let wrapper_eth = move || state.with(|s| shown(&s.balances.wrapper_eth));

    view! {
        <div class="balances">
            <Show
                when=move || !changing()
                fallback=|| view! {
                    <Column center=true>
                        <div class="container">
                            <Loader/>
                        </div>
                    </Column>
                }
            >
                <div>
                    <span>"User current LIBToken balance is: " {user_lib}</span>
                    <button on:click=move |_| on_buy.call(())>"Buy LIBToken"</button>
                </div>
                <div>
                    <span>"Book library Contract LIBToken balance is: " {library_lib}</span>
                    <Show when=owner fallback=|| view! {}>
                        <button on:click=move |_| on_unwrap.call(())>
                            "unwrap Library contract lib tokens"
                        </button>
                    </Show>
                </div>
                <div>
                    <span>"Book library Contract ETH balance is: " {library_eth}</span>
                    <Show when=owner fallback=|| view! {}>
                        <button on:click=move |_| on_withdraw.call(())>
                            "withdraw library contract ETH"
                        </button>
                    </Show>
                </div>
                <div>
                    <span>"Wrapper Contract ETH balance is: " {wrapper_eth}</span>
                </div>
            </Show>
        </div>
    }
}
