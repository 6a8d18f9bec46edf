//! Hash of the transaction an action is waiting for.

use leptos::*;

#[component]
pub fn TransactionDetails(#[prop(into)] transaction_hash: MaybeSignal<Option<String>>) -> impl IntoView {
    view! {
        <div class="transaction-details">
            {move || match transaction_hash.get() {
                Some(hash) => view! {
                    <span>"Transaction hash: "</span>
                    <code class="transaction-hash">{hash}</code>
                }
                .into_view(),
                None => view! { <span>"Waiting for wallet confirmation..."</span> }.into_view(),
            }}
        </div>
    }
}
