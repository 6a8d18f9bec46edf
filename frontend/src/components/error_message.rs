//! The single error banner.

use leptos::*;
use library_dapp::AppState;

#[component]
pub fn ErrorMessage(state: ReadSignal<AppState>, #[prop(into)] on_clear: Callback<()>) -> impl IntoView {
    view! {
        <Show when=move || state.with(|s| s.error.flag) fallback=|| view! {}>
            <div class="error-message">
                <span>{move || state.with(|s| s.error.message.clone().unwrap_or_default())}</span>
                <button class="clear-error" on:click=move |_| on_clear.call(())>
                    "Clear"
                </button>
            </div>
        </Show>
    }
}
