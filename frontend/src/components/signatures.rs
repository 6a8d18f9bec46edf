//! Buttons for the signed-message flows.

use leptos::*;
use library_dapp::AppState;

#[component]
pub fn SignaturePanel(
    state: ReadSignal<AppState>,
    #[prop(into)] on_sign: Callback<()>,
    #[prop(into)] on_wrap_signed: Callback<()>,
    #[prop(into)] on_sign_borrow: Callback<()>,
    #[prop(into)] on_borrow_signed: Callback<()>,
) -> impl IntoView {
    let signature = move || {
        state.with(|s| match (&s.hashed_message, &s.signed_message) {
            (Some(hash), Some(signature)) => Some((hash.clone(), signature.clone())),
            _ => None,
        })
    };

    view! {
        <div class="signatures">
            <div>
                <button on:click=move |_| on_sign.call(())>"Sign a message"</button>
            </div>
            <div>
                <button on:click=move |_| on_wrap_signed.call(())>"Wrap tokens with signing"</button>
            </div>
            <div>
                <button on:click=move |_| on_sign_borrow.call(())>"Sign for borrowing"</button>
            </div>
            <div>
                <button on:click=move |_| on_borrow_signed.call(())>"Borrow signed book"</button>
            </div>
            {move || signature().map(|(hash, signature)| view! {
                <div class="signed-message">
                    <div>"Hashed message: " <code>{hash}</code></div>
                    <div>"Signature: " <code>{signature}</code></div>
                </div>
            })}
        </div>
    }
}
