use leptos::*;

#[component]
pub fn ConnectButton(#[prop(into)] on_click: Callback<()>) -> impl IntoView {
    view! {
        <button class="connect-button" on:click=move |_| on_click.call(())>
            "Connect"
        </button>
    }
}
