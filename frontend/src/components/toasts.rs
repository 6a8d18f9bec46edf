//! Toast notifications raised by contract events.

use leptos::*;

use crate::types::Toast;

#[component]
pub fn Toasts(toasts: ReadSignal<Vec<Toast>>) -> impl IntoView {
    view! {
        <div class="toasts">
            <For
                each=move || toasts.get()
                key=|toast| toast.id
                children=move |toast: Toast| {
                    view! {
                        <div class="toast">
                            "[" {toast.timestamp} "] " {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
