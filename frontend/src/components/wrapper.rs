//! Page-width wrapper

use leptos::*;

#[component]
pub fn Wrapper(children: Children) -> impl IntoView {
    view! { <div class="wrapper">{children()}</div> }
}
