//! Vertical flex column used for page layout.

use leptos::*;

/// Default maximum width in pixels.
const DEFAULT_MAX_WIDTH: u32 = 600;

#[component]
pub fn Column(
    children: Children,
    /// Center children on both axes.
    #[prop(optional)]
    center: bool,
    /// Stretch to the full viewport height.
    #[prop(optional)]
    span_height: bool,
    #[prop(optional)] max_width: Option<u32>,
) -> impl IntoView {
    let mut class = String::from("column");
    if center {
        class.push_str(" center");
    }
    if span_height {
        class.push_str(" span-height");
    }
    let style = format!("max-width: {}px;", max_width.unwrap_or(DEFAULT_MAX_WIDTH));

    view! { <div class=class style=style>{children()}</div> }
}
