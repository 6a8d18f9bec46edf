//! Owner-only form for adding copies of a book.

use leptos::*;
use library_dapp::AppState;

use crate::components::{Column, Loader, TransactionDetails};

/// Validate the form fields into a title and a copy count.
fn parse_form(title: &str, quantity: &str) -> Result<(String, u64), &'static str> {
    let title = title.trim();
    if title.is_empty() {
        return Err("Enter a book title");
    }
    match quantity.trim().parse::<u64>() {
        Ok(quantity) if quantity > 0 => Ok((title.to_string(), quantity)),
        _ => Err("Quantity must be a positive number"),
    }
}

#[component]
pub fn AddBookForm(
    state: ReadSignal<AppState>,
    #[prop(into)] on_submit: Callback<(String, u64)>,
) -> impl IntoView {
    let (title, set_title) = create_signal(String::new());
    let (quantity, set_quantity) = create_signal(String::from("1"));
    let (invalid, set_invalid) = create_signal(None::<&'static str>);

    let pending = move || state.with(|s| s.busy.add_book);
    let transaction_hash = Signal::derive(move || state.with(|s| s.transaction_hash.clone()));

    let on_form_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        match parse_form(&title.get(), &quantity.get()) {
            Ok((name, copies)) => {
                log::info!("📚 Adding {} copies of {:?}", copies, name);
                set_invalid.set(None);
                set_title.set(String::new());
                on_submit.call((name, copies));
            }
            Err(message) => set_invalid.set(Some(message)),
        }
    };

    view! {
        <Show
            when=move || !pending()
            fallback=move || view! {
                <Column center=true>
                    <div class="container">
                        <Loader/>
                        <TransactionDetails transaction_hash=transaction_hash/>
                    </div>
                </Column>
            }
        >
            <form class="add-book-form" on:submit=on_form_submit>
                <h5>"Add a book"</h5>
                <input
                    type="text"
                    placeholder="Book title"
                    prop:value=title
                    on:input=move |ev| set_title.set(event_target_value(&ev))
                />
                <input
                    type="number"
                    min="1"
                    placeholder="Quantity"
                    prop:value=quantity
                    on:input=move |ev| set_quantity.set(event_target_value(&ev))
                />
                <button type="submit">"Add book"</button>
                {move || invalid.get().map(|message| view! { <p class="form-error">{message}</p> })}
            </form>
        </Show>
    }
}
