//! Clickable list of books.
//!
//! Shows a spinner while the list reloads, a spinner plus the pending
//! transaction while its click action runs, and a placeholder row when
//! there is nothing to show.

use leptos::*;
use library_dapp::{AppState, Book, BookListKind, BookListView};

use crate::components::{Column, Loader, TransactionDetails};

#[component]
pub fn BooksList(
    state: ReadSignal<AppState>,
    kind: BookListKind,
    /// Called with the id of the clicked book.
    #[prop(into)]
    on_select: Callback<String>,
) -> impl IntoView {
    let list = create_memo(move |_| state.with(|s| BookListView::from_state(s, kind)));
    let show_quantity = kind.show_quantity();

    view! {
        <div class="books-list">
            <h5>{kind.title()}</h5>
            {move || match list.get() {
                BookListView::Loading => view! {
                    <Column center=true>
                        <div class="container">
                            <Loader/>
                        </div>
                    </Column>
                }
                .into_view(),
                BookListView::Pending { transaction_hash } => view! {
                    <Column center=true>
                        <div class="container">
                            <Loader/>
                            <TransactionDetails transaction_hash=transaction_hash/>
                        </div>
                    </Column>
                }
                .into_view(),
                BookListView::Empty => view! {
                    <ul>
                        <li>"No items in this list"</li>
                    </ul>
                }
                .into_view(),
                BookListView::Items(books) => view! {
                    <ul>
                        <For
                            each=move || books.clone()
                            key=|book| book.id.clone()
                            children=move |book: Book| {
                                let id = book.id.clone();
                                view! {
                                    <li on:click=move |_| on_select.call(id.clone())>
                                        <span>{book.title}</span>
                                        {show_quantity.then(|| view! {
                                            <span class="quantity">{format!(" Quantity: {}", book.copies)}</span>
                                        })}
                                    </li>
                                }
                            }
                        />
                    </ul>
                }
                .into_view(),
            }}
        </div>
    }
}
