//! Render decisions shared by the view layer.
//!
//! Kept free of any UI framework so the choice of what a list shows can be
//! tested natively.

use crate::state::{AppState, Book, BusyFlag};

/// Which of the two book lists is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookListKind {
    /// The inventory; clicking a title borrows it.
    Available,
    /// The user's loans; clicking a title returns it.
    Borrowed,
}

impl BookListKind {
    pub fn title(self) -> &'static str {
        match self {
            BookListKind::Available => "Books list (click over title if you want to rent certain book)",
            BookListKind::Borrowed => "Your rented books (click over a title to return the book)",
        }
    }

    /// Whether the copy count is shown next to each title.
    pub fn show_quantity(self) -> bool {
        matches!(self, BookListKind::Available)
    }

    fn list_flag(self) -> BusyFlag {
        match self {
            BookListKind::Available => BusyFlag::BooksList,
            BookListKind::Borrowed => BusyFlag::BorrowedBooksList,
        }
    }

    fn action_flag(self) -> BusyFlag {
        match self {
            BookListKind::Available => BusyFlag::BorrowBook,
            BookListKind::Borrowed => BusyFlag::ReturnBook,
        }
    }

    fn books(self, state: &AppState) -> &[Book] {
        match self {
            BookListKind::Available => &state.available_books,
            BookListKind::Borrowed => &state.borrowed_books,
        }
    }
}

/// What a book list shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookListView {
    /// The list itself is being reloaded.
    Loading,
    /// A click action is waiting for its transaction.
    Pending { transaction_hash: Option<String> },
    /// Nothing to show: "No items in this list".
    Empty,
    /// Clickable titles in contract order.
    Items(Vec<Book>),
}

impl BookListView {
    /// Loading wins over a pending action, which wins over the items.
    pub fn new(
        books: &[Book],
        fetching_list: bool,
        action_pending: bool,
        transaction_hash: Option<&str>,
    ) -> Self {
        if fetching_list {
            BookListView::Loading
        } else if action_pending {
            BookListView::Pending {
                transaction_hash: transaction_hash.map(str::to_string),
            }
        } else if books.is_empty() {
            BookListView::Empty
        } else {
            BookListView::Items(books.to_vec())
        }
    }

    pub fn from_state(state: &AppState, kind: BookListKind) -> Self {
        Self::new(
            kind.books(state),
            state.busy.get(kind.list_flag()),
            state.busy.get(kind.action_flag()),
            state.transaction_hash.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> Book {
        Book {
            id: "0x01".into(),
            title: "Dune".into(),
            copies: 2,
        }
    }

    #[test]
    fn test_precedence() {
        let books = vec![dune()];
        assert_eq!(BookListView::new(&books, true, true, Some("0xab")), BookListView::Loading);
        assert_eq!(
            BookListView::new(&books, false, true, Some("0xab")),
            BookListView::Pending {
                transaction_hash: Some("0xab".into())
            }
        );
        assert_eq!(BookListView::new(&[], false, false, None), BookListView::Empty);
        assert_eq!(
            BookListView::new(&books, false, false, None),
            BookListView::Items(books.clone())
        );
    }

    #[test]
    fn test_from_state_uses_matching_flags() {
        let mut state = AppState {
            available_books: vec![dune()],
            ..AppState::default()
        };
        state.busy.borrow_book = true;

        assert!(matches!(
            BookListView::from_state(&state, BookListKind::Available),
            BookListView::Pending { .. }
        ));
        assert_eq!(
            BookListView::from_state(&state, BookListKind::Borrowed),
            BookListView::Empty
        );

        state.busy.borrowed_books_list = true;
        assert_eq!(
            BookListView::from_state(&state, BookListKind::Borrowed),
            BookListView::Loading
        );
    }

    #[test]
    fn test_kind_labels() {
        assert!(BookListKind::Available.show_quantity());
        assert!(!BookListKind::Borrowed.show_quantity());
        assert!(BookListKind::Borrowed.title().starts_with("Your rented books"));
    }
}
