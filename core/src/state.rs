//! Application state mirrored by the view layer.
//!
//! One owned [`AppState`] holds everything the components render. It is
//! only mutated by controller operations.

use alloy_primitives::U256;
use serde::Serialize;

use crate::config::DEFAULT_CHAIN_ID;

// =============================================================================
// Books
// =============================================================================

/// A book record read from the library contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// `bytes32` key, `0x`-prefixed hex.
    pub id: String,
    /// Title (`bookName`).
    pub title: String,
    /// Copies currently on the shelf (`numberOfCopies`).
    pub copies: u64,
}

/// Look up a book by id.
pub fn find_book<'a>(books: &'a [Book], id: &str) -> Option<&'a Book> {
    books.iter().find(|book| book.id.eq_ignore_ascii_case(id))
}

// =============================================================================
// Busy flags
// =============================================================================

/// Which in-flight activity a busy flag tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyFlag {
    AddBook,
    BooksList,
    BorrowBook,
    BorrowedBooksList,
    ReturnBook,
    ChangingBalances,
}

/// Per-action loading flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusyFlags {
    pub add_book: bool,
    pub books_list: bool,
    pub borrow_book: bool,
    pub borrowed_books_list: bool,
    pub return_book: bool,
    pub changing_balances: bool,
}

impl BusyFlags {
    pub fn get(&self, flag: BusyFlag) -> bool {
        match flag {
            BusyFlag::AddBook => self.add_book,
            BusyFlag::BooksList => self.books_list,
            BusyFlag::BorrowBook => self.borrow_book,
            BusyFlag::BorrowedBooksList => self.borrowed_books_list,
            BusyFlag::ReturnBook => self.return_book,
            BusyFlag::ChangingBalances => self.changing_balances,
        }
    }

    pub fn set(&mut self, flag: BusyFlag, value: bool) {
        let slot = match flag {
            BusyFlag::AddBook => &mut self.add_book,
            BusyFlag::BooksList => &mut self.books_list,
            BusyFlag::BorrowBook => &mut self.borrow_book,
            BusyFlag::BorrowedBooksList => &mut self.borrowed_books_list,
            BusyFlag::ReturnBook => &mut self.return_book,
            BusyFlag::ChangingBalances => &mut self.changing_balances,
        };
        *slot = value;
    }

    /// Whether any action or refresh is in flight.
    pub fn any(&self) -> bool {
        self.add_book
            || self.books_list
            || self.borrow_book
            || self.borrowed_books_list
            || self.return_book
            || self.changing_balances
    }
}

// =============================================================================
// Balances and errors
// =============================================================================

/// Token and ETH balances, formatted in ether units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balances {
    /// Connected user's LIB balance.
    pub user_lib: Option<String>,
    /// LIB held by the library contract.
    pub library_lib: Option<String>,
    /// ETH held by the library contract.
    pub library_eth: Option<String>,
    /// ETH held by the wrapper contract.
    pub wrapper_eth: Option<String>,
}

/// The single error banner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorState {
    pub flag: bool,
    pub message: Option<String>,
}

// =============================================================================
// Application state
// =============================================================================

/// Everything the dashboard renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    /// Full-page loading spinner.
    pub fetching: bool,
    pub connected: bool,
    /// Connected wallet address; empty when disconnected.
    pub address: String,
    pub chain_id: u64,
    pub book_library_address: Option<String>,
    pub token_address: Option<String>,
    pub wrapper_address: Option<String>,
    pub contract_owner: Option<String>,
    pub user_is_contract_owner: bool,
    /// Inventory in contract index order.
    pub available_books: Vec<Book>,
    /// Books the connected address currently holds.
    pub borrowed_books: Vec<Book>,
    /// Hash of the most recent transaction sent from the dashboard.
    pub transaction_hash: Option<String>,
    pub busy: BusyFlags,
    pub error: ErrorState,
    pub balances: Balances,
    /// Rent price in LIB base units.
    pub rent_price: Option<U256>,
    /// Last message hash signed through a signature demo.
    pub hashed_message: Option<String>,
    /// Last signature produced through a signature demo.
    pub signed_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            fetching: false,
            connected: false,
            address: String::new(),
            chain_id: DEFAULT_CHAIN_ID,
            book_library_address: None,
            token_address: None,
            wrapper_address: None,
            contract_owner: None,
            user_is_contract_owner: false,
            available_books: Vec::new(),
            borrowed_books: Vec::new(),
            transaction_hash: None,
            busy: BusyFlags::default(),
            error: ErrorState::default(),
            balances: Balances::default(),
            rent_price: None,
            hashed_message: None,
            signed_message: None,
        }
    }
}
