//! UI Components for the Book Library dashboard.
//!
//! Components only render what they are given and report clicks through
//! callbacks; the dashboard wires those to the controller.
//!
//! # Layout Components
//! - [`Header`] - Network, connected address and disconnect button
//! - [`Wrapper`] - Page-width wrapper
//! - [`Column`] - Flex column
//! - [`Loader`] - Spinner
//!
//! # Feature Components
//! - [`ConnectButton`] - Opens the wallet modal
//! - [`BooksList`] - Available or borrowed books
//! - [`AddBookForm`] - Owner-only book form
//! - [`BalancesPanel`] - LIB and ETH balances
//! - [`SignaturePanel`] - Signed-message flows
//! - [`ErrorMessage`] - Error banner
//! - [`TransactionDetails`] - Pending transaction hash
//! - [`Toasts`] - Event notifications

mod add_book_form;
mod balances;
mod books_list;
mod column;
mod connect_button;
mod error_message;
mod header;
mod loader;
mod signatures;
mod toasts;
mod transaction_details;
mod wrapper;

pub use add_book_form::*;
pub use balances::*;
pub use books_list::*;
pub use column::*;
pub use connect_button::*;
pub use error_message::*;
pub use header::*;
pub use loader::*;
pub use signatures::*;
pub use toasts::*;
pub use transaction_details::*;
pub use wrapper::*;
