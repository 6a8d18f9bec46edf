//! Typed bindings over the three dashboard contracts.
//!
//! Each binding wraps a [`ContractHandle`] produced by [`get_contract`] and
//! translates between Rust types and the JSON values the handle speaks.

use std::rc::Rc;

use alloy_primitives::U256;
use serde_json::Value;

use crate::error::{ChainError, ChainResult};
use crate::permit::PermitSignature;
use crate::provider::{
    ContractHandle, EventFilter, EventListener, ListenerId, Provider, SentTransaction,
    TxOverrides,
};
use crate::state::Book;
use crate::units::{parse_quantity, quantity_arg};
use crate::utils::SplitSignature;

/// Bind the contract at `address` to the provider's signer.
pub fn get_contract(
    provider: &dyn Provider,
    address: &str,
    abi: &'static str,
) -> Rc<dyn ContractHandle> {
    log::debug!("Binding contract at {}", address);
    provider.contract(address, abi)
}

fn str_arg(value: &str) -> Value {
    Value::String(value.to_string())
}

fn decode_u256(method: &str, value: &Value) -> ChainResult<U256> {
    parse_quantity(value).ok_or_else(|| ChainError::invalid_response(method, value))
}

fn decode_u64(method: &str, value: &Value) -> ChainResult<u64> {
    let wide = decode_u256(method, value)?;
    u64::try_from(wide).map_err(|_| ChainError::invalid_response(method, value))
}

fn decode_string(method: &str, value: &Value) -> ChainResult<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ChainError::invalid_response(method, value))
}

fn signature_args(signature: &SplitSignature) -> [Value; 3] {
    [
        Value::from(signature.v),
        str_arg(&signature.r),
        str_arg(&signature.s),
    ]
}

// =============================================================================
// Book library
// =============================================================================

/// The book library contract.
#[derive(Clone)]
pub struct BookLibrary {
    handle: Rc<dyn ContractHandle>,
}

impl BookLibrary {
    pub fn new(handle: Rc<dyn ContractHandle>) -> Self {
        Self { handle }
    }

    pub fn address(&self) -> String {
        self.handle.address()
    }

    pub fn handle(&self) -> &Rc<dyn ContractHandle> {
        &self.handle
    }

    /// Number of distinct book keys.
    pub async fn get_count(&self) -> ChainResult<u64> {
        let value = self.handle.call("getCount", vec![]).await?;
        decode_u64("getCount", &value)
    }

    /// Book key at `index`.
    pub async fn book_key(&self, index: u64) -> ChainResult<String> {
        let value = self.handle.call("bookKeys", vec![Value::from(index)]).await?;
        decode_string("bookKeys", &value)
    }

    /// The book record stored under `key`.
    ///
    /// The struct comes back either as `{ bookName, numberOfCopies }` or as
    /// a positional array.
    pub async fn book(&self, key: &str) -> ChainResult<Book> {
        let value = self.handle.call("books", vec![str_arg(key)]).await?;
        let (title, copies) = match &value {
            Value::Object(map) => (map.get("bookName"), map.get("numberOfCopies")),
            Value::Array(items) => (items.first(), items.get(1)),
            _ => (None, None),
        };
        let title = title
            .and_then(Value::as_str)
            .ok_or_else(|| ChainError::invalid_response("books", &value))?;
        let copies = copies
            .and_then(parse_quantity)
            .and_then(|c| u64::try_from(c).ok())
            .ok_or_else(|| ChainError::invalid_response("books", &value))?;
        Ok(Book {
            id: key.to_string(),
            title: title.to_string(),
            copies,
        })
    }

    /// Whether `user` currently holds `key` (status `1`).
    pub async fn user_borrowed_book(&self, user: &str, key: &str) -> ChainResult<bool> {
        let value = self
            .handle
            .call("userBorrowedBooks", vec![str_arg(user), str_arg(key)])
            .await?;
        Ok(decode_u64("userBorrowedBooks", &value)? == 1)
    }

    pub async fn rent_price(&self) -> ChainResult<U256> {
        let value = self.handle.call("rentPrice", vec![]).await?;
        decode_u256("rentPrice", &value)
    }

    pub async fn owner(&self) -> ChainResult<String> {
        let value = self.handle.call("owner", vec![]).await?;
        decode_string("owner", &value)
    }

    /// Address of the LIB token.
    pub async fn lib_token(&self) -> ChainResult<String> {
        let value = self.handle.call("LIBToken", vec![]).await?;
        decode_string("LIBToken", &value)
    }

    /// Address of the wrapper contract.
    pub async fn wrapper_contract(&self) -> ChainResult<String> {
        let value = self.handle.call("wrapperContract", vec![]).await?;
        decode_string("wrapperContract", &value)
    }

    pub async fn add_book(&self, title: &str, copies: u64) -> ChainResult<SentTransaction> {
        self.handle
            .send(
                "addBook",
                vec![str_arg(title), Value::from(copies)],
                TxOverrides::default(),
            )
            .await
    }

    /// Borrow `book_id`, paying `rent_price` through a signed permit.
    pub async fn borrow_book_by_id(
        &self,
        book_id: &str,
        rent_price: U256,
        permit: &PermitSignature,
    ) -> ChainResult<SentTransaction> {
        let args = vec![
            str_arg(book_id),
            quantity_arg(rent_price),
            Value::from(permit.deadline),
            Value::from(permit.v),
            str_arg(&permit.r),
            str_arg(&permit.s),
        ];
        self.handle
            .send("borrowBookById", args, TxOverrides::default())
            .await
    }

    /// Borrow `book_id` for `receiver` using a pre-signed approval.
    pub async fn borrow_with_signature(
        &self,
        hashed_message: &str,
        signature: &SplitSignature,
        receiver: &str,
        book_id: &str,
    ) -> ChainResult<SentTransaction> {
        let mut args = vec![str_arg(hashed_message)];
        args.extend(signature_args(signature));
        args.push(str_arg(receiver));
        args.push(str_arg(book_id));
        self.handle
            .send("borrowWithSignature", args, TxOverrides::default())
            .await
    }

    pub async fn return_book_by_id(&self, book_id: &str) -> ChainResult<SentTransaction> {
        self.handle
            .send("returnBookById", vec![str_arg(book_id)], TxOverrides::default())
            .await
    }

    /// Unwrap `amount` LIB held by the library back into ETH.
    pub async fn exchange_tokens(&self, amount: U256) -> ChainResult<SentTransaction> {
        self.handle
            .send("exchangeTokens", vec![quantity_arg(amount)], TxOverrides::default())
            .await
    }

    /// Send `amount` wei from the library to its owner.
    pub async fn withdraw(&self, amount: U256) -> ChainResult<SentTransaction> {
        self.handle
            .send("withdraw", vec![quantity_arg(amount)], TxOverrides::default())
            .await
    }

    pub fn on(&self, event: &str, listener: EventListener) -> ListenerId {
        self.handle.on(event, EventFilter::new(), listener)
    }
}

// =============================================================================
// LIB token
// =============================================================================

/// The LIB ERC-20 token with permit support.
#[derive(Clone)]
pub struct LibToken {
    handle: Rc<dyn ContractHandle>,
}

impl LibToken {
    pub fn new(handle: Rc<dyn ContractHandle>) -> Self {
        Self { handle }
    }

    pub fn address(&self) -> String {
        self.handle.address()
    }

    pub fn handle(&self) -> &Rc<dyn ContractHandle> {
        &self.handle
    }

    pub async fn balance_of(&self, account: &str) -> ChainResult<U256> {
        let value = self.handle.call("balanceOf", vec![str_arg(account)]).await?;
        decode_u256("balanceOf", &value)
    }

    pub async fn name(&self) -> ChainResult<String> {
        let value = self.handle.call("name", vec![]).await?;
        decode_string("name", &value)
    }

    /// Permit nonce of `owner`.
    pub async fn nonces(&self, owner: &str) -> ChainResult<U256> {
        let value = self.handle.call("nonces", vec![str_arg(owner)]).await?;
        decode_u256("nonces", &value)
    }

    pub async fn approve(&self, spender: &str, amount: U256) -> ChainResult<SentTransaction> {
        self.handle
            .send(
                "approve",
                vec![str_arg(spender), quantity_arg(amount)],
                TxOverrides::default(),
            )
            .await
    }

    /// Listen for transfers whose recipient is `to`.
    pub fn on_transfer_to(&self, to: &str, listener: EventListener) -> ListenerId {
        self.handle
            .on("Transfer", vec![None, Some(str_arg(to)), None], listener)
    }

    pub fn on(&self, event: &str, listener: EventListener) -> ListenerId {
        self.handle.on(event, EventFilter::new(), listener)
    }
}

// =============================================================================
// Wrapper
// =============================================================================

/// The ETH to LIB wrapper contract.
#[derive(Clone)]
pub struct WrapperContract {
    handle: Rc<dyn ContractHandle>,
}

impl WrapperContract {
    pub fn new(handle: Rc<dyn ContractHandle>) -> Self {
        Self { handle }
    }

    pub fn address(&self) -> String {
        self.handle.address()
    }

    pub fn handle(&self) -> &Rc<dyn ContractHandle> {
        &self.handle
    }

    /// Mint LIB for the sender in exchange for `value` wei.
    pub async fn wrap(&self, value: U256) -> ChainResult<SentTransaction> {
        self.handle
            .send("wrap", vec![], TxOverrides::with_value(value))
            .await
    }

    /// Mint LIB for `receiver` using a pre-signed approval.
    pub async fn wrap_with_signature(
        &self,
        hashed_message: &str,
        signature: &SplitSignature,
        receiver: &str,
        value: U256,
    ) -> ChainResult<SentTransaction> {
        let mut args = vec![str_arg(hashed_message)];
        args.extend(signature_args(signature));
        args.push(str_arg(receiver));
        self.handle
            .send("wrapWithSignature", args, TxOverrides::with_value(value))
            .await
    }

    pub fn on(&self, event: &str, listener: EventListener) -> ListenerId {
        self.handle.on(event, EventFilter::new(), listener)
    }
}
