//! EIP-712 permit construction for gasless token approvals.
//!
//! Borrowing a book costs `rentPrice` LIB. Instead of a separate `approve`
//! transaction the user signs a `Permit` typed-data message that the
//! library contract forwards to the token.

use alloy_primitives::U256;
use serde_json::{json, Value};

use crate::config::PERMIT_DOMAIN_VERSION;
use crate::utils::SplitSignature;

/// Inputs of a `Permit` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermitRequest {
    /// `name()` of the token, used as the domain name.
    pub token_name: String,
    /// Token address (`verifyingContract`).
    pub token_address: String,
    /// Address granting the allowance.
    pub owner: String,
    /// Address allowed to spend (the library contract).
    pub spender: String,
    /// Allowance in token base units.
    pub value: U256,
    /// Current `nonces(owner)`.
    pub nonce: U256,
    /// Unix timestamp after which the permit is void.
    pub deadline: u64,
}

/// A split permit signature plus the deadline it was signed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermitSignature {
    pub v: u8,
    pub r: String,
    pub s: String,
    pub deadline: u64,
}

impl PermitSignature {
    pub fn new(signature: SplitSignature, deadline: u64) -> Self {
        Self {
            v: signature.v,
            r: signature.r,
            s: signature.s,
            deadline,
        }
    }
}

impl PermitRequest {
    /// Typed-data document for `eth_signTypedData_v4`.
    pub fn typed_data(&self) -> Value {
        json!({
            "types": {
                "EIP712Domain": [
                    { "name": "name", "type": "string" },
                    { "name": "version", "type": "string" },
                    { "name": "verifyingContract", "type": "address" }
                ],
                "Permit": [
                    { "name": "owner", "type": "address" },
                    { "name": "spender", "type": "address" },
                    { "name": "value", "type": "uint256" },
                    { "name": "nonce", "type": "uint256" },
                    { "name": "deadline", "type": "uint256" }
                ]
            },
            "domain": {
                "name": self.token_name,
                "version": PERMIT_DOMAIN_VERSION,
                "verifyingContract": self.token_address
            },
            "primaryType": "Permit",
            "message": {
                "owner": self.owner,
                "spender": self.spender,
                "value": self.value.to_string(),
                "nonce": format!("0x{:x}", self.nonce),
                "deadline": self.deadline
            }
        })
    }

    /// RPC parameters: the signer address and the stringified typed data.
    pub fn rpc_params(&self) -> Vec<Value> {
        vec![
            Value::String(self.owner.clone()),
            Value::String(self.typed_data().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PermitRequest {
        PermitRequest {
            token_name: "LIBToken".into(),
            token_address: "0x00000000000000000000000000000000000000aa".into(),
            owner: "0x00000000000000000000000000000000000000bb".into(),
            spender: "0x00000000000000000000000000000000000000cc".into(),
            value: U256::from(1_000u64),
            nonce: U256::from(26u64),
            deadline: 1_700_003_600,
        }
    }

    #[test]
    fn test_typed_data_shape() {
        let data = request().typed_data();
        assert_eq!(data["primaryType"], "Permit");
        assert_eq!(data["domain"]["name"], "LIBToken");
        assert_eq!(data["domain"]["version"], "1");
        assert_eq!(
            data["domain"]["verifyingContract"],
            "0x00000000000000000000000000000000000000aa"
        );
        assert_eq!(data["message"]["value"], "1000");
        assert_eq!(data["message"]["nonce"], "0x1a");
        assert_eq!(data["message"]["deadline"], 1_700_003_600u64);
        assert_eq!(data["types"]["Permit"].as_array().map(Vec::len), Some(5));
        assert_eq!(data["types"]["EIP712Domain"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_rpc_params_are_address_then_json_string() {
        let params = request().rpc_params();
        assert_eq!(params[0], "0x00000000000000000000000000000000000000bb");
        let parsed: Value = serde_json::from_str(params[1].as_str().unwrap()).unwrap();
        assert_eq!(parsed["message"]["spender"], "0x00000000000000000000000000000000000000cc");
    }
}
