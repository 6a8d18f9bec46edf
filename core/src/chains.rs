//! Metadata for the networks the dashboard knows about.

use serde::Serialize;

/// Native currency of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeCurrency {
    pub symbol: &'static str,
    pub name: &'static str,
    pub decimals: u8,
}

/// Static description of a supported chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainData {
    pub name: &'static str,
    pub short_name: &'static str,
    pub chain: &'static str,
    /// Network name passed to the wallet modal.
    pub network: &'static str,
    pub chain_id: u64,
    pub network_id: u64,
    /// RPC endpoint; `%INFURA_ID%` is replaced with the configured project id.
    pub rpc_url: &'static str,
    pub native_currency: NativeCurrency,
}

const ETH: NativeCurrency = NativeCurrency {
    symbol: "ETH",
    name: "Ethereum",
    decimals: 18,
};

/// Chains the dashboard can connect to.
pub const SUPPORTED_CHAINS: &[ChainData] = &[
    ChainData {
        name: "Ethereum Mainnet",
        short_name: "eth",
        chain: "ETH",
        network: "mainnet",
        chain_id: 1,
        network_id: 1,
        rpc_url: "https://mainnet.infura.io/v3/%INFURA_ID%",
        native_currency: ETH,
    },
    ChainData {
        name: "Ethereum Ropsten",
        short_name: "rop",
        chain: "ETH",
        network: "ropsten",
        chain_id: 3,
        network_id: 3,
        rpc_url: "https://ropsten.infura.io/v3/%INFURA_ID%",
        native_currency: ETH,
    },
    ChainData {
        name: "Ethereum Rinkeby",
        short_name: "rin",
        chain: "ETH",
        network: "rinkeby",
        chain_id: 4,
        network_id: 4,
        rpc_url: "https://rinkeby.infura.io/v3/%INFURA_ID%",
        native_currency: ETH,
    },
    ChainData {
        name: "Ethereum Görli",
        short_name: "gor",
        chain: "ETH",
        network: "goerli",
        chain_id: 5,
        network_id: 5,
        rpc_url: "https://goerli.infura.io/v3/%INFURA_ID%",
        native_currency: ETH,
    },
    ChainData {
        name: "Ethereum Kovan",
        short_name: "kov",
        chain: "ETH",
        network: "kovan",
        chain_id: 42,
        network_id: 42,
        rpc_url: "https://kovan.infura.io/v3/%INFURA_ID%",
        native_currency: ETH,
    },
    ChainData {
        name: "Ethereum Sepolia",
        short_name: "sep",
        chain: "ETH",
        network: "sepolia",
        chain_id: 11155111,
        network_id: 11155111,
        rpc_url: "https://sepolia.infura.io/v3/%INFURA_ID%",
        native_currency: ETH,
    },
    ChainData {
        name: "Hardhat Local",
        short_name: "local",
        chain: "ETH",
        network: "localhost",
        chain_id: 31337,
        network_id: 31337,
        rpc_url: "http://127.0.0.1:8545",
        native_currency: ETH,
    },
];

/// Look up a chain by id, falling back to mainnet for unknown ids.
pub fn get_chain_data(chain_id: u64) -> &'static ChainData {
    SUPPORTED_CHAINS
        .iter()
        .find(|chain| chain.chain_id == chain_id)
        .unwrap_or_else(|| {
            log::warn!("Unknown chain id {}, falling back to mainnet", chain_id);
            &SUPPORTED_CHAINS[0]
        })
}

impl ChainData {
    /// RPC URL with the Infura project id substituted.
    pub fn rpc_url_with(&self, infura_id: &str) -> String {
        self.rpc_url.replace("%INFURA_ID%", infura_id)
    }
}
