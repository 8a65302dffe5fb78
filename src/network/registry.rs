//! Static network reference data.

use alloy::primitives::U256;
use serde::Serialize;
use serde_json::{json, Value};

use crate::environment::types::to_hex_quantity;

/// Immutable description of a supported blockchain network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkDescriptor {
    pub chain_id: u64,
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
    pub explorer_url: &'static str,
    pub rpc_url: &'static str,
}

impl NetworkDescriptor {
    pub fn chain_id_hex(&self) -> String {
        to_hex_quantity(U256::from(self.chain_id))
    }

    /// Parameters for `wallet_addEthereumChain` (EIP-3085).
    pub fn add_chain_params(&self) -> Value {
        json!([{
            "chainId": self.chain_id_hex(),
            "chainName": self.name,
            "nativeCurrency": {
                "name": self.symbol,
                "symbol": self.symbol,
                "decimals": self.decimals,
            },
            "rpcUrls": [self.rpc_url],
            "blockExplorerUrls": [self.explorer_url],
        }])
    }
}

/// Networks the broker will switch to or register on a provider.
pub const SUPPORTED_NETWORKS: [NetworkDescriptor; 6] = [
    NetworkDescriptor {
        chain_id: 1,
        name: "Ethereum Mainnet",
        symbol: "ETH",
        decimals: 18,
        explorer_url: "https://etherscan.io",
        rpc_url: "https://eth.llamarpc.com",
    },
    NetworkDescriptor {
        chain_id: 56,
        name: "BNB Smart Chain",
        symbol: "BNB",
        decimals: 18,
        explorer_url: "https://bscscan.com",
        rpc_url: "https://bsc-dataseed.binance.org",
    },
    NetworkDescriptor {
        chain_id: 137,
        name: "Polygon",
        symbol: "MATIC",
        decimals: 18,
        explorer_url: "https://polygonscan.com",
        rpc_url: "https://polygon-rpc.com",
    },
    NetworkDescriptor {
        chain_id: 43114,
        name: "Avalanche C-Chain",
        symbol: "AVAX",
        decimals: 18,
        explorer_url: "https://snowtrace.io",
        rpc_url: "https://api.avax.network/ext/bc/C/rpc",
    },
    NetworkDescriptor {
        chain_id: 42161,
        name: "Arbitrum One",
        symbol: "ETH",
        decimals: 18,
        explorer_url: "https://arbiscan.io",
        rpc_url: "https://arb1.arbitrum.io/rpc",
    },
    NetworkDescriptor {
        chain_id: 10,
        name: "OP Mainnet",
        symbol: "ETH",
        decimals: 18,
        explorer_url: "https://optimistic.etherscan.io",
        rpc_url: "https://mainnet.optimism.io",
    },
];

/// Look up a network by chain id.
pub fn lookup(chain_id: u64) -> Option<&'static NetworkDescriptor> {
    SUPPORTED_NETWORKS.iter().find(|n| n.chain_id == chain_id)
}
