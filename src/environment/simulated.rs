//! Deterministic simulated wallet environment.
//!
//! # Responsibilities
//! - Answer the full provider RPC surface the broker consumes, in memory
//! - Derive identity material (address, balance) purely from a seed
//! - Mimic provider error codes (user rejection aside) for the switch/add flow
//!
//! Sessions negotiated against this environment behave like real ones, which
//! keeps demo deployments and tests on the same code path as production.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use alloy::primitives::{keccak256, Address, B256, U256};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};

use crate::environment::types::{
    parse_chain_id, to_hex_quantity, EnvironmentError, WalletKind, CODE_UNRECOGNIZED_CHAIN,
};
use crate::environment::WalletEnvironment;

const WEI_PER_ETH: f64 = 1e18;

/// Identity material derived from a demo seed.
///
/// The derivation is a pure function of the seed: the address is the trailing
/// twenty bytes of `keccak256(seed)`, the balance is drawn from a seeded RNG
/// in the [10, 15) native-unit range.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedIdentity {
    pub address: Address,
    pub balance_eth: f64,
}

impl SimulatedIdentity {
    pub fn derive(seed: u64) -> Self {
        let hash = keccak256(seed.to_be_bytes());
        let address = Address::from_slice(&hash[12..]);
        let mut rng = StdRng::seed_from_u64(seed);
        let balance_eth = rng.gen_range(10.0..15.0);
        Self {
            address,
            balance_eth,
        }
    }

    /// Balance as the decimal string carried on a session.
    pub fn balance_string(&self) -> String {
        format!("{:.4}", self.balance_eth)
    }

    pub fn balance_wei(&self) -> U256 {
        U256::from((self.balance_eth * WEI_PER_ETH) as u128)
    }
}

#[derive(Debug)]
struct SimulatedState {
    chain_id: u64,
    /// Chains this wallet already knows; extended by `wallet_addEthereumChain`.
    known_chains: HashSet<u64>,
    /// Receipts for transactions this environment accepted: hash → block.
    receipts: HashMap<B256, u64>,
    block_number: u64,
    sent: u64,
}

/// In-memory wallet provider with deterministic behavior.
#[derive(Debug)]
pub struct SimulatedEnvironment {
    seed: u64,
    identity: SimulatedIdentity,
    injected: Vec<WalletKind>,
    state: Mutex<SimulatedState>,
}

impl SimulatedEnvironment {
    /// Create an environment seeded for deterministic identities.
    ///
    /// By default all injected wallet families are advertised, so any
    /// requested kind can complete a handshake.
    pub fn new(seed: u64) -> Self {
        Self::with_injected(
            seed,
            vec![WalletKind::Metamask, WalletKind::Coinbase, WalletKind::Binance],
        )
    }

    /// Create an environment advertising only the given injected kinds.
    pub fn with_injected(seed: u64, injected: Vec<WalletKind>) -> Self {
        Self {
            seed,
            identity: SimulatedIdentity::derive(seed),
            injected,
            state: Mutex::new(SimulatedState {
                chain_id: 1,
                known_chains: HashSet::from([1]),
                receipts: HashMap::new(),
                block_number: 1,
                sent: 0,
            }),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn identity(&self) -> SimulatedIdentity {
        self.identity
    }

    fn handle(&self, method: &str, params: &Value) -> Result<Value, EnvironmentError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| EnvironmentError::Transport(format!("state lock poisoned: {}", e)))?;

        match method {
            "wallet_requestPermissions" => Ok(json!([{ "parentCapability": "eth_accounts" }])),
            "eth_requestAccounts" => Ok(json!([self.identity.address])),
            "eth_chainId" => Ok(json!(to_hex_quantity(U256::from(state.chain_id)))),
            "eth_getBalance" => Ok(json!(to_hex_quantity(self.identity.balance_wei()))),
            "wallet_switchEthereumChain" => {
                let requested = chain_id_param(params)?;
                if !state.known_chains.contains(&requested) {
                    return Err(EnvironmentError::Rpc {
                        code: CODE_UNRECOGNIZED_CHAIN,
                        message: format!("unrecognized chain id {}", requested),
                    });
                }
                state.chain_id = requested;
                Ok(Value::Null)
            }
            "wallet_addEthereumChain" => {
                let requested = chain_id_param(params)?;
                state.known_chains.insert(requested);
                Ok(Value::Null)
            }
            "eth_sendTransaction" => {
                state.sent += 1;
                state.block_number += 1;
                let mut material = serde_json::to_vec(params).unwrap_or_default();
                material.extend_from_slice(&self.seed.to_be_bytes());
                material.extend_from_slice(&state.sent.to_be_bytes());
                let hash = keccak256(material);
                let block = state.block_number;
                state.receipts.insert(hash, block);
                Ok(json!(hash))
            }
            "eth_getTransactionReceipt" => {
                let hash: B256 = params
                    .get(0)
                    .and_then(Value::as_str)
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| {
                        EnvironmentError::Transport("receipt lookup needs a tx hash".to_string())
                    })?;
                match state.receipts.get(&hash) {
                    Some(block) => Ok(json!({
                        "status": "0x1",
                        "blockNumber": to_hex_quantity(U256::from(*block)),
                    })),
                    None => Ok(Value::Null),
                }
            }
            "wallet_disconnect" => Ok(Value::Null),
            other => Err(EnvironmentError::Rpc {
                code: -32601,
                message: format!("method not found: {}", other),
            }),
        }
    }
}

fn chain_id_param(params: &Value) -> Result<u64, EnvironmentError> {
    let field = params
        .get(0)
        .and_then(|p| p.get("chainId"))
        .ok_or_else(|| EnvironmentError::Transport("missing chainId parameter".to_string()))?;
    parse_chain_id(field)
}

impl WalletEnvironment for SimulatedEnvironment {
    fn injected_wallets(&self) -> Vec<WalletKind> {
        self.injected.clone()
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, EnvironmentError> {
        self.handle(method, &params)
    }
}
