//! Transaction intents and payload encoding.
//!
//! Every broker transaction carries its intent in the transaction data so an
//! off-chain interpreter can reconstruct what the user meant. Two strategies
//! exist:
//!
//! - `Marker`: the legacy colon-delimited text payloads
//!   (`ICO_PURCHASE:<tokenAmount>:<usdAmount>:<symbol>` and
//!   `AETHERION_TRANSFER:<amount>:<symbol>:<destination>`), for deployments
//!   without a broker contract.
//! - `Abi`: ABI-encoded calls to the broker contract surface, for
//!   deployments that have one. Decimal amounts are scaled to hundredths.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use serde::{Deserialize, Serialize};

use crate::tx::types::TxError;

sol! {
    /// Broker contract surface for intent-carrying transactions.
    function purchase(uint256 tokenAmount, uint256 usdAmount, string symbol);
    function forward(address destination, uint256 amount, string symbol);
}

const PURCHASE_TAG: &str = "ICO_PURCHASE";
const TRANSFER_TAG: &str = "AETHERION_TRANSFER";

/// What a transaction is meant to do, independent of how it is encoded.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionIntent {
    Purchase {
        token_amount: String,
        usd_amount: String,
        symbol: String,
    },
    Transfer {
        amount: String,
        symbol: String,
        destination: Address,
    },
}

/// Payload strategy for intent-carrying transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadCodec {
    #[default]
    Marker,
    Abi,
}

impl TransactionIntent {
    pub fn encode(&self, codec: PayloadCodec) -> Result<Bytes, TxError> {
        match codec {
            PayloadCodec::Marker => Ok(Bytes::from(self.encode_marker().into_bytes())),
            PayloadCodec::Abi => self.encode_abi(),
        }
    }

    /// Legacy text marker form.
    pub fn encode_marker(&self) -> String {
        match self {
            TransactionIntent::Purchase {
                token_amount,
                usd_amount,
                symbol,
            } => format!("{}:{}:{}:{}", PURCHASE_TAG, token_amount, usd_amount, symbol),
            TransactionIntent::Transfer {
                amount,
                symbol,
                destination,
            } => format!("{}:{}:{}:{}", TRANSFER_TAG, amount, symbol, destination),
        }
    }

    /// Reconstruct an intent from a marker payload.
    pub fn decode_marker(raw: &str) -> Result<Self, TxError> {
        let parts: Vec<&str> = raw.split(':').collect();
        if parts.len() != 4 {
            return Err(TxError::Payload(format!(
                "expected 4 segments, found {}",
                parts.len()
            )));
        }
        match parts[0] {
            PURCHASE_TAG => Ok(TransactionIntent::Purchase {
                token_amount: parts[1].to_string(),
                usd_amount: parts[2].to_string(),
                symbol: parts[3].to_string(),
            }),
            TRANSFER_TAG => Ok(TransactionIntent::Transfer {
                amount: parts[1].to_string(),
                symbol: parts[2].to_string(),
                destination: parts[3]
                    .parse()
                    .map_err(|e| TxError::Payload(format!("bad destination address: {}", e)))?,
            }),
            tag => Err(TxError::Payload(format!("unknown intent tag '{}'", tag))),
        }
    }

    fn encode_abi(&self) -> Result<Bytes, TxError> {
        match self {
            TransactionIntent::Purchase {
                token_amount,
                usd_amount,
                symbol,
            } => {
                let call = purchaseCall {
                    tokenAmount: hundredths(token_amount)?,
                    usdAmount: hundredths(usd_amount)?,
                    symbol: symbol.clone(),
                };
                Ok(Bytes::from(call.abi_encode()))
            }
            TransactionIntent::Transfer {
                amount,
                symbol,
                destination,
            } => {
                let call = forwardCall {
                    destination: *destination,
                    amount: hundredths(amount)?,
                    symbol: symbol.clone(),
                };
                Ok(Bytes::from(call.abi_encode()))
            }
        }
    }
}

/// Parse a decimal amount string into a hundredths-scaled integer.
fn hundredths(raw: &str) -> Result<U256, TxError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| TxError::InvalidAmount(raw.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(TxError::InvalidAmount(raw.to_string()));
    }
    Ok(U256::from((value * 100.0).round() as u128))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase_intent() -> TransactionIntent {
        TransactionIntent::Purchase {
            token_amount: "1000000.00".to_string(),
            usd_amount: "646".to_string(),
            symbol: "SING".to_string(),
        }
    }

    #[test]
    fn test_purchase_marker_format() {
        assert_eq!(
            purchase_intent().encode_marker(),
            "ICO_PURCHASE:1000000.00:646:SING"
        );
    }

    #[test]
    fn test_transfer_marker_format() {
        let destination: Address = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
            .parse()
            .unwrap();
        let intent = TransactionIntent::Transfer {
            amount: "250.00".to_string(),
            symbol: "SING".to_string(),
            destination,
        };
        let marker = intent.encode_marker();
        assert!(marker.starts_with("AETHERION_TRANSFER:250.00:SING:0x"));
    }

    #[test]
    fn test_marker_round_trip() {
        let original = purchase_intent();
        let decoded = TransactionIntent::decode_marker(&original.encode_marker()).unwrap();
        assert_eq!(decoded, original);

        let destination: Address = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
            .parse()
            .unwrap();
        let transfer = TransactionIntent::Transfer {
            amount: "1.50".to_string(),
            symbol: "SING".to_string(),
            destination,
        };
        let decoded = TransactionIntent::decode_marker(&transfer.encode_marker()).unwrap();
        assert_eq!(decoded, transfer);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(TransactionIntent::decode_marker("ICO_PURCHASE:1:2").is_err());
        assert!(TransactionIntent::decode_marker("SOMETHING:1:2:3").is_err());
        assert!(TransactionIntent::decode_marker("AETHERION_TRANSFER:1:SING:nothex").is_err());
    }

    #[test]
    fn test_abi_encoding_uses_call_selector() {
        let data = purchase_intent().encode(PayloadCodec::Abi).unwrap();
        assert_eq!(&data[..4], purchaseCall::SELECTOR);
        assert!(data.len() > 4);
    }

    #[test]
    fn test_hundredths_scaling() {
        assert_eq!(hundredths("1000000.00").unwrap(), U256::from(100_000_000u64));
        assert_eq!(hundredths("646").unwrap(), U256::from(64_600u64));
        assert!(hundredths("-1").is_err());
        assert!(hundredths("a lot").is_err());
    }
}
