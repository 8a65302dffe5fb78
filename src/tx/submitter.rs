//! Transaction building, submission, and confirmation monitoring.
//!
//! # Responsibilities
//! - Turn purchase and transfer requests into intent-carrying transactions
//! - Submit through the session's provider and wait for confirmation
//! - Apply the partial-failure policy for chained purchase-then-transfer
//!
//! Submission is not idempotent: a failed call must not be retried here, the
//! user decides whether to re-initiate.

use std::time::Duration;

use alloy::primitives::{keccak256, Address, B256, U256};
use serde_json::{json, Value};
use tokio::time::{interval, timeout};

use crate::config::schema::TimeoutConfig;
use crate::environment::types::to_hex_quantity;
use crate::environment::{EnvironmentError, WalletEnvironment};
use crate::sale::SaleState;
use crate::session::types::{ProviderSource, WalletSession};
use crate::tx::intent::{PayloadCodec, TransactionIntent};
use crate::tx::types::{ForwardOutcome, PurchaseOutcome, TransferOutcome, TxError};

/// Builds and submits intent-carrying transactions for a session.
pub struct TxSubmitter<'a, E> {
    env: &'a E,
    sale: &'a SaleState,
    timeouts: &'a TimeoutConfig,
    codec: PayloadCodec,
}

impl<'a, E: WalletEnvironment> TxSubmitter<'a, E> {
    pub fn new(
        env: &'a E,
        sale: &'a SaleState,
        timeouts: &'a TimeoutConfig,
        codec: PayloadCodec,
    ) -> Self {
        Self {
            env,
            sale,
            timeouts,
            codec,
        }
    }

    /// Purchase sale tokens for a USD amount.
    ///
    /// Converts USD to a token amount at the sale token price and to a native
    /// value at the configured reference price, then sends the purchase to
    /// the sale treasury (or to self when no treasury is configured). With
    /// `forward_to` set, a successful purchase chains into
    /// [`transfer_to_aetherion`](Self::transfer_to_aetherion); a failed
    /// forward does not roll the purchase back.
    pub async fn purchase_tokens(
        &self,
        session: &WalletSession,
        usd_amount: &str,
        payment_token: Option<&str>,
        forward_to: Option<Address>,
    ) -> Result<PurchaseOutcome, TxError> {
        if !session.is_connected() {
            return Err(TxError::NotConnected);
        }
        let usd = parse_positive(usd_amount)?;
        let from = session.address.ok_or(TxError::NotConnected)?;

        if let Some(token) = payment_token {
            // Multi-asset settlement is not wired up; the request is recorded
            // for the interpreter but settled in native currency.
            tracing::debug!(payment_token = token, "settling in native currency");
        }

        let config = self.sale.config();
        let token_amount = format!("{:.2}", usd / config.token_price);
        let value = ether_to_wei(usd / config.native_usd_price);
        let to = config.treasury.unwrap_or(from);

        let intent = TransactionIntent::Purchase {
            token_amount: token_amount.clone(),
            usd_amount: usd_amount.trim().to_string(),
            symbol: config.symbol.clone(),
        };
        let (tx_hash, block_number) = self.submit(session, from, to, value, &intent).await?;

        tracing::info!(
            session = %session.id,
            tx = %tx_hash,
            usd = usd_amount,
            tokens = %token_amount,
            "token purchase confirmed"
        );

        let forward = match forward_to {
            None => None,
            Some(destination) => {
                match self
                    .transfer_to_aetherion(session, destination, &token_amount, None)
                    .await
                {
                    Ok(outcome) => Some(ForwardOutcome::Completed(outcome)),
                    Err(e) => {
                        // Deliberate partial-failure policy: the purchase
                        // stands, the transfer error rides along.
                        tracing::warn!(
                            session = %session.id,
                            destination = %destination,
                            error = %e,
                            "forward transfer failed after successful purchase"
                        );
                        Some(ForwardOutcome::Failed {
                            error: e.to_string(),
                        })
                    }
                }
            }
        };

        Ok(PurchaseOutcome {
            tx_hash,
            block_number,
            token_amount,
            usd_amount: usd_amount.trim().to_string(),
            symbol: config.symbol.clone(),
            forward,
        })
    }

    /// Send a zero-value transaction to self carrying a transfer intent for
    /// an Aetherion destination address.
    pub async fn transfer_to_aetherion(
        &self,
        session: &WalletSession,
        destination: Address,
        amount: &str,
        symbol: Option<&str>,
    ) -> Result<TransferOutcome, TxError> {
        if !session.is_connected() {
            return Err(TxError::NotConnected);
        }
        parse_positive(amount)?;
        let from = session.address.ok_or(TxError::NotConnected)?;
        let symbol = symbol.unwrap_or(&self.sale.config().symbol).to_string();

        let intent = TransactionIntent::Transfer {
            amount: amount.trim().to_string(),
            symbol,
            destination,
        };
        // To self: the payload records the real destination.
        let (tx_hash, block_number) = self
            .submit(session, from, from, U256::ZERO, &intent)
            .await?;

        tracing::info!(
            session = %session.id,
            tx = %tx_hash,
            destination = %destination,
            amount = amount,
            "transfer intent confirmed"
        );

        Ok(TransferOutcome {
            tx_hash,
            block_number,
        })
    }

    async fn submit(
        &self,
        session: &WalletSession,
        from: Address,
        to: Address,
        value: U256,
        intent: &TransactionIntent,
    ) -> Result<(B256, u64), TxError> {
        let data = intent.encode(self.codec)?;

        match session.source {
            ProviderSource::Simulated { seed } => {
                // No provider behind the session: fabricate a deterministic
                // hash from the payload and settle immediately.
                let mut material = data.to_vec();
                material.extend_from_slice(&seed.to_be_bytes());
                Ok((keccak256(material), 0))
            }
            ProviderSource::Real => {
                let params = json!([{
                    "from": from,
                    "to": to,
                    "value": to_hex_quantity(value),
                    "data": format!("0x{}", alloy::hex::encode(&data)),
                }]);
                let result = self.env.request("eth_sendTransaction", params).await?;
                let tx_hash: B256 = result
                    .as_str()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| {
                        TxError::Environment(EnvironmentError::Transport(
                            "eth_sendTransaction must return a transaction hash".to_string(),
                        ))
                    })?;

                let block_number = self.wait_for_confirmation(tx_hash).await?;
                Ok((tx_hash, block_number))
            }
        }
    }

    /// Poll for a receipt until the transaction confirms or the window closes.
    async fn wait_for_confirmation(&self, tx_hash: B256) -> Result<u64, TxError> {
        let deadline = Duration::from_secs(self.timeouts.confirmation_secs);
        let poll = Duration::from_millis(self.timeouts.poll_interval_ms);

        let result = timeout(deadline, async {
            let mut ticker = interval(poll);

            loop {
                ticker.tick().await;

                let receipt = self
                    .env
                    .request("eth_getTransactionReceipt", json!([tx_hash]))
                    .await?;
                if receipt.is_null() {
                    tracing::debug!(tx = %tx_hash, "transaction pending");
                    continue;
                }

                let reverted = receipt
                    .get("status")
                    .and_then(Value::as_str)
                    .is_some_and(|s| s == "0x0");
                if reverted {
                    return Err(TxError::Reverted(tx_hash.to_string()));
                }

                let block_number = receipt
                    .get("blockNumber")
                    .and_then(Value::as_str)
                    .and_then(|s| u64::from_str_radix(s.trim_start_matches("0x"), 16).ok())
                    .unwrap_or(0);
                return Ok(block_number);
            }
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(TxError::ConfirmationTimeout(self.timeouts.confirmation_secs)),
        }
    }
}

fn parse_positive(raw: &str) -> Result<f64, TxError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| TxError::InvalidAmount(raw.to_string()))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(TxError::InvalidAmount(raw.to_string()));
    }
    Ok(value)
}

fn ether_to_wei(ether: f64) -> U256 {
    if !ether.is_finite() || ether <= 0.0 {
        return U256::ZERO;
    }
    U256::from((ether * 1e18) as u128)
}
