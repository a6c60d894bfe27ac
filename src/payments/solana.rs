use anyhow::Context;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{PaymentStatus, PaymentVerifier};
use crate::config::PaymentConfig;

lazy_static! {
    // base58 alphabet; a 64-byte signature encodes to 86-88 characters
    static ref SIGNATURE_RE: Regex = Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{86,88}$").unwrap();
}

pub(crate) fn is_signature(tx_id: &str) -> bool {
    SIGNATURE_RE.is_match(tx_id)
}

/// Checks the posting fee against a Solana JSON-RPC node.
#[derive(Clone)]
pub struct SolanaRpcVerifier {
    client: reqwest::Client,
    rpc_url: String,
    treasury: String,
    fee_lamports: u64,
}

impl SolanaRpcVerifier {
    pub fn new(rpc_url: &str, treasury: &str, fee_lamports: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            rpc_url: rpc_url.to_string(),
            treasury: treasury.to_string(),
            fee_lamports,
        }
    }

    /// `None` unless an RPC endpoint and treasury are configured.
    pub fn from_config(cfg: &PaymentConfig) -> Option<Self> {
        let rpc_url = cfg.rpc_url.as_deref()?;
        let treasury = cfg.treasury_address.as_deref()?;
        Some(Self::new(rpc_url, treasury, cfg.fee_lamports))
    }

    async fn get_transaction(&self, signature: &str) -> anyhow::Result<Value> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getTransaction",
            "params": [
                signature,
                {
                    "encoding": "jsonParsed",
                    "commitment": "confirmed",
                    "maxSupportedTransactionVersion": 0
                }
            ]
        });
        let response: Value = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .context("solana rpc request")?
            .error_for_status()
            .context("solana rpc status")?
            .json()
            .await
            .context("solana rpc body")?;

        if let Some(err) = response.get("error") {
            anyhow::bail!("solana rpc error: {err}");
        }
        Ok(response.get("result").cloned().unwrap_or(Value::Null))
    }
}

#[async_trait]
impl PaymentVerifier for SolanaRpcVerifier {
    async fn verify(&self, tx_id: &str, _claimed: PaymentStatus) -> anyhow::Result<PaymentStatus> {
        if !is_signature(tx_id) {
            warn!(tx_id, "payment id is not a transaction signature");
            return Ok(PaymentStatus::Failed);
        }
        let tx = self.get_transaction(tx_id).await?;
        let status = assess_transaction(&tx, &self.treasury, self.fee_lamports);
        debug!(tx_id, status = status.as_str(), "payment verified against ledger");
        Ok(status)
    }
}

/// Grades a `getTransaction` (jsonParsed) result: not yet visible is pending,
/// an errored transaction is failed, and otherwise it is confirmed only when
/// it carries a system transfer of at least `min_lamports` to `treasury`.
pub(crate) fn assess_transaction(tx: &Value, treasury: &str, min_lamports: u64) -> PaymentStatus {
    if tx.is_null() {
        return PaymentStatus::Pending;
    }
    if tx.pointer("/meta/err").is_some_and(|err| !err.is_null()) {
        return PaymentStatus::Failed;
    }

    let instructions = tx
        .pointer("/transaction/message/instructions")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let paid = instructions.iter().any(|ix| {
        ix.get("program").and_then(Value::as_str) == Some("system")
            && ix.pointer("/parsed/type").and_then(Value::as_str) == Some("transfer")
            && ix.pointer("/parsed/info/destination").and_then(Value::as_str) == Some(treasury)
            && ix
                .pointer("/parsed/info/lamports")
                .and_then(Value::as_u64)
                .is_some_and(|lamports| lamports >= min_lamports)
    });

    if paid {
        PaymentStatus::Confirmed
    } else {
        PaymentStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TREASURY: &str = "9UP7m3Fx96x8GumBTHjCQX7AKK7hPapPNhSEuZYbeZdT";

    fn transfer(destination: &str, lamports: u64, err: Value) -> Value {
        json!({
            "meta": { "err": err },
            "transaction": {
                "message": {
                    "instructions": [
                        { "program": "compute-budget", "parsed": null },
                        {
                            "program": "system",
                            "parsed": {
                                "type": "transfer",
                                "info": {
                                    "source": "payer",
                                    "destination": destination,
                                    "lamports": lamports
                                }
                            }
                        }
                    ]
                }
            }
        })
    }

    #[test]
    fn unseen_transaction_is_pending() {
        assert_eq!(assess_transaction(&Value::Null, TREASURY, 1), PaymentStatus::Pending);
    }

    #[test]
    fn sufficient_transfer_to_treasury_confirms() {
        let tx = transfer(TREASURY, 10_000_000, Value::Null);
        assert_eq!(assess_transaction(&tx, TREASURY, 10_000_000), PaymentStatus::Confirmed);
    }

    #[test]
    fn short_payment_or_wrong_recipient_fails() {
        let short = transfer(TREASURY, 9_999_999, Value::Null);
        assert_eq!(assess_transaction(&short, TREASURY, 10_000_000), PaymentStatus::Failed);

        let elsewhere = transfer("SomeoneElse111111111111111111111111111111111", 10_000_000, Value::Null);
        assert_eq!(assess_transaction(&elsewhere, TREASURY, 10_000_000), PaymentStatus::Failed);
    }

    #[test]
    fn errored_transaction_fails() {
        let tx = transfer(TREASURY, 10_000_000, json!({ "InstructionError": [0, "Custom"] }));
        assert_eq!(assess_transaction(&tx, TREASURY, 10_000_000), PaymentStatus::Failed);
    }

    #[test]
    fn signature_shape() {
        let sig = "5".repeat(88);
        assert!(is_signature(&sig));
        assert!(!is_signature("tx_123"));
        // 0, O, I and l are not base58
        assert!(!is_signature(&"0".repeat(88)));
    }

    #[tokio::test]
    async fn malformed_ids_fail_without_touching_the_network() {
        let verifier = SolanaRpcVerifier::new("http://127.0.0.1:9", TREASURY, 1);
        let status = verifier
            .verify("not-a-signature", PaymentStatus::Confirmed)
            .await
            .expect("verify");
        assert_eq!(status, PaymentStatus::Failed);
    }

    #[test]
    fn from_config_requires_rpc() {
        let cfg = PaymentConfig {
            rpc_url: None,
            treasury_address: Some(TREASURY.into()),
            fee_lamports: 1,
        };
        assert!(SolanaRpcVerifier::from_config(&cfg).is_none());
    }
}
