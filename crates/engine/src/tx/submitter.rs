//! Submission with allow-list gating and a one-shot legacy gas fallback.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, TxHash, U256};
use tracing::{info, warn};

use super::allow_list::{AllowListPolicy, AllowListValidator};
use super::sender::TransactionSender;
use crate::error::{EngineError, Result};
use crate::types::{GasOverrides, GasPricing, TransactionDraft};
use crate::zap::ZapQuote;

/// What to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionPayload {
    /// Calldata encoded locally.
    Direct { to: Address, data: Bytes, value: U256 },
    /// A transaction prepared by the quote service.
    Quoted(ZapQuote),
}

impl TransactionPayload {
    pub fn to(&self) -> Address {
        match self {
            TransactionPayload::Direct { to, .. } => *to,
            TransactionPayload::Quoted(quote) => quote.to,
        }
    }
}

/// A transaction the node accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedTransaction {
    pub hash: TxHash,
    pub to: Address,
    /// 1, or 2 when the legacy fallback was used.
    pub attempts: u8,
    /// Pricing of the accepted attempt.
    pub pricing: Option<GasPricing>,
}

/// Sends payloads, retrying once with legacy pricing when the node rejects EIP-1559 fields.
pub struct TransactionSubmitter {
    sender: Arc<dyn TransactionSender>,
    allow_list: Option<Arc<dyn AllowListValidator>>,
    policy: AllowListPolicy,
    incompatibility_code: i64,
}

impl TransactionSubmitter {
    pub fn new(sender: Arc<dyn TransactionSender>, incompatibility_code: i64) -> Self {
        Self {
            sender,
            allow_list: None,
            policy: AllowListPolicy::default(),
            incompatibility_code,
        }
    }

    pub fn with_allow_list(
        mut self,
        validator: Arc<dyn AllowListValidator>,
        policy: AllowListPolicy,
    ) -> Self {
        self.allow_list = Some(validator);
        self.policy = policy;
        self
    }

    /// Send `payload` from `from`.
    ///
    /// The first attempt carries EIP-1559 caps when both are overridden and otherwise
    /// leaves pricing to the node. If the node answers with the incompatibility code the
    /// draft is resent once with a legacy gas price: the caller's, else the quote's, else
    /// the sender's current price. There is never a third attempt.
    pub async fn submit(
        &self,
        from: Address,
        payload: TransactionPayload,
        overrides: &GasOverrides,
    ) -> Result<SubmittedTransaction> {
        let (draft, quote_gas_price) = match payload {
            TransactionPayload::Direct { to, data, value } => (
                TransactionDraft::new(from, to, data, value).with_gas_limit(overrides.gas_limit),
                None,
            ),
            TransactionPayload::Quoted(quote) => (
                TransactionDraft::new(from, quote.to, quote.data, quote.value)
                    .with_gas_limit(overrides.gas_limit.or(quote.gas)),
                quote.gas_price,
            ),
        };

        self.check_allow_list(&draft).await?;

        let first = overrides.eip1559_pricing();
        let error = match self.sender.send(&draft.clone().with_pricing(first)).await {
            Ok(hash) => return Ok(submitted(hash, &draft, 1, first)),
            Err(error) => error,
        };

        if error.code() != Some(self.incompatibility_code) {
            return Err(EngineError::TransactionSend {
                attempts: 1,
                source: error,
            });
        }

        let gas_price = match overrides.gas_price.or(quote_gas_price) {
            Some(price) => price,
            None => match self.sender.gas_price().await {
                Ok(price) => price,
                Err(read_error) => {
                    warn!(to = %draft.to, %read_error, "Gas price unavailable, cannot retry with legacy pricing");
                    return Err(EngineError::TransactionSend {
                        attempts: 1,
                        source: error,
                    });
                }
            },
        };
        info!(
            to = %draft.to,
            %error,
            gas_price,
            "Node rejected fee fields, retrying with legacy gas price"
        );

        let legacy = Some(GasPricing::Legacy { gas_price });
        let hash = self
            .sender
            .send(&draft.clone().with_pricing(legacy))
            .await
            .map_err(|source| EngineError::TransactionSend {
                attempts: 2,
                source,
            })?;

        Ok(submitted(hash, &draft, 2, legacy))
    }

    async fn check_allow_list(&self, draft: &TransactionDraft) -> Result<()> {
        let Some(validator) = &self.allow_list else {
            return Ok(());
        };

        let reason = match validator.validate_calldata(draft.to, &draft.data).await {
            Ok(verdict) if verdict.ok => return Ok(()),
            Ok(verdict) => verdict
                .reason
                .unwrap_or_else(|| "rejected without reason".to_string()),
            Err(error) => format!("validator unavailable: {error}"),
        };

        match self.policy {
            AllowListPolicy::Warn => {
                warn!(to = %draft.to, %reason, "Allow-list rejected transaction, sending anyway");
                Ok(())
            }
            AllowListPolicy::Enforce => Err(EngineError::CalldataRejected {
                to: draft.to,
                reason,
            }),
        }
    }
}

fn submitted(
    hash: TxHash,
    draft: &TransactionDraft,
    attempts: u8,
    pricing: Option<GasPricing>,
) -> SubmittedTransaction {
    SubmittedTransaction {
        hash,
        to: draft.to,
        attempts,
        pricing,
    }
}
