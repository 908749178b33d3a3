//! Sending drafts through a signer.

use alloy::network::TransactionBuilder;
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use alloy::transports::TransportError;
use alloy_primitives::{Address, TxHash};
use async_trait::async_trait;
use thiserror::Error;
use vaultkit_contracts::{connect_http, HttpProvider};

use crate::types::{GasPricing, TransactionDraft};

/// Failure to send a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// The node answered with a JSON-RPC error.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("{0}")]
    Other(String),
}

impl SendError {
    /// The JSON-RPC error code, if the node returned one.
    pub fn code(&self) -> Option<i64> {
        match self {
            SendError::Rpc { code, .. } => Some(*code),
            SendError::Other(_) => None,
        }
    }
}

impl From<TransportError> for SendError {
    fn from(error: TransportError) -> Self {
        match error.as_error_resp() {
            Some(payload) => SendError::Rpc {
                code: payload.code,
                message: payload.message.to_string(),
            },
            None => SendError::Other(error.to_string()),
        }
    }
}

/// Signs and broadcasts drafts.
///
/// Nonce management is left to the implementation.
#[async_trait]
pub trait TransactionSender: Send + Sync {
    async fn send(&self, draft: &TransactionDraft) -> Result<TxHash, SendError>;

    /// Current legacy gas price.
    async fn gas_price(&self) -> Result<u128, SendError>;
}

impl TransactionDraft {
    /// Convert into an alloy request. Exactly the populated pricing scheme is set.
    pub fn to_request(&self) -> TransactionRequest {
        let mut request = TransactionRequest::default()
            .with_from(self.from)
            .with_to(self.to)
            .with_input(self.data.clone())
            .with_value(self.value);

        if let Some(gas_limit) = self.gas_limit {
            request = request.with_gas_limit(gas_limit);
        }

        match self.pricing {
            Some(GasPricing::Legacy { gas_price }) => request.with_gas_price(gas_price),
            Some(GasPricing::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            }) => request
                .with_max_fee_per_gas(max_fee_per_gas)
                .with_max_priority_fee_per_gas(max_priority_fee_per_gas),
            None => request,
        }
    }
}

/// [`TransactionSender`] backed by a wallet-filled HTTP provider.
#[derive(Clone)]
pub struct ProviderSender {
    provider: HttpProvider,
    signer_address: Address,
}

impl ProviderSender {
    pub fn new(provider: HttpProvider, signer_address: Address) -> Self {
        Self {
            provider,
            signer_address,
        }
    }

    /// Connect to `rpc_url` signing with `private_key`.
    pub fn connect(rpc_url: &str, private_key: &str) -> crate::error::Result<Self> {
        let (provider, signer_address) = connect_http(rpc_url, private_key)?;
        Ok(Self::new(provider, signer_address))
    }

    pub fn signer_address(&self) -> Address {
        self.signer_address
    }

    pub fn provider(&self) -> &HttpProvider {
        &self.provider
    }
}

#[async_trait]
impl TransactionSender for ProviderSender {
    async fn send(&self, draft: &TransactionDraft) -> Result<TxHash, SendError> {
        let pending = self.provider.send_transaction(draft.to_request()).await?;
        Ok(*pending.tx_hash())
    }

    async fn gas_price(&self) -> Result<u128, SendError> {
        Ok(self.provider.get_gas_price().await?)
    }
}
