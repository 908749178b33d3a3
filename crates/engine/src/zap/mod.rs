//! Quote service seam for zap routes.

pub mod http;

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;

use crate::sources::SourceResult;
use crate::types::ZapProtocol;

pub use http::{ZapApiClient, ZapApiConfig};

/// Swap an arbitrary token into a vault.
#[derive(Debug, Clone, PartialEq)]
pub struct ZapInRequest {
    pub account: Address,
    pub from_token: Address,
    pub amount: U256,
    pub to_vault: Address,
    /// Tolerance in percent, e.g. `1.0` for 1%.
    pub slippage_percent: f64,
    pub protocol: ZapProtocol,
    /// Caller's gas price, forwarded so the quote can price the swap.
    pub gas_price: Option<u128>,
}

/// Swap vault shares out into an arbitrary token.
#[derive(Debug, Clone, PartialEq)]
pub struct ZapOutRequest {
    pub account: Address,
    pub to_token: Address,
    pub amount: U256,
    pub from_vault: Address,
    /// Tolerance in percent, e.g. `1.0` for 1%.
    pub slippage_percent: f64,
    pub protocol: ZapProtocol,
    pub gas_price: Option<u128>,
}

/// A ready-to-sign transaction returned by the quote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZapQuote {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    /// Suggested gas limit.
    pub gas: Option<u64>,
    /// Suggested gas price, used only when the caller gave none.
    pub gas_price: Option<u128>,
}

/// Produces zap transactions.
#[async_trait]
pub trait ZapQuoter: Send + Sync {
    async fn zap_in(&self, request: &ZapInRequest) -> SourceResult<ZapQuote>;

    async fn zap_out(&self, request: &ZapOutRequest) -> SourceResult<ZapQuote>;
}
