//! Collaborator seams the engine reads from.
//!
//! Every external data source is an object-safe trait held as `Arc<dyn Trait>`, so a
//! deployment can plug in any backend and tests can plug in in-memory doubles.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::types::{
    Apy, MetadataOverride, Position, TokenAlias, VaultDynamic, VaultHistoricEarnings, VaultStatic,
    VaultStrategiesMetadata,
};

/// Failure reported by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SourceError {
    message: String,
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(error: reqwest::Error) -> Self {
        Self::new(error.to_string())
    }
}

/// Result type for collaborator calls.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// A per-chain vault registry.
///
/// `None` as an address filter means every vault the adapter knows about.
#[async_trait]
pub trait VaultAdapter: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    async fn assets_static(&self, addresses: Option<&[Address]>)
        -> SourceResult<Vec<VaultStatic>>;

    async fn assets_dynamic(
        &self,
        addresses: Option<&[Address]>,
    ) -> SourceResult<Vec<VaultDynamic>>;

    async fn positions_of(
        &self,
        account: Address,
        addresses: Option<&[Address]>,
    ) -> SourceResult<Vec<Position>>;

    /// Underlying tokens of every vault the adapter knows about.
    async fn tokens(&self) -> SourceResult<Vec<Address>>;
}

/// Batch yield lookup keyed by vault address.
#[async_trait]
pub trait YieldOracle: Send + Sync {
    async fn apy_batch(&self, vaults: &[Address]) -> SourceResult<HashMap<Address, Apy>>;
}

/// Curated vault metadata.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn vault_overrides(&self) -> SourceResult<Vec<MetadataOverride>>;

    async fn strategies_metadata(
        &self,
        vaults: &[Address],
    ) -> SourceResult<Vec<VaultStrategiesMetadata>>;
}

/// Historic earnings per vault.
#[async_trait]
pub trait EarningsSource: Send + Sync {
    async fn historic_earnings(
        &self,
        vaults: &[Address],
    ) -> SourceResult<Vec<VaultHistoricEarnings>>;
}

/// USDC prices (6 decimals) for whole tokens. Tokens without a price are omitted.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn prices_usdc(&self, tokens: &[Address]) -> SourceResult<HashMap<Address, U256>>;
}

/// ERC-20 reads.
#[async_trait]
pub trait TokenReader: Send + Sync {
    async fn balance_of(&self, token: Address, owner: Address) -> SourceResult<U256>;

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> SourceResult<U256>;
}

/// A complete snapshot held by some external cache, if it has one.
#[async_trait]
pub trait SnapshotCache<T>: Send + Sync {
    async fn fetch(&self) -> Option<T>;
}

/// Vaults a zap service can route into on the current chain.
#[async_trait]
pub trait ZapVaultList: Send + Sync {
    async fn supported_vaults(&self) -> SourceResult<Vec<Address>>;
}

/// Static icon and alias lookups.
pub trait AssetDirectory: Send + Sync {
    fn icon(&self, token: Address) -> Option<String>;

    fn alias(&self, token: Address) -> Option<TokenAlias>;
}

/// Resolve an enrichment lookup, degrading to an empty value when it failed.
pub(crate) fn or_unavailable<T: Default>(source: &'static str, result: SourceResult<T>) -> T {
    result.unwrap_or_else(|error| {
        warn!(source, %error, "Enrichment unavailable, continuing without it");
        T::default()
    })
}
