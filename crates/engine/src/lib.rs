//! Vault aggregation and transaction routing.
//!
//! The engine collects vault records from any number of registry adapters, layers
//! curated metadata on top, and routes deposits and withdrawals through the right
//! contract: the vault itself, a partner tracking proxy, a zap contract or a routing
//! aggregator.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vaultkit_engine::{EngineConfig, VaultAdapter, VaultEngine};
//!
//! # async fn run(adapter: Arc<dyn VaultAdapter>) -> vaultkit_engine::Result<()> {
//! let engine = VaultEngine::builder(EngineConfig::new())
//!     .with_adapter(adapter)
//!     .build();
//!
//! for vault in engine.list_vaults(None).await? {
//!     tracing::info!(address = %vault.address, name = ?vault.metadata.display_name, "vault");
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod client;
pub mod config;
pub mod error;
pub mod merge;
pub mod onchain;
pub mod routing;
pub mod sources;
pub mod tx;
pub mod types;
pub mod zap;

pub use aggregator::AdapterAggregator;
pub use client::{EngineCaches, TransactionOptions, VaultEngine, VaultEngineBuilder};
pub use config::{
    AddressBook, ChainProfile, EngineConfig, NativeAsset, ZapSolution, DEFAULT_CHUNK_SIZE,
    EIP1559_UNSUPPORTED_CODE,
};
pub use error::{EngineError, ErrorCategory, Result};
pub use onchain::Erc20Reader;
pub use routing::{RouteDecision, RouteResolver, RouteTarget};
pub use sources::{
    AssetDirectory, EarningsSource, MetadataSource, PriceOracle, SnapshotCache, SourceError,
    SourceResult, TokenReader, VaultAdapter, YieldOracle, ZapVaultList,
};
pub use tx::{
    AllowListPolicy, AllowListValidator, AllowListVerdict, ProviderSender, SendError,
    SubmittedTransaction, TransactionPayload, TransactionSender, TransactionSubmitter,
};
pub use types::*;
pub use zap::{ZapApiClient, ZapApiConfig, ZapInRequest, ZapOutRequest, ZapQuote, ZapQuoter};
