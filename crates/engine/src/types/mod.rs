//! Type definitions for the vault engine.

pub mod chain;
pub mod gas;
pub mod overrides;
pub mod token;
pub mod vault;
pub mod zap;

pub use alloy_chains::NamedChain;
pub use chain::{is_native_token, NATIVE_TOKEN};
pub use gas::{GasOverrides, GasPricing, TransactionDraft};
pub use overrides::{index_overrides, MetadataOverride};
pub use token::{TokenAlias, TokenAllowance, TokenBalance, UnderlyingToken};
pub use vault::{
    Apy, EarningsDayData, Position, PositionKind, StrategyMetadata, Vault, VaultDynamic,
    VaultHistoricEarnings, VaultMetadata, VaultStatic, VaultStrategiesMetadata,
};
pub use zap::ZapProtocol;
