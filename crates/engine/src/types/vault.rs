//! Vault records as returned by registry adapters and as exposed after merging.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use super::zap::ZapProtocol;

/// Immutable identity of a vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultStatic {
    /// The vault's contract address.
    pub address: Address,
    /// The underlying token the vault accepts without zapping.
    pub token: Address,
    /// The vault's on-chain name.
    pub name: String,
    /// The vault's on-chain symbol.
    pub symbol: String,
    /// Decimals of the vault share token.
    pub decimals: u8,
}

/// Yield figures for a vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apy {
    /// How the figure was computed (e.g. "v2:averaged").
    #[serde(rename = "type")]
    pub kind: String,
    /// Gross APR before fees.
    pub gross_apr: f64,
    /// Net APY after fees.
    pub net_apy: f64,
}

/// Display, capability and lifecycle fields attached to a dynamic record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultMetadata {
    pub display_name: Option<String>,
    pub display_icon: Option<String>,
    /// Token the UI should preselect for deposits.
    pub default_display_token: Option<Address>,
    pub price_per_share: U256,
    pub deposit_limit: U256,
    pub emergency_shutdown: bool,
    pub retired: bool,
    pub deposits_disabled: bool,
    pub withdrawals_disabled: bool,
    pub allow_zap_in: bool,
    pub allow_zap_out: bool,
    pub zap_in_with: Option<ZapProtocol>,
    pub zap_out_with: Option<ZapProtocol>,
    pub migration_available: bool,
    pub migration_contract: Option<Address>,
    pub migration_target_vault: Option<Address>,
    /// Derived: hide the vault from accounts that hold no shares.
    pub hide_if_no_deposits: bool,
}

/// Refreshable state of a vault, superseded on each fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultDynamic {
    pub address: Address,
    pub token: Address,
    /// Total assets under management, in underlying token units.
    pub total_assets: U256,
    /// Total assets valued in USDC (6 decimals), when the adapter knows it.
    pub total_assets_usdc: Option<U256>,
    pub apy: Option<Apy>,
    pub metadata: VaultMetadata,
}

/// Curated description of one strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyMetadata {
    pub address: Address,
    pub name: String,
    pub description: Option<String>,
}

/// Strategy descriptions for a vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultStrategiesMetadata {
    pub vault: Address,
    pub strategies: Vec<StrategyMetadata>,
}

/// Earnings for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsDayData {
    /// ISO-8601 date.
    pub date: String,
    pub earnings_usdc: U256,
}

/// Historic earnings series for a vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultHistoricEarnings {
    pub vault: Address,
    pub days: Vec<EarningsDayData>,
}

/// A vault as exposed to callers: identity, state, curated metadata and display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vault {
    pub address: Address,
    pub token: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_assets: U256,
    pub total_assets_usdc: Option<U256>,
    pub apy: Option<Apy>,
    pub metadata: VaultMetadata,
    /// Curated display order; `None` sorts after every ordered vault.
    pub order: Option<f64>,
    pub strategies: Vec<StrategyMetadata>,
    pub historic_earnings: Vec<EarningsDayData>,
}

/// Kind of holding a position represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionKind {
    Deposit,
    Yield,
}

/// An account's holding in a vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// The vault address.
    pub asset: Address,
    /// The token the balance is denominated in.
    pub token: Address,
    #[serde(rename = "type")]
    pub kind: PositionKind,
    pub balance: U256,
    /// Balance converted to underlying token units.
    pub underlying_balance: U256,
    pub balance_usdc: Option<U256>,
}
