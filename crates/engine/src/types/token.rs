//! Token-level views: underlying tokens, balances and allowances.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Curated display name and symbol for a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAlias {
    pub name: String,
    pub symbol: String,
}

/// A token some vault accepts as its underlying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnderlyingToken {
    pub address: Address,
    pub alias: Option<TokenAlias>,
    pub icon: Option<String>,
    /// Price of one whole token in USDC (6 decimals).
    pub price_usdc: Option<U256>,
}

/// An account's balance of one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    pub address: Address,
    pub balance: U256,
    pub price_usdc: Option<U256>,
}

/// How much `spender` may pull of `owner`'s `token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAllowance {
    pub owner: Address,
    pub token: Address,
    pub spender: Address,
    pub amount: U256,
}
