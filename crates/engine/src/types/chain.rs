//! Chain-level constants and helpers.
//!
//! `NamedChain` itself is re-exported from `alloy_chains` by [`crate::types`].

use alloy_primitives::{address, Address};

/// Sentinel address standing in for a chain's native asset.
pub const NATIVE_TOKEN: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

/// Wrapped ether on Ethereum mainnet.
pub const MAINNET_WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

/// Wrapped FTM on Fantom opera.
pub const FANTOM_WFTM: Address = address!("21be370D5312f44cB42ce377BC9b8a0cEF1A4C83");

/// Wrapped ether on Arbitrum One.
pub const ARBITRUM_WETH: Address = address!("82aF49447D8a07e3bd95BD0d56f35241523fBab1");

/// Wrapped ether predeploy shared by OP-stack chains (Optimism, Base).
pub const OP_STACK_WETH: Address = address!("4200000000000000000000000000000000000006");

/// Whether `token` is the native-asset sentinel.
pub fn is_native_token(token: Address) -> bool {
    token == NATIVE_TOKEN
}
