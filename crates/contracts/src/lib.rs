//! Contract bindings and calldata builders for yield vaults.
//!
//! This crate provides Solidity bindings for vaults, the partner deposit tracker and ERC-20
//! tokens, typed calldata builders, and a helper for connecting a signing HTTP provider.
//!
//! # Example
//!
//! ```no_run
//! use vaultkit_contracts::calls;
//! use alloy::primitives::{Address, U256};
//!
//! let vault: Address = "0x5f18C75AbDAe578b483E5F43f12a39cF75b973a9".parse().unwrap();
//! let recipient: Address = "0x1234567890123456789012345678901234567890".parse().unwrap();
//!
//! let (to, data, value) = calls::vault_deposit(vault, U256::from(1_000_000u64), recipient, U256::ZERO)
//!     .encode();
//! ```

pub mod calls;
pub mod erc20;
pub mod error;
pub mod partner;
pub mod prepared_call;
pub mod provider;
pub mod vault;

pub use error::{ContractError, Result};
pub use prepared_call::PreparedCall;
pub use provider::{connect_http, HttpProvider};
