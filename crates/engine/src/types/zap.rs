//! Zap protocol identifiers.

use serde::{Deserialize, Serialize};

/// Identifies a zap execution path.
///
/// Also used as the key of the [`AddressBook`](crate::config::AddressBook) registry that maps
/// protocols to deployed contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZapProtocol {
    /// General-purpose zap-in contract.
    ZapIn,
    /// General-purpose zap-out contract.
    ZapOut,
    /// Zap-in contract for pickle jar vaults.
    PickleZapIn,
    /// Routing aggregator used on chains without zap contracts.
    Router,
}

impl std::fmt::Display for ZapProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZapProtocol::ZapIn => write!(f, "zapIn"),
            ZapProtocol::ZapOut => write!(f, "zapOut"),
            ZapProtocol::PickleZapIn => write!(f, "pickleZapIn"),
            ZapProtocol::Router => write!(f, "router"),
        }
    }
}
