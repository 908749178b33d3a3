//! Error types for the contracts crate.

use thiserror::Error;

/// Errors that can occur when connecting to a chain.
#[derive(Debug, Error)]
pub enum ContractError {
    /// RPC connection failed.
    #[error("RPC connection failed: {0}")]
    RpcConnection(String),

    /// Invalid private key.
    #[error("Invalid private key")]
    InvalidPrivateKey,
}

/// Result type alias for contract operations.
pub type Result<T> = std::result::Result<T, ContractError>;
