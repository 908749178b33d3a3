//! Error types for the vault engine.

use alloy_primitives::Address;
use thiserror::Error;
use vaultkit_contracts::ContractError;

use crate::sources::SourceError;
use crate::tx::SendError;

/// Errors that can occur when listing vaults or submitting vault transactions.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A static vault record had no dynamic counterpart after both fetches completed.
    #[error("Aggregation inconsistency: no dynamic record for vault {address}")]
    AggregationConsistency { address: Address },

    /// A registry adapter query failed, including its chunked retry.
    #[error("Adapter query failed: {0}")]
    Adapter(SourceError),

    /// A contract the route needs is not configured.
    #[error("Route configuration error: {0}")]
    RouteConfiguration(String),

    /// A zap deposit or withdraw was requested without a slippage tolerance.
    #[error("Zap operations require a slippage tolerance")]
    MissingSlippage,

    /// The slippage tolerance is not a fraction in (0, 1).
    #[error("Invalid slippage tolerance: {0}")]
    InvalidSlippage(f64),

    /// The vault is not known to any registered adapter.
    #[error("Vault not found: {0}")]
    VaultNotFound(Address),

    /// The quoting service failed to produce a transaction.
    #[error("Zap quote failed: {0}")]
    Quote(SourceError),

    /// A token balance, allowance or price lookup failed.
    #[error("Lookup failed: {0}")]
    Lookup(SourceError),

    /// The allow-list rejected the transaction and enforcement is enabled.
    #[error("Calldata rejected for {to}: {reason}")]
    CalldataRejected { to: Address, reason: String },

    /// Sending the transaction failed.
    #[error("Transaction send failed after {attempts} attempt(s): {source}")]
    TransactionSend {
        attempts: u8,
        #[source]
        source: SendError,
    },

    /// Transaction support not configured (no sender was provided).
    #[error("Transaction support not configured: a transaction sender is required")]
    TransactionNotConfigured,

    /// An operation needs a collaborator the engine was built without.
    #[error("{0} not configured")]
    CollaboratorNotConfigured(&'static str),

    /// Error from the contracts layer.
    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),

    /// HTTP client construction or request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to parse input or configuration.
    #[error("Failed to parse: {0}")]
    Parse(String),
}

/// High-level classification of [`EngineError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Upstream data sources disagree with each other.
    Consistency,
    /// A required address or collaborator is missing from the configuration.
    Configuration,
    /// The request itself is invalid.
    Validation,
    /// An upstream adapter, quote service or lookup failed.
    Upstream,
    /// Transaction validation or submission failed.
    Transaction,
}

impl EngineError {
    /// Classify this error.
    pub fn error_category(&self) -> ErrorCategory {
        match self {
            EngineError::AggregationConsistency { .. } => ErrorCategory::Consistency,
            EngineError::RouteConfiguration(_)
            | EngineError::TransactionNotConfigured
            | EngineError::CollaboratorNotConfigured(_) => ErrorCategory::Configuration,
            EngineError::MissingSlippage
            | EngineError::InvalidSlippage(_)
            | EngineError::VaultNotFound(_)
            | EngineError::Parse(_) => ErrorCategory::Validation,
            EngineError::Adapter(_)
            | EngineError::Quote(_)
            | EngineError::Lookup(_)
            | EngineError::Request(_) => ErrorCategory::Upstream,
            EngineError::CalldataRejected { .. }
            | EngineError::TransactionSend { .. }
            | EngineError::Contract(_) => ErrorCategory::Transaction,
        }
    }

    /// Whether repeating the same call may succeed.
    ///
    /// Upstream failures and aggregation inconsistencies are transient. A failed send is
    /// not: the transaction may have reached the mempool.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.error_category(),
            ErrorCategory::Upstream | ErrorCategory::Consistency
        )
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_slippage() {
        assert_eq!(
            EngineError::MissingSlippage.to_string(),
            "Zap operations require a slippage tolerance"
        );
    }

    #[test]
    fn test_error_display_consistency() {
        let error = EngineError::AggregationConsistency {
            address: Address::repeat_byte(0x11),
        };
        assert!(error.to_string().contains("no dynamic record"));
    }

    #[test]
    fn test_error_display_send() {
        let error = EngineError::TransactionSend {
            attempts: 2,
            source: SendError::Other("nonce too low".to_string()),
        };
        assert_eq!(
            error.to_string(),
            "Transaction send failed after 2 attempt(s): nonce too low"
        );
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            EngineError::RouteConfiguration("partner proxy".into()).error_category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            EngineError::MissingSlippage.error_category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            EngineError::Adapter(SourceError::new("timeout")).error_category(),
            ErrorCategory::Upstream
        );
    }

    #[test]
    fn test_collaborator_not_configured() {
        let error = EngineError::CollaboratorNotConfigured("zap quoter");
        assert_eq!(error.to_string(), "zap quoter not configured");
        assert_eq!(error.error_category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_retryable() {
        assert!(EngineError::Quote(SourceError::new("503")).is_retryable());
        assert!(!EngineError::MissingSlippage.is_retryable());
        assert!(!EngineError::TransactionSend {
            attempts: 1,
            source: SendError::Other("reverted".into()),
        }
        .is_retryable());
    }
}
