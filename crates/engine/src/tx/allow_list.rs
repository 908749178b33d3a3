//! Pre-send validation of destination and calldata.

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::sources::SourceResult;

/// Result of an allow-list check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowListVerdict {
    pub ok: bool,
    pub reason: Option<String>,
}

impl AllowListVerdict {
    pub fn allowed() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

/// Validates that a transaction targets an expected contract with expected calldata.
#[async_trait]
pub trait AllowListValidator: Send + Sync {
    async fn validate_calldata(&self, to: Address, data: &Bytes) -> SourceResult<AllowListVerdict>;
}

/// What to do with a negative verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AllowListPolicy {
    /// Log and send anyway.
    #[default]
    Warn,
    /// Refuse to send.
    Enforce,
}
