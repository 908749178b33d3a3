//! Gas pricing and transaction drafts.

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fee scheme attached to a transaction. At most one scheme is ever populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GasPricing {
    /// Pre-London `gasPrice`.
    #[serde(rename_all = "camelCase")]
    Legacy { gas_price: u128 },
    /// EIP-1559 fee caps.
    #[serde(rename_all = "camelCase")]
    Eip1559 {
        max_fee_per_gas: u128,
        max_priority_fee_per_gas: u128,
    },
}

/// Caller-supplied gas parameters. Everything is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GasOverrides {
    pub gas_limit: Option<u64>,
    pub gas_price: Option<u128>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
}

impl GasOverrides {
    /// No overrides; the signer and node pick everything.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    pub fn with_eip1559(mut self, max_fee_per_gas: u128, max_priority_fee_per_gas: u128) -> Self {
        self.max_fee_per_gas = Some(max_fee_per_gas);
        self.max_priority_fee_per_gas = Some(max_priority_fee_per_gas);
        self
    }

    /// EIP-1559 pricing for the first attempt.
    ///
    /// Both caps must be present. A lone cap is dropped with a warning and the node
    /// default applies.
    pub fn eip1559_pricing(&self) -> Option<GasPricing> {
        match (self.max_fee_per_gas, self.max_priority_fee_per_gas) {
            (Some(max_fee_per_gas), Some(max_priority_fee_per_gas)) => Some(GasPricing::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            }),
            (None, None) => None,
            (max_fee, max_priority) => {
                warn!(
                    ?max_fee,
                    ?max_priority,
                    "Ignoring incomplete EIP-1559 fee override"
                );
                None
            }
        }
    }
}

/// Everything needed to send one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub gas_limit: Option<u64>,
    /// `None` leaves pricing to the signer or node.
    pub pricing: Option<GasPricing>,
}

impl TransactionDraft {
    /// A draft with no gas limit and default pricing.
    pub fn new(from: Address, to: Address, data: Bytes, value: U256) -> Self {
        Self {
            from,
            to,
            data,
            value,
            gas_limit: None,
            pricing: None,
        }
    }

    pub fn with_gas_limit(mut self, gas_limit: Option<u64>) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn with_pricing(mut self, pricing: Option<GasPricing>) -> Self {
        self.pricing = pricing;
        self
    }
}
