//! Curated metadata overrides.

use std::collections::HashMap;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use super::zap::ZapProtocol;

/// Curated, address-keyed override. Every field is optional; absent fields leave the
/// derived or on-chain value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataOverride {
    pub address: Address,
    /// Exclude the vault from every listing.
    pub hide_always: Option<bool>,
    pub order: Option<f64>,
    pub display_name: Option<String>,
    pub display_symbol: Option<String>,
    pub display_icon: Option<String>,
    pub allow_zap_in: Option<bool>,
    pub allow_zap_out: Option<bool>,
    pub zap_in_with: Option<ZapProtocol>,
    pub zap_out_with: Option<ZapProtocol>,
    pub migration_available: Option<bool>,
    pub migration_contract: Option<Address>,
    pub migration_target_vault: Option<Address>,
    pub deposits_disabled: Option<bool>,
    pub withdrawals_disabled: Option<bool>,
    pub retired: Option<bool>,
}

impl MetadataOverride {
    /// An override for `address` with no fields set.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            ..Default::default()
        }
    }

    /// Set the display order.
    pub fn with_order(mut self, order: f64) -> Self {
        self.order = Some(order);
        self
    }

    /// Set `hideAlways`.
    pub fn with_hide_always(mut self, hide: bool) -> Self {
        self.hide_always = Some(hide);
        self
    }

    /// Set the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Whether this override removes the vault from listings.
    pub fn is_hidden(&self) -> bool {
        self.hide_always.unwrap_or(false)
    }
}

/// Index overrides by vault address. Later entries win over earlier ones.
pub fn index_overrides(overrides: &[MetadataOverride]) -> HashMap<Address, &MetadataOverride> {
    overrides.iter().map(|o| (o.address, o)).collect()
}
