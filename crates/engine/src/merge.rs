//! Merging static records, dynamic records and curated overrides into [`Vault`]s.

use std::cmp::Ordering;
use std::collections::HashMap;

use alloy_primitives::Address;
use tracing::warn;

use crate::error::{EngineError, Result};
use crate::types::{
    index_overrides, EarningsDayData, MetadataOverride, StrategyMetadata, Vault, VaultDynamic,
    VaultMetadata, VaultStatic,
};

/// Layer `o` onto `metadata`. Present override fields win; absent ones leave the
/// existing value alone. The derived `hide_if_no_deposits` is recomputed.
pub fn apply_override(metadata: &mut VaultMetadata, o: Option<&MetadataOverride>) {
    if let Some(o) = o {
        if let Some(name) = &o.display_name {
            metadata.display_name = Some(name.clone());
        }
        if let Some(icon) = &o.display_icon {
            metadata.display_icon = Some(icon.clone());
        }
        if let Some(allow) = o.allow_zap_in {
            metadata.allow_zap_in = allow;
        }
        if let Some(allow) = o.allow_zap_out {
            metadata.allow_zap_out = allow;
        }
        if o.zap_in_with.is_some() {
            metadata.zap_in_with = o.zap_in_with;
        }
        if o.zap_out_with.is_some() {
            metadata.zap_out_with = o.zap_out_with;
        }
        if let Some(disabled) = o.deposits_disabled {
            metadata.deposits_disabled = disabled;
        }
        if let Some(disabled) = o.withdrawals_disabled {
            metadata.withdrawals_disabled = disabled;
        }
        if let Some(retired) = o.retired {
            metadata.retired = retired;
        }
        metadata.migration_available |= o.migration_available.unwrap_or(false);
        if o.migration_contract.is_some() {
            metadata.migration_contract = o.migration_contract;
        }
        if o.migration_target_vault.is_some() {
            metadata.migration_target_vault = o.migration_target_vault;
        }
    }

    metadata.hide_if_no_deposits =
        metadata.emergency_shutdown || metadata.retired || metadata.migration_available;
}

/// Compose one vault.
pub fn merge(
    vault: VaultStatic,
    dynamic: VaultDynamic,
    o: Option<&MetadataOverride>,
    strategies: Option<Vec<StrategyMetadata>>,
    historic_earnings: Option<Vec<EarningsDayData>>,
) -> Vault {
    let mut metadata = dynamic.metadata;
    if metadata.display_name.is_none() {
        metadata.display_name = Some(vault.name.clone());
    }
    apply_override(&mut metadata, o);

    let symbol = o
        .and_then(|o| o.display_symbol.clone())
        .unwrap_or(vault.symbol);

    Vault {
        address: vault.address,
        token: vault.token,
        name: vault.name,
        symbol,
        decimals: vault.decimals,
        total_assets: dynamic.total_assets,
        total_assets_usdc: dynamic.total_assets_usdc,
        apy: dynamic.apy,
        metadata,
        order: o.and_then(|o| o.order),
        strategies: strategies.unwrap_or_default(),
        historic_earnings: historic_earnings.unwrap_or_default(),
    }
}

/// Compose every static record with its dynamic counterpart.
///
/// Fails if any static record has no dynamic record. Vaults with `hideAlways` are
/// dropped and the rest are stably sorted by override order, unordered vaults last.
pub fn merge_all(
    statics: Vec<VaultStatic>,
    dynamics: Vec<VaultDynamic>,
    overrides: &[MetadataOverride],
    mut strategies: HashMap<Address, Vec<StrategyMetadata>>,
    mut earnings: HashMap<Address, Vec<EarningsDayData>>,
) -> Result<Vec<Vault>> {
    let mut by_address: HashMap<Address, VaultDynamic> = HashMap::with_capacity(dynamics.len());
    for dynamic in dynamics {
        let address = dynamic.address;
        if by_address.insert(address, dynamic).is_some() {
            warn!(%address, "Duplicate dynamic record, keeping the last one");
        }
    }
    let mut dynamics = by_address;
    let overrides = index_overrides(overrides);

    let mut vaults = Vec::with_capacity(statics.len());
    for vault in statics {
        let address = vault.address;
        let dynamic = dynamics
            .remove(&address)
            .ok_or(EngineError::AggregationConsistency { address })?;
        let o = overrides.get(&address).copied();
        if o.is_some_and(MetadataOverride::is_hidden) {
            continue;
        }
        vaults.push(merge(
            vault,
            dynamic,
            o,
            strategies.remove(&address),
            earnings.remove(&address),
        ));
    }

    vaults.sort_by(|a, b| compare_order(a.order, b.order));
    Ok(vaults)
}

fn compare_order(a: Option<f64>, b: Option<f64>) -> Ordering {
    let a = a.unwrap_or(f64::INFINITY);
    let b = b.unwrap_or(f64::INFINITY);
    a.total_cmp(&b)
}
