//! Fan-out over registry adapters.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::Address;
use futures::future::try_join_all;
use tracing::{debug, warn};

use crate::config::ChainProfile;
use crate::error::{EngineError, Result};
use crate::merge::apply_override;
use crate::sources::{
    or_unavailable, AssetDirectory, SourceError, SourceResult, VaultAdapter, YieldOracle,
    ZapVaultList,
};
use crate::types::{
    index_overrides, MetadataOverride, Position, VaultDynamic, VaultStatic, ZapProtocol,
    NATIVE_TOKEN,
};

/// Collects vault records from every registered adapter.
///
/// Adapters are queried in parallel and their results are concatenated in registration
/// order. Records are not deduplicated across adapters.
pub struct AdapterAggregator {
    adapters: Vec<Arc<dyn VaultAdapter>>,
    profile: ChainProfile,
    chunk_size: usize,
    yields: Option<Arc<dyn YieldOracle>>,
    directory: Option<Arc<dyn AssetDirectory>>,
    zap_vaults: Option<Arc<dyn ZapVaultList>>,
}

impl AdapterAggregator {
    pub fn new(
        adapters: Vec<Arc<dyn VaultAdapter>>,
        profile: ChainProfile,
        chunk_size: usize,
    ) -> Self {
        Self {
            adapters,
            profile,
            chunk_size: chunk_size.max(1),
            yields: None,
            directory: None,
            zap_vaults: None,
        }
    }

    pub fn with_yield_oracle(mut self, yields: Arc<dyn YieldOracle>) -> Self {
        self.yields = Some(yields);
        self
    }

    pub fn with_asset_directory(mut self, directory: Arc<dyn AssetDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn with_zap_vault_list(mut self, zap_vaults: Arc<dyn ZapVaultList>) -> Self {
        self.zap_vaults = Some(zap_vaults);
        self
    }

    /// Static records from every adapter.
    pub async fn list_static(&self, filter: Option<&[Address]>) -> Result<Vec<VaultStatic>> {
        let results = try_join_all(
            self.adapters
                .iter()
                .map(|adapter| adapter.assets_static(filter)),
        )
        .await
        .map_err(EngineError::Adapter)?;

        Ok(results.into_iter().flatten().collect())
    }

    /// Enriched dynamic records from every adapter, with `overrides` extended for zap
    /// support and applied.
    pub async fn list_dynamic(
        &self,
        filter: Option<&[Address]>,
        overrides: &[MetadataOverride],
    ) -> Result<Vec<VaultDynamic>> {
        let overrides = self.augment_overrides(overrides).await;
        self.list_dynamic_with(filter, &overrides).await
    }

    /// Enriched dynamic records with `overrides` applied as given. Callers that merge
    /// afterwards pass the output of [`Self::augment_overrides`] to both steps.
    pub async fn list_dynamic_with(
        &self,
        filter: Option<&[Address]>,
        overrides: &[MetadataOverride],
    ) -> Result<Vec<VaultDynamic>> {
        let overrides = index_overrides(overrides);

        let results = try_join_all(self.adapters.iter().map(|adapter| {
            let overrides = &overrides;
            async move {
                let records = self.dynamic_for(adapter.as_ref(), filter).await?;
                Ok::<_, SourceError>(self.enrich(records, overrides).await)
            }
        }))
        .await
        .map_err(EngineError::Adapter)?;

        Ok(results.into_iter().flatten().collect())
    }

    /// Positions held by `account` across every adapter.
    pub async fn positions_of(
        &self,
        account: Address,
        filter: Option<&[Address]>,
    ) -> Result<Vec<Position>> {
        let results = try_join_all(
            self.adapters
                .iter()
                .map(|adapter| self.positions_for(adapter.as_ref(), account, filter)),
        )
        .await
        .map_err(EngineError::Adapter)?;

        Ok(results.into_iter().flatten().collect())
    }

    /// Underlying tokens from every adapter, duplicates included.
    pub async fn tokens(&self) -> Result<Vec<Address>> {
        let results = try_join_all(self.adapters.iter().map(|adapter| adapter.tokens()))
            .await
            .map_err(EngineError::Adapter)?;

        Ok(results.into_iter().flatten().collect())
    }

    async fn dynamic_for(
        &self,
        adapter: &dyn VaultAdapter,
        filter: Option<&[Address]>,
    ) -> SourceResult<Vec<VaultDynamic>> {
        match adapter.assets_dynamic(filter).await {
            Ok(records) => Ok(records),
            Err(error) => {
                warn!(adapter = adapter.name(), %error, "Bulk dynamic query failed, retrying in chunks");
                let addresses = self.fallback_addresses(adapter, filter).await?;
                let chunks = try_join_all(
                    addresses
                        .chunks(self.chunk_size)
                        .map(|chunk| adapter.assets_dynamic(Some(chunk))),
                )
                .await?;
                Ok(chunks.into_iter().flatten().collect())
            }
        }
    }

    async fn positions_for(
        &self,
        adapter: &dyn VaultAdapter,
        account: Address,
        filter: Option<&[Address]>,
    ) -> SourceResult<Vec<Position>> {
        match adapter.positions_of(account, filter).await {
            Ok(positions) => Ok(positions),
            Err(error) => {
                warn!(adapter = adapter.name(), %account, %error, "Bulk positions query failed, retrying in chunks");
                let addresses = self.fallback_addresses(adapter, filter).await?;
                let chunks = try_join_all(
                    addresses
                        .chunks(self.chunk_size)
                        .map(|chunk| adapter.positions_of(account, Some(chunk))),
                )
                .await?;
                Ok(chunks.into_iter().flatten().collect())
            }
        }
    }

    /// The address set a failed bulk call covered: the filter, or every static vault.
    async fn fallback_addresses(
        &self,
        adapter: &dyn VaultAdapter,
        filter: Option<&[Address]>,
    ) -> SourceResult<Vec<Address>> {
        let addresses = match filter {
            Some(addresses) => addresses.to_vec(),
            None => adapter
                .assets_static(None)
                .await?
                .into_iter()
                .map(|vault| vault.address)
                .collect(),
        };
        debug!(
            adapter = adapter.name(),
            addresses = addresses.len(),
            chunk_size = self.chunk_size,
            "Splitting bulk query"
        );
        Ok(addresses)
    }

    async fn enrich(
        &self,
        mut records: Vec<VaultDynamic>,
        overrides: &HashMap<Address, &MetadataOverride>,
    ) -> Vec<VaultDynamic> {
        let apys = match &self.yields {
            Some(yields) => {
                let addresses: Vec<Address> = records.iter().map(|r| r.address).collect();
                or_unavailable("apy", yields.apy_batch(&addresses).await)
            }
            None => HashMap::new(),
        };

        for record in &mut records {
            if record.apy.is_none() {
                record.apy = apys.get(&record.address).cloned();
            }
            self.fill_display(record);
            apply_override(&mut record.metadata, overrides.get(&record.address).copied());
        }
        records
    }

    /// Fill display fields the adapter left empty from the underlying token.
    fn fill_display(&self, record: &mut VaultDynamic) {
        let metadata = &mut record.metadata;
        let (display_token, native_symbol) = if self.profile.is_wrapped_native(record.token) {
            (NATIVE_TOKEN, Some(self.profile.native.symbol.clone()))
        } else {
            (record.token, None)
        };

        if metadata.default_display_token.is_none() {
            metadata.default_display_token = Some(display_token);
        }

        let Some(directory) = &self.directory else {
            if metadata.display_name.is_none() {
                metadata.display_name = native_symbol;
            }
            return;
        };

        if metadata.display_icon.is_none() {
            metadata.display_icon = directory.icon(display_token);
        }
        if metadata.display_name.is_none() {
            metadata.display_name =
                native_symbol.or_else(|| directory.alias(record.token).map(|alias| alias.symbol));
        }
    }

    /// Extend `overrides` with zap flags for every vault the zap service supports.
    pub async fn augment_overrides(&self, overrides: &[MetadataOverride]) -> Vec<MetadataOverride> {
        let mut augmented = overrides.to_vec();
        if !self.profile.augment_zap_support {
            return augmented;
        }
        let Some(zap_vaults) = &self.zap_vaults else {
            return augmented;
        };

        let supported = or_unavailable("zap support", zap_vaults.supported_vaults().await);
        let (zap_in, zap_out) = match self.profile.router() {
            Some(_) => (ZapProtocol::Router, ZapProtocol::Router),
            None => (ZapProtocol::ZapIn, ZapProtocol::ZapOut),
        };

        for address in supported {
            let index = match augmented.iter().position(|o| o.address == address) {
                Some(index) => index,
                None => {
                    augmented.push(MetadataOverride::new(address));
                    augmented.len() - 1
                }
            };
            let o = &mut augmented[index];
            o.allow_zap_in = Some(true);
            o.allow_zap_out = Some(true);
            o.zap_in_with.get_or_insert(zap_in);
            o.zap_out_with.get_or_insert(zap_out);
        }
        augmented
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;
    use async_trait::async_trait;

    use super::*;
    use crate::types::{TokenAlias, VaultMetadata};

    struct OneVault;

    fn record(token: Address) -> VaultDynamic {
        VaultDynamic {
            address: Address::repeat_byte(1),
            token,
            total_assets: U256::ZERO,
            total_assets_usdc: None,
            apy: None,
            metadata: VaultMetadata::default(),
        }
    }

    #[async_trait]
    impl VaultAdapter for OneVault {
        fn name(&self) -> &str {
            "one"
        }

        async fn assets_static(&self, _: Option<&[Address]>) -> SourceResult<Vec<VaultStatic>> {
            Ok(vec![])
        }

        async fn assets_dynamic(&self, _: Option<&[Address]>) -> SourceResult<Vec<VaultDynamic>> {
            Ok(vec![record(crate::types::chain::MAINNET_WETH)])
        }

        async fn positions_of(
            &self,
            _: Address,
            _: Option<&[Address]>,
        ) -> SourceResult<Vec<Position>> {
            Ok(vec![])
        }

        async fn tokens(&self) -> SourceResult<Vec<Address>> {
            Ok(vec![])
        }
    }

    struct Icons;

    impl AssetDirectory for Icons {
        fn icon(&self, token: Address) -> Option<String> {
            Some(format!("https://icons.example/{token}.png"))
        }

        fn alias(&self, _: Address) -> Option<TokenAlias> {
            Some(TokenAlias {
                name: "Wrapped Ether".into(),
                symbol: "WETH".into(),
            })
        }
    }

    struct Supported(Vec<Address>);

    #[async_trait]
    impl ZapVaultList for Supported {
        async fn supported_vaults(&self) -> SourceResult<Vec<Address>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_wrapped_native_displays_as_native() {
        let aggregator = AdapterAggregator::new(vec![Arc::new(OneVault)], ChainProfile::mainnet(), 30)
            .with_asset_directory(Arc::new(Icons));

        let records = aggregator.list_dynamic(None, &[]).await.unwrap();

        let metadata = &records[0].metadata;
        assert_eq!(metadata.display_name.as_deref(), Some("ETH"));
        assert_eq!(metadata.default_display_token, Some(NATIVE_TOKEN));
        assert_eq!(
            metadata.display_icon,
            Some(format!("https://icons.example/{NATIVE_TOKEN}.png"))
        );
    }

    #[tokio::test]
    async fn test_zap_augmentation_keeps_unrelated_fields() {
        let vault = Address::repeat_byte(1);
        let aggregator = AdapterAggregator::new(vec![Arc::new(OneVault)], ChainProfile::mainnet(), 30)
            .with_zap_vault_list(Arc::new(Supported(vec![vault, Address::repeat_byte(2)])));
        let curated = vec![MetadataOverride::new(vault)
            .with_order(4.0)
            .with_display_name("Curated")];

        let augmented = aggregator.augment_overrides(&curated).await;

        assert_eq!(augmented.len(), 2);
        assert_eq!(augmented[0].order, Some(4.0));
        assert_eq!(augmented[0].display_name.as_deref(), Some("Curated"));
        assert_eq!(augmented[0].allow_zap_in, Some(true));
        assert_eq!(augmented[0].zap_out_with, Some(ZapProtocol::ZapOut));
        assert_eq!(augmented[1].address, Address::repeat_byte(2));
        assert_eq!(curated[0].allow_zap_in, None);
    }

    #[tokio::test]
    async fn test_no_augmentation_when_profile_disables_it() {
        let aggregator =
            AdapterAggregator::new(vec![Arc::new(OneVault)], ChainProfile::arbitrum(), 30)
                .with_zap_vault_list(Arc::new(Supported(vec![Address::repeat_byte(1)])));

        let augmented = aggregator.augment_overrides(&[]).await;

        assert!(augmented.is_empty());
    }
}
