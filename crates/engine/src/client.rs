//! The public engine: listings, balances, allowances and routed transactions.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use futures::future::try_join_all;
use tracing::{debug, warn};
use vaultkit_contracts::calls;

use crate::aggregator::AdapterAggregator;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::merge::merge_all;
use crate::routing::{RouteDecision, RouteResolver, RouteTarget};
use crate::sources::{
    or_unavailable, AssetDirectory, EarningsSource, MetadataSource, PriceOracle, SnapshotCache,
    TokenReader, VaultAdapter, YieldOracle, ZapVaultList,
};
use crate::tx::{
    AllowListValidator, SubmittedTransaction, TransactionPayload, TransactionSender,
    TransactionSubmitter,
};
use crate::types::{
    is_native_token, EarningsDayData, GasOverrides, MetadataOverride, Position, StrategyMetadata,
    TokenAllowance, TokenBalance, UnderlyingToken, Vault, VaultDynamic, VaultStatic,
};
use crate::zap::{ZapInRequest, ZapOutRequest, ZapQuote, ZapQuoter};

/// Externally managed snapshots. A hit short-circuits the corresponding unfiltered call.
#[derive(Clone, Default)]
pub struct EngineCaches {
    pub vaults: Option<Arc<dyn SnapshotCache<Vec<Vault>>>>,
    pub dynamic: Option<Arc<dyn SnapshotCache<Vec<VaultDynamic>>>>,
    pub tokens: Option<Arc<dyn SnapshotCache<Vec<UnderlyingToken>>>>,
}

/// Per-call transaction options.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransactionOptions {
    /// Slippage tolerance as a fraction, e.g. `0.01` for 1%. Required on zap routes.
    pub slippage: Option<f64>,
    pub gas: GasOverrides,
}

impl TransactionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slippage(mut self, slippage: f64) -> Self {
        self.slippage = Some(slippage);
        self
    }

    pub fn with_gas(mut self, gas: GasOverrides) -> Self {
        self.gas = gas;
        self
    }
}

/// Builder for [`VaultEngine`].
pub struct VaultEngineBuilder {
    config: EngineConfig,
    adapters: Vec<Arc<dyn VaultAdapter>>,
    yields: Option<Arc<dyn YieldOracle>>,
    metadata: Option<Arc<dyn MetadataSource>>,
    earnings: Option<Arc<dyn EarningsSource>>,
    prices: Option<Arc<dyn PriceOracle>>,
    directory: Option<Arc<dyn AssetDirectory>>,
    token_reader: Option<Arc<dyn TokenReader>>,
    zap_vaults: Option<Arc<dyn ZapVaultList>>,
    quoter: Option<Arc<dyn ZapQuoter>>,
    sender: Option<Arc<dyn TransactionSender>>,
    allow_list: Option<Arc<dyn AllowListValidator>>,
    caches: EngineCaches,
}

impl VaultEngineBuilder {
    pub fn with_adapter(mut self, adapter: Arc<dyn VaultAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    pub fn with_yield_oracle(mut self, yields: Arc<dyn YieldOracle>) -> Self {
        self.yields = Some(yields);
        self
    }

    pub fn with_metadata_source(mut self, metadata: Arc<dyn MetadataSource>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_earnings_source(mut self, earnings: Arc<dyn EarningsSource>) -> Self {
        self.earnings = Some(earnings);
        self
    }

    pub fn with_price_oracle(mut self, prices: Arc<dyn PriceOracle>) -> Self {
        self.prices = Some(prices);
        self
    }

    pub fn with_asset_directory(mut self, directory: Arc<dyn AssetDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn with_token_reader(mut self, reader: Arc<dyn TokenReader>) -> Self {
        self.token_reader = Some(reader);
        self
    }

    pub fn with_zap_vault_list(mut self, zap_vaults: Arc<dyn ZapVaultList>) -> Self {
        self.zap_vaults = Some(zap_vaults);
        self
    }

    pub fn with_quoter(mut self, quoter: Arc<dyn ZapQuoter>) -> Self {
        self.quoter = Some(quoter);
        self
    }

    /// Enable transaction support.
    pub fn with_sender(mut self, sender: Arc<dyn TransactionSender>) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn with_allow_list(mut self, validator: Arc<dyn AllowListValidator>) -> Self {
        self.allow_list = Some(validator);
        self
    }

    pub fn with_caches(mut self, caches: EngineCaches) -> Self {
        self.caches = caches;
        self
    }

    pub fn build(self) -> VaultEngine {
        let config = self.config;

        let mut aggregator =
            AdapterAggregator::new(self.adapters, config.profile.clone(), config.chunk_size);
        if let Some(yields) = self.yields {
            aggregator = aggregator.with_yield_oracle(yields);
        }
        if let Some(directory) = &self.directory {
            aggregator = aggregator.with_asset_directory(Arc::clone(directory));
        }
        if let Some(zap_vaults) = self.zap_vaults {
            aggregator = aggregator.with_zap_vault_list(zap_vaults);
        }

        let submitter = self.sender.map(|sender| {
            let submitter = TransactionSubmitter::new(sender, config.node_incompatibility_code);
            match self.allow_list {
                Some(validator) => submitter.with_allow_list(validator, config.allow_list_policy),
                None => submitter,
            }
        });

        let resolver = RouteResolver::new(
            config.profile.clone(),
            config.addresses.clone(),
            config.pickle_jars.clone(),
        );

        VaultEngine {
            config,
            aggregator,
            resolver,
            metadata: self.metadata,
            earnings: self.earnings,
            prices: self.prices,
            directory: self.directory,
            token_reader: self.token_reader,
            quoter: self.quoter,
            submitter,
            caches: self.caches,
        }
    }
}

/// Aggregated vault views and routed deposit/withdraw submission for one chain.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use vaultkit_engine::{EngineConfig, ProviderSender, TransactionOptions, VaultEngine};
/// use alloy_primitives::U256;
///
/// # async fn run(adapter: Arc<dyn vaultkit_engine::VaultAdapter>) -> vaultkit_engine::Result<()> {
/// let sender = ProviderSender::connect("https://eth.llamarpc.com", "0x...")?;
/// let account = sender.signer_address();
///
/// let engine = VaultEngine::builder(EngineConfig::new())
///     .with_adapter(adapter)
///     .with_sender(Arc::new(sender))
///     .build();
///
/// let vaults = engine.list_vaults(None).await?;
/// let vault = vaults[0].address;
/// let token = vaults[0].token;
/// engine
///     .deposit(vault, token, U256::from(1_000_000u64), account, &TransactionOptions::new())
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct VaultEngine {
    config: EngineConfig,
    aggregator: AdapterAggregator,
    resolver: RouteResolver,
    metadata: Option<Arc<dyn MetadataSource>>,
    earnings: Option<Arc<dyn EarningsSource>>,
    prices: Option<Arc<dyn PriceOracle>>,
    directory: Option<Arc<dyn AssetDirectory>>,
    token_reader: Option<Arc<dyn TokenReader>>,
    quoter: Option<Arc<dyn ZapQuoter>>,
    submitter: Option<TransactionSubmitter>,
    caches: EngineCaches,
}

impl VaultEngine {
    /// Start building an engine for `config`.
    pub fn builder(config: EngineConfig) -> VaultEngineBuilder {
        VaultEngineBuilder {
            config,
            adapters: Vec::new(),
            yields: None,
            metadata: None,
            earnings: None,
            prices: None,
            directory: None,
            token_reader: None,
            zap_vaults: None,
            quoter: None,
            sender: None,
            allow_list: None,
            caches: EngineCaches::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Check if transaction support is configured.
    pub fn has_transaction_support(&self) -> bool {
        self.submitter.is_some()
    }

    // Listings

    /// Every vault with curated metadata applied, sorted by display order.
    pub async fn list_vaults(&self, filter: Option<&[Address]>) -> Result<Vec<Vault>> {
        if filter.is_none() {
            if let Some(vaults) = cached(self.caches.vaults.as_ref()).await {
                return Ok(vaults);
            }
        }

        let curated = self.overrides().await;
        let overrides = self.aggregator.augment_overrides(&curated).await;
        let (statics, dynamics) = tokio::try_join!(
            self.aggregator.list_static(filter),
            self.aggregator.list_dynamic_with(filter, &overrides)
        )?;

        let addresses: Vec<Address> = statics.iter().map(|v| v.address).collect();
        let (strategies, earnings) = tokio::join!(
            self.strategies_for(&addresses),
            self.earnings_for(&addresses)
        );

        merge_all(statics, dynamics, &overrides, strategies, earnings)
    }

    pub async fn list_vaults_static(&self, filter: Option<&[Address]>) -> Result<Vec<VaultStatic>> {
        self.aggregator.list_static(filter).await
    }

    /// Dynamic records. Curated overrides are fetched when `overrides` is `None`.
    pub async fn list_vaults_dynamic(
        &self,
        filter: Option<&[Address]>,
        overrides: Option<&[MetadataOverride]>,
    ) -> Result<Vec<VaultDynamic>> {
        match overrides {
            Some(overrides) => self.aggregator.list_dynamic(filter, overrides).await,
            None => {
                if filter.is_none() {
                    if let Some(records) = cached(self.caches.dynamic.as_ref()).await {
                        return Ok(records);
                    }
                }
                let overrides = self.overrides().await;
                self.aggregator.list_dynamic(filter, &overrides).await
            }
        }
    }

    pub async fn positions_of(
        &self,
        account: Address,
        filter: Option<&[Address]>,
    ) -> Result<Vec<Position>> {
        self.aggregator.positions_of(account, filter).await
    }

    /// Every distinct underlying token with icon, alias and USDC price where known.
    pub async fn list_underlying_tokens(&self) -> Result<Vec<UnderlyingToken>> {
        if let Some(tokens) = cached(self.caches.tokens.as_ref()).await {
            return Ok(tokens);
        }

        let tokens = self.distinct_tokens().await?;
        let prices = self.prices_for(&tokens).await;

        Ok(tokens
            .into_iter()
            .map(|address| UnderlyingToken {
                address,
                alias: self.directory.as_ref().and_then(|d| d.alias(address)),
                icon: self.directory.as_ref().and_then(|d| d.icon(address)),
                price_usdc: prices.get(&address).copied(),
            })
            .collect())
    }

    /// Non-zero balances of every underlying token held by `account`.
    pub async fn balances_of(&self, account: Address) -> Result<Vec<TokenBalance>> {
        let reader = self
            .token_reader
            .as_ref()
            .ok_or(EngineError::CollaboratorNotConfigured("token reader"))?;

        let tokens = self.distinct_tokens().await?;
        let balances = try_join_all(tokens.iter().map(|&token| reader.balance_of(token, account)))
            .await
            .map_err(EngineError::Lookup)?;

        let held: Vec<(Address, U256)> = tokens
            .into_iter()
            .zip(balances)
            .filter(|(_, balance)| !balance.is_zero())
            .collect();
        let held_tokens: Vec<Address> = held.iter().map(|(token, _)| *token).collect();
        let prices = self.prices_for(&held_tokens).await;

        Ok(held
            .into_iter()
            .map(|(address, balance)| TokenBalance {
                address,
                balance,
                price_usdc: prices.get(&address).copied(),
            })
            .collect())
    }

    // Transactions

    /// Deposit `amount` of `token` into `vault` on behalf of `account`.
    pub async fn deposit(
        &self,
        vault: Address,
        token: Address,
        amount: U256,
        account: Address,
        options: &TransactionOptions,
    ) -> Result<SubmittedTransaction> {
        let submitter = self.submitter()?;
        let vault = self.vault_static(vault).await?;
        let route =
            self.resolver
                .resolve_deposit(&vault, token, self.config.is_partner_eligible())?;
        let slippage = route.validate_slippage(options.slippage)?;
        debug!(vault = %vault.address, %token, target = ?route.target, "Resolved deposit route");

        let payload = match (route.zap_protocol, slippage) {
            (Some(protocol), Some(slippage)) => {
                let quoter = self.quoter()?;
                let request = ZapInRequest {
                    account,
                    from_token: token,
                    amount,
                    to_vault: vault.address,
                    slippage_percent: slippage * 100.0,
                    protocol,
                    gas_price: options.gas.gas_price,
                };
                let quote = quoter.zap_in(&request).await.map_err(EngineError::Quote)?;
                quoted(&route, quote)
            }
            _ => match route.target {
                RouteTarget::Vault(address) => {
                    let value = if is_native_token(token) { amount } else { U256::ZERO };
                    direct(calls::vault_deposit(address, amount, account, value).encode())
                }
                RouteTarget::PartnerProxy(proxy) => {
                    let partner_id = self.config.partner_id.ok_or_else(|| {
                        EngineError::RouteConfiguration("partner id not configured".into())
                    })?;
                    direct(calls::partner_deposit(proxy, vault.address, partner_id, amount).encode())
                }
                target => {
                    return Err(EngineError::RouteConfiguration(format!(
                        "no zap protocol for {target:?}"
                    )))
                }
            },
        };

        submitter.submit(account, payload, &options.gas).await
    }

    /// Withdraw `amount` shares of `vault` into `token` on behalf of `account`.
    pub async fn withdraw(
        &self,
        vault: Address,
        token: Address,
        amount: U256,
        account: Address,
        options: &TransactionOptions,
    ) -> Result<SubmittedTransaction> {
        let submitter = self.submitter()?;
        let vault = self.vault_static(vault).await?;
        let route = self.resolver.resolve_withdraw(&vault, token)?;
        let slippage = route.validate_slippage(options.slippage)?;
        debug!(vault = %vault.address, %token, target = ?route.target, "Resolved withdraw route");

        let payload = match (route.zap_protocol, slippage) {
            (Some(protocol), Some(slippage)) => {
                let quoter = self.quoter()?;
                let request = ZapOutRequest {
                    account,
                    to_token: token,
                    amount,
                    from_vault: vault.address,
                    slippage_percent: slippage * 100.0,
                    protocol,
                    gas_price: options.gas.gas_price,
                };
                let quote = quoter.zap_out(&request).await.map_err(EngineError::Quote)?;
                quoted(&route, quote)
            }
            _ => direct(calls::vault_withdraw(vault.address, amount, account).encode()),
        };

        submitter.submit(account, payload, &options.gas).await
    }

    /// Allowance `account` has granted the deposit route's spender, or `None` when the
    /// route pulls no ERC-20 (native deposits).
    pub async fn deposit_allowance(
        &self,
        vault: Address,
        token: Address,
        account: Address,
    ) -> Result<Option<TokenAllowance>> {
        let Some((token, spender)) = self.deposit_spender(vault, token).await? else {
            return Ok(None);
        };
        self.allowance(token, account, spender).await.map(Some)
    }

    /// Allowance of vault shares `account` has granted the withdraw route's spender, or
    /// `None` when withdrawing directly from the vault.
    pub async fn withdraw_allowance(
        &self,
        vault: Address,
        token: Address,
        account: Address,
    ) -> Result<Option<TokenAllowance>> {
        let Some((shares, spender)) = self.withdraw_spender(vault, token).await? else {
            return Ok(None);
        };
        self.allowance(shares, account, spender).await.map(Some)
    }

    /// Approve the deposit route's spender for `amount`. `None` when no approval is needed.
    pub async fn approve_deposit(
        &self,
        vault: Address,
        token: Address,
        amount: U256,
        account: Address,
        gas: &GasOverrides,
    ) -> Result<Option<SubmittedTransaction>> {
        let submitter = self.submitter()?;
        let Some((token, spender)) = self.deposit_spender(vault, token).await? else {
            return Ok(None);
        };
        let payload = direct(calls::approve(token, spender, amount).encode());
        submitter.submit(account, payload, gas).await.map(Some)
    }

    /// Approve the withdraw route's spender for `amount` shares. `None` when no approval
    /// is needed.
    pub async fn approve_withdraw(
        &self,
        vault: Address,
        token: Address,
        amount: U256,
        account: Address,
        gas: &GasOverrides,
    ) -> Result<Option<SubmittedTransaction>> {
        let submitter = self.submitter()?;
        let Some((shares, spender)) = self.withdraw_spender(vault, token).await? else {
            return Ok(None);
        };
        let payload = direct(calls::approve(shares, spender, amount).encode());
        submitter.submit(account, payload, gas).await.map(Some)
    }

    // Helpers

    fn submitter(&self) -> Result<&TransactionSubmitter> {
        self.submitter
            .as_ref()
            .ok_or(EngineError::TransactionNotConfigured)
    }

    fn quoter(&self) -> Result<&Arc<dyn ZapQuoter>> {
        self.quoter
            .as_ref()
            .ok_or(EngineError::CollaboratorNotConfigured("zap quoter"))
    }

    async fn vault_static(&self, address: Address) -> Result<VaultStatic> {
        self.aggregator
            .list_static(Some(&[address]))
            .await?
            .into_iter()
            .find(|vault| vault.address == address)
            .ok_or(EngineError::VaultNotFound(address))
    }

    /// `(token, spender)` pair a deposit needs approved.
    async fn deposit_spender(
        &self,
        vault: Address,
        token: Address,
    ) -> Result<Option<(Address, Address)>> {
        if is_native_token(token) {
            return Ok(None);
        }
        let vault = self.vault_static(vault).await?;
        let route =
            self.resolver
                .resolve_deposit(&vault, token, self.config.is_partner_eligible())?;
        Ok(Some((token, route.target_address())))
    }

    /// `(share token, spender)` pair a withdraw needs approved.
    async fn withdraw_spender(
        &self,
        vault: Address,
        token: Address,
    ) -> Result<Option<(Address, Address)>> {
        let vault = self.vault_static(vault).await?;
        let route = self.resolver.resolve_withdraw(&vault, token)?;
        if !route.is_zap() {
            return Ok(None);
        }
        Ok(Some((vault.address, route.target_address())))
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<TokenAllowance> {
        let reader = self
            .token_reader
            .as_ref()
            .ok_or(EngineError::CollaboratorNotConfigured("token reader"))?;
        let amount = reader
            .allowance(token, owner, spender)
            .await
            .map_err(EngineError::Lookup)?;
        Ok(TokenAllowance {
            owner,
            token,
            spender,
            amount,
        })
    }

    async fn overrides(&self) -> Vec<MetadataOverride> {
        match &self.metadata {
            Some(metadata) => or_unavailable("overrides", metadata.vault_overrides().await),
            None => Vec::new(),
        }
    }

    async fn strategies_for(&self, vaults: &[Address]) -> HashMap<Address, Vec<StrategyMetadata>> {
        let Some(metadata) = &self.metadata else {
            return HashMap::new();
        };
        or_unavailable("strategies", metadata.strategies_metadata(vaults).await)
            .into_iter()
            .map(|entry| (entry.vault, entry.strategies))
            .collect()
    }

    async fn earnings_for(&self, vaults: &[Address]) -> HashMap<Address, Vec<EarningsDayData>> {
        let Some(earnings) = &self.earnings else {
            return HashMap::new();
        };
        or_unavailable("earnings", earnings.historic_earnings(vaults).await)
            .into_iter()
            .map(|entry| (entry.vault, entry.days))
            .collect()
    }

    async fn prices_for(&self, tokens: &[Address]) -> HashMap<Address, U256> {
        match &self.prices {
            Some(prices) if !tokens.is_empty() => {
                or_unavailable("prices", prices.prices_usdc(tokens).await)
            }
            _ => HashMap::new(),
        }
    }

    /// Adapter tokens in first-seen order.
    async fn distinct_tokens(&self) -> Result<Vec<Address>> {
        let mut seen = HashSet::new();
        Ok(self
            .aggregator
            .tokens()
            .await?
            .into_iter()
            .filter(|token| seen.insert(*token))
            .collect())
    }
}

async fn cached<T>(cache: Option<&Arc<dyn SnapshotCache<T>>>) -> Option<T> {
    let snapshot = cache?.fetch().await;
    if snapshot.is_some() {
        debug!("Serving from cache");
    }
    snapshot
}

fn direct((to, data, value): (Address, Bytes, U256)) -> TransactionPayload {
    TransactionPayload::Direct { to, data, value }
}

fn quoted(route: &RouteDecision, quote: ZapQuote) -> TransactionPayload {
    let expected = route.target_address();
    if quote.to != expected {
        warn!(%expected, actual = %quote.to, "Quote targets a different contract than the resolved route");
    }
    TransactionPayload::Quoted(quote)
}
