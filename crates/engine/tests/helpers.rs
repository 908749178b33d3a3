//! In-memory collaborator doubles for engine integration tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use alloy_primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use vaultkit_engine::{
    AllowListValidator, AllowListVerdict, Apy, EarningsDayData, EarningsSource,
    MetadataOverride, MetadataSource, Position, PositionKind, PriceOracle, SendError,
    SnapshotCache, SourceError, SourceResult, TokenReader, TransactionDraft, TransactionSender,
    VaultAdapter, VaultDynamic, VaultHistoricEarnings, VaultMetadata, VaultStatic,
    VaultStrategiesMetadata, YieldOracle, ZapInRequest, ZapOutRequest, ZapQuote, ZapQuoter,
    ZapVaultList,
};

/// Underlying token shared by every test vault.
pub const UNDERLYING: Address = Address::repeat_byte(0xaa);

/// Deterministic vault address.
pub fn vault_address(i: u8) -> Address {
    Address::with_last_byte(i)
}

pub fn vault_static(i: u8) -> VaultStatic {
    VaultStatic {
        address: vault_address(i),
        token: UNDERLYING,
        name: format!("Vault {i}"),
        symbol: format!("yv{i}"),
        decimals: 18,
    }
}

pub fn vault_dynamic(i: u8) -> VaultDynamic {
    VaultDynamic {
        address: vault_address(i),
        token: UNDERLYING,
        total_assets: U256::from(u64::from(i) * 1_000),
        total_assets_usdc: None,
        apy: None,
        metadata: VaultMetadata::default(),
    }
}

/// Registry adapter serving `count` vaults. Bulk calls covering more than `max_bulk`
/// addresses fail, which forces the chunked fallback.
pub struct MockAdapter {
    statics: Vec<VaultStatic>,
    dynamics: Vec<VaultDynamic>,
    tokens: Vec<Address>,
    max_bulk: Option<usize>,
    pub dynamic_calls: Mutex<Vec<Option<usize>>>,
    pub position_calls: Mutex<Vec<Option<usize>>>,
}

impl MockAdapter {
    pub fn with_vaults(count: u8) -> Self {
        Self {
            statics: (1..=count).map(vault_static).collect(),
            dynamics: (1..=count).map(vault_dynamic).collect(),
            tokens: vec![UNDERLYING],
            max_bulk: None,
            dynamic_calls: Mutex::new(Vec::new()),
            position_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_max_bulk(mut self, max_bulk: usize) -> Self {
        self.max_bulk = Some(max_bulk);
        self
    }

    pub fn with_dynamics(mut self, dynamics: Vec<VaultDynamic>) -> Self {
        self.dynamics = dynamics;
        self
    }

    pub fn with_tokens(mut self, tokens: Vec<Address>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Sizes of every dynamic query, `None` for unfiltered ones.
    pub fn dynamic_query_sizes(&self) -> Vec<Option<usize>> {
        self.dynamic_calls.lock().unwrap().clone()
    }

    fn covered(&self, addresses: Option<&[Address]>) -> usize {
        addresses.map_or(self.statics.len(), <[Address]>::len)
    }

    fn too_large(&self, addresses: Option<&[Address]>) -> bool {
        self.max_bulk
            .is_some_and(|max| self.covered(addresses) > max)
    }
}

fn selected(addresses: Option<&[Address]>, address: Address) -> bool {
    addresses.is_none_or(|filter| filter.contains(&address))
}

#[async_trait]
impl VaultAdapter for MockAdapter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn assets_static(&self, addresses: Option<&[Address]>) -> SourceResult<Vec<VaultStatic>> {
        Ok(self
            .statics
            .iter()
            .filter(|v| selected(addresses, v.address))
            .cloned()
            .collect())
    }

    async fn assets_dynamic(
        &self,
        addresses: Option<&[Address]>,
    ) -> SourceResult<Vec<VaultDynamic>> {
        self.dynamic_calls
            .lock()
            .unwrap()
            .push(addresses.map(<[Address]>::len));
        if self.too_large(addresses) {
            return Err(SourceError::new("multicall too large"));
        }
        Ok(self
            .dynamics
            .iter()
            .filter(|v| selected(addresses, v.address))
            .cloned()
            .collect())
    }

    async fn positions_of(
        &self,
        _account: Address,
        addresses: Option<&[Address]>,
    ) -> SourceResult<Vec<Position>> {
        self.position_calls
            .lock()
            .unwrap()
            .push(addresses.map(<[Address]>::len));
        if self.too_large(addresses) {
            return Err(SourceError::new("multicall too large"));
        }
        Ok(self
            .statics
            .iter()
            .filter(|v| selected(addresses, v.address))
            .map(|v| Position {
                asset: v.address,
                token: v.address,
                kind: PositionKind::Deposit,
                balance: U256::from(1u64),
                underlying_balance: U256::from(1u64),
                balance_usdc: None,
            })
            .collect())
    }

    async fn tokens(&self) -> SourceResult<Vec<Address>> {
        Ok(self.tokens.clone())
    }
}

/// Curated metadata source.
#[derive(Default)]
pub struct MockMetadata {
    pub overrides: Vec<MetadataOverride>,
    pub fail_overrides: bool,
    pub fail_strategies: bool,
}

#[async_trait]
impl MetadataSource for MockMetadata {
    async fn vault_overrides(&self) -> SourceResult<Vec<MetadataOverride>> {
        if self.fail_overrides {
            return Err(SourceError::new("metadata service down"));
        }
        Ok(self.overrides.clone())
    }

    async fn strategies_metadata(
        &self,
        _vaults: &[Address],
    ) -> SourceResult<Vec<VaultStrategiesMetadata>> {
        if self.fail_strategies {
            return Err(SourceError::new("metadata service down"));
        }
        Ok(Vec::new())
    }
}

/// Yield oracle serving a fixed table, or failing every lookup when `apys` is `None`.
pub struct MockYields {
    pub apys: Option<HashMap<Address, Apy>>,
}

pub fn apy(net_apy: f64) -> Apy {
    Apy {
        kind: "v2:averaged".into(),
        gross_apr: net_apy * 1.1,
        net_apy,
    }
}

#[async_trait]
impl YieldOracle for MockYields {
    async fn apy_batch(&self, vaults: &[Address]) -> SourceResult<HashMap<Address, Apy>> {
        let apys = self
            .apys
            .as_ref()
            .ok_or_else(|| SourceError::new("yield api timeout"))?;
        Ok(vaults
            .iter()
            .filter_map(|v| apys.get(v).map(|apy| (*v, apy.clone())))
            .collect())
    }
}

/// Earnings source serving one day per vault, or failing when `fail` is set.
#[derive(Default)]
pub struct MockEarnings {
    pub fail: bool,
}

#[async_trait]
impl EarningsSource for MockEarnings {
    async fn historic_earnings(
        &self,
        vaults: &[Address],
    ) -> SourceResult<Vec<VaultHistoricEarnings>> {
        if self.fail {
            return Err(SourceError::new("subgraph unavailable"));
        }
        Ok(vaults
            .iter()
            .map(|vault| VaultHistoricEarnings {
                vault: *vault,
                days: vec![EarningsDayData {
                    date: "2024-01-01".into(),
                    earnings_usdc: U256::from(42u64),
                }],
            })
            .collect())
    }
}

/// Zap service supporting a fixed vault set.
pub struct MockZapVaults(pub Vec<Address>);

#[async_trait]
impl ZapVaultList for MockZapVaults {
    async fn supported_vaults(&self) -> SourceResult<Vec<Address>> {
        Ok(self.0.clone())
    }
}

/// Sender that replays scripted outcomes and records every draft it saw.
pub struct MockSender {
    outcomes: Mutex<VecDeque<Result<TxHash, SendError>>>,
    pub drafts: Mutex<Vec<TransactionDraft>>,
    pub gas_price: u128,
    pub gas_price_error: Option<SendError>,
    pub gas_price_calls: AtomicUsize,
}

impl MockSender {
    pub fn new(outcomes: Vec<Result<TxHash, SendError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            drafts: Mutex::new(Vec::new()),
            gas_price: 30_000_000_000,
            gas_price_error: None,
            gas_price_calls: AtomicUsize::new(0),
        }
    }

    /// Fail every gas price read with `error`.
    pub fn with_gas_price_error(mut self, error: SendError) -> Self {
        self.gas_price_error = Some(error);
        self
    }

    /// Every send succeeds.
    pub fn accepting() -> Self {
        Self::new(Vec::new())
    }

    pub fn send_count(&self) -> usize {
        self.drafts.lock().unwrap().len()
    }

    pub fn drafts(&self) -> Vec<TransactionDraft> {
        self.drafts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionSender for MockSender {
    async fn send(&self, draft: &TransactionDraft) -> Result<TxHash, SendError> {
        self.drafts.lock().unwrap().push(draft.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(TxHash::repeat_byte(0x77)))
    }

    async fn gas_price(&self) -> Result<u128, SendError> {
        self.gas_price_calls.fetch_add(1, Ordering::SeqCst);
        match &self.gas_price_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.gas_price),
        }
    }
}

/// The node's "EIP-1559 fields not supported" answer.
pub fn incompatible_node() -> SendError {
    SendError::Rpc {
        code: -32602,
        message: "invalid argument 0: json: cannot unmarshal maxFeePerGas".into(),
    }
}

/// Quote service returning a fixed transaction.
pub struct MockQuoter {
    pub quote: ZapQuote,
    pub zap_in_calls: Mutex<Vec<ZapInRequest>>,
    pub zap_out_calls: Mutex<Vec<ZapOutRequest>>,
}

impl MockQuoter {
    pub fn new(to: Address) -> Self {
        Self {
            quote: ZapQuote {
                to,
                data: Bytes::from(vec![0x12, 0x34, 0x56, 0x78]),
                value: U256::ZERO,
                gas: Some(450_000),
                gas_price: Some(1_000),
            },
            zap_in_calls: Mutex::new(Vec::new()),
            zap_out_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.zap_in_calls.lock().unwrap().len() + self.zap_out_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ZapQuoter for MockQuoter {
    async fn zap_in(&self, request: &ZapInRequest) -> SourceResult<ZapQuote> {
        self.zap_in_calls.lock().unwrap().push(request.clone());
        Ok(self.quote.clone())
    }

    async fn zap_out(&self, request: &ZapOutRequest) -> SourceResult<ZapQuote> {
        self.zap_out_calls.lock().unwrap().push(request.clone());
        Ok(self.quote.clone())
    }
}

/// ERC-20 reads from fixed tables.
#[derive(Default)]
pub struct MockTokenReader {
    pub balances: HashMap<(Address, Address), U256>,
    pub allowance: U256,
}

#[async_trait]
impl TokenReader for MockTokenReader {
    async fn balance_of(&self, token: Address, owner: Address) -> SourceResult<U256> {
        Ok(self
            .balances
            .get(&(token, owner))
            .copied()
            .unwrap_or_default())
    }

    async fn allowance(
        &self,
        _token: Address,
        _owner: Address,
        _spender: Address,
    ) -> SourceResult<U256> {
        Ok(self.allowance)
    }
}

/// Prices every token at the same USDC value.
pub struct FlatPrices(pub U256);

#[async_trait]
impl PriceOracle for FlatPrices {
    async fn prices_usdc(&self, tokens: &[Address]) -> SourceResult<HashMap<Address, U256>> {
        Ok(tokens.iter().map(|t| (*t, self.0)).collect())
    }
}

/// Allow-list returning a fixed verdict.
pub struct FixedAllowList(pub AllowListVerdict);

#[async_trait]
impl AllowListValidator for FixedAllowList {
    async fn validate_calldata(&self, _to: Address, _data: &Bytes) -> SourceResult<AllowListVerdict> {
        Ok(self.0.clone())
    }
}

/// Cache holding an optional snapshot and counting lookups.
pub struct MockCache<T> {
    pub snapshot: Option<T>,
    pub fetches: AtomicUsize,
}

impl<T> MockCache<T> {
    pub fn new(snapshot: Option<T>) -> Self {
        Self {
            snapshot,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T: Clone + Send + Sync> SnapshotCache<T> for MockCache<T> {
    async fn fetch(&self) -> Option<T> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.snapshot.clone()
    }
}
