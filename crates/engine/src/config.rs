//! Engine configuration.

use std::collections::BTreeMap;

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::tx::AllowListPolicy;
use crate::types::chain::{ARBITRUM_WETH, FANTOM_WFTM, MAINNET_WETH, OP_STACK_WETH};
use crate::types::ZapProtocol;

/// Number of addresses per query when a bulk adapter call has to be split.
pub const DEFAULT_CHUNK_SIZE: usize = 30;

/// JSON-RPC error code nodes return when they reject EIP-1559 fee fields.
pub const EIP1559_UNSUPPORTED_CODE: i64 = -32602;

/// A chain's native asset and its wrapped ERC-20.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeAsset {
    pub symbol: String,
    pub wrapped: Address,
}

impl NativeAsset {
    pub fn new(symbol: impl Into<String>, wrapped: Address) -> Self {
        Self {
            symbol: symbol.into(),
            wrapped,
        }
    }
}

/// How zaps are executed on a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ZapSolution {
    /// Dedicated zap-in/zap-out contracts looked up in the [`AddressBook`].
    ZapperContracts,
    /// A single routing aggregator contract handles every zap.
    RouterAggregator { router: Address },
}

/// Chain-specific behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainProfile {
    pub chain: NamedChain,
    pub native: NativeAsset,
    pub zap_solution: ZapSolution,
    /// Grant zap flags to every vault the zap service lists as supported.
    pub augment_zap_support: bool,
}

impl Default for ChainProfile {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl ChainProfile {
    /// A profile using zapper contracts and no zap augmentation.
    pub fn new(chain: NamedChain, native: NativeAsset) -> Self {
        Self {
            chain,
            native,
            zap_solution: ZapSolution::ZapperContracts,
            augment_zap_support: false,
        }
    }

    /// Ethereum mainnet: zapper contracts, zap support taken from the zap service.
    pub fn mainnet() -> Self {
        Self::new(NamedChain::Mainnet, NativeAsset::new("ETH", MAINNET_WETH))
            .with_augment_zap_support(true)
    }

    /// Fantom opera: every zap goes through `router`.
    pub fn fantom(router: Address) -> Self {
        Self::new(NamedChain::Fantom, NativeAsset::new("FTM", FANTOM_WFTM))
            .with_zap_solution(ZapSolution::RouterAggregator { router })
    }

    pub fn arbitrum() -> Self {
        Self::new(NamedChain::Arbitrum, NativeAsset::new("ETH", ARBITRUM_WETH))
    }

    pub fn optimism() -> Self {
        Self::new(NamedChain::Optimism, NativeAsset::new("ETH", OP_STACK_WETH))
    }

    pub fn base() -> Self {
        Self::new(NamedChain::Base, NativeAsset::new("ETH", OP_STACK_WETH))
    }

    pub fn with_zap_solution(mut self, zap_solution: ZapSolution) -> Self {
        self.zap_solution = zap_solution;
        self
    }

    pub fn with_augment_zap_support(mut self, augment: bool) -> Self {
        self.augment_zap_support = augment;
        self
    }

    /// The router address, on router-aggregator chains.
    pub fn router(&self) -> Option<Address> {
        match self.zap_solution {
            ZapSolution::RouterAggregator { router } => Some(router),
            ZapSolution::ZapperContracts => None,
        }
    }

    /// Whether `token` is this chain's wrapped native asset.
    pub fn is_wrapped_native(&self, token: Address) -> bool {
        self.native.wrapped == token
    }
}

/// Deployed helper contracts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressBook {
    pub zap_contracts: BTreeMap<ZapProtocol, Address>,
    pub partner_proxy: Option<Address>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zap_contract(mut self, protocol: ZapProtocol, address: Address) -> Self {
        self.zap_contracts.insert(protocol, address);
        self
    }

    pub fn with_partner_proxy(mut self, address: Address) -> Self {
        self.partner_proxy = Some(address);
        self
    }

    /// The contract registered for `protocol`.
    pub fn zap_contract(&self, protocol: ZapProtocol) -> Result<Address> {
        self.zap_contracts.get(&protocol).copied().ok_or_else(|| {
            EngineError::RouteConfiguration(format!("no contract registered for {protocol}"))
        })
    }

    /// The partner tracking proxy.
    pub fn partner_proxy(&self) -> Result<Address> {
        self.partner_proxy
            .ok_or_else(|| EngineError::RouteConfiguration("partner proxy not configured".into()))
    }
}

/// Configuration for [`VaultEngine`](crate::VaultEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub profile: ChainProfile,
    pub addresses: AddressBook,
    /// Partner attribution id; when set, underlying-token deposits go through the proxy.
    pub partner_id: Option<Address>,
    /// Vaults deposited into through the pickle zap.
    pub pickle_jars: Vec<Address>,
    pub chunk_size: usize,
    pub node_incompatibility_code: i64,
    pub allow_list_policy: AllowListPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            profile: ChainProfile::default(),
            addresses: AddressBook::default(),
            partner_id: None,
            pickle_jars: Vec::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            node_incompatibility_code: EIP1559_UNSUPPORTED_CODE,
            allow_list_policy: AllowListPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::Parse(e.to_string()))
    }

    pub fn with_profile(mut self, profile: ChainProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_addresses(mut self, addresses: AddressBook) -> Self {
        self.addresses = addresses;
        self
    }

    pub fn with_partner_id(mut self, partner_id: Address) -> Self {
        self.partner_id = Some(partner_id);
        self
    }

    pub fn with_pickle_jars(mut self, jars: Vec<Address>) -> Self {
        self.pickle_jars = jars;
        self
    }

    /// Set the chunk size. Zero is treated as one.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_node_incompatibility_code(mut self, code: i64) -> Self {
        self.node_incompatibility_code = code;
        self
    }

    pub fn with_allow_list_policy(mut self, policy: AllowListPolicy) -> Self {
        self.allow_list_policy = policy;
        self
    }

    pub fn chain(&self) -> NamedChain {
        self.profile.chain
    }

    /// Whether deposits are attributed to a partner.
    pub fn is_partner_eligible(&self) -> bool {
        self.partner_id.is_some()
    }
}
