//! HTTP client for the zap quote API.

use std::str::FromStr;
use std::time::Duration;

use alloy_chains::NamedChain;
use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{ZapInRequest, ZapOutRequest, ZapQuote, ZapQuoter};
use crate::error::Result;
use crate::sources::{SourceError, SourceResult, ZapVaultList};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Configuration for [`ZapApiClient`].
#[derive(Debug, Clone)]
pub struct ZapApiConfig {
    /// API root, e.g. `https://api.zapper.example/v1`.
    pub base_url: Url,
    pub api_key: Option<String>,
    pub timeout: Duration,
    /// Network segment used in request paths.
    pub chain: NamedChain,
}

impl ZapApiConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            chain: NamedChain::Mainnet,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_chain(mut self, chain: NamedChain) -> Self {
        self.chain = chain;
        self
    }
}

/// Quote client over the zap HTTP API.
#[derive(Debug, Clone)]
pub struct ZapApiClient {
    http_client: Client,
    config: ZapApiConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawZapTransaction {
    to: Address,
    data: Bytes,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    gas: Option<String>,
    #[serde(default)]
    gas_price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSupportedVault {
    address: Address,
}

impl ZapApiClient {
    pub fn with_config(config: ZapApiConfig) -> Result<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &ZapApiConfig {
        &self.config
    }

    fn endpoint(&self, direction: &str, resource: &str) -> String {
        format!(
            "{}/{}/vault/{}/{}",
            self.config.base_url.as_str().trim_end_matches('/'),
            direction,
            self.config.chain,
            resource
        )
    }

    async fn get<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> SourceResult<T> {
        let mut request = self.http_client.get(url).query(query);
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("api_key", key)]);
        }

        debug!(url, "Requesting zap API");
        let response = request.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

fn quote_from_raw(raw: RawZapTransaction) -> SourceResult<ZapQuote> {
    let value = match raw.value {
        Some(value) => parse_quantity("value", &value)?,
        None => U256::ZERO,
    };
    let gas = raw
        .gas
        .map(|gas| {
            parse_quantity("gas", &gas).and_then(|v| {
                u64::try_from(v).map_err(|_| SourceError::new(format!("gas out of range: {gas}")))
            })
        })
        .transpose()?;
    let gas_price = raw
        .gas_price
        .map(|price| {
            parse_quantity("gasPrice", &price).and_then(|v| {
                u128::try_from(v)
                    .map_err(|_| SourceError::new(format!("gasPrice out of range: {price}")))
            })
        })
        .transpose()?;

    Ok(ZapQuote {
        to: raw.to,
        data: raw.data,
        value,
        gas,
        gas_price,
    })
}

/// Parse a decimal or `0x`-prefixed quantity.
fn parse_quantity(field: &str, raw: &str) -> SourceResult<U256> {
    U256::from_str(raw.trim()).map_err(|e| SourceError::new(format!("invalid {field} '{raw}': {e}")))
}

fn slippage_param(percent: f64) -> String {
    format!("{percent}")
}

#[async_trait]
impl ZapQuoter for ZapApiClient {
    async fn zap_in(&self, request: &ZapInRequest) -> SourceResult<ZapQuote> {
        let mut query = vec![
            ("ownerAddress", request.account.to_string()),
            ("sellToken", request.from_token.to_string()),
            ("sellAmount", request.amount.to_string()),
            ("poolAddress", request.to_vault.to_string()),
            ("slippagePercentage", slippage_param(request.slippage_percent)),
            ("protocol", request.protocol.to_string()),
        ];
        if let Some(gas_price) = request.gas_price {
            query.push(("gasPrice", gas_price.to_string()));
        }

        let raw: RawZapTransaction = self
            .get(&self.endpoint("zap-in", "transaction"), &query)
            .await?;
        quote_from_raw(raw)
    }

    async fn zap_out(&self, request: &ZapOutRequest) -> SourceResult<ZapQuote> {
        let mut query = vec![
            ("ownerAddress", request.account.to_string()),
            ("toToken", request.to_token.to_string()),
            ("sellAmount", request.amount.to_string()),
            ("poolAddress", request.from_vault.to_string()),
            ("slippagePercentage", slippage_param(request.slippage_percent)),
            ("protocol", request.protocol.to_string()),
        ];
        if let Some(gas_price) = request.gas_price {
            query.push(("gasPrice", gas_price.to_string()));
        }

        let raw: RawZapTransaction = self
            .get(&self.endpoint("zap-out", "transaction"), &query)
            .await?;
        quote_from_raw(raw)
    }
}

#[async_trait]
impl ZapVaultList for ZapApiClient {
    async fn supported_vaults(&self) -> SourceResult<Vec<Address>> {
        let vaults: Vec<RawSupportedVault> = self
            .get(&self.endpoint("zap-in", "supported-vaults"), &[])
            .await?;
        Ok(vaults.into_iter().map(|v| v.address).collect())
    }
}
