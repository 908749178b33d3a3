//! Collaborators backed by direct contract reads.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use vaultkit_contracts::erc20::IERC20;
use vaultkit_contracts::HttpProvider;

use crate::sources::{SourceError, SourceResult, TokenReader};

/// Reads ERC-20 balances and allowances over RPC.
#[derive(Clone)]
pub struct Erc20Reader {
    provider: HttpProvider,
}

impl Erc20Reader {
    pub fn new(provider: HttpProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl TokenReader for Erc20Reader {
    async fn balance_of(&self, token: Address, owner: Address) -> SourceResult<U256> {
        let contract = IERC20::new(token, &self.provider);
        contract.balanceOf(owner).call().await.map_err(|e| {
            SourceError::new(format!("balanceOf({owner}) on {token} failed: {e}"))
        })
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> SourceResult<U256> {
        let contract = IERC20::new(token, &self.provider);
        contract.allowance(owner, spender).call().await.map_err(|e| {
            SourceError::new(format!("allowance({owner}, {spender}) on {token} failed: {e}"))
        })
    }
}
