//! Provider construction for signing clients.

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};

use crate::error::{ContractError, Result};

/// Type-erased provider with the recommended fillers and a local wallet attached.
pub type HttpProvider = DynProvider;

/// Connect to `rpc_url` with a wallet built from `private_key`.
///
/// Returns the provider together with the signer's address. Gas, nonce and chain id are
/// filled by the provider unless the transaction already carries them.
pub fn connect_http(rpc_url: &str, private_key: &str) -> Result<(HttpProvider, Address)> {
    let signer: PrivateKeySigner = private_key
        .parse()
        .map_err(|_| ContractError::InvalidPrivateKey)?;
    let signer_address = signer.address();
    let wallet = EthereumWallet::from(signer);

    let url: url::Url = rpc_url
        .parse()
        .map_err(|e| ContractError::RpcConnection(format!("{}", e)))?;

    let provider = ProviderBuilder::new()
        .wallet(wallet)
        .connect_http(url)
        .erased();

    Ok((provider, signer_address))
}
