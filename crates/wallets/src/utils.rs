use crate::error::{PrivateKeyError, WalletError};
use alloy_network::EthereumWallet;
use alloy_primitives::{B256, hex::FromHex};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use url::Url;

fn ensure_pk_not_env(pk: &str) -> Result<(), PrivateKeyError> {
    if !pk.starts_with("0x") && std::env::var(pk).is_ok() {
        return Err(PrivateKeyError::ExistsAsEnvVar(pk.to_string()));
    }
    Ok(())
}

/// Validates and sanitizes a hex encoded private key, returning the local signer.
pub fn create_private_key_signer(
    private_key_str: &str,
) -> Result<PrivateKeySigner, PrivateKeyError> {
    let private_key = match B256::from_hex(private_key_str.trim()) {
        Ok(private_key) => private_key,
        Err(err) => {
            ensure_pk_not_env(private_key_str)?;
            return Err(err.into());
        }
    };
    PrivateKeySigner::from_bytes(&private_key).map_err(|err| {
        ensure_pk_not_env(private_key_str)
            .err()
            .unwrap_or_else(|| PrivateKeyError::InvalidKey(err.to_string()))
    })
}

/// Returns a provider that fills, signs and submits transactions with `signer`.
pub fn signing_provider(
    rpc_url: &str,
    signer: PrivateKeySigner,
) -> Result<DynProvider, WalletError> {
    let url = Url::parse(rpc_url)?;
    Ok(ProviderBuilder::new().wallet(EthereumWallet::from(signer)).connect_http(url).erased())
}

/// Returns a provider that leaves signing to the node, see [`NodeWallet`](crate::NodeWallet).
pub fn http_provider(rpc_url: &str) -> Result<DynProvider, WalletError> {
    let url = Url::parse(rpc_url)?;
    Ok(ProviderBuilder::new().connect_http(url).erased())
}
