use alloy_primitives::hex::FromHexError;
use alloy_transport::TransportError;
use crowdchain_contract::ContractError;

#[derive(Debug, thiserror::Error)]
pub enum PrivateKeyError {
    #[error("Failed to create wallet from private key. Private key is invalid hex: {0}")]
    InvalidHex(#[from] FromHexError),
    #[error("Failed to create wallet from private key: {0}")]
    InvalidKey(String),
    #[error(
        "Failed to create wallet from private key. Invalid private key. But env var {0} exists. Is the `$` anchor missing?"
    )]
    ExistsAsEnvVar(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// No injected wallet is available to connect through.
    #[error("Please install MetaMask or another Web3 wallet")]
    ProviderUnavailable,
    #[error("wallet did not expose any account")]
    NoAccounts,
    #[error("a wallet connection is already in progress")]
    ConnectInProgress,
    /// The session was disconnected before the pending connection completed.
    #[error("wallet connection was cancelled")]
    Cancelled,
    #[error("wallet is not connected")]
    NotConnected,
    #[error("invalid RPC URL: {0}")]
    InvalidRpcUrl(#[from] url::ParseError),
    #[error(transparent)]
    Rpc(#[from] TransportError),
    #[error(transparent)]
    Contract(#[from] ContractError),
    #[error(transparent)]
    PrivateKey(#[from] PrivateKeyError),
}
