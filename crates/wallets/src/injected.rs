use crate::error::WalletError;
use alloy_primitives::{Address, ChainId};
use alloy_provider::DynProvider;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Notifications an injected wallet pushes to its subscribers, mirroring the EIP-1193
/// `accountsChanged` and `chainChanged` events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalletEvent {
    /// The set of exposed accounts changed. Empty when the user locked or revoked the wallet.
    AccountsChanged(Vec<Address>),
    ChainChanged(ChainId),
}

/// The wallet a user picks to connect with.
///
/// Every kind is served by the same injected provider; the kind is only recorded on the
/// session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum WalletKind {
    #[default]
    MetaMask,
    WalletConnect,
    TrustWallet,
    Coinbase,
}

/// A wallet provider the session manager can connect through, the equivalent of the
/// browser-injected `window.ethereum`.
#[async_trait]
pub trait InjectedWallet: Send + Sync + 'static {
    /// Accounts the wallet already exposes, without prompting (`eth_accounts`).
    async fn accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Asks the wallet to expose its accounts (`eth_requestAccounts`).
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// The chain the wallet is currently on.
    async fn chain_id(&self) -> Result<ChainId, WalletError>;

    /// A provider routing requests through this wallet.
    fn provider(&self) -> DynProvider;

    /// Subscribes to account and chain notifications.
    fn subscribe(&self) -> broadcast::Receiver<WalletEvent>;
}
