use crate::{
    error::WalletError,
    injected::{InjectedWallet, WalletEvent},
    utils::http_provider,
};
use alloy_primitives::{Address, ChainId};
use alloy_provider::{DynProvider, Provider};
use async_trait::async_trait;
use std::{fmt, time::Duration};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, trace};

/// An injected wallet backed by the accounts a JSON-RPC node manages, e.g. a local dev node.
///
/// The node has no push channel for account or chain changes, so a background task polls
/// `eth_accounts` and `eth_chainId` and publishes a [`WalletEvent`] whenever either changes.
pub struct NodeWallet {
    provider: DynProvider,
    events: broadcast::Sender<WalletEvent>,
    poller: JoinHandle<()>,
}

impl NodeWallet {
    /// Connects to the node at `rpc_url`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect_http(rpc_url: &str, poll_interval: Duration) -> Result<Self, WalletError> {
        Ok(Self::new(http_provider(rpc_url)?, poll_interval))
    }

    pub fn new(provider: DynProvider, poll_interval: Duration) -> Self {
        let (events, _) = broadcast::channel(16);
        let poller = tokio::spawn(poll_changes(provider.clone(), events.clone(), poll_interval));
        Self { provider, events, poller }
    }
}

impl Drop for NodeWallet {
    fn drop(&mut self) {
        self.poller.abort();
    }
}

impl fmt::Debug for NodeWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeWallet").field("subscribers", &self.events.receiver_count()).finish()
    }
}

#[async_trait]
impl InjectedWallet for NodeWallet {
    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(self.provider.get_accounts().await?)
    }

    // node managed accounts are always unlocked, there is nothing to prompt for
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.accounts().await
    }

    async fn chain_id(&self) -> Result<ChainId, WalletError> {
        Ok(self.provider.get_chain_id().await?)
    }

    fn provider(&self) -> DynProvider {
        self.provider.clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }
}

async fn poll_changes(
    provider: DynProvider,
    events: broadcast::Sender<WalletEvent>,
    poll_interval: Duration,
) {
    // first poll after one full interval
    let start = tokio::time::Instant::now() + poll_interval;
    let mut interval = tokio::time::interval_at(start, poll_interval);
    let mut accounts = None;
    let mut chain_id = None;
    loop {
        interval.tick().await;

        match provider.get_accounts().await {
            Ok(current) => {
                if let Some(event) = diff(&mut accounts, current, WalletEvent::AccountsChanged) {
                    debug!(target: "wallet", ?event, "node accounts changed");
                    let _ = events.send(event);
                }
            }
            Err(err) => trace!(target: "wallet", %err, "failed to poll accounts"),
        }

        match provider.get_chain_id().await {
            Ok(current) => {
                if let Some(event) = diff(&mut chain_id, current, WalletEvent::ChainChanged) {
                    debug!(target: "wallet", ?event, "node chain changed");
                    let _ = events.send(event);
                }
            }
            Err(err) => trace!(target: "wallet", %err, "failed to poll chain id"),
        }
    }
}

/// Records `current` and returns an event if it differs from a previously observed value.
/// The first observation only establishes the baseline.
fn diff<T: PartialEq + Clone>(
    last: &mut Option<T>,
    current: T,
    event: impl FnOnce(T) -> WalletEvent,
) -> Option<WalletEvent> {
    let changed = last.as_ref().is_some_and(|last| *last != current);
    *last = Some(current.clone());
    changed.then(|| event(current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{U64, address};
    use alloy_provider::ProviderBuilder;
    use alloy_transport::mock::Asserter;

    const ALICE: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const BOB: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

    fn mocked_provider() -> (DynProvider, Asserter) {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone())
            .erased();
        (provider, asserter)
    }

    async fn next_event(events: &mut broadcast::Receiver<WalletEvent>) -> WalletEvent {
        tokio::time::timeout(Duration::from_secs(5), events.recv()).await.unwrap().unwrap()
    }

    #[test]
    fn first_observation_is_baseline() {
        let mut last = None;
        assert_eq!(diff(&mut last, 1u64, WalletEvent::ChainChanged), None);
        assert_eq!(diff(&mut last, 1u64, WalletEvent::ChainChanged), None);
        assert_eq!(
            diff(&mut last, 5u64, WalletEvent::ChainChanged),
            Some(WalletEvent::ChainChanged(5))
        );
        assert_eq!(last, Some(5));
    }

    #[test]
    fn account_changes() {
        let mut last = None;
        assert_eq!(diff(&mut last, vec![ALICE], WalletEvent::AccountsChanged), None);
        assert_eq!(
            diff(&mut last, vec![], WalletEvent::AccountsChanged),
            Some(WalletEvent::AccountsChanged(vec![]))
        );
    }

    #[tokio::test]
    async fn reads_node_accounts_and_chain() {
        let (provider, asserter) = mocked_provider();
        let wallet = NodeWallet::new(provider, Duration::from_secs(3600));

        asserter.push_success(&vec![ALICE, BOB]);
        assert_eq!(wallet.accounts().await.unwrap(), vec![ALICE, BOB]);

        asserter.push_success(&U64::from(31337));
        assert_eq!(wallet.chain_id().await.unwrap(), 31337);

        asserter.push_success(&vec![BOB]);
        assert_eq!(wallet.request_accounts().await.unwrap(), vec![BOB]);

        asserter.push_failure_msg("connection refused");
        assert!(wallet.chain_id().await.is_err());
    }

    #[tokio::test]
    async fn poller_publishes_changes() {
        let (provider, asserter) = mocked_provider();
        // baseline, then the node switches chains
        asserter.push_success(&vec![ALICE]);
        asserter.push_success(&U64::from(1));
        asserter.push_success(&vec![ALICE]);
        asserter.push_success(&U64::from(5));

        let wallet = NodeWallet::new(provider, Duration::from_millis(10));
        let mut events = wallet.subscribe();
        assert_eq!(next_event(&mut events).await, WalletEvent::ChainChanged(5));

        asserter.push_success(&vec![BOB]);
        asserter.push_success(&U64::from(5));
        assert_eq!(next_event(&mut events).await, WalletEvent::AccountsChanged(vec![BOB]));

        asserter.push_success(&Vec::<Address>::new());
        asserter.push_success(&U64::from(5));
        assert_eq!(next_event(&mut events).await, WalletEvent::AccountsChanged(vec![]));
    }
}
