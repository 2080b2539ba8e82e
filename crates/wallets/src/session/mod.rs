//! The wallet session: which account signs, on which chain, through which contract binding.

mod state;
pub use state::SessionManager;

mod types;
pub use types::{ConnectionStatus, Session, SessionEvent};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::WalletError,
        injected::{InjectedWallet, WalletEvent, WalletKind},
    };
    use alloy_primitives::{Address, ChainId, address};
    use alloy_provider::{DynProvider, Provider, ProviderBuilder};
    use alloy_transport::mock::Asserter;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::{sync::Arc, time::Duration};
    use tokio::sync::{Notify, broadcast};

    const ALICE: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const BOB: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
    const CONTRACT: Address = address!("0x5FbDB2315678afecb367f032d93F642f64180aa3");

    struct MockWallet {
        accounts: Mutex<Vec<Address>>,
        chain_id: ChainId,
        provider: DynProvider,
        events: broadcast::Sender<WalletEvent>,
        // when set, `request_accounts` waits for a notification before answering
        gate: Option<Arc<Notify>>,
    }

    impl MockWallet {
        fn new(accounts: Vec<Address>) -> Self {
            let provider = ProviderBuilder::new()
                .disable_recommended_fillers()
                .connect_mocked_client(Asserter::new())
                .erased();
            let (events, _) = broadcast::channel(16);
            Self { accounts: Mutex::new(accounts), chain_id: 31337, provider, events, gate: None }
        }

        fn gated(accounts: Vec<Address>, gate: Arc<Notify>) -> Self {
            Self { gate: Some(gate), ..Self::new(accounts) }
        }

        fn emit(&self, event: WalletEvent) {
            self.events.send(event).unwrap();
        }
    }

    #[async_trait]
    impl InjectedWallet for MockWallet {
        async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
            Ok(self.accounts.lock().clone())
        }

        async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.accounts().await
        }

        async fn chain_id(&self) -> Result<ChainId, WalletError> {
            Ok(self.chain_id)
        }

        fn provider(&self) -> DynProvider {
            self.provider.clone()
        }

        fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
            self.events.subscribe()
        }
    }

    fn manager(wallet: &Arc<MockWallet>) -> SessionManager {
        SessionManager::new(Some(wallet.clone() as Arc<dyn InjectedWallet>), CONTRACT)
    }

    async fn next_event(events: &mut broadcast::Receiver<SessionEvent>) -> SessionEvent {
        tokio::time::timeout(Duration::from_secs(5), events.recv()).await.unwrap().unwrap()
    }

    async fn wait_until(mut f: impl FnMut() -> bool) {
        for _ in 0..100 {
            if f() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn no_wallet_available() {
        let manager = SessionManager::new(None, CONTRACT);
        let err = manager.connect(WalletKind::MetaMask).await.unwrap_err();
        assert!(matches!(err, WalletError::ProviderUnavailable));
        assert_eq!(err.to_string(), "Please install MetaMask or another Web3 wallet");
        assert_eq!(manager.status(), ConnectionStatus::Disconnected);
        assert!(manager.restore(WalletKind::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn connect_binds_signer_and_contract() {
        let wallet = Arc::new(MockWallet::new(vec![ALICE, BOB]));
        let manager = manager(&wallet);
        let mut events = manager.subscribe();

        let session = manager.connect(WalletKind::Coinbase).await.unwrap();
        assert_eq!(session.signer(), ALICE);
        assert_eq!(session.chain_id(), 31337);
        assert_eq!(session.kind(), WalletKind::Coinbase);
        assert_eq!(session.client().address(), CONTRACT);
        assert_eq!(session.client().sender(), Some(ALICE));
        assert!(manager.is_connected());
        assert_eq!(
            next_event(&mut events).await,
            SessionEvent::Connected { signer: ALICE, chain_id: 31337 }
        );

        // connecting again keeps the existing session
        let again = manager.connect(WalletKind::MetaMask).await.unwrap();
        assert_eq!(again.signer(), ALICE);
        assert_eq!(again.kind(), WalletKind::Coinbase);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn connect_without_accounts() {
        let wallet = Arc::new(MockWallet::new(vec![]));
        let manager = manager(&wallet);
        let err = manager.connect(WalletKind::MetaMask).await.unwrap_err();
        assert!(matches!(err, WalletError::NoAccounts));
        assert_eq!(manager.status(), ConnectionStatus::Disconnected);
        assert!(matches!(manager.client().unwrap_err(), WalletError::NotConnected));
    }

    #[tokio::test]
    async fn concurrent_connect_is_rejected() {
        let gate = Arc::new(Notify::new());
        let wallet = Arc::new(MockWallet::gated(vec![ALICE], gate.clone()));
        let manager = manager(&wallet);

        let pending = tokio::spawn({
            let manager = manager.clone();
            async move { manager.connect(WalletKind::MetaMask).await }
        });
        wait_until(|| manager.status() == ConnectionStatus::Connecting).await;

        let err = manager.connect(WalletKind::MetaMask).await.unwrap_err();
        assert!(matches!(err, WalletError::ConnectInProgress));

        gate.notify_one();
        let session = pending.await.unwrap().unwrap();
        assert_eq!(session.signer(), ALICE);
        assert!(manager.is_connected());
    }

    #[tokio::test]
    async fn disconnect_cancels_pending_connect() {
        let gate = Arc::new(Notify::new());
        let wallet = Arc::new(MockWallet::gated(vec![ALICE], gate.clone()));
        let manager = manager(&wallet);

        let pending = tokio::spawn({
            let manager = manager.clone();
            async move { manager.connect(WalletKind::MetaMask).await }
        });
        wait_until(|| manager.status() == ConnectionStatus::Connecting).await;

        manager.disconnect();
        gate.notify_one();
        let err = pending.await.unwrap().unwrap_err();
        assert!(matches!(err, WalletError::Cancelled));
        assert_eq!(manager.status(), ConnectionStatus::Disconnected);
        assert_eq!(wallet.events.receiver_count(), 0);
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let wallet = Arc::new(MockWallet::new(vec![ALICE]));
        let manager = manager(&wallet);
        let mut events = manager.subscribe();

        manager.disconnect();
        assert!(events.try_recv().is_err());

        manager.connect(WalletKind::MetaMask).await.unwrap();
        next_event(&mut events).await;
        assert_eq!(wallet.events.receiver_count(), 1);

        manager.disconnect();
        manager.disconnect();
        assert_eq!(next_event(&mut events).await, SessionEvent::Disconnected);
        assert!(events.try_recv().is_err());
        assert!(manager.session().is_none());
        wait_until(|| wallet.events.receiver_count() == 0).await;
    }

    #[tokio::test]
    async fn account_change_rebinds_session() {
        let wallet = Arc::new(MockWallet::new(vec![ALICE]));
        let manager = manager(&wallet);
        let mut events = manager.subscribe();
        manager.connect(WalletKind::MetaMask).await.unwrap();
        next_event(&mut events).await;

        wallet.emit(WalletEvent::AccountsChanged(vec![BOB]));
        assert_eq!(next_event(&mut events).await, SessionEvent::AccountChanged { signer: BOB });

        let session = manager.session().unwrap();
        assert_eq!(session.signer(), BOB);
        assert_eq!(session.client().sender(), Some(BOB));
        assert_eq!(manager.client().unwrap().sender(), Some(BOB));
    }

    #[tokio::test]
    async fn empty_accounts_disconnect() {
        let wallet = Arc::new(MockWallet::new(vec![ALICE]));
        let manager = manager(&wallet);
        let mut events = manager.subscribe();
        manager.connect(WalletKind::MetaMask).await.unwrap();
        next_event(&mut events).await;

        wallet.emit(WalletEvent::AccountsChanged(vec![]));
        assert_eq!(next_event(&mut events).await, SessionEvent::Disconnected);
        assert_eq!(manager.status(), ConnectionStatus::Disconnected);
        wait_until(|| wallet.events.receiver_count() == 0).await;
    }

    #[tokio::test]
    async fn chain_change_resets_session() {
        let wallet = Arc::new(MockWallet::new(vec![ALICE]));
        let manager = manager(&wallet);
        let mut events = manager.subscribe();
        manager.connect(WalletKind::MetaMask).await.unwrap();
        next_event(&mut events).await;

        wallet.emit(WalletEvent::ChainChanged(11155111));
        assert_eq!(next_event(&mut events).await, SessionEvent::Reset { chain_id: 11155111 });
        assert!(manager.session().is_none());
        wait_until(|| wallet.events.receiver_count() == 0).await;

        // reconnecting registers exactly one listener again
        manager.connect(WalletKind::MetaMask).await.unwrap();
        assert_eq!(wallet.events.receiver_count(), 1);
    }

    #[tokio::test]
    async fn restore_previous_authorization() {
        let wallet = Arc::new(MockWallet::new(vec![]));
        let manager = manager(&wallet);
        assert!(manager.restore(WalletKind::TrustWallet).await.unwrap().is_none());
        assert_eq!(manager.status(), ConnectionStatus::Disconnected);

        *wallet.accounts.lock() = vec![BOB];
        let session = manager.restore(WalletKind::TrustWallet).await.unwrap().unwrap();
        assert_eq!(session.signer(), BOB);
        assert_eq!(session.kind(), WalletKind::TrustWallet);
    }
}
