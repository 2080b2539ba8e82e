use crate::{
    error::WalletError,
    injected::{InjectedWallet, WalletEvent, WalletKind},
    session::types::{ConnectionStatus, Session, SessionEvent},
};
use alloy_primitives::Address;
use alloy_provider::DynProvider;
use crowdchain_contract::CampaignClient;
use parking_lot::Mutex;
use std::{
    mem,
    sync::{Arc, Weak},
};
use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};
use tracing::{debug, trace, warn};

/// Owns the single wallet session of the process.
///
/// Transitions:
/// - `Disconnected -> Connecting` on [`connect`](Self::connect), which requires an injected
///   wallet.
/// - `Connecting -> Connected` once an account is exposed and the contract is bound.
/// - `Connected -> Disconnected` on [`disconnect`](Self::disconnect), when the wallet reports
///   no accounts, or when it changes chains. The latter publishes [`SessionEvent::Reset`].
///
/// Cloning is cheap, all clones share the same slot.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    wallet: Option<Arc<dyn InjectedWallet>>,
    contract: Address,
    state: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

enum SessionState {
    Disconnected,
    Connecting,
    Connected {
        session: Session,
        // dropped together with the session, which releases the wallet listener
        _subscription: Subscription,
    },
}

impl SessionManager {
    /// Creates a manager binding sessions to the contract at `contract`. `wallet` is `None` when
    /// no injected wallet is available.
    pub fn new(wallet: Option<Arc<dyn InjectedWallet>>, contract: Address) -> Self {
        let (events, _) = broadcast::channel(16);
        let inner =
            Inner { wallet, contract, state: Mutex::new(SessionState::Disconnected), events };
        Self { inner: Arc::new(inner) }
    }

    pub fn status(&self) -> ConnectionStatus {
        match &*self.inner.state.lock() {
            SessionState::Disconnected => ConnectionStatus::Disconnected,
            SessionState::Connecting => ConnectionStatus::Connecting,
            SessionState::Connected { .. } => ConnectionStatus::Connected,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status() == ConnectionStatus::Connected
    }

    /// Returns the current session, if connected.
    pub fn session(&self) -> Option<Session> {
        match &*self.inner.state.lock() {
            SessionState::Connected { session, .. } => Some(session.clone()),
            _ => None,
        }
    }

    /// Returns the contract bound to the current signer.
    pub fn client(&self) -> Result<CampaignClient<DynProvider>, WalletError> {
        self.session().map(|session| session.client().clone()).ok_or(WalletError::NotConnected)
    }

    /// Subscribes to session changes.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Connects through the injected wallet.
    ///
    /// Returns the existing session if already connected. Fails with
    /// [`WalletError::ConnectInProgress`] while another connect is pending.
    pub async fn connect(&self, kind: WalletKind) -> Result<Session, WalletError> {
        let wallet = self.inner.wallet.clone().ok_or(WalletError::ProviderUnavailable)?;
        {
            let mut state = self.inner.state.lock();
            match &*state {
                SessionState::Connected { session, .. } => return Ok(session.clone()),
                SessionState::Connecting => return Err(WalletError::ConnectInProgress),
                SessionState::Disconnected => *state = SessionState::Connecting,
            }
        }
        debug!(target: "wallet", %kind, "connecting wallet");

        let session = match self.inner.establish(kind, wallet.as_ref()).await {
            Ok(session) => session,
            Err(err) => {
                let mut state = self.inner.state.lock();
                if matches!(*state, SessionState::Connecting) {
                    *state = SessionState::Disconnected;
                }
                warn!(target: "wallet", %kind, %err, "failed to connect wallet");
                return Err(err);
            }
        };

        {
            let mut state = self.inner.state.lock();
            if !matches!(*state, SessionState::Connecting) {
                debug!(target: "wallet", "connect cancelled by disconnect");
                return Err(WalletError::Cancelled);
            }
            let subscription = Subscription::spawn(Arc::downgrade(&self.inner), wallet.subscribe());
            *state =
                SessionState::Connected { session: session.clone(), _subscription: subscription };
        }

        debug!(
            target: "wallet",
            signer = %session.signer(), chain_id = session.chain_id(),
            "wallet connected"
        );
        let _ = self.inner.events.send(SessionEvent::Connected {
            signer: session.signer(),
            chain_id: session.chain_id(),
        });
        Ok(session)
    }

    /// Reconnects as `kind` if the wallet already exposes accounts without prompting, as it
    /// does after a restart when the user previously granted access.
    pub async fn restore(&self, kind: WalletKind) -> Result<Option<Session>, WalletError> {
        let Some(wallet) = self.inner.wallet.clone() else { return Ok(None) };
        if wallet.accounts().await?.is_empty() {
            trace!(target: "wallet", "no previously authorized accounts");
            return Ok(None);
        }
        self.connect(kind).await.map(Some)
    }

    /// Drops the current session. Does nothing when already disconnected.
    pub fn disconnect(&self) {
        self.inner.disconnect();
    }
}

impl Inner {
    async fn establish(
        &self,
        kind: WalletKind,
        wallet: &dyn InjectedWallet,
    ) -> Result<Session, WalletError> {
        let accounts = wallet.request_accounts().await?;
        let signer = *accounts.first().ok_or(WalletError::NoAccounts)?;
        let chain_id = wallet.chain_id().await?;
        Ok(Session::new(kind, signer, chain_id, wallet.provider(), self.contract))
    }

    fn disconnect(&self) {
        let previous = mem::replace(&mut *self.state.lock(), SessionState::Disconnected);
        match previous {
            SessionState::Disconnected => {}
            SessionState::Connecting => debug!(target: "wallet", "pending connect cancelled"),
            SessionState::Connected { session, .. } => {
                debug!(target: "wallet", signer = %session.signer(), "wallet disconnected");
                let _ = self.events.send(SessionEvent::Disconnected);
            }
        }
    }

    /// Applies a wallet notification. Returns `false` once the session it was registered for is
    /// gone.
    fn on_wallet_event(&self, event: WalletEvent) -> bool {
        match event {
            WalletEvent::AccountsChanged(accounts) => {
                let Some(signer) = accounts.first().copied() else {
                    self.disconnect();
                    return false;
                };
                let mut state = self.state.lock();
                let SessionState::Connected { session, .. } = &mut *state else { return false };
                if session.signer() != signer {
                    session.rebind(signer);
                    drop(state);
                    debug!(target: "wallet", %signer, "wallet account changed");
                    let _ = self.events.send(SessionEvent::AccountChanged { signer });
                }
                true
            }
            WalletEvent::ChainChanged(chain_id) => {
                let previous = mem::replace(&mut *self.state.lock(), SessionState::Disconnected);
                if matches!(previous, SessionState::Connected { .. }) {
                    debug!(target: "wallet", chain_id, "wallet changed chain, resetting session");
                    let _ = self.events.send(SessionEvent::Reset { chain_id });
                }
                false
            }
        }
    }
}

/// Listener for wallet notifications, aborted on drop.
struct Subscription(JoinHandle<()>);

impl Subscription {
    fn spawn(inner: Weak<Inner>, events: broadcast::Receiver<WalletEvent>) -> Self {
        Self(tokio::spawn(listen(inner, events)))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.0.abort();
    }
}

async fn listen(inner: Weak<Inner>, mut events: broadcast::Receiver<WalletEvent>) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                warn!(target: "wallet", skipped, "missed wallet notifications");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        trace!(target: "wallet", ?event, "wallet notification");
        let Some(inner) = inner.upgrade() else { break };
        if !inner.on_wallet_event(event) {
            break;
        }
    }
}
