use crate::injected::WalletKind;
use alloy_primitives::{Address, ChainId};
use alloy_provider::DynProvider;
use crowdchain_contract::CampaignClient;
use std::fmt;

/// Coarse connection state, see [`SessionManager`](super::SessionManager).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

/// Published by the session manager whenever the session changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Connected { signer: Address, chain_id: ChainId },
    /// The wallet switched accounts; the session now signs as `signer`.
    AccountChanged { signer: Address },
    Disconnected,
    /// The wallet moved to another chain. The session is gone and everything derived from it
    /// must be rebuilt.
    Reset { chain_id: ChainId },
}

/// A live wallet connection.
///
/// The signer and the contract binding are created together and replaced together, so a
/// session is never half initialized.
#[derive(Clone)]
pub struct Session {
    kind: WalletKind,
    signer: Address,
    chain_id: ChainId,
    provider: DynProvider,
    client: CampaignClient<DynProvider>,
}

impl Session {
    pub(crate) fn new(
        kind: WalletKind,
        signer: Address,
        chain_id: ChainId,
        provider: DynProvider,
        contract: Address,
    ) -> Self {
        let client = CampaignClient::new(contract, provider.clone()).with_sender(signer);
        Self { kind, signer, chain_id, provider, client }
    }

    /// Rebinds the session to another account of the same wallet.
    pub(crate) fn rebind(&mut self, signer: Address) {
        let contract = self.client.address();
        *self = Self::new(self.kind, signer, self.chain_id, self.provider.clone(), contract);
    }

    pub fn kind(&self) -> WalletKind {
        self.kind
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// The contract bound to this session's signer.
    pub fn client(&self) -> &CampaignClient<DynProvider> {
        &self.client
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("kind", &self.kind)
            .field("signer", &self.signer)
            .field("chain_id", &self.chain_id)
            .field("contract", &self.client.address())
            .finish_non_exhaustive()
    }
}
