use super::session_manager;
use clap::Parser;
use crowdchain::opts::{ChainOpts, WalletOpts};
use crowdchain_wallets::SessionEvent;
use eyre::Result;
use tokio::sync::broadcast::error::RecvError;

/// CLI arguments for `crowdchain watch`.
#[derive(Debug, Parser)]
pub struct WatchArgs {
    #[command(flatten)]
    pub wallet: WalletOpts,

    #[command(flatten)]
    pub chain: ChainOpts,
}

impl WatchArgs {
    pub async fn run(self) -> Result<()> {
        let (_, manager) = session_manager(&self.chain)?;
        let mut events = manager.subscribe();

        let session = match manager.restore(self.wallet.wallet).await? {
            Some(session) => session,
            None => manager.connect(self.wallet.wallet).await?,
        };
        println!(
            "Connected {} via {} on chain {}",
            session.signer(),
            session.kind(),
            session.chain_id()
        );

        loop {
            let event = tokio::select! {
                event = events.recv() => event,
                _ = tokio::signal::ctrl_c() => break,
            };
            match event {
                Ok(SessionEvent::Connected { .. }) => {}
                Ok(SessionEvent::AccountChanged { signer }) => {
                    println!("Account changed to {signer}")
                }
                Ok(SessionEvent::Disconnected) => {
                    println!("Wallet disconnected");
                    break;
                }
                Ok(SessionEvent::Reset { chain_id }) => {
                    println!("Wallet switched to chain {chain_id}, session reset");
                    break;
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "missed session events"),
                Err(RecvError::Closed) => break,
            }
        }

        manager.disconnect();
        Ok(())
    }
}
