use crowdchain::opts::ChainOpts;
use crowdchain_config::Config;
use crowdchain_contract::{Confirmation, PendingCampaignTx};
use crowdchain_wallets::{NodeWallet, SessionManager};
use eyre::Result;
use std::sync::Arc;

pub mod campaign;
pub mod send;
pub mod serve;
pub mod watch;

/// Builds a session manager over the accounts managed by the configured node.
pub(crate) fn session_manager(chain: &ChainOpts) -> Result<(Config, SessionManager)> {
    let config = chain.load_config()?;
    let wallet = NodeWallet::connect_http(config.rpc_url()?, config.wallet_poll_interval())?;
    let manager = SessionManager::new(Some(Arc::new(wallet)), config.contract_address()?);
    Ok((config, manager))
}

/// Waits for `pending` to be mined, reporting progress on the way.
pub(crate) async fn confirm(
    pending: PendingCampaignTx,
    confirmations: u64,
) -> Result<Confirmation> {
    println!("Transaction sent! Waiting for confirmation...");
    println!("Transaction hash: {}", pending.tx_hash());
    let confirmation = pending.confirm(confirmations).await?;
    if let Some(block) = confirmation.block_number {
        println!("Confirmed in block {block}");
    }
    Ok(confirmation)
}
