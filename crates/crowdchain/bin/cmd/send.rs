use super::{confirm, session_manager};
use alloy_primitives::U256;
use clap::Parser;
use crowdchain::{
    opts::{ChainOpts, WalletOpts},
    utils::parse_ether_amount,
};
use eyre::Result;

/// CLI arguments for `crowdchain create`.
#[derive(Debug, Parser)]
pub struct CreateArgs {
    /// The funding goal, in wei.
    #[arg(long, value_name = "WEI")]
    pub goal: U256,

    /// How long the campaign accepts pledges, in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub duration: U256,

    #[command(flatten)]
    pub wallet: WalletOpts,

    #[command(flatten)]
    pub chain: ChainOpts,
}

impl CreateArgs {
    pub async fn run(self) -> Result<()> {
        let Self { goal, duration, wallet, chain } = self;
        let (config, manager) = session_manager(&chain)?;
        let session = manager.connect(wallet.wallet).await?;

        let pending = session.client().create_campaign(goal, duration).await?;
        let confirmation = confirm(pending, config.confirmations).await?;
        match confirmation.campaign_id {
            Some(id) => println!("Campaign created successfully! Campaign ID: {id}"),
            None => println!("Campaign created successfully!"),
        }
        Ok(())
    }
}

/// CLI arguments for `crowdchain pledge`.
#[derive(Debug, Parser)]
pub struct PledgeArgs {
    /// The campaign to pledge to.
    pub id: U256,

    /// The amount to pledge, in ether.
    #[arg(value_parser = parse_ether_amount, value_name = "ETHER")]
    pub amount: U256,

    #[command(flatten)]
    pub wallet: WalletOpts,

    #[command(flatten)]
    pub chain: ChainOpts,
}

impl PledgeArgs {
    pub async fn run(self) -> Result<()> {
        let Self { id, amount, wallet, chain } = self;
        let (config, manager) = session_manager(&chain)?;
        let session = manager.connect(wallet.wallet).await?;

        let pending = session.client().pledge(id, amount).await?;
        confirm(pending, config.confirmations).await?;
        println!("Pledge successful!");
        Ok(())
    }
}

/// The campaign-settling transactions.
#[derive(Clone, Copy, Debug)]
pub enum Action {
    Withdraw,
    Refund,
}

/// CLI arguments for `crowdchain withdraw` and `crowdchain refund`.
#[derive(Debug, Parser)]
pub struct SendArgs {
    /// The campaign id.
    pub id: U256,

    #[command(flatten)]
    pub wallet: WalletOpts,

    #[command(flatten)]
    pub chain: ChainOpts,
}

impl SendArgs {
    pub async fn run(self, action: Action) -> Result<()> {
        let Self { id, wallet, chain } = self;
        let (config, manager) = session_manager(&chain)?;
        let session = manager.connect(wallet.wallet).await?;
        let client = session.client();

        let pending = match action {
            Action::Withdraw => client.withdraw(id).await?,
            Action::Refund => client.refund(id).await?,
        };
        confirm(pending, config.confirmations).await?;
        match action {
            Action::Withdraw => println!("Funds withdrawn successfully!"),
            Action::Refund => println!("Refund successful!"),
        }
        Ok(())
    }
}
