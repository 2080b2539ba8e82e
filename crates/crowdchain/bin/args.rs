use crate::cmd::{
    campaign::CampaignArgs,
    send::{CreateArgs, PledgeArgs, SendArgs},
    serve::ServeArgs,
    watch::WatchArgs,
};
use clap::{Parser, Subcommand};

/// Create, fund and inspect crowdfunding campaigns.
#[derive(Parser)]
#[command(name = "crowdchain", version, next_display_order = None)]
pub struct Crowdchain {
    #[command(subcommand)]
    pub cmd: CrowdchainSubcommand,
}

#[derive(Subcommand)]
pub enum CrowdchainSubcommand {
    /// Runs the HTTP proxy.
    Serve(ServeArgs),

    /// Creates a campaign.
    #[command(visible_alias = "c")]
    Create(CreateArgs),

    /// Prints a campaign.
    #[command(visible_alias = "show")]
    Campaign(CampaignArgs),

    /// Pledges ether to a campaign.
    Pledge(PledgeArgs),

    /// Withdraws the pledges of a funded campaign to its creator.
    Withdraw(SendArgs),

    /// Reclaims a pledge from a campaign that missed its goal.
    Refund(SendArgs),

    /// Connects a wallet session and logs its changes until the wallet resets.
    Watch(WatchArgs),
}
