use alloy_primitives::U256;
use alloy_provider::Provider;
use alloy_rpc_types::BlockNumberOrTag;
use clap::Parser;
use crowdchain::{
    opts::ChainOpts,
    utils::{format_eth, format_timestamp},
};
use crowdchain_contract::{CampaignClient, CampaignView};
use crowdchain_wallets::utils::http_provider;
use eyre::Result;

/// CLI arguments for `crowdchain campaign`.
#[derive(Debug, Parser)]
pub struct CampaignArgs {
    /// The campaign id.
    pub id: U256,

    /// Print the campaign as JSON.
    #[arg(long, short, help_heading = "Display options")]
    pub json: bool,

    #[command(flatten)]
    pub chain: ChainOpts,
}

impl CampaignArgs {
    pub async fn run(self) -> Result<()> {
        let Self { id, json, chain } = self;
        let config = chain.load_config()?;
        let provider = http_provider(config.rpc_url()?)?;
        let client = CampaignClient::new(config.contract_address()?, provider);

        let campaign = client.get_campaign(id).await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&campaign)?);
            return Ok(());
        }

        let now = client
            .provider()
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await?
            .map(|block| U256::from(block.header.timestamp));
        println!("{}", pretty_campaign(&campaign, now));
        Ok(())
    }
}

fn pretty_campaign(campaign: &CampaignView, now: Option<U256>) -> String {
    let status = match now {
        _ if campaign.claimed => "claimed",
        Some(now) if now < campaign.deadline => "open",
        Some(_) if campaign.is_funded() => "funded",
        Some(_) => "failed",
        None => "unknown",
    };
    format!(
        "Campaign Details:\n\
         Creator: {}\n\
         Goal: {}\n\
         Deadline: {}\n\
         Pledged: {}\n\
         Claimed: {}\n\
         Status: {status}",
        campaign.creator,
        format_eth(campaign.goal),
        format_timestamp(campaign.deadline),
        format_eth(campaign.pledged),
        campaign.claimed,
    )
}
