use alloy_primitives::Address;
use clap::Parser;
use crowdchain_config::{
    Config,
    figment::{
        self, Metadata, Profile,
        providers::Serialized,
        value::{Dict, Map},
    },
};
use crowdchain_wallets::WalletKind;
use serde::Serialize;

/// Chain and contract options shared by every command. Unset flags fall back to
/// `crowdchain.toml` and `CROWDCHAIN_*` variables.
#[derive(Clone, Debug, Default, Serialize, Parser)]
#[command(next_help_heading = "Chain options")]
pub struct ChainOpts {
    /// The RPC endpoint.
    #[arg(short, long = "rpc-url", value_name = "URL")]
    #[serde(rename = "rpc_url", skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,

    /// The address of the crowdfunding contract.
    #[arg(long = "contract", value_name = "ADDRESS")]
    #[serde(rename = "contract_address", skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,

    /// The number of confirmations to wait for after submitting a transaction.
    #[arg(long, value_name = "N")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmations: Option<u64>,
}

impl figment::Provider for ChainOpts {
    fn metadata(&self) -> Metadata {
        Metadata::named("command line arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}

impl ChainOpts {
    /// Loads the configuration with these options layered on top.
    pub fn load_config(&self) -> eyre::Result<Config> {
        Ok(Config::load_with(self.clone())?)
    }
}

/// Options of commands that act through a wallet session.
#[derive(Clone, Debug, Default, Parser)]
#[command(next_help_heading = "Wallet options")]
pub struct WalletOpts {
    /// The wallet to connect with.
    #[arg(long, default_value_t, value_name = "KIND")]
    pub wallet: WalletKind,
}
