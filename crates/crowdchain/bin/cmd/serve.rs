use clap::Parser;
use crowdchain::opts::ChainOpts;
use crowdchain_config::{
    Config,
    figment::{
        self, Metadata, Profile,
        providers::Serialized,
        value::{Dict, Map},
    },
};
use crowdchain_contract::CampaignClient;
use crowdchain_server::{ContractBackend, ProxyServer};
use crowdchain_wallets::utils::{create_private_key_signer, signing_provider};
use eyre::Result;
use serde::Serialize;
use std::{net::IpAddr, sync::Arc};

/// CLI arguments for `crowdchain serve`.
#[derive(Clone, Debug, Parser, Serialize)]
pub struct ServeArgs {
    /// The interface to listen on.
    #[arg(long, value_name = "ADDR")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<IpAddr>,

    /// The port to listen on.
    #[arg(short, long, value_name = "PORT")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// The private key the proxy signs every transaction with.
    #[arg(long, value_name = "KEY")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,

    #[command(flatten)]
    #[serde(flatten)]
    pub chain: ChainOpts,
}

impl figment::Provider for ServeArgs {
    fn metadata(&self) -> Metadata {
        Metadata::named("command line arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}

impl ServeArgs {
    pub async fn run(self) -> Result<()> {
        let config = Config::load_with(self)?;
        let signer = create_private_key_signer(config.private_key()?)?;
        let contract = config.contract_address()?;
        info!(
            target: "proxy",
            signer = %signer.address(), %contract, rpc_url = config.rpc_url()?,
            "starting proxy"
        );

        let provider = signing_provider(config.rpc_url()?, signer)?;
        let backend =
            ContractBackend::new(CampaignClient::new(contract, provider), config.confirmations);
        let mut server = ProxyServer::new(config.socket_addr(), Arc::new(backend));
        server.start().await?;
        println!("Backend API is running on port {}", server.port());

        tokio::signal::ctrl_c().await?;
        server.stop().await?;
        Ok(())
    }
}
