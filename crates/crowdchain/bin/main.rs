#[macro_use]
extern crate tracing;

use clap::Parser;
use crowdchain::{handler, utils};
use crowdchain_config::Config;
use eyre::Result;

mod args;
mod cmd;

use args::{Crowdchain, CrowdchainSubcommand};
use cmd::send::Action;

fn main() -> Result<()> {
    handler::install();
    Config::load_dotenv();
    utils::subscriber();
    let args = Crowdchain::parse();
    main_args(args)
}

#[tokio::main]
async fn main_args(args: Crowdchain) -> Result<()> {
    match args.cmd {
        CrowdchainSubcommand::Serve(cmd) => cmd.run().await,
        CrowdchainSubcommand::Create(cmd) => cmd.run().await,
        CrowdchainSubcommand::Campaign(cmd) => cmd.run().await,
        CrowdchainSubcommand::Pledge(cmd) => cmd.run().await,
        CrowdchainSubcommand::Withdraw(cmd) => cmd.run(Action::Withdraw).await,
        CrowdchainSubcommand::Refund(cmd) => cmd.run(Action::Refund).await,
        CrowdchainSubcommand::Watch(cmd) => cmd.run().await,
    }
}
