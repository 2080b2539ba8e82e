//! # crowdchain-config
//!
//! Layered configuration for the CrowdChain proxy and CLI.
//!
//! Values are merged in this order, later sources winning:
//! 1. built-in defaults
//! 2. `crowdchain.toml` (or the file named by `CROWDCHAIN_CONFIG`)
//! 3. `CROWDCHAIN_*` environment variables
//! 4. any extra [`Provider`], usually the parsed command line

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

use alloy_primitives::Address;
use figment::{
    Figment, Metadata, Profile, Provider,
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Map},
};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::Path,
    time::Duration,
};

mod error;
pub use error::{ConfigError, FAILED_TO_EXTRACT_CONFIG_MSG};

pub use figment;

/// Settings shared by the proxy server and the wallet-backed CLI commands.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// JSON-RPC endpoint of the node hosting the crowdfunding contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,
    /// Hex encoded key the proxy signs every transaction with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    /// Address of the deployed crowdfunding contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,
    /// Interface the proxy binds to.
    pub host: IpAddr,
    /// Port the proxy listens on.
    pub port: u16,
    /// Blocks to wait for before a proxied write is reported as done.
    pub confirmations: u64,
    /// How often the node wallet polls for account and chain changes.
    pub wallet_poll_interval_ms: u64,
}

impl Config {
    /// The default config file name.
    pub const FILE_NAME: &'static str = "crowdchain.toml";

    /// Environment variable overriding the config file location.
    pub const CONFIG_ENV: &'static str = "CROWDCHAIN_CONFIG";

    /// Prefix of all environment variables read into the config.
    pub const ENV_PREFIX: &'static str = "CROWDCHAIN_";

    /// The port the proxy listens on when nothing else is configured.
    pub const DEFAULT_PORT: u16 = 3001;

    /// Returns the environment variable name for the given setting.
    pub fn env_var(key: &str) -> String {
        format!("{}{}", Self::ENV_PREFIX, key.to_ascii_uppercase())
    }

    /// Loads the config from the default figment, see [`Self::figment`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_provider(Self::figment())
    }

    /// Loads the config from the default figment merged with `provider`, which takes
    /// precedence over everything else.
    pub fn load_with(provider: impl Provider) -> Result<Self, ConfigError> {
        Self::from_provider(Self::figment().merge(provider))
    }

    /// Extracts a config from any provider.
    pub fn from_provider(provider: impl Provider) -> Result<Self, ConfigError> {
        let config: Self = Figment::from(provider).extract()?;
        trace!(target: "config", ?config, "loaded config");
        Ok(config)
    }

    /// Returns the default figment: defaults, the toml file and the environment.
    pub fn figment() -> Figment {
        let file = Env::var_or(Self::CONFIG_ENV, Self::FILE_NAME);
        Self::figment_with_file(file)
    }

    /// Returns the default figment reading the toml settings from `file`.
    pub fn figment_with_file(file: impl AsRef<Path>) -> Figment {
        let file = file.as_ref();
        if file.exists() {
            debug!(target: "config", file = %file.display(), "merging config file");
        }
        Figment::from(Self::default())
            .merge(Toml::file(file))
            .merge(Env::prefixed(Self::ENV_PREFIX).ignore(&["CONFIG"]))
    }

    /// Loads `.env` from the current directory or any parent, if one exists.
    pub fn load_dotenv() {
        match dotenvy::dotenv() {
            Ok(path) => debug!(target: "config", path = %path.display(), "loaded .env"),
            Err(err) if err.not_found() => {}
            Err(err) => warn!(target: "config", %err, "failed to load .env"),
        }
    }

    /// Returns the configured RPC endpoint.
    pub fn rpc_url(&self) -> Result<&str, ConfigError> {
        self.rpc_url.as_deref().ok_or(ConfigError::missing("rpc_url"))
    }

    /// Returns the configured signing key.
    pub fn private_key(&self) -> Result<&str, ConfigError> {
        self.private_key.as_deref().ok_or(ConfigError::missing("private_key"))
    }

    /// Returns the configured contract address.
    pub fn contract_address(&self) -> Result<Address, ConfigError> {
        self.contract_address.ok_or(ConfigError::missing("contract_address"))
    }

    /// Returns the address the proxy binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn wallet_poll_interval(&self) -> Duration {
        Duration::from_millis(self.wallet_poll_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: None,
            private_key: None,
            contract_address: None,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: Self::DEFAULT_PORT,
            confirmations: 1,
            wallet_poll_interval_ms: 1_000,
        }
    }
}

// Keeps the signing key out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("contract_address", &self.contract_address)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("confirmations", &self.confirmations)
            .field("wallet_poll_interval_ms", &self.wallet_poll_interval_ms)
            .finish()
    }
}

impl Provider for Config {
    fn metadata(&self) -> Metadata {
        Metadata::named("CrowdChain Config")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}
