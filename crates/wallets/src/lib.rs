//! # crowdchain-wallets
//!
//! Wallet access for CrowdChain: local private key signers, injected wallets and the session
//! that binds a connected account to the crowdfunding contract.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod error;
pub use error::{PrivateKeyError, WalletError};

mod injected;
pub use injected::{InjectedWallet, WalletEvent, WalletKind};

mod node;
pub use node::NodeWallet;

pub mod session;
pub use session::{ConnectionStatus, Session, SessionEvent, SessionManager};

pub mod utils;
