//! # crowdchain-contract
//!
//! Client for the crowdfunding contract. All accounting, escrow and deadline rules live in the
//! contract itself; this crate only encodes calls, waits for receipts and normalizes results
//! and failures.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod abi;
pub use abi::Crowdfunding;

mod client;
pub use client::{CampaignClient, PendingCampaignTx};

mod error;
pub use error::ContractError;

mod types;
pub use types::{CampaignView, Confirmation, TxAction, decimal};
