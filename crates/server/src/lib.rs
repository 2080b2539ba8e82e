//! # crowdchain-server
//!
//! HTTP proxy relaying campaign requests to the crowdfunding contract under a single signing
//! identity.
//!
//! Routes:
//! - `GET /` health check
//! - `POST /create-campaign` with `{goal, duration}`
//! - `GET /campaign/{id}`
//! - `POST /campaign/{id}/pledge` with `{value}`
//! - `POST /campaign/{id}/withdraw`
//! - `POST /campaign/{id}/refund`
//!
//! Failures are returned as `{"error": <message>}`: malformed requests with `400`, everything
//! else with `500`.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

mod backend;
pub use backend::{CampaignBackend, ContractBackend};

pub mod error;
pub use error::{ApiError, ServerError};

mod handlers;
mod router;

mod server;
pub use server::ProxyServer;

mod state;

pub mod types;
