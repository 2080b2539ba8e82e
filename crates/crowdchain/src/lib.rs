//! # crowdchain
//!
//! Shared plumbing of the `crowdchain` binary.

#[macro_use]
extern crate tracing;

pub mod handler;
pub mod opts;
pub mod utils;
