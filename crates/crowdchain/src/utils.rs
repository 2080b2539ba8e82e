use alloy_primitives::{
    U256,
    utils::{ParseUnits, Unit, format_ether},
};
use chrono::DateTime;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Initializes the global tracing subscriber, filtered by `RUST_LOG`.
pub fn subscriber() {
    let registry = tracing_subscriber::registry().with(env_filter());
    let _ = registry.with(tracing_subscriber::fmt::layer()).try_init();
}

fn env_filter() -> EnvFilter {
    const DEFAULT_DIRECTIVES: &[&str] = &["hyper=off", "reqwest=off"];
    let mut filter = EnvFilter::from_default_env();
    for directive in DEFAULT_DIRECTIVES {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

/// Parses an amount given in ether into wei.
pub fn parse_ether_amount(s: &str) -> Result<U256, String> {
    let value = match ParseUnits::parse_units(s.trim(), Unit::ETHER).map_err(|e| e.to_string())? {
        ParseUnits::U256(value) => value,
        ParseUnits::I256(_) => return Err(format!("amount must not be negative: {s}")),
    };
    if value.is_zero() {
        return Err("amount must be greater than zero".to_string());
    }
    Ok(value)
}

/// Formats a wei amount as ether, e.g. `1.5 ETH`.
pub fn format_eth(wei: U256) -> String {
    let formatted = format_ether(wei);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} ETH", if trimmed.is_empty() { "0" } else { trimmed })
}

/// Formats a unix timestamp in UTC.
pub fn format_timestamp(timestamp: U256) -> String {
    u64::try_from(timestamp)
        .ok()
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|date| date.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
