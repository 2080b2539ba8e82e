use alloy_primitives::{TxHash, U256};
use crowdchain_contract::{Confirmation, decimal};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::error::ApiError;

pub(crate) const MISSING_GOAL_OR_DURATION: &str = "Missing goal or duration";
pub(crate) const MISSING_PLEDGE_VALUE: &str = "Missing pledge value";

/// Body of `POST /create-campaign`.
///
/// Both fields are kept raw so a missing, null or zero value can be told apart from a
/// malformed one.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CreateCampaignRequest {
    pub goal: Option<Value>,
    pub duration: Option<Value>,
}

/// Body of `POST /campaign/{id}/pledge`, the value in wei.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PledgeRequest {
    pub value: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignResponse {
    pub message: String,
    pub tx_hash: TxHash,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "opt_decimal")]
    pub campaign_id: Option<U256>,
}

impl From<Confirmation> for CreateCampaignResponse {
    fn from(confirmation: Confirmation) -> Self {
        Self {
            message: "Campaign created successfully!".to_string(),
            tx_hash: confirmation.tx_hash,
            campaign_id: confirmation.campaign_id,
        }
    }
}

/// Response of the pledge, withdraw and refund routes.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub message: String,
    pub tx_hash: TxHash,
}

impl TransactionResponse {
    pub(crate) fn new(message: &str, confirmation: Confirmation) -> Self {
        Self { message: message.to_string(), tx_hash: confirmation.tx_hash }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Reads an unsigned integer given as a JSON number or as a decimal or `0x` hex string.
///
/// Absent, null, empty and zero values all yield `None`.
pub(crate) fn parse_uint(name: &str, value: Option<&Value>) -> Result<Option<U256>, ApiError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::Number(n)) => n.as_u64().map(U256::from),
        Some(Value::String(s)) => U256::from_str(s.trim()).ok(),
        Some(_) => None,
    };
    match parsed {
        Some(value) => Ok((!value.is_zero()).then_some(value)),
        None => Err(ApiError::invalid(format!("invalid {name}: expected an unsigned integer"))),
    }
}

/// Parses the `{id}` path segment.
pub(crate) fn parse_campaign_id(id: &str) -> Result<U256, ApiError> {
    U256::from_str(id.trim()).map_err(|_| ApiError::invalid(format!("invalid campaign id: {id}")))
}

mod opt_decimal {
    use super::decimal;
    use alloy_primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        value: &Option<U256>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => decimal::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<U256>, D::Error> {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "decimal")] U256);
        Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(value)| value))
    }
}
