use alloy_primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A campaign as reported by `getCampaign`.
///
/// Serializes the integer fields as decimal strings so JSON consumers never lose precision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignView {
    pub creator: Address,
    #[serde(with = "decimal")]
    pub goal: U256,
    /// Unix timestamp after which pledges are closed.
    #[serde(with = "decimal")]
    pub deadline: U256,
    #[serde(with = "decimal")]
    pub pledged: U256,
    pub claimed: bool,
}

impl CampaignView {
    /// The contract returns a zeroed record for ids it never assigned.
    pub fn is_empty(&self) -> bool {
        self.creator.is_zero()
    }

    pub fn is_funded(&self) -> bool {
        self.pledged >= self.goal
    }
}

/// The kind of write submitted to the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxAction {
    CreateCampaign,
    Pledge,
    Withdraw,
    Refund,
}

impl TxAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateCampaign => "createCampaign",
            Self::Pledge => "pledge",
            Self::Withdraw => "withdraw",
            Self::Refund => "refund",
        }
    }
}

impl fmt::Display for TxAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a mined transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub action: TxAction,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    /// Id assigned by the contract, decoded from `CampaignCreated`. Only set for
    /// [`TxAction::CreateCampaign`].
    pub campaign_id: Option<U256>,
}

/// (De)serializes a [`U256`] as a base 10 string. Deserialization also accepts `0x` hex.
pub mod decimal {
    use alloy_primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let s = String::deserialize(deserializer)?;
        U256::from_str(&s).map_err(D::Error::custom)
    }
}
