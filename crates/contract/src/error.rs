use alloy_primitives::U256;
use alloy_provider::PendingTransactionError;
use alloy_transport::{RpcError, TransportErrorKind};

/// Errors surfaced by the [`CampaignClient`](crate::CampaignClient).
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// A call was rejected before reaching the node.
    #[error("{0}")]
    InvalidArgument(&'static str),
    /// The contract holds no campaign under this id.
    #[error("campaign {0} does not exist")]
    NotFound(U256),
    /// The node or the contract rejected the call; the reason is passed through untouched.
    #[error("{0}")]
    ContractRevert(String),
    /// A pledge was rejected by the contract, e.g. because the campaign expired.
    #[error("pledge rejected: {0}")]
    InsufficientValue(String),
    /// The node could not be reached or answered with garbage.
    #[error(transparent)]
    NetworkFailure(RpcError<TransportErrorKind>),
    /// Polling for the receipt of a submitted transaction failed.
    #[error(transparent)]
    Confirmation(#[from] PendingTransactionError),
    /// Any other contract binding failure, e.g. undecodable return data.
    #[error(transparent)]
    Call(alloy_contract::Error),
}

impl ContractError {
    /// Returns `true` if the contract or node rejected the request.
    pub const fn is_revert(&self) -> bool {
        matches!(self, Self::ContractRevert(_) | Self::InsufficientValue(_))
    }

    /// Returns `true` if the failure was caused by the transport.
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::NetworkFailure(_) | Self::Confirmation(_))
    }

    /// Reclassifies a revert as a rejected pledge.
    pub(crate) fn into_pledge_error(self) -> Self {
        match self {
            Self::ContractRevert(reason) => Self::InsufficientValue(reason),
            err => err,
        }
    }
}

impl From<alloy_contract::Error> for ContractError {
    fn from(err: alloy_contract::Error) -> Self {
        match err {
            // every error response is a rejection, the message already carries the reason
            alloy_contract::Error::TransportError(RpcError::ErrorResp(payload)) => {
                Self::ContractRevert(payload.message.into_owned())
            }
            alloy_contract::Error::TransportError(err) => Self::NetworkFailure(err),
            err => match err.as_revert_data() {
                Some(data) => Self::ContractRevert(
                    alloy_sol_types::decode_revert_reason(&data)
                        .unwrap_or_else(|| format!("execution reverted: {data}")),
                ),
                None => Self::Call(err),
            },
        }
    }
}
