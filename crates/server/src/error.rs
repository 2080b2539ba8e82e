use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use crowdchain_contract::ContractError;
use std::{io, net::SocketAddr};
use tokio::task::JoinError;

use crate::types::ErrorResponse;

/// A failed request, rendered as `{"error": <message>}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request itself is malformed.
    #[error("{0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) | Self::Contract(ContractError::InvalidArgument(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Contract(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidArgument(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidArgument(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Contract(err) if err.is_network() => {
                error!(target: "proxy", %err, "node unreachable")
            }
            _ if status.is_server_error() => error!(target: "proxy", err = %self, "request failed"),
            _ => debug!(target: "proxy", err = %self, "rejected request"),
        }
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// Errors starting or stopping the [`ProxyServer`](crate::ProxyServer).
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: io::Error },
    #[error("server is already running")]
    AlreadyRunning,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("server task failed: {0}")]
    Join(#[from] JoinError),
}
