use axum::{
    http::StatusCode,
    response::{IntoResponse, Response}
};
use anyhow;
use log::error;

use realty_ledger::{backend::BackendError, error::LedgerError};

#[derive(Debug)]
pub(crate) enum ServerError {
    BadRequest(String),
    InternalError(anyhow::Error)
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(msg) =>
                (StatusCode::BAD_REQUEST, format!("Bad request: {}", msg)).into_response(),
            Self::InternalError(err) => {
                error!("request failed: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Internal error: {}", err)).into_response()
            }
        }
    }
}

impl From<LedgerError> for ServerError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::MalformedRecord(_) => Self::InternalError(err.into()),
            other => Self::BadRequest(other.to_string())
        }
    }
}

impl From<BackendError> for ServerError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Ledger(inner) => inner.into(),
            other => Self::InternalError(other.into())
        }
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::InternalError(err.into())
    }
}
