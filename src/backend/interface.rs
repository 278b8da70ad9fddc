use thiserror::Error;

use crate::core::{LedgerError, LedgerRecord, UserName};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// The table store answered with a non-success status.
    #[error("remote store returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String
    },
    #[error("unexpected response from remote store: {0}")]
    UnexpectedResponse(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError)
}

pub type Result<T> = std::result::Result<T, BackendError>;

/// Somewhere a user's ledger record can be kept.
///
/// `load` returns `Ok(None)` when nothing was saved for the user yet;
/// a missing record is never an error. `save` replaces whatever was
/// there before.
pub trait LedgerStore: Send + Sync {
    fn describe(&self) -> String;
    fn load(&self, user: &UserName) -> Result<Option<LedgerRecord>>;
    fn save(&self, user: &UserName, record: &LedgerRecord) -> Result<()>;
}
