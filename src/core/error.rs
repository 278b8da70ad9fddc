use thiserror::Error;

use crate::core::expense::Amount;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Occurs when a user name is empty, too long, or could
    /// escape the storage directory when used as a file name.
    #[error("invalid user name {name:?}: {reason}")]
    InvalidUserName {
        name: String,
        reason: &'static str
    },
    /// Occurs when an expense amount is zero, negative or not a number.
    #[error("amount must be greater than 0, got {0}")]
    NonPositiveAmount(Amount),
    /// Occurs when a stored record has an `expenses` entry
    /// which cannot be read as a list of expenses.
    #[error("malformed ledger record: {0}")]
    MalformedRecord(#[source] serde_json::Error),
    /// Occurs when a date string is not in `YYYY-MM-DD` form.
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String)
}

pub type LedgerResult<T> = Result<T, LedgerError>;
