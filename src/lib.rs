mod core;
pub mod backend;
pub mod config;

pub use crate::core::{Ledger, LedgerRecord, UserName, Expense, ExpenseKind, Amount};
pub use crate::core::{LedgerError, LedgerResult, Summary, KindTotal};
pub use crate::core::{error, expense, ledger, record, user};
pub use crate::backend::PersistenceAdapter;
pub use crate::config::StorageConfig;
