pub mod error;
pub mod user;
pub mod record;
pub mod expense;
pub mod ledger;

pub use error::{LedgerError, LedgerResult};
pub use user::UserName;
pub use record::LedgerRecord;
pub use expense::{Expense, ExpenseKind, Amount};
pub use ledger::{Ledger, Summary, KindTotal};
