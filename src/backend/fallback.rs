use log::warn;

use crate::backend::interface::{LedgerStore, Result};
use crate::core::{LedgerRecord, UserName};

/// Tries `primary` first and degrades to `fallback` whenever it fails.
///
/// Primary errors are logged and swallowed; fallback errors propagate.
/// A primary without a record for the user also defers to the fallback,
/// so records written there during an outage are still found.
pub struct FallbackStore<P, F> {
    primary: P,
    fallback: F
}

impl<P: LedgerStore, F: LedgerStore> FallbackStore<P, F> {
    pub fn new(primary: P, fallback: F) -> FallbackStore<P, F> {
        FallbackStore { primary, fallback }
    }
}

impl<P: LedgerStore, F: LedgerStore> LedgerStore for FallbackStore<P, F> {
    fn describe(&self) -> String {
        format!("{}, falling back to {}", self.primary.describe(), self.fallback.describe())
    }

    fn load(&self, user: &UserName) -> Result<Option<LedgerRecord>> {
        match self.primary.load(user) {
            Ok(Some(record)) => return Ok(Some(record)),
            Ok(None) => (),
            Err(err) => warn!("loading {} from {} failed, using {}: {}",
                user, self.primary.describe(), self.fallback.describe(), err)
        }
        self.fallback.load(user)
    }

    fn save(&self, user: &UserName, record: &LedgerRecord) -> Result<()> {
        match self.primary.save(user, record) {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!("saving {} to {} failed, using {}: {}",
                    user, self.primary.describe(), self.fallback.describe(), err);
                self.fallback.save(user, record)
            }
        }
    }
}
