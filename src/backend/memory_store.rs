use std::collections::HashMap;
use std::sync::Mutex;

use crate::backend::interface::{LedgerStore, Result};
use crate::core::{LedgerRecord, UserName};

/// Keeps records in process memory. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<UserName, LedgerRecord>>
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LedgerStore for MemoryStore {
    fn describe(&self) -> String {
        "in-memory store".to_owned()
    }

    fn load(&self, user: &UserName) -> Result<Option<LedgerRecord>> {
        let records = self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(records.get(user).cloned())
    }

    fn save(&self, user: &UserName, record: &LedgerRecord) -> Result<()> {
        let mut records = self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        records.insert(user.clone(), record.clone());
        Ok(())
    }
}
