use std::sync::Arc;

use log::info;

use crate::backend::interface::{LedgerStore, Result};
use crate::backend::open_store;
use crate::config::StorageConfig;
use crate::core::{Ledger, LedgerRecord, UserName};

/// Front door for persisting ledgers. The backend is fixed when the
/// adapter is built; a user without a saved record gets `{}`.
#[derive(Clone)]
pub struct PersistenceAdapter {
    store: Arc<dyn LedgerStore>
}

impl PersistenceAdapter {
    pub fn new(store: Arc<dyn LedgerStore>) -> PersistenceAdapter {
        PersistenceAdapter { store }
    }

    pub fn from_config(config: &StorageConfig) -> Result<PersistenceAdapter> {
        let store = open_store(config)?;
        info!("ledgers are stored in {}", store.describe());
        Ok(PersistenceAdapter { store: Arc::from(store) })
    }

    pub fn describe(&self) -> String {
        self.store.describe()
    }

    pub fn load(&self, user: &UserName) -> Result<LedgerRecord> {
        Ok(self.store.load(user)?.unwrap_or_default())
    }

    pub fn save(&self, user: &UserName, record: &LedgerRecord) -> Result<()> {
        self.store.save(user, record)
    }

    pub fn load_ledger(&self, user: &UserName) -> Result<Ledger> {
        let record = self.load(user)?;
        Ok(Ledger::from_record(&record)?)
    }

    pub fn save_ledger(&self, user: &UserName, ledger: &Ledger) -> Result<()> {
        self.save(user, &ledger.to_record()?)
    }
}


#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use crate::backend::testing::{unreachable_url, FakeTableStore, FAKE_KEY};
    use crate::backend::{MemoryStore, PersistenceAdapter};
    use crate::config::StorageConfig;
    use crate::core::{Expense, ExpenseKind, LedgerRecord, UserName};
    use crate::core::expense::parse_date;

    use rstest::rstest;
    use serde_json::json;
    use tempfile::TempDir;

    fn user(name: &str) -> UserName {
        UserName::parse(name).unwrap()
    }

    fn local_config(tmp: &TempDir) -> StorageConfig {
        StorageConfig {
            data_dir: tmp.path().join("user_data"),
            ..StorageConfig::default()
        }
    }

    fn remote_config(tmp: &TempDir, url: &str) -> StorageConfig {
        StorageConfig {
            remote_url: Some(url.to_owned()),
            remote_key: Some(FAKE_KEY.to_owned()),
            timeout_secs: 5,
            ..local_config(tmp)
        }
    }

    #[test]
    fn local_round_trip_without_remote() {
        let tmp = tempfile::tempdir().unwrap();
        let adapter = PersistenceAdapter::from_config(&local_config(&tmp)).unwrap();
        let alice = user("alice");

        adapter.save(&alice, &LedgerRecord::new(json!({"rooms": 3}))).unwrap();

        let file = tmp.path().join("user_data").join("alice.json");
        let on_disk: serde_json::Value = serde_json::from_str(&fs::read_to_string(file).unwrap()).unwrap();
        assert_eq!(on_disk, json!({"rooms": 3}));
        assert_eq!(adapter.load(&alice).unwrap(), LedgerRecord::new(json!({"rooms": 3})));
        assert!(adapter.describe().starts_with("local files"));
    }

    #[test]
    fn remote_round_trip_leaves_local_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let fake = FakeTableStore::start();
        let adapter = PersistenceAdapter::from_config(&remote_config(&tmp, &fake.url)).unwrap();
        let bob = user("bob");

        adapter.save(&bob, &LedgerRecord::new(json!({"rooms": 2}))).unwrap();

        assert_eq!(fake.row("bob"), Some(json!({"rooms": 2})));
        assert_eq!(adapter.load(&bob).unwrap(), LedgerRecord::new(json!({"rooms": 2})));
        assert!(!tmp.path().join("user_data").exists());
    }

    #[test]
    fn unreachable_remote_falls_back_to_local() {
        let tmp = tempfile::tempdir().unwrap();
        let adapter = PersistenceAdapter::from_config(&remote_config(&tmp, &unreachable_url())).unwrap();
        let carol = user("carol");

        adapter.save(&carol, &LedgerRecord::new(json!({"rooms": 5}))).unwrap();

        assert!(tmp.path().join("user_data").join("carol.json").exists());
        assert_eq!(adapter.load(&carol).unwrap(), LedgerRecord::new(json!({"rooms": 5})));
    }

    #[test]
    fn rejected_key_falls_back_to_local() {
        let tmp = tempfile::tempdir().unwrap();
        let fake = FakeTableStore::start();
        let config = StorageConfig {
            remote_key: Some("revoked".to_owned()),
            ..remote_config(&tmp, &fake.url)
        };
        let adapter = PersistenceAdapter::from_config(&config).unwrap();
        let dave = user("dave");

        adapter.save(&dave, &LedgerRecord::new(json!({"rooms": 1}))).unwrap();

        assert_eq!(fake.row_count(), 0);
        assert_eq!(adapter.load(&dave).unwrap(), LedgerRecord::new(json!({"rooms": 1})));
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn unknown_user_gets_empty_record(#[case] remote: bool) {
        let tmp = tempfile::tempdir().unwrap();
        let fake = FakeTableStore::start();
        let config = if remote { remote_config(&tmp, &fake.url) } else { local_config(&tmp) };
        let adapter = PersistenceAdapter::from_config(&config).unwrap();

        let record = adapter.load(&user("stranger")).unwrap();
        assert_eq!(record, LedgerRecord::empty());
    }

    #[test]
    fn local_errors_propagate() {
        let tmp = tempfile::tempdir().unwrap();
        let config = local_config(&tmp);
        fs::create_dir_all(&config.data_dir).unwrap();
        fs::write(config.data_dir.join("eve.json"), "[truncated").unwrap();

        let adapter = PersistenceAdapter::from_config(&config).unwrap();
        assert!(adapter.load(&user("eve")).is_err());
    }

    #[test]
    fn typed_ledger_round_trip() {
        let adapter = PersistenceAdapter::new(Arc::new(MemoryStore::new()));
        let frodo = user("frodo");

        let mut ledger = adapter.load_ledger(&frodo).unwrap();
        assert!(ledger.is_empty());

        let date = parse_date("2024-06-01").unwrap();
        ledger.add_expense(Expense::new(date, ExpenseKind::DeedTax, 9000.0, None).unwrap()).unwrap();
        adapter.save_ledger(&frodo, &ledger).unwrap();

        let reloaded = adapter.load_ledger(&frodo).unwrap();
        assert_eq!(reloaded, ledger);
        assert_eq!(reloaded.total(), 9000.0);
    }

    #[test]
    fn foreign_record_is_not_a_ledger() {
        let adapter = PersistenceAdapter::new(Arc::new(MemoryStore::new()));
        let sam = user("sam");
        adapter.save(&sam, &LedgerRecord::new(json!("just a string"))).unwrap();

        assert!(adapter.load_ledger(&sam).is_err());
    }
}
