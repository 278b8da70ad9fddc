mod interface;
mod json_store;
mod remote_store;
mod memory_store;
mod fallback;
mod adapter;
#[cfg(test)]
pub(crate) mod testing;

pub use interface::{LedgerStore, Result, BackendError};
pub use json_store::JsonStore;
pub use remote_store::RemoteStore;
pub use memory_store::MemoryStore;
pub use fallback::FallbackStore;
pub use adapter::PersistenceAdapter;

use crate::config::StorageConfig;

/// Pick the backend once from configuration: the remote table with a
/// local safety net when both secrets are set, local files otherwise.
pub fn open_store(config: &StorageConfig) -> Result<Box<dyn LedgerStore>> {
    let local = JsonStore::new(&config.data_dir);
    match config.remote() {
        Some(remote) => {
            let remote = RemoteStore::new(&remote)?;
            Ok(Box::new(FallbackStore::new(remote, local)))
        },
        None => Ok(Box::new(local))
    }
}
