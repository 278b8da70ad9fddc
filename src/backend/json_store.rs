use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::backend::interface::{LedgerStore, Result};
use crate::core::{LedgerRecord, UserName};

/// Keeps each user's record in `{dir}/{user}.json`.
///
/// Files are lost whenever the host's disk is wiped, which on most
/// container platforms means every redeploy.
pub struct JsonStore {
    dir: PathBuf
}

impl JsonStore {
    pub fn new(dir: impl AsRef<Path>) -> JsonStore {
        JsonStore { dir: dir.as_ref().to_path_buf() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, user: &UserName) -> PathBuf {
        self.dir.join(format!("{}.json", user.as_str()))
    }
}

impl LedgerStore for JsonStore {
    fn describe(&self) -> String {
        format!("local files in {}", self.dir.display())
    }

    fn load(&self, user: &UserName) -> Result<Option<LedgerRecord>> {
        let path = self.path_for(user);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no ledger file at {}", path.display());
                return Ok(None);
            },
            Err(err) => return Err(err.into())
        };

        let record = serde_json::from_str(&content)?;
        debug!("loaded {} from {}", user, path.display());
        Ok(Some(record))
    }

    fn save(&self, user: &UserName, record: &LedgerRecord) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(user);
        let content = serde_json::to_string_pretty(record)?;

        // each writer gets its own temp file; the rename swaps in a complete ledger
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|err| err.error)?;

        info!("saved ledger of {} to {}", user, path.display());
        Ok(())
    }
}
