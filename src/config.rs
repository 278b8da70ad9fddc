use std::{fmt, fs, path::{Path, PathBuf}, time::Duration};
use serde::{Serialize, Deserialize};
use toml;
use anyhow::{self, Context};

pub const URL_VAR: &str = "LEDGER_STORE_URL";
pub const KEY_VAR: &str = "LEDGER_STORE_KEY";
pub const DATA_DIR_VAR: &str = "LEDGER_DATA_DIR";
/// Log filter both binaries start with when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Where ledgers are persisted.
///
/// The remote table is used only when both `remote_url` and `remote_key`
/// are set; otherwise records live in `data_dir` on local disk.
#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default)]
    pub remote_key: Option<String>,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64
}

/// Connection settings for the hosted table, only built when complete.
#[derive(Clone)]
pub struct RemoteConfig {
    pub url: String,
    pub key: String,
    pub table: String,
    pub timeout: Duration
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("user_data")
}

fn default_table() -> String {
    "ledgers".to_owned()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            data_dir: default_data_dir(),
            remote_url: None,
            remote_key: None,
            table: default_table(),
            timeout_secs: default_timeout_secs()
        }
    }
}

impl StorageConfig {
    pub fn read(filepath: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file_content = fs::read_to_string(filepath)
            .with_context(|| "failed to read config file")?;
        let config = toml::from_str(&file_content)
            .with_context(|| "failed to parse config file")?;
        return Ok(config);
    }

    /// Apply the secrets and data directory from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(URL_VAR) {
            self.remote_url = Some(url);
        }
        if let Some(key) = lookup(KEY_VAR) {
            self.remote_key = Some(key);
        }
        if let Some(dir) = lookup(DATA_DIR_VAR).filter(|dir| !dir.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        self
    }

    pub fn remote(&self) -> Option<RemoteConfig> {
        let present = |value: &Option<String>| value.as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);

        Some(RemoteConfig {
            url: present(&self.remote_url)?,
            key: present(&self.remote_key)?,
            table: self.table.clone(),
            timeout: Duration::from_secs(self.timeout_secs)
        })
    }
}

fn redact(value: &Option<String>) -> &'static str {
    match value {
        Some(_) => "<set>",
        None => "<unset>"
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("data_dir", &self.data_dir)
            .field("remote_url", &self.remote_url)
            .field("remote_key", &redact(&self.remote_key))
            .field("table", &self.table)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("url", &self.url)
            .field("key", &"<set>")
            .field("table", &self.table)
            .field("timeout", &self.timeout)
            .finish()
    }
}
