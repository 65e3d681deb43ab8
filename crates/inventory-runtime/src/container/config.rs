//! # Runtime Configuration
//!
//! Where the stockroom keeps its records and who is operating it.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `STOCKROOM_DATA_DIR` | `./data` | Data directory (RocksDB files, process lock) |
//! | `STOCKROOM_STORE` | `memory` | `memory` or `rocksdb` |
//! | `STOCKROOM_OPERATOR` | `admin` | Actor recorded on audit rows |
//! | `STOCKROOM_SYNC_WRITES` | `true` | fsync every committed transaction |

use shared_types::Actor;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Record store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    /// Ephemeral; everything is lost when the process exits.
    #[default]
    Memory,
    /// Durable RocksDB store under the data directory.
    RocksDb,
}

impl StoreKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreKind::Memory => "memory",
            StoreKind::RocksDb => "rocksdb",
        }
    }
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "rocksdb" => Ok(StoreKind::RocksDb),
            other => Err(ConfigError::UnknownStore(other.to_string())),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown store backend '{0}' (expected memory or rocksdb)")]
    UnknownStore(String),

    #[error("Store backend '{0}' is not compiled in (rebuild with --features {0})")]
    BackendUnavailable(StoreKind),

    #[error("Data directory must not be empty")]
    EmptyDataDir,

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub data_dir: PathBuf,
    pub store: StoreKind,
    /// Default actor for operator commands.
    pub operator: Actor,
    /// fsync after every committed transaction (RocksDB only).
    pub sync_writes: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            store: StoreKind::Memory,
            operator: Actor::default(),
            sync_writes: true,
        }
    }
}

impl RuntimeConfig {
    /// Build configuration from `STOCKROOM_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("STOCKROOM_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(store) = lookup("STOCKROOM_STORE") {
            config.store = store.parse()?;
        }
        if let Some(operator) = lookup("STOCKROOM_OPERATOR") {
            config.operator = Actor::operator_or_default(Some(&operator));
        }
        if let Some(sync) = lookup("STOCKROOM_SYNC_WRITES") {
            config.sync_writes = parse_bool("STOCKROOM_SYNC_WRITES", &sync)?;
        }

        Ok(config)
    }

    /// Check the configuration can be served by this build.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }
        if self.store == StoreKind::RocksDb && !cfg!(feature = "rocksdb") {
            return Err(ConfigError::BackendUnavailable(StoreKind::RocksDb));
        }
        Ok(())
    }

    /// Directory holding the RocksDB files.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("db")
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}
