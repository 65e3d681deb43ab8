//! # RocksDB Record Store
//!
//! Durable `RecordStore` for the stockroom.
//!
//! ## Layout
//!
//! - one column family per record table, key = record key as big-endian
//!   `u64` (iteration order is key order)
//! - `sequences` column family: table name → last allocated key
//!
//! ## Transactions
//!
//! `run_in_transaction` holds the write lock, buffers the closure's writes in
//! an `OverlayTransaction` and commits the resulting `ChangeSet` (records and
//! sequence values together) as one `WriteBatch`. A failed closure writes
//! nothing.

use inventory_engine::adapters::{ChangeSet, OverlayTransaction, SequencedView};
use inventory_engine::domain::Table;
use inventory_engine::{RecordStore, StoreError, StoreTransaction, StoreView};
use parking_lot::RwLock;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, IteratorMode, Options, WriteBatch, DB};
use std::path::PathBuf;
use tracing::{debug, info};

pub const CF_SEQUENCES: &str = "sequences";

/// RocksDB configuration.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: PathBuf,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// fsync after each committed transaction (default: true)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/db"),
            block_cache_size: 64 * 1024 * 1024,
            write_buffer_size: 16 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Create config for testing (smaller buffers, no sync)
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 4 * 1024 * 1024,
            write_buffer_size: 1024 * 1024,
            sync_writes: false,
        }
    }
}

fn column_families() -> impl Iterator<Item = &'static str> {
    Table::ALL
        .into_iter()
        .map(Table::name)
        .chain(std::iter::once(CF_SEQUENCES))
}

fn backend(action: &str, e: rocksdb::Error) -> StoreError {
    StoreError::Backend(format!("RocksDB {} failed: {}", action, e))
}

pub struct RocksDbRecordStore {
    db: RwLock<DB>,
    config: RocksDbConfig,
}

impl RocksDbRecordStore {
    /// Open or create the database with every table's column family.
    pub fn open(config: RocksDbConfig) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = column_families()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors)
            .map_err(|e| backend("open", e))?;
        info!("[stockroom] RocksDB store opened at {}", config.path.display());

        Ok(Self {
            db: RwLock::new(db),
            config,
        })
    }

    pub fn config(&self) -> &RocksDbConfig {
        &self.config
    }

    fn write_options(&self) -> rocksdb::WriteOptions {
        let mut write_opts = rocksdb::WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        write_opts
    }
}

fn cf<'a>(db: &'a DB, name: &str) -> Result<&'a ColumnFamily, StoreError> {
    db.cf_handle(name)
        .ok_or_else(|| StoreError::Backend(format!("missing column family {}", name)))
}

/// Committed state as seen through the open database.
struct DbView<'a> {
    db: &'a DB,
}

impl StoreView for DbView<'_> {
    fn get_raw(&self, table: Table, key: u64) -> Result<Option<Vec<u8>>, StoreError> {
        self.db
            .get_cf(cf(self.db, table.name())?, key.to_be_bytes())
            .map_err(|e| backend("get", e))
    }

    fn scan_raw(&self, table: Table) -> Result<Vec<(u64, Vec<u8>)>, StoreError> {
        let mut rows = Vec::new();
        for item in self.db.iterator_cf(cf(self.db, table.name())?, IteratorMode::Start) {
            let (key, value) = item.map_err(|e| backend("scan", e))?;
            let key: [u8; 8] = key.as_ref().try_into().map_err(|_| StoreError::Codec {
                table: table.name(),
                message: format!("key of {} bytes", key.len()),
            })?;
            rows.push((u64::from_be_bytes(key), value.to_vec()));
        }
        Ok(rows)
    }
}

impl SequencedView for DbView<'_> {
    fn last_id(&self, table: Table) -> Result<u64, StoreError> {
        let value = self
            .db
            .get_cf(cf(self.db, CF_SEQUENCES)?, table.name())
            .map_err(|e| backend("get", e))?;
        match value {
            None => Ok(0),
            Some(bytes) => {
                let bytes: [u8; 8] = bytes.as_slice().try_into().map_err(|_| StoreError::Codec {
                    table: CF_SEQUENCES,
                    message: format!("sequence of {} bytes for {}", bytes.len(), table.name()),
                })?;
                Ok(u64::from_be_bytes(bytes))
            }
        }
    }
}

fn to_batch(db: &DB, changes: &ChangeSet) -> Result<WriteBatch, StoreError> {
    let mut batch = WriteBatch::default();
    for ((table, key), bytes) in &changes.puts {
        batch.put_cf(cf(db, table.name())?, key.to_be_bytes(), bytes);
    }
    let sequences = cf(db, CF_SEQUENCES)?;
    for (table, last) in &changes.sequences {
        batch.put_cf(sequences, table.name(), last.to_be_bytes());
    }
    Ok(batch)
}

impl RecordStore for RocksDbRecordStore {
    fn read<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&dyn StoreView) -> Result<R, E>,
        E: From<StoreError>,
    {
        let db = self.db.read();
        f(&DbView { db: &db })
    }

    fn run_in_transaction<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> Result<R, E>,
        E: From<StoreError>,
    {
        let db = self.db.write();
        let view = DbView { db: &db };
        let (value, changes) = OverlayTransaction::execute(&view, f)?;
        if changes.is_empty() {
            return Ok(value);
        }

        let batch = to_batch(&db, &changes)?;
        db.write_opt(batch, &self.write_options())
            .map_err(|e| backend("batch write", e))?;
        debug!("[stockroom] committed {} record(s)", changes.puts.len());
        Ok(value)
    }

    fn reset(&self) -> Result<(), StoreError> {
        let db = self.db.write();
        let mut batch = WriteBatch::default();
        for name in column_families() {
            let handle = cf(&db, name)?;
            for item in db.iterator_cf(handle, IteratorMode::Start) {
                let (key, _) = item.map_err(|e| backend("scan", e))?;
                batch.delete_cf(handle, key);
            }
        }
        db.write_opt(batch, &self.write_options())
            .map_err(|e| backend("reset", e))
    }
}
