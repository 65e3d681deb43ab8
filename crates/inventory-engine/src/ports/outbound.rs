//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the inventory service requires from its host.
//!
//! The store contract is deliberately narrow: tables of bincode records keyed
//! by `u64`, a per-table sequence, and a transaction that commits all buffered
//! writes or none of them.
//!
//! Production: `RocksDbRecordStore` (inventory-runtime, feature `rocksdb`)
//! Testing: `InMemoryRecordStore` (adapters/memory.rs)

use crate::domain::errors::StoreError;
use crate::domain::records::{Record, Sequenced, Table};
use shared_types::Timestamp;

/// Read access to the tables.
pub trait StoreView {
    /// Raw bytes of one record.
    fn get_raw(&self, table: Table, key: u64) -> Result<Option<Vec<u8>>, StoreError>;

    /// All records of a table in ascending key order.
    fn scan_raw(&self, table: Table) -> Result<Vec<(u64, Vec<u8>)>, StoreError>;
}

/// Buffered writes on top of a view. Nothing is visible to other readers
/// until the owning store commits.
pub trait StoreTransaction: StoreView {
    /// Allocate the next key of a table's sequence (starts at 1).
    fn next_id(&mut self, table: Table) -> Result<u64, StoreError>;

    fn put_raw(&mut self, table: Table, key: u64, value: Vec<u8>) -> Result<(), StoreError>;
}

/// Abstract interface for the durable record store.
pub trait RecordStore: Send + Sync {
    /// Run `f` against a consistent read view.
    fn read<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&dyn StoreView) -> Result<R, E>,
        E: From<StoreError>;

    /// Run `f` as one atomic unit of work.
    ///
    /// Writers are serialized. Buffered writes are committed when `f` returns
    /// `Ok` and discarded when it returns `Err`.
    fn run_in_transaction<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> Result<R, E>,
        E: From<StoreError>;

    /// Remove every record and restart every sequence.
    fn reset(&self) -> Result<(), StoreError>;
}

/// Typed access over any view.
pub trait RecordView: StoreView {
    /// Fetch one record by key.
    fn get<T: Record>(&self, key: u64) -> Result<Option<T>, StoreError> {
        self.get_raw(T::TABLE, key)?
            .map(|bytes| T::decode(&bytes))
            .transpose()
    }

    /// Scan a table and keep the records matching `predicate`.
    fn find<T: Record>(
        &self,
        mut predicate: impl FnMut(&T) -> bool,
    ) -> Result<Vec<T>, StoreError> {
        let mut out = Vec::new();
        for (_, bytes) in self.scan_raw(T::TABLE)? {
            let record = T::decode(&bytes)?;
            if predicate(&record) {
                out.push(record);
            }
        }
        Ok(out)
    }

    fn all<T: Record>(&self) -> Result<Vec<T>, StoreError> {
        self.find(|_: &T| true)
    }
}

impl<V: StoreView + ?Sized> RecordView for V {}

/// Typed writes over any transaction.
pub trait RecordWriter: StoreTransaction {
    /// Allocate a key, stamp it onto the record and store it.
    fn insert<T: Sequenced>(&mut self, record: &mut T) -> Result<u64, StoreError> {
        let key = self.next_id(T::TABLE)?;
        record.assign_key(key);
        self.put_raw(T::TABLE, key, record.encode()?)?;
        Ok(key)
    }

    /// Overwrite (or create) the record under its own key.
    fn update<T: Record>(&mut self, record: &T) -> Result<(), StoreError> {
        self.put_raw(T::TABLE, record.key(), record.encode()?)
    }
}

impl<X: StoreTransaction + ?Sized> RecordWriter for X {}

/// Abstract interface for time.
pub trait TimeSource: Send + Sync {
    /// Get current timestamp in seconds since epoch.
    fn now(&self) -> Timestamp;
}
