use super::overlay::{ChangeSet, OverlayTransaction, SequencedView};
use crate::domain::errors::StoreError;
use crate::domain::records::Table;
use crate::ports::outbound::{RecordStore, StoreTransaction, StoreView};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
struct MemoryTables {
    rows: HashMap<Table, BTreeMap<u64, Vec<u8>>>,
    sequences: HashMap<Table, u64>,
}

impl MemoryTables {
    fn apply(&mut self, changes: ChangeSet) {
        for ((table, key), bytes) in changes.puts {
            self.rows.entry(table).or_default().insert(key, bytes);
        }
        self.sequences.extend(changes.sequences);
    }
}

impl StoreView for MemoryTables {
    fn get_raw(&self, table: Table, key: u64) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.rows.get(&table).and_then(|rows| rows.get(&key)).cloned())
    }

    fn scan_raw(&self, table: Table) -> Result<Vec<(u64, Vec<u8>)>, StoreError> {
        Ok(self
            .rows
            .get(&table)
            .map(|rows| rows.iter().map(|(k, v)| (*k, v.clone())).collect())
            .unwrap_or_default())
    }
}

impl SequencedView for MemoryTables {
    fn last_id(&self, table: Table) -> Result<u64, StoreError> {
        Ok(self.sequences.get(&table).copied().unwrap_or(0))
    }
}

/// In-memory record store for unit tests and ephemeral runs.
///
/// A transaction holds the write lock for its whole closure, so writers are
/// serialized and readers never observe a half-applied change set.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<MemoryTables>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in a table.
    pub fn len(&self, table: Table) -> usize {
        self.tables
            .read()
            .rows
            .get(&table)
            .map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().rows.values().all(BTreeMap::is_empty)
    }
}

impl RecordStore for InMemoryRecordStore {
    fn read<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&dyn StoreView) -> Result<R, E>,
        E: From<StoreError>,
    {
        let tables = self.tables.read();
        f(&*tables)
    }

    fn run_in_transaction<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> Result<R, E>,
        E: From<StoreError>,
    {
        let mut tables = self.tables.write();
        let (value, changes) = OverlayTransaction::execute(&*tables, f)?;
        tables.apply(changes);
        Ok(value)
    }

    fn reset(&self) -> Result<(), StoreError> {
        *self.tables.write() = MemoryTables::default();
        Ok(())
    }
}
