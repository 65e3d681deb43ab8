//! # Overlay Transaction
//!
//! Buffers puts and sequence bumps over a read-only base. Reads inside the
//! transaction see its own writes. The backend turns the resulting
//! `ChangeSet` into one atomic commit, or drops it.
//!
//! ```text
//!   get(t, k) ──► puts[(t, k)] ──miss──► base.get_raw(t, k)
//!   scan(t)   ──► base.scan_raw(t) ⊕ puts[(t, *)]
//!   next_id(t)──► sequences[t] or base.last_id(t), then +1
//! ```

use crate::domain::errors::StoreError;
use crate::domain::records::Table;
use crate::ports::outbound::{StoreTransaction, StoreView};
use std::collections::BTreeMap;

/// A view that also knows the last key handed out per table.
pub trait SequencedView: StoreView {
    fn last_id(&self, table: Table) -> Result<u64, StoreError>;
}

/// Everything a committed transaction must persist.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    pub puts: BTreeMap<(Table, u64), Vec<u8>>,
    /// Final sequence value per touched table.
    pub sequences: BTreeMap<Table, u64>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.puts.is_empty() && self.sequences.is_empty()
    }
}

pub struct OverlayTransaction<'a, B: ?Sized> {
    base: &'a B,
    changes: ChangeSet,
}

impl<'a, B: SequencedView + ?Sized> OverlayTransaction<'a, B> {
    pub fn new(base: &'a B) -> Self {
        Self {
            base,
            changes: ChangeSet::default(),
        }
    }

    /// Run `f` over a fresh overlay. Returns the buffered changes only when
    /// `f` succeeds.
    pub fn execute<R, E, F>(base: &'a B, f: F) -> Result<(R, ChangeSet), E>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> Result<R, E>,
    {
        let mut tx = Self::new(base);
        let value = f(&mut tx)?;
        Ok((value, tx.into_changes()))
    }

    pub fn into_changes(self) -> ChangeSet {
        self.changes
    }
}

impl<B: SequencedView + ?Sized> StoreView for OverlayTransaction<'_, B> {
    fn get_raw(&self, table: Table, key: u64) -> Result<Option<Vec<u8>>, StoreError> {
        match self.changes.puts.get(&(table, key)) {
            Some(bytes) => Ok(Some(bytes.clone())),
            None => self.base.get_raw(table, key),
        }
    }

    fn scan_raw(&self, table: Table) -> Result<Vec<(u64, Vec<u8>)>, StoreError> {
        let mut merged: BTreeMap<u64, Vec<u8>> = self.base.scan_raw(table)?.into_iter().collect();
        for ((_, key), bytes) in self.changes.puts.range((table, 0)..=(table, u64::MAX)) {
            merged.insert(*key, bytes.clone());
        }
        Ok(merged.into_iter().collect())
    }
}

impl<B: SequencedView + ?Sized> StoreTransaction for OverlayTransaction<'_, B> {
    fn next_id(&mut self, table: Table) -> Result<u64, StoreError> {
        let last = match self.changes.sequences.get(&table) {
            Some(value) => *value,
            None => self.base.last_id(table)?,
        };
        let next = last
            .checked_add(1)
            .ok_or_else(|| StoreError::Backend(format!("sequence exhausted for {}", table.name())))?;
        self.changes.sequences.insert(table, next);
        Ok(next)
    }

    fn put_raw(&mut self, table: Table, key: u64, value: Vec<u8>) -> Result<(), StoreError> {
        self.changes.puts.insert((table, key), value);
        Ok(())
    }
}
