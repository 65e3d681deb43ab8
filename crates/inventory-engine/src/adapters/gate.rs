//! # Store Gate
//!
//! Wraps a `RecordStore` so lifecycle calls cannot interleave with work.
//!
//! ```text
//!   read / run_in_transaction ──► shared guard   (many at once)
//!   reset / reopen             ──► exclusive guard (waits for in-flight
//!                                                   operations to drain)
//! ```
//!
//! A failed `reopen` leaves the gate closed; every later call reports
//! `StoreError::Closed` until a successful `reopen`.

use crate::domain::errors::StoreError;
use crate::ports::outbound::{RecordStore, StoreTransaction, StoreView};
use parking_lot::RwLock;
use tracing::{info, warn};

pub struct StoreGate<S> {
    store: RwLock<Option<S>>,
}

impl<S: RecordStore> StoreGate<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: RwLock::new(Some(store)),
        }
    }

    /// Replace the wrapped store once in-flight operations have finished.
    ///
    /// `open` receives the current store by value so a backend holding a file
    /// lock can release it before the replacement is opened.
    pub fn reopen<F>(&self, open: F) -> Result<(), StoreError>
    where
        F: FnOnce(S) -> Result<S, StoreError>,
    {
        let mut slot = self.store.write();
        let current = slot.take().ok_or(StoreError::Closed)?;
        match open(current) {
            Ok(store) => {
                *slot = Some(store);
                info!("[stockroom] store reopened");
                Ok(())
            }
            Err(e) => {
                warn!("[stockroom] reopen failed, store closed: {}", e);
                Err(e)
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.store.read().is_some()
    }
}

impl<S: RecordStore> RecordStore for StoreGate<S> {
    fn read<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&dyn StoreView) -> Result<R, E>,
        E: From<StoreError>,
    {
        let slot = self.store.read();
        match slot.as_ref() {
            Some(store) => store.read(f),
            None => Err(StoreError::Closed.into()),
        }
    }

    fn run_in_transaction<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut dyn StoreTransaction) -> Result<R, E>,
        E: From<StoreError>,
    {
        let slot = self.store.read();
        match slot.as_ref() {
            Some(store) => store.run_in_transaction(f),
            None => Err(StoreError::Closed.into()),
        }
    }

    fn reset(&self) -> Result<(), StoreError> {
        let slot = self.store.write();
        let store = slot.as_ref().ok_or(StoreError::Closed)?;
        store.reset()?;
        info!("[stockroom] store reset, all tables and sequences cleared");
        Ok(())
    }
}
