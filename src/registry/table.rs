//! Registry implementation
//!
//! HashMap-based record table with a single-slot MRU cache.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::ExtensionRecord;
use crate::display::ConnectionId;

#[derive(Debug, Default)]
struct RegistryState {
    records: HashMap<ConnectionId, Arc<ExtensionRecord>>,
}

/// Table of extension records keyed by connection
///
/// Lock order is `state` then `mru`. The fast path in [`find`](Self::find)
/// takes only a read lock on `mru`.
#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    state: Mutex<RegistryState>,
    mru: RwLock<Option<Arc<ExtensionRecord>>>,
}

impl ExtensionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the record for a connection
    ///
    /// A hit on the MRU slot skips the registry lock. Otherwise the table is
    /// searched under the lock and a hit becomes the new MRU entry. A miss has
    /// no side effects.
    pub fn find(&self, connection: ConnectionId) -> Option<Arc<ExtensionRecord>> {
        if let Some(record) = self.mru.read().as_ref() {
            if record.connection() == connection {
                tracing::trace!(%connection, "registry MRU hit");
                return Some(Arc::clone(record));
            }
        }

        let state = self.state.lock();
        let record = Arc::clone(state.records.get(&connection)?);
        *self.mru.write() = Some(Arc::clone(&record));
        Some(record)
    }

    /// Add a record and make it the MRU entry
    ///
    /// If another record for the same connection got in first, that one is
    /// kept and returned instead, so a connection never has two records.
    pub fn insert(&self, record: ExtensionRecord) -> Arc<ExtensionRecord> {
        self.insert_if_absent(record).0
    }

    /// Like [`insert`](Self::insert), also reporting whether `record` was the
    /// one stored (`false` means an existing record was kept)
    pub fn insert_if_absent(&self, record: ExtensionRecord) -> (Arc<ExtensionRecord>, bool) {
        let connection = record.connection();
        let mut state = self.state.lock();

        let (record, inserted) = match state.records.get(&connection) {
            Some(existing) => {
                tracing::debug!(%connection, "record already registered, keeping existing");
                (Arc::clone(existing), false)
            }
            None => {
                let record = Arc::new(record);
                state.records.insert(connection, Arc::clone(&record));
                (record, true)
            }
        };

        *self.mru.write() = Some(Arc::clone(&record));
        (record, inserted)
    }

    /// Drop the record for a connection
    ///
    /// Returns false if the connection was never registered. Clears the MRU
    /// slot if it pointed at the removed record.
    pub fn remove(&self, connection: ConnectionId) -> bool {
        let mut state = self.state.lock();
        let Some(removed) = state.records.remove(&connection) else {
            return false;
        };

        let mut mru = self.mru.write();
        if mru.as_ref().is_some_and(|cached| Arc::ptr_eq(cached, &removed)) {
            *mru = None;
        }
        true
    }

    /// Number of registered connections
    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Connection currently held in the MRU slot
    pub fn cached_connection(&self) -> Option<ConnectionId> {
        self.mru.read().as_ref().map(|record| record.connection())
    }
}
