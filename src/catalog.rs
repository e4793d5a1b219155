// src/catalog.rs

use std::sync::{
    atomic::{AtomicU64, Ordering},
    PoisonError, RwLock,
};
use tracing::{info, warn};

use crate::{
    config::DuplicatePolicy, error::LoadError, loader::CsvLoader, record::Record,
    store::RecordStore,
};

/// Result of a load that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The store now holds this many records.
    Committed(usize),
    /// A newer load committed first; this result was thrown away.
    Superseded,
}

#[derive(Debug, Default)]
struct Committed {
    seq: u64,
    store: RecordStore,
}

/// A [`RecordStore`] that is refreshed from the network.
///
/// Every load takes a ticket when it starts. On completion it is applied only
/// if no load with a later ticket has been applied already, so an older
/// request finishing late never overwrites newer data. Failed loads leave the
/// store as it was.
#[derive(Debug, Default)]
pub struct Catalog {
    next_seq: AtomicU64,
    state: RwLock<Committed>,
    duplicates: DuplicatePolicy,
}

impl Catalog {
    pub fn new(duplicates: DuplicatePolicy) -> Self {
        Self {
            duplicates,
            ..Self::default()
        }
    }

    /// Seed with an already-built store.
    pub fn from_store(store: RecordStore, duplicates: DuplicatePolicy) -> Self {
        Self {
            next_seq: AtomicU64::new(0),
            state: RwLock::new(Committed { seq: 0, store }),
            duplicates,
        }
    }

    /// Reserve the next load ticket.
    pub fn begin_load(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply `records` loaded under `ticket`, unless a newer ticket already won.
    pub fn commit(&self, ticket: u64, records: Vec<Record>) -> Result<LoadOutcome, LoadError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if ticket <= state.seq {
            warn!(ticket, committed = state.seq, "discarding superseded load");
            return Ok(LoadOutcome::Superseded);
        }

        let n = records.len();
        match self.duplicates {
            DuplicatePolicy::LastWriteWins => state.store.reset(records),
            DuplicatePolicy::Reject => state.store.try_reset(records)?,
        }
        state.seq = ticket;
        info!(ticket, records = n, "catalogue committed");
        Ok(LoadOutcome::Committed(n))
    }

    /// Load `url` and commit the result. Errors are returned as-is and the
    /// previous data stays queryable.
    pub async fn refresh(&self, loader: &CsvLoader, url: &str) -> Result<LoadOutcome, LoadError> {
        let ticket = self.begin_load();
        let records = loader.load(url).await?;
        self.commit(ticket, records)
    }

    /// Run `f` against the current store under the read lock.
    pub fn with_store<R>(&self, f: impl FnOnce(&RecordStore) -> R) -> R {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state.store)
    }

    pub fn search(&self, query: &str, limit: usize) -> Vec<Record> {
        self.with_store(|s| s.search(query, limit).into_iter().cloned().collect())
    }

    pub fn first_match(&self, query: &str) -> Option<Record> {
        self.with_store(|s| s.first_match(query).cloned())
    }

    pub fn exact_by_name(&self, name: &str) -> Option<Record> {
        self.with_store(|s| s.exact_by_name(name).cloned())
    }

    pub fn len(&self) -> usize {
        self.with_store(RecordStore::len)
    }

    pub fn is_empty(&self) -> bool {
        self.with_store(RecordStore::is_empty)
    }
}
