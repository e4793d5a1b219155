// src/store.rs

use std::collections::{HashMap, HashSet};

use crate::{error::DuplicateName, record::Record};

/// Suggestion count the front end asks for by default.
pub const DEFAULT_SEARCH_LIMIT: usize = 12;

/// In-memory catalogue: records in document order plus a lowercase-name index.
///
/// Searches are linear scans; the catalogue is expected to be small.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    records: Vec<Record>,
    /// `records[i].name.to_lowercase()`, kept alongside to avoid re-lowering per query.
    lowered: Vec<String>,
    by_name: HashMap<String, usize>,
}

impl RecordStore {
    pub fn new(records: Vec<Record>) -> Self {
        let mut store = Self::default();
        store.reset(records);
        store
    }

    /// Replace everything. Duplicate names resolve last-write-wins in the index.
    pub fn reset(&mut self, records: Vec<Record>) {
        let lowered: Vec<String> = records.iter().map(|r| r.name.to_lowercase()).collect();
        let mut by_name = HashMap::with_capacity(records.len());
        for (i, key) in lowered.iter().enumerate() {
            by_name.insert(key.clone(), i);
        }

        self.records = records;
        self.lowered = lowered;
        self.by_name = by_name;
    }

    /// Like [`reset`](Self::reset), but refuses a dataset containing two
    /// names that are equal ignoring case. The store is untouched on error.
    pub fn try_reset(&mut self, records: Vec<Record>) -> Result<(), DuplicateName> {
        let mut seen = HashSet::with_capacity(records.len());
        for rec in &records {
            if !seen.insert(rec.name.to_lowercase()) {
                return Err(DuplicateName {
                    name: rec.name.clone(),
                });
            }
        }
        self.reset(records);
        Ok(())
    }

    /// Case-insensitive substring match on the name, in document order,
    /// at most `limit` results. An empty query matches every record.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Record> {
        let needle = query.to_lowercase();
        self.lowered
            .iter()
            .zip(&self.records)
            .filter(|(name, _)| name.contains(needle.as_str()))
            .map(|(_, rec)| rec)
            .take(limit)
            .collect()
    }

    /// First record, in document order, whose name contains `query`.
    pub fn first_match(&self, query: &str) -> Option<&Record> {
        let needle = query.to_lowercase();
        self.lowered
            .iter()
            .position(|name| name.contains(needle.as_str()))
            .map(|i| &self.records[i])
    }

    /// Case-insensitive exact lookup.
    pub fn exact_by_name(&self, name: &str) -> Option<&Record> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<Record>> for RecordStore {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}
