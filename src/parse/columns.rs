// src/parse/columns.rs

use crate::{config::ColumnNames, record::Record};

/// Positions of the mapped fields within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnMap {
    pub name: Option<usize>,
    pub price_tier_30: Option<usize>,
    pub price_tier_20: Option<usize>,
    pub image_url: Option<usize>,
}

impl ColumnMap {
    /// Exact, case-sensitive match; the first matching header wins.
    pub fn from_header(header: &[String], names: &ColumnNames) -> Self {
        let find = |wanted: &str| header.iter().position(|h| h.trim() == wanted);
        Self {
            name: find(&names.name),
            price_tier_30: find(&names.price_tier_30),
            price_tier_20: find(&names.price_tier_20),
            image_url: find(&names.image_url),
        }
    }

    /// `None` when the row has no name after trimming.
    pub fn to_record(&self, row: &[String]) -> Option<Record> {
        let name = cell(row, self.name);
        if name.is_empty() {
            return None;
        }
        Some(Record {
            name,
            price_tier_30: cell(row, self.price_tier_30),
            price_tier_20: cell(row, self.price_tier_20),
            image_url: cell(row, self.image_url),
        })
    }
}

fn cell(row: &[String], idx: Option<usize>) -> String {
    idx.and_then(|i| row.get(i))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
