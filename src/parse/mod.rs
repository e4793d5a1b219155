// src/parse/mod.rs

pub mod columns;
pub mod tokenizer;

pub use columns::ColumnMap;
pub use tokenizer::{tokenize, trim_field};

use tracing::debug;

use crate::{config::ColumnNames, error::LoadError, record::Record};

/// Tokenize `text`, take the first row as the header and map the rest to
/// records. Rows with an empty name are dropped.
///
/// Only an input with no rows at all is an error; anything else degrades to
/// empty fields.
pub fn parse_records(text: &str, names: &ColumnNames) -> Result<Vec<Record>, LoadError> {
    let mut rows = tokenize(text).into_iter();
    let header = rows.next().ok_or(LoadError::EmptyDocument)?;
    let columns = ColumnMap::from_header(&header, names);

    let mut dropped = 0usize;
    let records: Vec<Record> = rows
        .filter_map(|row| {
            let rec = columns.to_record(&row);
            if rec.is_none() {
                dropped += 1;
            }
            rec
        })
        .collect();

    debug!(records = records.len(), dropped, "parsed CSV body");
    Ok(records)
}
