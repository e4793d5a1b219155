pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod parse;
pub mod record;
pub mod retry;
pub mod store;

pub use catalog::{Catalog, LoadOutcome};
pub use config::{ColumnNames, Config, DuplicatePolicy};
pub use error::{DuplicateName, LoadError};
pub use loader::CsvLoader;
pub use record::Record;
pub use store::{RecordStore, DEFAULT_SEARCH_LIMIT};
