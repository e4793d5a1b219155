// src/loader.rs

use chrono::Utc;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{info, instrument};
use url::Url;

use crate::{
    config::{ColumnNames, Config},
    error::LoadError,
    fetch::{cache_busted, get_text},
    parse::parse_records,
    record::Record,
};

/// Fetches the published CSV and maps it to records.
///
/// Holds no dataset of its own; see [`crate::Catalog`] for that.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    client: Client,
    cache_bust: bool,
    timeout: Option<Duration>,
    columns: ColumnNames,
}

impl CsvLoader {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            cache_bust: true,
            timeout: None,
            columns: ColumnNames::default(),
        }
    }

    pub fn from_config(client: Client, cfg: &Config) -> Self {
        Self {
            client,
            cache_bust: cfg.cache_bust,
            timeout: cfg.timeout(),
            columns: cfg.columns.clone(),
        }
    }

    pub fn cache_bust(mut self, on: bool) -> Self {
        self.cache_bust = on;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn columns(mut self, columns: ColumnNames) -> Self {
        self.columns = columns;
        self
    }

    /// The URL actually requested for `url`.
    pub fn request_url(&self, url: &str) -> Result<Url, LoadError> {
        let parsed = Url::parse(url)?;
        Ok(if self.cache_bust {
            cache_busted(&parsed, Utc::now())
        } else {
            parsed
        })
    }

    #[instrument(level = "info", skip(self))]
    pub async fn load(&self, url: &str) -> Result<Vec<Record>, LoadError> {
        let start = Instant::now();
        let target = self.request_url(url)?;
        let body = get_text(&self.client, &target, self.timeout).await?;
        let records = parse_records(&body, &self.columns)?;
        info!(
            bytes = body.len(),
            records = records.len(),
            elapsed = ?start.elapsed(),
            "loaded catalogue"
        );
        Ok(records)
    }
}
