// src/config.rs

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, str::FromStr, time::Duration};

use crate::store::DEFAULT_SEARCH_LIMIT;

/// Header names the loader maps onto [`crate::Record`] fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub name: String,
    pub price_tier_30: String,
    pub price_tier_20: String,
    pub image_url: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            name: "Product Name".into(),
            price_tier_30: "30mm".into(),
            price_tier_20: "20mm".into(),
            image_url: "Image URL".into(),
        }
    }
}

/// What the name index does when two records share a case-insensitive name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Later rows replace earlier ones in the index.
    #[default]
    LastWriteWins,
    /// Refuse the whole dataset.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_url: String,
    pub cache_bust: bool,
    /// Per-request timeout; `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    pub search_limit: usize,
    pub duplicates: DuplicatePolicy,
    pub columns: ColumnNames,
    /// Extra attempts made by the front end after a failed load.
    pub retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_url: String::new(),
            cache_bust: true,
            timeout_secs: None,
            search_limit: DEFAULT_SEARCH_LIMIT,
            duplicates: DuplicatePolicy::default(),
            columns: ColumnNames::default(),
            retries: 0,
            retry_backoff_ms: 500,
        }
    }
}

impl Config {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("parsing YAML config")
    }

    /// Read a YAML file, or start from defaults when `path` is `None`, then
    /// apply `PRICECARD_*` environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| env::var(key).ok())
    }

    /// [`load`](Self::load) with the override source supplied by the caller.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match path {
            Some(p) => {
                let text =
                    fs::read_to_string(p).with_context(|| format!("reading config {:?}", p))?;
                Self::from_yaml_str(&text).with_context(|| format!("in {:?}", p))?
            }
            None => Self::default(),
        };
        cfg.apply_overrides(lookup)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply overrides from a key lookup (the process environment in practice).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("PRICECARD_DATA_URL") {
            self.data_url = url;
        }
        if let Some(v) = lookup("PRICECARD_CACHE_BUST") {
            self.cache_bust = parse_bool(&v).context("PRICECARD_CACHE_BUST")?;
        }
        if let Some(v) = lookup("PRICECARD_TIMEOUT_SECS") {
            self.timeout_secs = match v.trim() {
                "" | "none" => None,
                s => Some(parse_num(s).context("PRICECARD_TIMEOUT_SECS")?),
            };
        }
        if let Some(v) = lookup("PRICECARD_SEARCH_LIMIT") {
            self.search_limit = parse_num(&v).context("PRICECARD_SEARCH_LIMIT")?;
        }
        if let Some(v) = lookup("PRICECARD_RETRIES") {
            self.retries = parse_num(&v).context("PRICECARD_RETRIES")?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_url.trim().is_empty() {
            bail!("no data URL configured (set `data_url` or PRICECARD_DATA_URL)");
        }
        if self.search_limit == 0 {
            bail!("search_limit must be at least 1");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got {:?}", other),
    }
}

fn parse_num<T>(s: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.trim()
        .parse::<T>()
        .with_context(|| format!("expected a number, got {:?}", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_widget_behaviour() {
        let cfg = Config::default();
        assert!(cfg.cache_bust);
        assert_eq!(cfg.timeout(), None);
        assert_eq!(cfg.search_limit, 12);
        assert_eq!(cfg.duplicates, DuplicatePolicy::LastWriteWins);
        assert_eq!(cfg.columns.name, "Product Name");
        assert_eq!(cfg.retries, 0);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = Config::from_yaml_str(
            "data_url: https://example.com/pub?output=csv\n\
             cache_bust: false\n\
             duplicates: reject\n\
             columns:\n  image_url: Photo\n",
        )
        .unwrap();
        assert_eq!(cfg.data_url, "https://example.com/pub?output=csv");
        assert!(!cfg.cache_bust);
        assert_eq!(cfg.duplicates, DuplicatePolicy::Reject);
        assert_eq!(cfg.columns.image_url, "Photo");
        assert_eq!(cfg.columns.price_tier_30, "30mm");
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> = [
            ("PRICECARD_DATA_URL", "http://localhost/data.csv"),
            ("PRICECARD_CACHE_BUST", "off"),
            ("PRICECARD_TIMEOUT_SECS", "5"),
            ("PRICECARD_SEARCH_LIMIT", "3"),
        ]
        .into_iter()
        .collect();

        let mut cfg = Config::default();
        cfg.apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(cfg.data_url, "http://localhost/data.csv");
        assert!(!cfg.cache_bust);
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(cfg.search_limit, 3);
    }

    #[test]
    fn bad_env_value_is_an_error() {
        let mut cfg = Config::default();
        let err = cfg
            .apply_overrides(|k| (k == "PRICECARD_CACHE_BUST").then(|| "maybe".to_string()))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("PRICECARD_CACHE_BUST"));
    }

    #[test]
    fn validation_requires_url_and_limit() {
        assert!(Config::default().validate().is_err());
        let cfg = Config {
            data_url: "http://x/y.csv".into(),
            search_limit: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_reads_file_then_env_then_validates() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data_url: http://localhost/sheet.csv").unwrap();
        writeln!(file, "timeout_secs: 10").unwrap();
        writeln!(file, "search_limit: 4").unwrap();

        let cfg = Config::load_with(Some(file.path()), |k| match k {
            "PRICECARD_DATA_URL" => Some("http://override/sheet.csv".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.data_url, "http://override/sheet.csv");
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(cfg.search_limit, 4);

        // env can also break an otherwise valid file
        let err = Config::load_with(Some(file.path()), |k| {
            (k == "PRICECARD_SEARCH_LIMIT").then(|| "0".to_string())
        })
        .unwrap_err();
        assert!(format!("{:#}", err).contains("search_limit"));
    }

    #[test]
    fn load_without_file_uses_env() {
        let cfg = Config::load_with(None, |k| {
            (k == "PRICECARD_DATA_URL").then(|| "http://env/sheet.csv".to_string())
        })
        .unwrap();
        assert_eq!(cfg.data_url, "http://env/sheet.csv");
        assert!(Config::load_with(None, |_| None).is_err());
    }

    #[test]
    fn missing_config_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let err = Config::load_with(Some(&path), |_| None).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("reading config"), "got {}", msg);
        assert!(msg.contains("absent.yaml"), "got {}", msg);
    }
}
