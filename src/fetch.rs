// src/fetch.rs

use chrono::{DateTime, Utc};
use reqwest::{
    header::{CACHE_CONTROL, PRAGMA},
    Client,
};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::error::LoadError;

/// Query parameter carrying the cache-defeating timestamp.
pub const CACHE_BUST_PARAM: &str = "t";

/// Append `t=<unix millis>` so neither the browser-style caches in between
/// nor the publisher hand back a stale copy of the sheet.
pub fn cache_busted(url: &Url, now: DateTime<Utc>) -> Url {
    let mut out = url.clone();
    out.query_pairs_mut()
        .append_pair(CACHE_BUST_PARAM, &now.timestamp_millis().to_string());
    out
}

/// GET `url` with caching disabled and return the body as text.
///
/// A non-2xx status becomes [`LoadError::Fetch`]; connection problems and
/// timeouts, whether before the headers or while reading the body, become
/// [`LoadError::Transport`].
pub async fn get_text(
    client: &Client,
    url: &Url,
    timeout: Option<Duration>,
) -> Result<String, LoadError> {
    debug!(%url, "GET");
    let mut req = client
        .get(url.clone())
        .header(CACHE_CONTROL, "no-store")
        .header(PRAGMA, "no-cache");
    if let Some(t) = timeout {
        req = req.timeout(t);
    }

    let resp = req.send().await?;
    let status = resp.status();
    if !status.is_success() {
        warn!(%url, status = status.as_u16(), "non-success status");
        return Err(LoadError::Fetch {
            status_code: status.as_u16(),
        });
    }

    resp.text().await.map_err(|e| {
        // the per-request timeout also covers reading the body
        if e.is_timeout() || e.is_connect() {
            LoadError::Transport {
                message: e.to_string(),
            }
        } else {
            LoadError::Body {
                message: e.to_string(),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn cache_bust_starts_query_when_absent() {
        let url = Url::parse("https://example.com/sheet.csv").unwrap();
        assert_eq!(
            cache_busted(&url, at(1_700_000_000_123)).as_str(),
            "https://example.com/sheet.csv?t=1700000000123"
        );
    }

    #[test]
    fn cache_bust_extends_existing_query() {
        let url = Url::parse("https://docs.example.com/pub?output=csv").unwrap();
        assert_eq!(
            cache_busted(&url, at(42)).as_str(),
            "https://docs.example.com/pub?output=csv&t=42"
        );
    }
}
