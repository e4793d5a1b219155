// src/retry.rs

use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, warn};

use crate::{
    catalog::{Catalog, LoadOutcome},
    error::LoadError,
    loader::CsvLoader,
};

/// Delay before retry number `attempt` (1-based): `initial * 2^(attempt-1)`.
pub fn backoff_delay(initial: Duration, attempt: u32) -> Duration {
    initial.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

/// [`Catalog::refresh`] with up to `max_retries` extra attempts.
/// `CsvLoader` and `Catalog` never retry on their own; callers opt in here.
/// Non-retryable errors (4xx, bad URL, rejected duplicates) return at once.
pub async fn refresh_with_retry(
    catalog: &Catalog,
    loader: &CsvLoader,
    url: &str,
    max_retries: u32,
    initial_backoff: Duration,
) -> Result<LoadOutcome, LoadError> {
    let mut attempts = 0;
    loop {
        match catalog.refresh(loader, url).await {
            Ok(outcome) => return Ok(outcome),
            Err(e) if attempts < max_retries && e.is_retryable() => {
                attempts += 1;
                let delay = backoff_delay(initial_backoff, attempts);
                warn!(%url, attempt = attempts, delay_ms = delay.as_millis() as u64, error = %e, "Retrying");
                sleep(delay).await;
            }
            Err(e) => {
                error!(%url, attempts, error = %e, "Giving up");
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::tests::serve;
    use reqwest::Client;
    use warp::http::StatusCode;

    #[test]
    fn backoff_doubles() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(500));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(1000));
        assert_eq!(backoff_delay(base, 4), Duration::from_millis(4000));
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        let (addr, seen) = serve(StatusCode::NOT_FOUND, "").await;
        let catalog = Catalog::default();
        let loader = CsvLoader::new(Client::new()).cache_bust(false);

        let err = refresh_with_retry(
            &catalog,
            &loader,
            &format!("http://{}/sheet.csv", addr),
            3,
            Duration::from_millis(1),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn server_error_is_retried_until_exhausted() {
        let (addr, seen) = serve(StatusCode::SERVICE_UNAVAILABLE, "").await;
        let catalog = Catalog::default();
        let loader = CsvLoader::new(Client::new());

        let err = refresh_with_retry(
            &catalog,
            &loader,
            &format!("http://{}/sheet.csv", addr),
            2,
            Duration::from_millis(1),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(seen.lock().unwrap().len(), 3);
    }
}
