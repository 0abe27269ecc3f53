//! Adaptive request pacing for scraping and embedding calls.
//!
//! Every request waits for a governor permit via `until_ready()`, which
//! spaces requests at the configured rate. On 429 the governor is slowed,
//! the `Retry-After` delay is honored and the request is retried once.

use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Delay between board requests when nothing else is configured.
pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_millis(500);

/// Error type for a single HTTP exchange, distinguishing rate limiting from
/// other failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Server returned 429 Too Many Requests.
    RateLimited { retry_after: Option<Duration> },
    /// Server answered with another non-success status.
    Status(u16),
    /// Transport or decoding failure.
    Other(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::RateLimited {
                retry_after: Some(d),
            } => write!(f, "Rate limited (429), retry after {:.1}s", d.as_secs_f64()),
            FetchError::RateLimited { retry_after: None } => write!(f, "Rate limited (429)"),
            FetchError::Status(code) => write!(f, "HTTP {}", code),
            FetchError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Other(e.to_string())
    }
}

fn quota_for(period: Duration) -> Quota {
    Quota::with_period(period).unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
}

/// Rate limiter with adaptive slowdown via ArcSwap.
///
/// A 429 swaps the governor for a slower one (doubling the period, capped at
/// 16x). After 60s without another 429 the base rate is restored.
pub struct AdaptiveLimiter {
    limiter: ArcSwap<DirectLimiter>,
    base_period: Duration,
    current_factor: AtomicU32,
    last_429: std::sync::Mutex<Option<Instant>>,
}

impl Default for AdaptiveLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_INTERVAL)
    }
}

impl AdaptiveLimiter {
    /// Create a limiter allowing one request per `period`.
    pub fn new(period: Duration) -> Self {
        let limiter = Arc::new(DirectLimiter::direct(quota_for(period)));
        Self {
            limiter: ArcSwap::from(limiter),
            base_period: period,
            current_factor: AtomicU32::new(1),
            last_429: std::sync::Mutex::new(None),
        }
    }

    pub fn base_period(&self) -> Duration {
        self.base_period
    }

    /// Wait until the limiter allows a request.
    pub async fn acquire(&self) {
        self.try_decay();
        let limiter = self.limiter.load_full();
        limiter.until_ready().await;
    }

    /// Called when a 429 is received. Doubles the slowdown factor and swaps the governor.
    pub fn on_rate_limited(&self) {
        if let Ok(mut last) = self.last_429.lock() {
            *last = Some(Instant::now());
        }

        let _ = self
            .current_factor
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |f| {
                Some((f * 2).min(16))
            });

        let factor = self.current_factor.load(Ordering::SeqCst);
        if let Some(scaled) = self.base_period.checked_mul(factor) {
            self.limiter
                .store(Arc::new(DirectLimiter::direct(quota_for(scaled))));
        }
    }

    fn try_decay(&self) {
        let should_restore = self
            .last_429
            .lock()
            .ok()
            .and_then(|last| last.map(|t| t.elapsed().as_secs() >= 60))
            .unwrap_or(false);

        if should_restore && self.current_factor.load(Ordering::SeqCst) > 1 {
            self.current_factor.store(1, Ordering::SeqCst);
            self.limiter
                .store(Arc::new(DirectLimiter::direct(quota_for(self.base_period))));
        }
    }
}

/// Map a response status to `Ok(())` or the matching [`FetchError`].
///
/// A 429 carries the parsed `Retry-After` delay, if any.
pub fn check_response(resp: &reqwest::Response) -> Result<(), FetchError> {
    let status = resp.status();
    if status.as_u16() == 429 {
        let retry_after = resp
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        Err(FetchError::RateLimited { retry_after })
    } else if !status.is_success() {
        Err(FetchError::Status(status.as_u16()))
    } else {
        Ok(())
    }
}

/// Parse a Retry-After header value (seconds or HTTP-date).
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    if let Ok(secs) = value.trim().parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    // HTTP-date: fall back to a conservative fixed delay
    if value.contains(',') || value.contains("GMT") {
        return Some(Duration::from_secs(5));
    }
    None
}

/// Run `request` behind the limiter.
///
/// 1. Acquires a governor permit (waits if needed)
/// 2. Runs the request
/// 3. On 429: slows the governor, sleeps for `Retry-After` (default 2s,
///    capped at `max_wait`) and retries once
/// 4. Any other outcome is returned as is
pub async fn with_rate_limit<T, F, Fut>(
    label: &str,
    limiter: &AdaptiveLimiter,
    max_wait: Duration,
    mut request: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    limiter.acquire().await;

    match request().await {
        Err(FetchError::RateLimited { retry_after }) => {
            limiter.on_rate_limited();

            let wait = retry_after.unwrap_or(Duration::from_secs(2)).min(max_wait);
            tracing::info!(
                service = label,
                wait_secs = wait.as_secs_f64(),
                "429 rate limited, waiting then retrying"
            );
            tokio::time::sleep(wait).await;

            limiter.acquire().await;
            request().await
        }
        other => other,
    }
}
