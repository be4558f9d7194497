use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

/// Linear backoff schedule: retry `n` waits `n * step`, capped at `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Delay before the first retry, added again for every further retry
    pub step: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
}

impl Backoff {
    /// Create a new linear backoff schedule
    pub fn new(step: Duration, max_delay: Duration) -> Self {
        Self { step, max_delay }
    }

    /// Preset: rate-limited requests (HTTP 429, quota markers)
    /// Delays: 10s, 20s, 30s, 40s, 50s, then 60s max
    pub fn rate_limited() -> Self {
        Self::new(Duration::from_secs(10), Duration::from_secs(60))
    }

    /// Preset: transient failures (network errors, unreadable responses)
    /// Delays: 2s, 4s, 6s, 8s, then 10s max
    pub fn transient() -> Self {
        Self::new(Duration::from_secs(2), Duration::from_secs(10))
    }

    /// Calculate the delay for a given attempt number (0-indexed)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.step.saturating_mul(attempt).min(self.max_delay)
    }
}

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAction {
    /// Sleep for the given duration, then retry
    Wait(Duration),
    /// Retry right away
    Immediately,
    /// Stop retrying and return the error
    GiveUp,
}

/// Something that can pause the current task.
///
/// Production code sleeps on the tokio timer; tests swap in
/// [`RecordingSleeper`] so backoff schedules can be asserted without waiting.
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Records every requested delay and returns immediately
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in order
    pub fn delays(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .map(|delays| delays.clone())
            .unwrap_or_default()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(duration);
        }
        std::future::ready(())
    }
}

/// Execute an async operation with retries, letting `classify` decide how each
/// failure is handled.
///
/// `classify` receives the error and the index of the attempt that would run
/// next (1 for the first retry), so it can pick a delay from a [`Backoff`].
///
/// # Returns
/// The result of the operation, or the last error once attempts run out or
/// `classify` gives up
///
/// # Panics
/// Panics if `max_attempts` is 0
pub async fn with_retry_policy<T, E, F, Fut, C, S>(
    max_attempts: u32,
    operation_name: &str,
    sleeper: &S,
    mut operation: F,
    classify: C,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    C: Fn(&E, u32) -> RetryAction,
    S: Sleeper,
{
    assert!(
        max_attempts >= 1,
        "max_attempts must be >= 1, got {}",
        max_attempts
    );

    let mut attempt = 0;
    loop {
        let error = match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(
                        "{}: Succeeded on attempt {}/{}",
                        operation_name,
                        attempt + 1,
                        max_attempts
                    );
                }
                return Ok(result);
            }
            Err(e) => e,
        };

        let next = attempt + 1;
        if next >= max_attempts {
            warn!(
                "{}: All {} attempts failed. Last error: {}",
                operation_name, max_attempts, error
            );
            return Err(error);
        }

        match classify(&error, next) {
            RetryAction::GiveUp => {
                debug!(
                    "{}: Error is not retryable, failing immediately: {}",
                    operation_name, error
                );
                return Err(error);
            }
            RetryAction::Immediately => {
                debug!(
                    "{}: Attempt {}/{} failed ({}), retrying now",
                    operation_name, next, max_attempts, error
                );
            }
            RetryAction::Wait(delay) => {
                warn!(
                    "{}: Attempt {}/{} failed ({}), waiting {:?}",
                    operation_name, next, max_attempts, error, delay
                );
                sleeper.sleep(delay).await;
            }
        }

        attempt = next;
    }
}
