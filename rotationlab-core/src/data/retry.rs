//! Retry with exponential backoff, and the sleep seam used for request pacing.

use super::provider::DataError;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// Blocking sleep, abstracted so tests can record delays instead of waiting.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Records requested delays without sleeping.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().map(|d| d.clone()).unwrap_or_default()
    }

    pub fn total(&self) -> Duration {
        self.delays().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(duration);
        }
    }
}

/// Outcome of a request that did not succeed.
#[derive(Debug, Error)]
pub enum RetryError {
    #[error("gave up after {attempts} attempt(s): {last}")]
    Exhausted { attempts: u32, last: DataError },

    #[error(transparent)]
    Permanent(DataError),
}

/// Bounded attempts with doubling delays: `base`, `2 * base`, ...
///
/// The delay follows every failed attempt except the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay after the given failed attempt (1-based), or `None` if no attempt follows.
    pub fn backoff_after(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt >= self.max_attempts {
            return None;
        }
        let factor = 1u32 << (attempt - 1).min(16);
        Some(self.base_delay.saturating_mul(factor))
    }

    /// Sum of all backoff delays when every attempt fails.
    pub fn total_backoff(&self) -> Duration {
        (1..self.max_attempts)
            .filter_map(|a| self.backoff_after(a))
            .sum()
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    ///
    /// `op` receives the 1-based attempt number. Only transient errors are retried.
    pub fn run<T, F>(&self, label: &str, sleeper: &dyn Sleeper, mut op: F) -> Result<T, RetryError>
    where
        F: FnMut(u32) -> Result<T, DataError>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() => return Err(RetryError::Permanent(e)),
                Err(e) => {
                    log::warn!("{label}: attempt {attempt}/{attempts} failed: {e}");
                    match self.backoff_after(attempt) {
                        Some(delay) => {
                            sleeper.sleep(delay);
                            attempt += 1;
                        }
                        None => {
                            return Err(RetryError::Exhausted {
                                attempts: attempt,
                                last: e,
                            })
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transient() -> DataError {
        DataError::NetworkUnreachable("connection reset".into())
    }

    #[test]
    fn default_backoff_schedule() {
        let p = RetryPolicy::default();
        assert_eq!(p.backoff_after(1), Some(Duration::from_secs(1)));
        assert_eq!(p.backoff_after(2), Some(Duration::from_secs(2)));
        assert_eq!(p.backoff_after(3), None);
        assert_eq!(p.total_backoff(), Duration::from_secs(3));
    }

    #[test]
    fn gives_up_after_three_attempts() {
        let sleeper = RecordingSleeper::new();
        let mut calls = 0;
        let result: Result<(), _> = RetryPolicy::default().run("TEST", &sleeper, |_| {
            calls += 1;
            Err(transient())
        });
        assert_eq!(calls, 3);
        assert!(matches!(result, Err(RetryError::Exhausted { attempts: 3, .. })));
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
        assert_eq!(sleeper.total(), Duration::from_secs(3));
    }

    #[test]
    fn succeeds_on_second_attempt() {
        let sleeper = RecordingSleeper::new();
        let result = RetryPolicy::default().run("TEST", &sleeper, |attempt| {
            if attempt == 1 {
                Err(transient())
            } else {
                Ok(attempt)
            }
        });
        assert_eq!(result.unwrap(), 2);
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(1)]);
    }

    #[test]
    fn permanent_error_is_not_retried() {
        let sleeper = RecordingSleeper::new();
        let mut calls = 0;
        let result: Result<(), _> = RetryPolicy::default().run("TEST", &sleeper, |_| {
            calls += 1;
            Err(DataError::AuthenticationRequired("expired".into()))
        });
        assert_eq!(calls, 1);
        assert!(matches!(result, Err(RetryError::Permanent(_))));
        assert!(sleeper.delays().is_empty());
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let sleeper = RecordingSleeper::new();
        let policy = RetryPolicy::new(0, Duration::from_secs(1));
        let mut calls = 0;
        let _: Result<(), _> = policy.run("TEST", &sleeper, |_| {
            calls += 1;
            Err(transient())
        });
        assert_eq!(calls, 1);
    }
}
