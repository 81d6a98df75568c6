//! Bounded retry with a constant delay between attempts.

use crate::error::{Error, Result};
use crate::types::DesiredResource;
use std::thread;
use std::time::Duration;

/// Blocks the calling thread between attempts.
///
/// Injected so tests can observe delays without waiting.
pub trait Sleeper {
    /// Pause for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Sleeper backed by [`std::thread::sleep`].
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Callback trait for retry progress notifications.
pub trait RetryCallback {
    /// Called after a failed attempt that will be retried.
    ///
    /// # Arguments
    /// * `attempt` - Attempt that just failed (1-indexed)
    /// * `tries` - Maximum number of attempts
    /// * `error` - The error of that attempt
    /// * `delay` - Pause before the next attempt
    fn on_retry(&mut self, attempt: u32, tries: u32, error: &Error, delay: Duration);
}

/// No-op callback that does nothing.
pub struct NoCallback;

impl RetryCallback for NoCallback {
    fn on_retry(&mut self, _attempt: u32, _tries: u32, _error: &Error, _delay: Duration) {}
}

/// How often to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum attempts; values below 1 count as 1
    pub tries: u32,
    /// Constant delay between attempts
    pub try_sleep: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::once()
    }
}

impl RetryPolicy {
    /// Create a policy.
    pub fn new(tries: u32, try_sleep: Duration) -> Self {
        Self { tries, try_sleep }
    }

    /// A single attempt.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// The policy a resource declares.
    pub fn for_resource(resource: &DesiredResource) -> Self {
        Self::new(resource.tries, resource.try_sleep_duration())
    }

    /// Attempts that will actually be made.
    pub fn attempts(&self) -> u32 {
        self.tries.max(1)
    }

    /// Whether failed attempts are followed by a pause.
    ///
    /// A single-attempt policy never sleeps.
    pub fn sleeps(&self) -> bool {
        !self.try_sleep.is_zero() && self.attempts() > 1
    }
}

/// Execute an operation with retry logic.
///
/// `operation` receives the 1-indexed attempt number. The first success is
/// returned immediately. After a failure, and only if another attempt
/// remains, the policy's delay is slept. When every attempt fails the last
/// error is returned wrapped in [`Error::ExhaustedRetries`].
pub fn with_retry<T, F>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    mut callback: Option<&mut dyn RetryCallback>,
    mut operation: F,
) -> Result<T>
where
    F: FnMut(u32) -> Result<T>,
{
    let tries = policy.attempts();
    let mut last_error: Option<Error> = None;

    for attempt in 1..=tries {
        if tries > 1 {
            log::debug!("Resource try {attempt}/{tries}");
        }

        match operation(attempt) {
            Ok(result) => return Ok(result),
            Err(e) => {
                log::debug!("Attempt {attempt}/{tries} failed: {e}");

                if attempt < tries {
                    let delay = if policy.sleeps() {
                        policy.try_sleep
                    } else {
                        Duration::ZERO
                    };

                    if let Some(cb) = callback.as_deref_mut() {
                        cb.on_retry(attempt, tries, &e, delay);
                    }

                    if policy.sleeps() {
                        log::debug!(
                            "Sleeping for {} seconds between tries",
                            policy.try_sleep.as_secs_f64()
                        );
                        sleeper.sleep(policy.try_sleep);
                    }
                }

                last_error = Some(e);
            }
        }
    }

    // attempts() is at least 1, so a failure is always recorded by now
    let last = last_error.unwrap_or_else(|| Error::attempt("retry exhausted"));
    Err(Error::ExhaustedRetries {
        attempts: tries,
        last: Box::new(last),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct RecordingSleeper(RefCell<Vec<Duration>>);

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.0.borrow_mut().push(duration);
        }
    }

    #[test]
    fn test_success_first_try() {
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::new(3, Duration::from_secs(2));
        let result = with_retry(&policy, &sleeper, None, |_| Ok::<_, Error>(42));
        assert_eq!(result.unwrap(), 42);
        assert!(sleeper.0.borrow().is_empty());
    }

    #[test]
    fn test_all_attempts_fail() {
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::new(3, Duration::from_secs(2));
        let attempts = Cell::new(0);

        let result: Result<()> = with_retry(&policy, &sleeper, None, |n| {
            attempts.set(attempts.get() + 1);
            Err(Error::attempt(format!("failure {n}")))
        });

        let err = result.unwrap_err();
        assert_eq!(attempts.get(), 3);
        assert_eq!(err.to_string(), "failure 3");
        assert!(matches!(err, Error::ExhaustedRetries { attempts: 3, .. }));
        assert_eq!(*sleeper.0.borrow(), vec![Duration::from_secs(2); 2]);
    }

    #[test]
    fn test_eventual_success_stops_attempts() {
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::new(5, Duration::from_secs(1));
        let attempts = Cell::new(0);

        let result = with_retry(&policy, &sleeper, None, |n| {
            attempts.set(n);
            if n < 2 {
                Err(Error::attempt("not yet"))
            } else {
                Ok(n)
            }
        });

        assert_eq!(result.unwrap(), 2);
        assert_eq!(attempts.get(), 2);
        assert_eq!(sleeper.0.borrow().len(), 1);
    }

    #[test]
    fn test_single_try_never_sleeps() {
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::new(1, Duration::from_secs(30));
        assert!(!policy.sleeps());

        let result: Result<()> = with_retry(&policy, &sleeper, None, |_| Err(Error::attempt("x")));
        assert!(result.is_err());
        assert!(sleeper.0.borrow().is_empty());
    }

    #[test]
    fn test_zero_tries_means_one_attempt() {
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::new(0, Duration::from_secs(1));
        let attempts = Cell::new(0);
        let result: Result<()> = with_retry(&policy, &sleeper, None, |_| {
            attempts.set(attempts.get() + 1);
            Err(Error::attempt("x"))
        });
        assert_eq!(attempts.get(), 1);
        assert_eq!(result.unwrap_err().to_string(), "x");
    }

    #[test]
    fn test_zero_sleep_does_not_call_sleeper() {
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::new(3, Duration::ZERO);
        let _: Result<()> = with_retry(&policy, &sleeper, None, |_| Err(Error::attempt("x")));
        assert!(sleeper.0.borrow().is_empty());
    }

    #[test]
    fn test_callback_invoked_between_attempts() {
        struct Counting(Vec<(u32, u32)>);
        impl RetryCallback for Counting {
            fn on_retry(&mut self, attempt: u32, tries: u32, _: &Error, _: Duration) {
                self.0.push((attempt, tries));
            }
        }

        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::new(3, Duration::from_millis(10));
        let mut counting = Counting(Vec::new());

        let _: Result<()> = with_retry(&policy, &sleeper, Some(&mut counting), |_| {
            Err(Error::attempt("x"))
        });

        // Called for each retry (not after the last attempt)
        assert_eq!(counting.0, vec![(1, 3), (2, 3)]);
    }
}
