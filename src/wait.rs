//! Generic poll-until-terminal driver.
//!
//! [`wait_for`] repeatedly invokes a getter until it reports a terminal
//! value, the getter fails, or the deadline passes. Attempts are strictly
//! sequential; the delay before attempt `n` is `interval.delay(n - 1)` and
//! counts against the deadline.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

/// Deadline used when a caller passes a zero timeout.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(300);

/// Delay schedule between two attempts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IntervalStrategy {
    /// Same delay before every attempt.
    Linear(Duration),
    /// `min(cap, base * factor^attempt)`.
    Exponential {
        /// Delay after the first attempt.
        base: Duration,
        /// Growth factor applied per attempt.
        factor: u32,
        /// Upper bound on any single delay.
        cap: Duration,
    },
}

impl IntervalStrategy {
    /// Delay to observe after attempt `attempt` (zero-based).
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Self::Linear(interval) => interval,
            Self::Exponential { base, factor, cap } => factor
                .checked_pow(attempt)
                .and_then(|scale| base.checked_mul(scale))
                .map_or(cap, |delay| delay.min(cap)),
        }
    }
}

/// Outcome of one getter invocation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attempt<T> {
    /// Value observed by the attempt.
    pub value: T,
    /// Whether the wait should stop on this value.
    pub terminal: bool,
}

impl<T> Attempt<T> {
    /// Builds a poll outcome, classifying `value` with `is_terminal`.
    pub fn classify(value: T, is_terminal: impl FnOnce(&T) -> bool) -> Self {
        let terminal = is_terminal(&value);
        Self { value, terminal }
    }
}

/// Failure of a wait.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WaitError<T, E> {
    /// The getter failed; the wait ends immediately.
    Get(E),
    /// The deadline passed before a terminal value was observed.
    Timeout {
        /// Deadline that elapsed.
        timeout: Duration,
        /// Last non-terminal value, when any attempt succeeded.
        last: Option<T>,
    },
}

/// Resolves the caller's timeout; zero selects [`DEFAULT_WAIT_TIMEOUT`].
#[must_use]
pub fn effective_timeout(timeout: Duration) -> Duration {
    if timeout.is_zero() {
        DEFAULT_WAIT_TIMEOUT
    } else {
        timeout
    }
}

/// Polls `get` until it reports a terminal value.
///
/// Attempt 0 runs immediately. Once a terminal value is returned `get` is
/// never invoked again. A zero `timeout` selects [`DEFAULT_WAIT_TIMEOUT`].
///
/// # Errors
///
/// Returns [`WaitError::Get`] on the first getter failure and
/// [`WaitError::Timeout`] once the elapsed time would exceed the timeout
/// before the next attempt.
pub async fn wait_for<T, E, F, Fut>(
    mut get: F,
    timeout: Duration,
    interval: IntervalStrategy,
) -> Result<T, WaitError<T, E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Attempt<T>, E>>,
{
    let deadline = effective_timeout(timeout);
    let started = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        let outcome = get().await.map_err(WaitError::Get)?;
        if outcome.terminal {
            debug!(attempt, elapsed = ?started.elapsed(), "wait reached terminal state");
            return Ok(outcome.value);
        }

        let delay = interval.delay(attempt);
        let remaining = deadline.saturating_sub(started.elapsed());
        if remaining.is_zero() || delay > remaining {
            sleep(remaining).await;
            warn!(timeout = ?deadline, attempts = attempt.saturating_add(1), "wait timed out");
            return Err(WaitError::Timeout {
                timeout: deadline,
                last: Some(outcome.value),
            });
        }

        debug!(attempt, ?delay, "waiting before next attempt");
        sleep(delay).await;
        attempt = attempt.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1)]
    #[case(1, 2)]
    #[case(3, 8)]
    #[case(4, 10)]
    #[case(40, 10)]
    fn exponential_delay_is_capped(#[case] attempt: u32, #[case] expected_secs: u64) {
        let strategy = IntervalStrategy::Exponential {
            base: Duration::from_secs(1),
            factor: 2,
            cap: Duration::from_secs(10),
        };
        assert_eq!(strategy.delay(attempt), Duration::from_secs(expected_secs));
    }

    #[test]
    fn linear_delay_is_constant() {
        let strategy = IntervalStrategy::Linear(Duration::from_secs(5));
        assert_eq!(strategy.delay(0), strategy.delay(17));
    }

    #[test]
    fn zero_timeout_selects_default() {
        assert_eq!(effective_timeout(Duration::ZERO), DEFAULT_WAIT_TIMEOUT);
        assert_eq!(
            effective_timeout(Duration::from_secs(1)),
            Duration::from_secs(1)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn returns_value_of_first_terminal_attempt() {
        let started = Instant::now();
        let mut calls = Vec::new();

        let result: Result<u32, WaitError<u32, ()>> = wait_for(
            || {
                let attempt = u32::try_from(calls.len()).unwrap_or(u32::MAX);
                calls.push(started.elapsed().as_secs());
                async move { Ok(Attempt::classify(attempt, |value| *value == 3)) }
            },
            Duration::from_secs(60),
            IntervalStrategy::Exponential {
                base: Duration::from_secs(1),
                factor: 2,
                cap: Duration::from_secs(30),
            },
        )
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls, vec![0, 1, 3, 7]);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_after_deadline() {
        let started = Instant::now();
        let mut calls = 0_u32;

        let result: Result<u32, WaitError<u32, ()>> = wait_for(
            || {
                calls += 1;
                let seen = calls;
                async move {
                    Ok(Attempt {
                        value: seen,
                        terminal: false,
                    })
                }
            },
            Duration::from_secs(60),
            IntervalStrategy::Linear(Duration::from_secs(5)),
        )
        .await;

        assert!(started.elapsed() >= Duration::from_secs(60));
        assert_eq!(calls, 13);
        assert_eq!(
            result,
            Err(WaitError::Timeout {
                timeout: Duration::from_secs(60),
                last: Some(13),
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_still_honours_deadline() {
        let started = Instant::now();
        let mut calls = 0_u32;

        let result: Result<u32, WaitError<u32, ()>> = wait_for(
            || {
                calls += 1;
                let seen = calls;
                async move {
                    sleep(Duration::from_millis(5)).await;
                    Ok(Attempt {
                        value: seen,
                        terminal: false,
                    })
                }
            },
            Duration::from_millis(50),
            IntervalStrategy::Linear(Duration::ZERO),
        )
        .await;

        assert_eq!(started.elapsed().as_millis(), 50);
        assert_eq!(calls, 10);
        assert_eq!(
            result,
            Err(WaitError::Timeout {
                timeout: Duration::from_millis(50),
                last: Some(10),
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn getter_error_ends_wait() {
        let mut calls = 0_u32;
        let result: Result<u32, WaitError<u32, &str>> = wait_for(
            || {
                calls += 1;
                let seen = calls;
                async move {
                    if seen == 2 {
                        Err("boom")
                    } else {
                        Ok(Attempt {
                            value: seen,
                            terminal: false,
                        })
                    }
                }
            },
            Duration::from_secs(60),
            IntervalStrategy::Linear(Duration::from_secs(1)),
        )
        .await;

        assert_eq!(result, Err(WaitError::Get("boom")));
        assert_eq!(calls, 2);
    }
}
