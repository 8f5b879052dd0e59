//! Retry policy for lookups that may come back empty for a while, such as a
//! MAC address table right after a link came up.

use std::time::{Duration, Instant};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same pause after every attempt.
    Fixed(Duration),
    /// Pause doubles after every attempt, capped at `max`.
    Exponential { initial: Duration, max: Duration },
}

impl Backoff {
    /// Pause after the given (zero based) attempt.
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { initial, max } => {
                let factor = 1u32.checked_shl(attempt.min(31)).unwrap_or(u32::MAX);
                initial.saturating_mul(factor).min(max)
            }
        }
    }
}

/// Bounds a retry loop by attempt count and, optionally, by wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
    pub deadline: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Backoff::Fixed(DEFAULT_DELAY),
            deadline: None,
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no waiting.
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            backoff: Backoff::Fixed(Duration::ZERO),
            deadline: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn start(&self) -> RetryState {
        RetryState {
            policy: *self,
            started: Instant::now(),
            attempts: 0,
        }
    }
}

/// Progress through one retry loop.
#[derive(Debug)]
pub struct RetryState {
    policy: RetryPolicy,
    started: Instant,
    attempts: u32,
}

impl RetryState {
    /// Records a failed attempt and returns the pause before the next one,
    /// or `None` when the policy is exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        let attempt = self.attempts;
        self.attempts += 1;

        if self.attempts >= self.policy.max_attempts {
            return None;
        }

        let delay = self.policy.backoff.delay(attempt);
        if let Some(deadline) = self.policy.deadline {
            if self.started.elapsed() + delay >= deadline {
                return None;
            }
        }
        Some(delay)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_policy_should_stop_after_max_attempts() {
        let policy = RetryPolicy::default()
            .with_max_attempts(3)
            .with_backoff(Backoff::Fixed(Duration::ZERO));
        let mut state = policy.start();

        assert_eq!(state.next_delay(), Some(Duration::ZERO));
        assert_eq!(state.next_delay(), Some(Duration::ZERO));
        assert_eq!(state.next_delay(), None);
        assert_eq!(state.attempts(), 3);
    }

    #[test]
    fn once_should_never_wait() {
        let mut state = RetryPolicy::once().start();
        assert_eq!(state.next_delay(), None);
    }

    #[test]
    fn exponential_backoff_should_be_capped() {
        let backoff = Backoff::Exponential {
            initial: Duration::from_millis(10),
            max: Duration::from_millis(50),
        };

        assert_eq!(backoff.delay(0), Duration::from_millis(10));
        assert_eq!(backoff.delay(2), Duration::from_millis(40));
        assert_eq!(backoff.delay(3), Duration::from_millis(50));
        assert_eq!(backoff.delay(40), Duration::from_millis(50));
    }

    #[test]
    fn deadline_should_end_the_loop_before_the_attempt_cap() {
        let policy = RetryPolicy::default()
            .with_backoff(Backoff::Fixed(Duration::from_secs(5)))
            .with_deadline(Duration::from_secs(1));
        let mut state = policy.start();

        assert_eq!(state.next_delay(), None);
        assert_eq!(state.attempts(), 1);
    }
}
