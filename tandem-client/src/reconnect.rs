use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Every attempt waits `ReconnectPolicy::delay`.
    Fixed,
    /// `delay * factor^(attempt - 1)`, capped at `max`.
    Exponential { factor: u32, max: Duration },
}

/// Decides whether a failed session instance is retried and after how long.
/// `attempt` is the 1-based number of the retry about to be scheduled, or the
/// count of retries already made when asking `should_retry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub backoff: Backoff,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(3),
            backoff: Backoff::Fixed,
        }
    }
}

impl ReconnectPolicy {
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    pub fn next_delay(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential { factor, max } => {
                let scale = factor.saturating_pow(attempt.saturating_sub(1));
                self.delay.saturating_mul(scale).min(max)
            }
        }
    }
}
