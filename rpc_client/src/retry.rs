use rand::Rng;
use std::time::Duration;

/// Exponential backoff, base 1s doubling to a 30s ceiling, plus up to 10%
/// uniform jitter. Applied only to transport-level failures; domain errors
/// never reach this path.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter_fraction: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            jitter_fraction: 0.1,
        }
    }
}

impl RetryPolicy {
    /// Delay before the `attempt`th retry (1-based: the delay before the
    /// second overall try is `delay_for(1)`).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.as_millis().saturating_mul(1u128 << attempt.min(30));
        let capped = exp.min(self.max_delay.as_millis());
        let jitter_span = (capped as f64 * self.jitter_fraction) as u64;
        let jitter = if jitter_span == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=jitter_span)
        };
        Duration::from_millis(capped as u64 + jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_grows_but_never_exceeds_ceiling_plus_jitter() {
        let policy = RetryPolicy::default();
        for attempt in 0..10 {
            let delay = policy.delay_for(attempt);
            let ceiling_with_jitter = policy.max_delay + policy.max_delay.mul_f64(policy.jitter_fraction);
            assert!(delay <= ceiling_with_jitter, "attempt {attempt} delay {delay:?} exceeded ceiling");
        }
    }

    #[test]
    fn first_retry_delay_is_close_to_base() {
        let policy = RetryPolicy::default();
        let delay = policy.delay_for(0);
        assert!(delay >= policy.base_delay);
        assert!(delay <= policy.base_delay + policy.base_delay.mul_f64(0.1));
    }
}
