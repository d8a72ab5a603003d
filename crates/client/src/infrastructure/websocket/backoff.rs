//! Exponential backoff for connection attempts.

use rand::Rng;

use crate::config::RetryConfig;

/// Exponential backoff state shared by connect logic.
#[derive(Debug, Clone)]
pub struct BackoffState {
    config: RetryConfig,
    attempts: u32,
    delay_ms: u64,
}

impl BackoffState {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            delay_ms: config.initial_delay_ms,
            config,
            attempts: 0,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.config.max_attempts
    }

    /// Record an attempt.
    ///
    /// Returns the delay to wait *before* performing it: zero for the first
    /// attempt, `None` once every attempt has been used.
    pub fn next_delay_and_advance(&mut self) -> Option<u64> {
        if self.is_exhausted() {
            return None;
        }

        self.attempts += 1;
        if self.attempts == 1 {
            return Some(0);
        }

        let current_delay = self.delay_ms;
        self.delay_ms = ((self.delay_ms as f64) * self.config.multiplier)
            .min(self.config.max_delay_ms as f64) as u64;
        Some(self.jittered(current_delay))
    }

    /// Spread `delay` by ±`jitter_factor` so restarts don't retry in lockstep.
    fn jittered(&self, delay: u64) -> u64 {
        let jitter_range = (delay as f64 * self.config.jitter_factor) as i64;
        if jitter_range > 0 {
            let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
            (delay as i64 + jitter).max(0) as u64
        } else {
            delay
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay_ms: 100,
            max_delay_ms: 350,
            multiplier: 2.0,
            jitter_factor: 0.0,
        }
    }

    #[test]
    fn first_attempt_is_immediate_then_grows_to_cap() {
        let mut backoff = BackoffState::new(config(5));
        let delays: Vec<u64> = std::iter::from_fn(|| backoff.next_delay_and_advance()).collect();

        assert_eq!(delays, vec![0, 100, 200, 350, 350]);
        assert!(backoff.is_exhausted());
        assert_eq!(backoff.attempts(), 5);
    }

    #[test]
    fn jitter_stays_within_range() {
        let mut cfg = config(50);
        cfg.max_delay_ms = 1_000;
        cfg.initial_delay_ms = 1_000;
        cfg.jitter_factor = 0.2;
        let mut backoff = BackoffState::new(cfg);
        backoff.next_delay_and_advance();

        while let Some(delay) = backoff.next_delay_and_advance() {
            assert!((800..=1_200).contains(&delay), "delay {delay} out of range");
        }
    }
}
