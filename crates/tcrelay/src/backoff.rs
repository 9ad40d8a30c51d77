//! Reconnect delays: exponential, capped, with random jitter.

use std::time::Duration;

use rand::Rng;

use crate::ReconnectConfig;

/// Produces the wait before each reconnect attempt.
///
/// The base delay starts at `initial_delay`, doubles after every attempt
/// and stops growing at `max_delay`. Each returned delay adds a random
/// `0..=jitter` so that several relays restarted together do not hit the
/// realm server in lockstep.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    jitter: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(config: &ReconnectConfig) -> Self {
        let initial = config.initial_delay();
        Self {
            initial,
            max: config.max_delay(),
            jitter: config.jitter(),
            current: initial,
        }
    }

    /// Returns the next delay and advances the schedule.
    pub fn next_delay(&mut self) -> Duration {
        let base = self.current;
        self.current = self.current.saturating_mul(2).min(self.max);
        base + self.sample_jitter()
    }

    /// Restarts the schedule at `initial_delay`. Called after a
    /// successful connect.
    pub fn reset(&mut self) {
        self.current = self.initial;
    }

    fn sample_jitter(&self) -> Duration {
        let max_ms = self.jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=max_ms))
    }
}
