//! Politeness rate limiting
//!
//! The crawler is strictly sequential; a random pause after each
//! successful fetch keeps the request rate irregular and low.

use rand::Rng;
use std::time::Duration;

/// A uniform random delay applied after each successful fetch
#[derive(Debug, Clone, Copy)]
pub struct Politeness {
    min: Duration,
    max: Duration,
}

impl Politeness {
    /// Creates a politeness delay drawing uniformly from `[min, max]` seconds
    pub fn new(min_secs: f64, max_secs: f64) -> Self {
        Self {
            min: Duration::from_secs_f64(min_secs),
            max: Duration::from_secs_f64(max_secs),
        }
    }

    /// No delay at all, for tests and offline runs
    pub fn disabled() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    /// Sleeps for a random duration in the configured range
    pub async fn pause(&self) {
        if self.max.is_zero() {
            return;
        }

        // The rng handle is not Send; pick the delay before awaiting
        let delay = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64())
        };

        tokio::time::sleep(Duration::from_secs_f64(delay)).await;
    }
}

impl Default for Politeness {
    fn default() -> Self {
        Self::new(2.0, 5.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_disabled_returns_immediately() {
        let start = Instant::now();
        Politeness::disabled().pause().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_pause_within_range() {
        let politeness = Politeness::new(0.01, 0.05);
        let start = Instant::now();
        politeness.pause().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(10));
        assert!(elapsed < Duration::from_millis(500));
    }
}
