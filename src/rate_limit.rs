// src/rate_limit.rs

//! Sliding-window rate limiter keyed by client identity. The window and
//! threshold are injected by the embedder; there is no process-global
//! state, so each serving surface owns its own limiter instance.

use std::collections::HashMap;
use std::time::{Duration, Instant};

pub struct RateLimiter {
    window: Duration,
    max_requests: usize,
    hits: HashMap<String, Vec<Instant>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        RateLimiter {
            window,
            max_requests,
            hits: HashMap::new(),
        }
    }

    /// Records a request for `client` and reports whether it is allowed.
    /// Hits older than the window are dropped before counting.
    pub fn check(&mut self, client: &str) -> bool {
        let now = Instant::now();
        let hits = self.hits.entry(client.to_string()).or_default();
        hits.retain(|hit| now.duration_since(*hit) < self.window);

        if hits.len() >= self.max_requests {
            return false;
        }
        hits.push(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_the_threshold() {
        let mut limiter = RateLimiter::new(Duration::from_secs(60), 2);
        assert!(limiter.check("1.2.3.4"));
        assert!(limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));
    }

    #[test]
    fn clients_are_tracked_independently() {
        let mut limiter = RateLimiter::new(Duration::from_secs(60), 1);
        assert!(limiter.check("alpha"));
        assert!(limiter.check("beta"));
        assert!(!limiter.check("alpha"));
    }

    #[test]
    fn hits_expire_with_the_window() {
        let mut limiter = RateLimiter::new(Duration::from_millis(20), 1);
        assert!(limiter.check("1.2.3.4"));
        assert!(!limiter.check("1.2.3.4"));
        std::thread::sleep(Duration::from_millis(30));
        assert!(limiter.check("1.2.3.4"));
    }
}
