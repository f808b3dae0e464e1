use dashmap::DashMap;
use std::collections::VecDeque;
use std::net::IpAddr;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(30 * 60),
            max_requests: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the oldest counted request leaves the window.
    pub reset: Duration,
}

/// Sliding-window log limiter: every accepted request is timestamped per client,
/// and a client may have at most `max_requests` stamps younger than `window`.
/// Refused requests are not recorded.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    hits: DashMap<IpAddr, VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            hits: DashMap::new(),
        }
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    pub fn check(&self, client: IpAddr) -> RateLimitStatus {
        let now = Instant::now();
        let window = self.config.window;
        let limit = self.config.max_requests;

        let mut log = self.hits.entry(client).or_default();
        while log.front().is_some_and(|&t| now.duration_since(t) >= window) {
            log.pop_front();
        }

        let allowed = (log.len() as u64) < limit as u64;
        if allowed {
            log.push_back(now);
        }

        let reset = log.front()
            .map(|&oldest| window.saturating_sub(now.duration_since(oldest)))
            .unwrap_or(window);

        RateLimitStatus {
            allowed,
            limit,
            remaining: limit.saturating_sub(log.len() as u32),
            reset,
        }
    }

    /// Drops clients with no request inside the window. Returns how many were dropped.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let window = self.config.window;
        let before = self.hits.len();

        self.hits.retain(|_, log| log.back().is_some_and(|&t| now.duration_since(t) < window));

        before.saturating_sub(self.hits.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.hits.len()
    }
}
