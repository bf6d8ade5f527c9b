use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{debug, info};

use crate::metrics::TRACKED_KEYS;

// One fixed time bucket with a request ceiling, e.g. "2 per 1 minute".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateWindow {
    pub name: &'static str,
    pub duration: Duration,
    pub limit: u32,
}

impl RateWindow {
    pub fn minute(limit: u32) -> Self {
        Self {
            name: "minute",
            duration: Duration::from_secs(60),
            limit,
        }
    }

    pub fn day(limit: u32) -> Self {
        Self {
            name: "day",
            duration: Duration::from_secs(24 * 60 * 60),
            limit,
        }
    }

    pub fn describe(&self) -> String {
        format!("{} per 1 {}", self.limit, self.name)
    }
}

// Counter for one (key, window) pair
#[derive(Debug, Clone)]
pub struct RateLimitEntry {
    pub count: u32,
    pub window_start: Instant,
}

impl RateLimitEntry {
    fn expired(&self, now: Instant, window: &RateWindow) -> bool {
        now.saturating_duration_since(self.window_start) >= window.duration
    }
}

// Which window refused the request and when it frees up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub window: RateWindow,
    pub retry_after: Duration,
}

impl Denial {
    pub fn detail(&self) -> String {
        self.window.describe()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }
}

// In-memory fixed window limiter. Every key carries one counter per
// configured window; all of them must stay within their limit.
pub struct RateLimiter {
    windows: Vec<RateWindow>,
    entries: DashMap<String, Vec<RateLimitEntry>>,
}

impl RateLimiter {
    pub fn new(windows: Vec<RateWindow>) -> Self {
        Self {
            windows,
            entries: DashMap::new(),
        }
    }

    pub fn windows(&self) -> &[RateWindow] {
        &self.windows
    }

    pub fn tracked_keys(&self) -> usize {
        self.entries.len()
    }

    pub fn check(&self, key: &str) -> Decision {
        self.check_at(key, Instant::now())
    }

    // Counts the hit against every window, denied or not.
    pub fn check_at(&self, key: &str, now: Instant) -> Decision {
        // entry guard holds the shard lock: increment and compare are atomic per key
        let mut entry = self.entries.entry(key.to_string()).or_insert_with(|| {
            self.windows
                .iter()
                .map(|_| RateLimitEntry {
                    count: 0,
                    window_start: now,
                })
                .collect()
        });

        let mut denial = None;
        for (window, counter) in self.windows.iter().zip(entry.iter_mut()) {
            // window expired..? start a fresh one
            if counter.expired(now, window) {
                counter.count = 0;
                counter.window_start = now;
            }
            counter.count = counter.count.saturating_add(1);

            if denial.is_none() && counter.count > window.limit {
                let elapsed = now.saturating_duration_since(counter.window_start);
                denial = Some(Denial {
                    window: window.clone(),
                    retry_after: window.duration.saturating_sub(elapsed),
                });
            }
        }
        drop(entry);
        TRACKED_KEYS.set(self.entries.len() as f64);

        match denial {
            Some(d) => Decision::Denied(d),
            None => Decision::Allowed,
        }
    }

    // Drops keys whose windows have all run out. Returns how many went.
    pub fn sweep_at(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, counters| {
            !self
                .windows
                .iter()
                .zip(counters.iter())
                .all(|(window, counter)| counter.expired(now, window))
        });
        TRACKED_KEYS.set(self.entries.len() as f64);
        before.saturating_sub(self.entries.len())
    }
}

// Periodic cleanup so idle keys don't pile up
pub async fn rate_limit_sweeper(limiter: Arc<RateLimiter>, every: Duration) {
    let mut interval = interval(every);
    info!(interval = ?every, "rate limit sweeper started");

    loop {
        interval.tick().await;
        let removed = limiter.sweep_at(Instant::now());
        if removed > 0 {
            debug!(removed, remaining = limiter.tracked_keys(), "swept expired rate limit keys");
        }
    }
}
