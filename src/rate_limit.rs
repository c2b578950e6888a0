use dashmap::DashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::debug;

use crate::metrics::TRACKED_CLIENTS;

// Longest window we accept, keeps `now + window` far away from Instant overflow
pub const MAX_WINDOW_SECS: u64 = 365 * 24 * 60 * 60;
pub const MAX_WINDOW: Duration = Duration::from_secs(MAX_WINDOW_SECS);

// Rate limit entry - tracks requests per client in the current window
#[derive(Debug, Clone, Copy)]
pub struct WindowEntry {
    pub count: u32,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow { remaining: u32 },
    Reject { retry_after: Duration },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }
}

/// Fixed-window request counter keyed by client.
///
/// The first request of a window starts it; the window ends `window` later
/// no matter how requests are spread inside it. Rejected requests still
/// count, so a client hammering the service stays rejected until the
/// window runs out. Windows longer than [`MAX_WINDOW`] are clamped to it.
pub struct RateLimiter {
    clients: DashMap<String, WindowEntry>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(limit: NonZeroU32, window: Duration) -> Self {
        Self {
            clients: DashMap::new(),
            limit: limit.get(),
            window: window.min(MAX_WINDOW),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn admit(&self, key: &str) -> Decision {
        self.admit_at(key, Instant::now())
    }

    pub fn admit_at(&self, key: &str, now: Instant) -> Decision {
        let decision = self.count_request(key, now);
        // len() locks every shard, so only after the entry guard is gone
        TRACKED_CLIENTS.set(self.clients.len() as f64);
        decision
    }

    fn count_request(&self, key: &str, now: Instant) -> Decision {
        // The entry guard holds the shard lock until we return, which makes
        // check-and-increment atomic per client.
        let mut entry = self
            .clients
            .entry(key.to_string())
            .or_insert(WindowEntry {
                count: 0,
                expires_at: now,
            });

        // new client or window over? start a fresh one
        if now >= entry.expires_at {
            *entry = WindowEntry {
                count: 1,
                // window <= MAX_WINDOW, so this cannot overflow
                expires_at: now + self.window,
            };
            return Decision::Allow {
                remaining: self.limit - 1,
            };
        }

        entry.count = entry.count.saturating_add(1);
        if entry.count > self.limit {
            return Decision::Reject {
                retry_after: entry.expires_at - now,
            };
        }

        Decision::Allow {
            remaining: self.limit - entry.count,
        }
    }

    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }

    /// Drops every client whose window has ended by `now`. Returns how many
    /// entries were removed.
    pub fn sweep_expired(&self, now: Instant) -> usize {
        let before = self.clients.len();
        self.clients.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.clients.len())
    }
}

// Periodically forget clients whose window is over
pub async fn sweeper(limiter: Arc<RateLimiter>, every: Duration) {
    let mut interval = interval(every);

    loop {
        interval.tick().await;

        let removed = limiter.sweep_expired(Instant::now());
        let tracked = limiter.tracked_clients();
        TRACKED_CLIENTS.set(tracked as f64);

        if removed > 0 {
            debug!(removed, tracked, "Swept expired rate limit windows");
        }
    }
}
