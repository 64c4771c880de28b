use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;

/// Sliding window approximated from the current and previous fixed windows.
#[derive(Debug)]
struct SlidingWindow {
    window_size: Duration,
    limit: u32,
    current_window_start: Instant,
    current_count: u32,
    prev_count: u32,
    last_seen: Instant,
}

impl SlidingWindow {
    fn new(window_size: Duration, limit: u32, now: Instant) -> Self {
        Self {
            window_size,
            limit,
            current_window_start: now,
            current_count: 0,
            prev_count: 0,
            last_seen: now,
        }
    }

    fn roll(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.current_window_start);
        if elapsed >= self.window_size * 2 {
            self.prev_count = 0;
            self.current_count = 0;
            self.current_window_start = now;
        } else if elapsed >= self.window_size {
            self.prev_count = self.current_count;
            self.current_count = 0;
            self.current_window_start += self.window_size;
        }
    }

    fn allow(&mut self, now: Instant) -> RateDecision {
        self.roll(now);
        self.last_seen = now;

        let elapsed = now.duration_since(self.current_window_start);
        let weight = 1.0 - elapsed.as_secs_f64() / self.window_size.as_secs_f64();
        let effective = self.prev_count as f64 * weight + self.current_count as f64;

        if effective + 1.0 <= self.limit as f64 {
            self.current_count += 1;
            RateDecision {
                allowed: true,
                remaining: (self.limit as f64 - effective - 1.0).floor().max(0.0) as u32,
                retry_after: None,
            }
        } else {
            RateDecision {
                allowed: false,
                remaining: 0,
                retry_after: Some(self.window_size.saturating_sub(elapsed).as_secs().max(1)),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub remaining: u32,
    /// Seconds until the caller should try again.
    pub retry_after: Option<u64>,
}

/// Per-key limiter kept in process memory.
#[derive(Clone)]
pub struct SlidingWindowLimiter {
    map: Arc<DashMap<String, Arc<Mutex<SlidingWindow>>>>,
    window_size: Duration,
    limit: u32,
}

impl SlidingWindowLimiter {
    pub fn new(limit: u32, window_size: Duration) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            window_size,
            limit,
        }
    }

    pub fn per_hour(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(60 * 60))
    }

    fn window(&self, key: &str, now: Instant) -> Arc<Mutex<SlidingWindow>> {
        if let Some(existing) = self.map.get(key) {
            return existing.clone();
        }
        self.map
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SlidingWindow::new(self.window_size, self.limit, now))))
            .clone()
    }

    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let window = self.window(key, now);
        let mut guard = window.lock();
        guard.allow(now)
    }

    /// Drops keys idle for two windows; returns how many were removed.
    pub fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let ttl = self.window_size * 2;
        let before = self.map.len();
        self.map.retain(|_, window| now.duration_since(window.lock().last_seen) <= ttl);
        before - self.map.len()
    }

    pub fn tracked_keys(&self) -> usize {
        self.map.len()
    }
}
