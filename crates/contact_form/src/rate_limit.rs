//! Advisory, client-side submission throttle.
//!
//! One `RateLimitRecord` per storage origin counts attempts inside a fixed
//! window. Once the window has elapsed the record is hard-reset to a single
//! attempt; it does not slide or decay. A burst right at the boundary can
//! therefore reach twice the limit within a short span. This is the accepted
//! coarse-grained policy, not a bug.
//!
//! The limiter is only a deterrent: clearing client storage defeats it. It
//! fails open whenever storage is unavailable or holds garbage, and the
//! read-then-write on the record is not atomic, so two sessions submitting at
//! the same instant may both be admitted on the last free slot.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::ClientStorage;

pub const MAX_ATTEMPTS: u32 = 3;
pub const WINDOW: Duration = Duration::from_millis(3_600_000);
/// Storage key of the single, process-wide record.
pub const STORAGE_KEY: &str = "contactAttempts";

const MINUTE_MS: i64 = 60_000;

/// Source of wall-clock milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Hand-driven clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn at(millis: i64) -> Self {
        Self {
            now: AtomicI64::new(millis),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(duration_millis(by), Ordering::SeqCst);
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Persisted attempt counter.
///
/// Stored as `{"attempts": N, "timestamp": <window start ms>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRecord {
    pub attempts: u32,
    #[serde(rename = "timestamp")]
    pub window_start: i64,
}

impl RateLimitRecord {
    fn fresh(now: i64) -> Self {
        Self {
            attempts: 1,
            window_start: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_attempts: u32,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            window: WINDOW,
        }
    }
}

/// Verdict of `RateLimiter::check_and_record`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { minutes_remaining: u64 },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed)
    }

    pub fn minutes_remaining(&self) -> Option<u64> {
        match self {
            RateDecision::Allowed => None,
            RateDecision::Limited { minutes_remaining } => Some(*minutes_remaining),
        }
    }
}

pub struct RateLimiter {
    storage: Arc<dyn ClientStorage>,
    clock: Arc<dyn Clock>,
    policy: RateLimitPolicy,
    key: String,
}

impl RateLimiter {
    pub fn new(storage: Arc<dyn ClientStorage>, policy: RateLimitPolicy) -> Self {
        Self {
            storage,
            clock: Arc::new(SystemClock),
            policy,
            key: STORAGE_KEY.to_string(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Override the storage key (defaults to `contactAttempts`).
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Read the stored record without touching it.
    ///
    /// Unavailable storage and unparseable records both read as `None`.
    pub fn peek(&self) -> Option<RateLimitRecord> {
        let raw = match self.storage.get(&self.key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "rate limit storage unavailable; treating as no record");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "corrupt rate limit record; treating as no record");
                None
            }
        }
    }

    /// Decide whether a new attempt may proceed and record it if so.
    ///
    /// A rejected attempt leaves the record untouched.
    pub fn check_and_record(&self) -> RateDecision {
        let now = self.clock.now_millis();
        let window = duration_millis(self.policy.window);

        let Some(record) = self.peek() else {
            debug!("no rate limit record; starting a new window");
            self.store(RateLimitRecord::fresh(now));
            return RateDecision::Allowed;
        };

        // A window start in the future (clock moved backwards) counts as zero elapsed.
        let elapsed = now.saturating_sub(record.window_start).max(0);
        if elapsed > window {
            debug!(elapsed, "rate limit window expired; resetting");
            self.store(RateLimitRecord::fresh(now));
            return RateDecision::Allowed;
        }

        if record.attempts >= self.policy.max_attempts {
            let left = window - elapsed;
            let minutes_remaining = ((left + MINUTE_MS - 1) / MINUTE_MS).max(1) as u64;
            debug!(attempts = record.attempts, minutes_remaining, "submission throttled");
            return RateDecision::Limited { minutes_remaining };
        }

        self.store(RateLimitRecord {
            attempts: record.attempts + 1,
            window_start: record.window_start,
        });
        RateDecision::Allowed
    }

    fn store(&self, record: RateLimitRecord) {
        let encoded = match serde_json::to_string(&record) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "failed to encode rate limit record");
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.key, &encoded) {
            warn!(error = %e, "failed to persist rate limit record; allowing anyway");
        }
    }
}

fn duration_millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}
