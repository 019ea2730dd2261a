//! Jittered time-to-live computation for cached links.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::time::Duration;

use crate::domain::entities::Link;

/// Chooses how long a link snapshot may live in the cache.
///
/// For an average TTL `A` the base TTL is `0.75·A + U(0, A)/2`, where
/// `U(0, A)` is uniform in `[0, A)`. Expirations therefore spread over
/// `[0.75·A, 1.25·A)` instead of landing at the same instant. When the link has
/// an `expires_at`, the TTL is capped at the time remaining until then.
#[derive(Debug, Clone, Copy)]
pub struct TtlPolicy {
    average: Duration,
}

impl TtlPolicy {
    pub fn new(average: Duration) -> Self {
        Self { average }
    }

    pub fn average(&self) -> Duration {
        self.average
    }

    /// Draws a jittered TTL around the configured average.
    pub fn jittered(&self) -> Duration {
        let average_ms = u64::try_from(self.average.as_millis()).unwrap_or(u64::MAX);
        let draw = if average_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..average_ms)
        };

        Duration::from_millis(average_ms.saturating_mul(3) / 4 + draw / 2)
    }

    /// Returns the TTL to use for `link`, or `None` if it must not be cached.
    ///
    /// `None` means the link is already at or past its `expires_at`.
    pub fn ttl_for(&self, link: &Link, now: DateTime<Utc>) -> Option<Duration> {
        cap_at_expiry(self.jittered(), link.expires_at, now)
    }
}

fn cap_at_expiry(
    ttl: Duration,
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<Duration> {
    let Some(expires_at) = expires_at else {
        return Some(ttl);
    };

    // to_std fails for negative deltas, i.e. already expired
    let remaining = (expires_at - now).to_std().ok()?;
    if remaining.is_zero() {
        return None;
    }

    Some(ttl.min(remaining))
}
