//! Wall-clock sources.
//!
//! [`TotpEngine`](crate::TotpEngine) reads the time through a [`Clock`] so that callers can
//! substitute fixed or stepped time in tests instead of waiting on the real clock.

use core::convert::TryFrom;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of the current time.
pub trait Clock {
    /// Time elapsed since the Unix epoch.
    fn now(&self) -> Duration;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// The operating system's real-time clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_else(|err| {
                tracing::warn!(behind = ?err.duration(), "system clock is set before the Unix epoch");
                Duration::ZERO
            })
    }
}

/// A clock that always reads the same instant.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FixedClock(pub Duration);

impl FixedClock {
    /// A clock fixed `secs` seconds after the Unix epoch.
    pub const fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Duration {
        self.0
    }
}

/// A clock moved explicitly by its owner, with millisecond resolution.
///
/// Reads and updates are atomic, so a shared `ManualClock` can be stepped from one thread while
/// engines on other threads read it.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    /// A clock starting at `now` since the Unix epoch.
    pub fn new(now: Duration) -> Self {
        Self {
            millis: AtomicU64::new(to_millis(now)),
        }
    }

    /// A clock starting `secs` seconds after the Unix epoch.
    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: Duration) {
        self.millis.store(to_millis(now), Ordering::SeqCst);
    }

    /// Moves the clock forward by `elapsed`, saturating at the largest representable time.
    pub fn advance(&self, elapsed: Duration) {
        let elapsed = to_millis(elapsed);
        // The closure never returns `None`, so the update cannot fail
        let _ = self
            .millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |millis| {
                Some(millis.saturating_add(elapsed))
            });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

fn to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
