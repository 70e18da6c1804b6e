// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// A clock that provides the current time.
///
/// Object safe: workers hold an `Arc<dyn Clock>` so tests can substitute
/// [`FakeClock`].
pub trait Clock: Send + Sync {
    /// Monotonic instant for measuring elapsed time.
    fn now(&self) -> Instant;
    /// Wall-clock time for record timestamps.
    fn utc_now(&self) -> DateTime<Utc>;
}

/// Real system clock
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fake clock for testing with controllable time
pub struct FakeClock {
    inner: Mutex<(Instant, DateTime<Utc>)>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new((Instant::now(), Utc::now())),
        }
    }

    /// Advance both the monotonic and wall-clock time.
    pub fn advance(&self, duration: Duration) {
        let mut inner = self.inner.lock();
        inner.0 += duration;
        inner.1 += chrono::Duration::from_std(duration).unwrap_or_default();
    }

    /// Pin the wall clock to a specific time.
    pub fn set_utc(&self, at: DateTime<Utc>) {
        self.inner.lock().1 = at;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.inner.lock().0
    }

    fn utc_now(&self) -> DateTime<Utc> {
        self.inner.lock().1
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
