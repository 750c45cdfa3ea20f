//! Wall-clock sources for session freshness checks.
//!
//! `std::time::SystemTime` is unavailable on `wasm32-unknown-unknown`, so the
//! browser build reads `Date.now()` instead.

#[cfg(test)]
#[path = "clock_test.rs"]
mod clock_test;

use std::cell::Cell;
use std::rc::Rc;

/// Source of the current Unix time in seconds.
pub trait Clock {
    fn now_secs(&self) -> i64;
}

/// Native clock backed by `SystemTime`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
    }
}

/// Browser clock backed by `Date.now()`.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserClock;

#[cfg(feature = "hydrate")]
impl Clock for BrowserClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now_secs(&self) -> i64 {
        (js_sys::Date::now() / 1000.0).floor() as i64
    }
}

/// Manually driven clock. Clones share the same instant.
#[derive(Clone, Debug, Default)]
pub struct FixedClock {
    now: Rc<Cell<i64>>,
}

impl FixedClock {
    #[must_use]
    pub fn at(now_secs: i64) -> Self {
        Self { now: Rc::new(Cell::new(now_secs)) }
    }

    pub fn set(&self, now_secs: i64) {
        self.now.set(now_secs);
    }

    pub fn advance(&self, secs: i64) {
        self.now.set(self.now.get() + secs);
    }
}

impl Clock for FixedClock {
    fn now_secs(&self) -> i64 {
        self.now.get()
    }
}

/// Clock for the current environment.
pub fn default_clock() -> Box<dyn Clock> {
    #[cfg(feature = "hydrate")]
    {
        Box::new(BrowserClock)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Box::new(SystemClock)
    }
}
