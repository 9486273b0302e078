use chrono::{DateTime, Utc};
use std::time::Instant;

/// A simple clock abstraction for deterministic wall time in services and
/// tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum WallClock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl WallClock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            WallClock::Default => Utc::now(),
            WallClock::Fixed(t) => *t,
        }
    }

    /// Returns true if this clock is fixed.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, WallClock::Fixed(_))
    }
}

/// Clock for typing telemetry timestamps.
///
/// Timestamps are milliseconds on a monotonic axis so inter-event intervals
/// (dwell time, flight time) stay meaningful regardless of wall-clock
/// adjustments. The `Manual` variant gives tests deterministic control.
#[derive(Debug, Clone, Copy)]
pub enum TelemetryClock {
    /// Milliseconds elapsed since the clock was started.
    Monotonic(Instant),
    /// A hand-advanced timestamp in milliseconds.
    Manual(f64),
}

impl TelemetryClock {
    /// Returns a monotonic clock starting at the current instant.
    #[must_use]
    pub fn start() -> Self {
        Self::Monotonic(Instant::now())
    }

    /// Returns a manual clock positioned at `now_ms`.
    #[must_use]
    pub fn manual(now_ms: f64) -> Self {
        Self::Manual(now_ms)
    }

    /// Returns the current timestamp in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> f64 {
        match self {
            TelemetryClock::Monotonic(origin) => origin.elapsed().as_secs_f64() * 1000.0,
            TelemetryClock::Manual(now_ms) => *now_ms,
        }
    }

    /// If this is a manual clock, advance it by `delta_ms`.
    ///
    /// Has no effect on `TelemetryClock::Monotonic`.
    pub fn advance(&mut self, delta_ms: f64) {
        if let TelemetryClock::Manual(now_ms) = self {
            *now_ms += delta_ms;
        }
    }

    /// Returns true if this clock is hand-advanced.
    #[must_use]
    pub fn is_manual(&self) -> bool {
        matches!(self, TelemetryClock::Manual(_))
    }
}

impl Default for TelemetryClock {
    fn default() -> Self {
        Self::start()
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `WallClock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> WallClock {
    WallClock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let mut clock = TelemetryClock::manual(100.0);
        assert_eq!(clock.now_ms(), 100.0);
        clock.advance(25.5);
        assert_eq!(clock.now_ms(), 125.5);
    }

    #[test]
    fn monotonic_clock_does_not_go_backwards() {
        let clock = TelemetryClock::start();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }

    #[test]
    fn fixed_wall_clock_is_stable() {
        let clock = fixed_clock();
        assert!(clock.is_fixed());
        assert_eq!(clock.now(), fixed_now());
    }
}
