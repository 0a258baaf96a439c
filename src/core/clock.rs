// Injectable time source. The coordinator never reads the system clock
// directly so tests can drive timers deterministically.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeZone, Utc};

pub trait Clock: Send {
    /// Monotonic instant used for scheduling.
    fn instant(&self) -> Instant;
    /// Wall-clock time used for alert timestamps.
    fn wall(&self) -> DateTime<Utc>;
}

/// Real time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn instant(&self) -> Instant {
        Instant::now()
    }

    fn wall(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct ManualInner {
    base: Instant,
    wall_base: DateTime<Utc>,
    offset: Duration,
}

/// Hand-advanced clock for tests. Clones share the same underlying time.
#[derive(Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualInner>>,
}

impl ManualClock {
    pub fn new() -> Self {
        let wall_base = Utc
            .with_ymd_and_hms(2024, 11, 1, 8, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            inner: Arc::new(Mutex::new(ManualInner {
                base: Instant::now(),
                wall_base,
                offset: Duration::ZERO,
            })),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn instant(&self) -> Instant {
        let inner = self.inner.lock().unwrap();
        inner.base + inner.offset
    }

    fn wall(&self) -> DateTime<Utc> {
        let inner = self.inner.lock().unwrap();
        inner.wall_base + chrono::Duration::from_std(inner.offset).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances_shared() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        let start = clock.instant();

        handle.advance(Duration::from_secs(45));

        assert_eq!(clock.instant() - start, Duration::from_secs(45));
        assert_eq!(
            clock.wall() - handle.wall(),
            chrono::Duration::zero()
        );
    }
}
