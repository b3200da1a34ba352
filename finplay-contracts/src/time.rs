//! Wall-clock abstraction
//!
//! "Last played" stamps come from an injected provider so next-up behaviour
//! can be tested without the system clock.

use chrono::{DateTime, Duration, Utc};
use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};

/// Source of the current UTC time.
pub trait TimeProvider: Send + Sync + Debug + 'static {
    fn utc_now(&self) -> DateTime<Utc>;

    /// Clone the time provider into a boxed trait object
    fn clone_box(&self) -> Box<dyn TimeProvider>;
}

/// Production time provider that uses real system time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn clone_box(&self) -> Box<dyn TimeProvider> {
        Box::new(*self)
    }
}

/// Time provider that only moves when told to. Clones share the same clock.
#[derive(Clone, Debug)]
pub struct ManualTimeProvider {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualTimeProvider {
    pub fn new_at(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    pub fn set_utc(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }
}

impl TimeProvider for ManualTimeProvider {
    fn utc_now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn clone_box(&self) -> Box<dyn TimeProvider> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_advances_and_shares_state() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let clock = ManualTimeProvider::new_at(start);
        let shared = clock.clone_box();

        clock.advance(Duration::minutes(5));
        assert_eq!(shared.utc_now(), start + Duration::minutes(5));

        clock.set_utc(start);
        assert_eq!(shared.utc_now(), start);
    }

    #[test]
    fn system_clock_moves_forward() {
        let provider = SystemTimeProvider;
        let first = provider.utc_now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(provider.utc_now() > first);
    }
}
