//! Pluggable clock for the scheduler.
//!
//! Production uses wall time; tests pin the clock to assert firing
//! decisions deterministically.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Days, Local, NaiveTime};

/// Source of the current local time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// The current local date-time.
    fn now(&self) -> DateTime<Local>;

    /// The current local time of day.
    fn time_of_day(&self) -> NaiveTime {
        self.now().time()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Time remaining until the next local midnight.
///
/// Computed on naive local time; a DST shift may make a single reset a bit
/// early or late, which only moves when the daily counter clears.
pub fn duration_until_midnight(now: DateTime<Local>) -> Duration {
    let next_midnight = now
        .date_naive()
        .checked_add_days(Days::new(1))
        .and_then(|d| d.and_hms_opt(0, 0, 0));

    match next_midnight {
        Some(midnight) => {
            let remaining = midnight - now.naive_local();
            remaining.to_std().unwrap_or(Duration::from_secs(1))
        }
        // Unreachable in practice (date overflow); retry in a day.
        None => Duration::from_secs(24 * 60 * 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_duration_until_midnight() {
        let now = Local.with_ymd_and_hms(2026, 3, 10, 23, 0, 0).unwrap();
        let remaining = duration_until_midnight(now);
        assert_eq!(remaining, Duration::from_secs(60 * 60));
    }

    #[test]
    fn test_duration_until_midnight_just_after_midnight() {
        let now = Local.with_ymd_and_hms(2026, 3, 10, 0, 0, 1).unwrap();
        let remaining = duration_until_midnight(now);
        assert_eq!(remaining, Duration::from_secs(24 * 60 * 60 - 1));
    }
}
