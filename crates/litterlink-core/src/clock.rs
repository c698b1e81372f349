// ── Time source ──
//
// The facade never calls `Utc::now()` directly; it asks a `Clock`. Tests
// pin the instant with `FixedClock`.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date at `now()` in `timezone`.
    fn today_in(&self, timezone: Tz) -> NaiveDate {
        self.now().with_timezone(&timezone).date_naive()
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn today_is_local_date() {
        // 02:30 UTC is still the previous evening in New York.
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 10, 19, 2, 30, 0).unwrap());
        assert_eq!(
            clock.today_in(chrono_tz::America::New_York),
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
        );
        assert_eq!(
            clock.today_in(Tz::UTC),
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
        );
    }
}
