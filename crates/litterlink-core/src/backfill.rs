// ── Backfill policy ──
//
// Day-by-day history walking for PetKit and the bookkeeping shared by
// both adapters. Which device types are fetched, and which return their
// whole history in one call, is fixed here.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CoreError;

/// PetKit litter box types whose records we understand.
pub const SUPPORTED_DEVICE_TYPES: [&str; 4] = ["t3", "t4", "t5", "t6"];

/// Types that ignore the requested day and return everything at once.
pub const BULK_DEVICE_TYPES: [&str; 2] = ["t5", "t6"];

pub fn is_supported(device_type: &str) -> bool {
    SUPPORTED_DEVICE_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(device_type))
}

pub fn is_bulk(device_type: &str) -> bool {
    BULK_DEVICE_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(device_type))
}

/// Log at `warn` when diagnostics are on, otherwise at `debug`.
macro_rules! diag {
    ($enabled:expr, $($arg:tt)+) => {
        if $enabled {
            ::tracing::warn!($($arg)+);
        } else {
            ::tracing::debug!($($arg)+);
        }
    };
}
pub(crate) use diag;

/// Count and log a failed history page, or propagate it when the session
/// is gone. Authentication failures have already used their one retry.
pub(crate) fn skip_failed_page(
    summary: &mut FetchSummary,
    err: litterlink_api::Error,
    page: &str,
    diagnostics: bool,
) -> Result<(), CoreError> {
    if err.is_auth_expired() {
        return Err(err.into());
    }
    summary.pages_failed += 1;
    diag!(diagnostics, page, error = %err, "skipping unreadable history page");
    Ok(())
}

// ── DayWalk ─────────────────────────────────────────────────────────

/// Cursor over calendar days, newest first.
///
/// Yields `today`, then each previous day, for at most `depth` days. A
/// bulk walk yields only `today`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayWalk {
    next: Option<NaiveDate>,
    remaining: u32,
    bulk: bool,
}

impl DayWalk {
    pub fn new(today: NaiveDate, depth: u32) -> Self {
        Self {
            next: Some(today),
            remaining: depth,
            bulk: false,
        }
    }

    /// Walk for one PetKit device type.
    pub fn for_device(today: NaiveDate, depth: u32, device_type: &str) -> Self {
        let walk = Self::new(today, depth);
        if is_bulk(device_type) {
            walk.single_shot()
        } else {
            walk
        }
    }

    /// Stop after the first day regardless of depth.
    pub fn single_shot(mut self) -> Self {
        self.bulk = true;
        self
    }
}

impl Iterator for DayWalk {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.remaining == 0 {
            return None;
        }
        let day = self.next?;
        self.remaining = if self.bulk { 0 } else { self.remaining - 1 };
        self.next = day.pred_opt();
        Some(day)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let upper = if self.next.is_none() {
            0
        } else if self.bulk {
            usize::from(self.remaining > 0)
        } else {
            usize::try_from(self.remaining).unwrap_or(usize::MAX)
        };
        (0, Some(upper))
    }
}

// ── FetchSummary ────────────────────────────────────────────────────

/// What one `fetch_all_data` call retrieved and what it had to skip.
///
/// A page is one history request: a device-day for PetKit, one pet's
/// weight history or one robot's activity for Whisker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FetchSummary {
    pub pets: usize,
    pub visits: usize,
    pub statuses: usize,
    pub pages_attempted: usize,
    pub pages_failed: usize,
    /// Records dropped for missing mandatory fields.
    pub records_skipped: usize,
    /// Devices outside the supported type set.
    pub devices_skipped: usize,
}

impl FetchSummary {
    /// At least one page was requested and none could be read.
    pub fn all_pages_failed(&self) -> bool {
        self.pages_attempted > 0 && self.pages_failed == self.pages_attempted
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn walks_backward_across_month_boundary() {
        let days: Vec<_> = DayWalk::new(day(2026, 3, 2), 4).collect();
        assert_eq!(
            days,
            vec![
                day(2026, 3, 2),
                day(2026, 3, 1),
                day(2026, 2, 28),
                day(2026, 2, 27)
            ]
        );
    }

    #[test]
    fn zero_depth_yields_nothing() {
        assert_eq!(DayWalk::new(day(2026, 10, 19), 0).count(), 0);
        assert_eq!(
            DayWalk::for_device(day(2026, 10, 19), 0, "t6").count(),
            0
        );
    }

    #[test]
    fn bulk_devices_stop_after_first_day() {
        let days: Vec<_> = DayWalk::for_device(day(2026, 10, 19), 30, "T5").collect();
        assert_eq!(days, vec![day(2026, 10, 19)]);
        assert_eq!(DayWalk::for_device(day(2026, 10, 19), 30, "t4").count(), 30);
    }

    #[test]
    fn device_type_sets() {
        assert!(is_supported("T3"));
        assert!(is_supported("t6"));
        assert!(!is_supported("d4"));
        assert!(!is_supported("t7"));
        assert!(is_bulk("t6"));
        assert!(!is_bulk("t4"));
    }

    #[test]
    fn total_failure_detection() {
        let mut summary = FetchSummary::default();
        assert!(!summary.all_pages_failed());
        summary.pages_attempted = 3;
        summary.pages_failed = 3;
        assert!(summary.all_pages_failed());
        summary.pages_failed = 2;
        assert!(!summary.all_pages_failed());
    }
}
