//! Resolving wall-clock times that fall on a DST transition.
//!
//! A zoned iCalendar date-time is only a wall-clock reading plus a `TZID`.
//! Around transitions that reading can be ambiguous (the fall-back hour occurs
//! twice) or nonexistent (the spring-forward gap). RFC 5545 section 3.3.5
//! fixes the interpretation, and [`localize`] follows it:
//!
//! - ambiguous: the first occurrence (the earlier instant)
//! - nonexistent: the UTC offset in effect before the gap, which moves the
//!   reading forward by the length of the gap (02:30 becomes 03:30)

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;

/// How a wall-clock reading maps onto a zone's time line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTimeKind {
    /// Exactly one instant has this reading.
    Unique,
    /// Two instants have this reading (clocks were set back).
    Ambiguous,
    /// No instant has this reading (clocks were set forward).
    Nonexistent,
}

/// Classify `local` as a reading in `tz`.
pub fn local_time_kind(tz: &Tz, local: NaiveDateTime) -> LocalTimeKind {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(_) => LocalTimeKind::Unique,
        LocalResult::Ambiguous(_, _) => LocalTimeKind::Ambiguous,
        LocalResult::None => LocalTimeKind::Nonexistent,
    }
}

/// Resolve a wall-clock reading in `tz` to an instant.
pub fn localize(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => {
            tracing::debug!(%local, zone = tz.name(), "ambiguous local time, picking the first occurrence");
            earliest
        }
        LocalResult::None => {
            let before_gap = tz
                .offset_from_utc_datetime(&(local - Duration::days(1)))
                .fix();
            let utc = local - Duration::seconds(i64::from(before_gap.local_minus_utc()));
            tracing::debug!(%local, zone = tz.name(), "nonexistent local time, using the offset before the gap");
            tz.from_utc_datetime(&utc)
        }
    }
}
