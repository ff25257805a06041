//! Build a `VTIMEZONE` component from the IANA database.
//!
//! chrono-tz does not expose its transition table, so transitions are found by
//! sampling the UTC offset once a day across the window and bisecting each
//! change down to the second. Transitions with the same kind, offsets and
//! abbreviation share one `STANDARD`/`DAYLIGHT` observance: the first becomes
//! its `DTSTART`, the rest its `RDATE` list.

use chrono::{Duration, NaiveDate, NaiveDateTime, Offset, TimeZone};
use chrono_tz::{OffsetComponents, Tz};
use ics_core::{CalDateTime, Component, DateOrDateTime, DateTimeList, DateTimeValue, PropertyValue};

/// Earliest and latest year a window can name. `DTSTART` is written with a
/// four-digit year.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// The years covered by generated observances, `[first_year, last_year)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VTimezoneWindow {
    first_year: i32,
    last_year: i32,
}

impl VTimezoneWindow {
    /// A window from January 1st of `first_year` up to January 1st of
    /// `last_year`. The years are swapped if given in the wrong order and
    /// clamped to [`MIN_YEAR`]..=[`MAX_YEAR`].
    pub fn new(first_year: i32, last_year: i32) -> Self {
        let clamp = |year: i32| year.clamp(MIN_YEAR, MAX_YEAR);
        let window = Self {
            first_year: clamp(first_year.min(last_year)),
            last_year: clamp(first_year.max(last_year)),
        };
        if window.first_year != first_year.min(last_year)
            || window.last_year != first_year.max(last_year)
        {
            tracing::warn!(first_year, last_year, ?window, "VTIMEZONE window clamped");
        }
        window
    }

    pub fn first_year(&self) -> i32 {
        self.first_year
    }

    pub fn last_year(&self) -> i32 {
        self.last_year
    }

    fn start(&self) -> NaiveDateTime {
        january_first(self.first_year)
    }

    fn end(&self) -> NaiveDateTime {
        january_first(self.last_year)
    }
}

impl Default for VTimezoneWindow {
    fn default() -> Self {
        Self::new(1970, 2038)
    }
}

/// Midnight UTC on January 1st. Total for years in [`MIN_YEAR`]..=[`MAX_YEAR`].
fn january_first(year: i32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

/// UTC offset, DST flag and abbreviation in effect at some instant.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Observance {
    offset_seconds: i32,
    dst: bool,
    name: String,
}

impl Observance {
    fn at(tz: &Tz, utc: NaiveDateTime) -> Self {
        let offset = tz.offset_from_utc_datetime(&utc);
        Self {
            offset_seconds: offset.fix().local_minus_utc(),
            dst: offset.dst_offset() != Duration::zero(),
            name: offset.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Transition {
    utc: NaiveDateTime,
    from: Observance,
    to: Observance,
}

impl Transition {
    /// Local time of the transition, read on the clock before it.
    fn local_start(&self) -> NaiveDateTime {
        self.utc + Duration::seconds(i64::from(self.from.offset_seconds))
    }
}

fn transitions(tz: &Tz, window: &VTimezoneWindow) -> Vec<Transition> {
    let end = window.end();
    let mut found = Vec::new();
    let mut cursor = window.start();
    let mut current = Observance::at(tz, cursor);

    while cursor < end {
        let next = (cursor + Duration::days(1)).min(end);
        if Observance::at(tz, next) == current {
            cursor = next;
            continue;
        }

        // `lo` still has the old observance, `hi` already has the new one.
        let (mut lo, mut hi) = (cursor, next);
        while hi - lo > Duration::seconds(1) {
            let mid = lo + (hi - lo) / 2;
            if Observance::at(tz, mid) == current {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        let to = Observance::at(tz, hi);
        found.push(Transition {
            utc: hi,
            from: current,
            to: to.clone(),
        });
        current = to;
        cursor = hi;
    }

    found
}

/// Format a UTC offset as `+HHMM`, or `+HHMMSS` when seconds are present.
fn format_offset(seconds: i32) -> String {
    let sign = if seconds < 0 { '-' } else { '+' };
    let abs = seconds.unsigned_abs();
    let (hours, minutes, secs) = (abs / 3600, (abs % 3600) / 60, abs % 60);
    if secs == 0 {
        format!("{sign}{hours:02}{minutes:02}")
    } else {
        format!("{sign}{hours:02}{minutes:02}{secs:02}")
    }
}

fn observance_component(
    from: &Observance,
    to: &Observance,
    starts: Vec<NaiveDateTime>,
) -> Component {
    let kind = if to.dst { "DAYLIGHT" } else { "STANDARD" };
    let mut starts = starts.into_iter().map(CalDateTime::floating);
    let mut component = Component::new(kind)
        .with_property("TZNAME", PropertyValue::text(to.name.as_str()))
        .with_property("TZOFFSETFROM", PropertyValue::text(format_offset(from.offset_seconds)))
        .with_property("TZOFFSETTO", PropertyValue::text(format_offset(to.offset_seconds)));

    if let Some(first) = starts.next() {
        component.push_property("DTSTART", DateTimeValue::new(first));
    }
    let rest: Vec<DateOrDateTime> = starts.map(DateOrDateTime::DateTime).collect();
    if !rest.is_empty() {
        component.push_property("RDATE", DateTimeList::new(rest));
    }
    component
}

/// Build the `VTIMEZONE` for `tz` covering `window`.
pub fn build_vtimezone(tz: Tz, window: &VTimezoneWindow) -> Component {
    let mut vtimezone =
        Component::new("VTIMEZONE").with_property("TZID", PropertyValue::text(tz.name()));

    let transitions = transitions(&tz, window);
    if transitions.is_empty() {
        let start = window.start();
        let observance = Observance::at(&tz, start);
        let local = start + Duration::seconds(i64::from(observance.offset_seconds));
        vtimezone.push_component(observance_component(&observance, &observance, vec![local]));
        return vtimezone;
    }

    let mut groups: Vec<(Transition, Vec<NaiveDateTime>)> = Vec::new();
    for transition in transitions {
        let local = transition.local_start();
        let existing = groups
            .iter_mut()
            .find(|(first, _)| first.from == transition.from && first.to == transition.to);
        match existing {
            Some((_, starts)) => starts.push(local),
            None => groups.push((transition, vec![local])),
        }
    }

    for (first, starts) in groups {
        vtimezone.push_component(observance_component(&first.from, &first.to, starts));
    }

    tracing::debug!(
        zone = tz.name(),
        observances = vtimezone.components.len(),
        "built VTIMEZONE"
    );
    vtimezone
}
