//! The rewrite rule applied to every temporal value.
//!
//! Only UTC and floating date-times are normalized. A date-time that already
//! names its zone is authoritative and stays as it is.
//!
//! | input    | output                                              |
//! |----------|-----------------------------------------------------|
//! | UTC      | same instant, wall clock of the target zone[^1]     |
//! | floating | same wall clock, target zone attached               |
//! | zoned    | unchanged                                           |
//!
//! [^1]: unless the instant is the later occurrence of an ambiguous wall-clock
//! time. The reading would resolve to the earlier one, so the value stays UTC.

use std::borrow::Cow;

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use ics_core::{CalDateTime, Zone};

use crate::dst::localize;

/// Zone names that denote UTC itself.
pub const UTC_ZONE_NAMES: [&str; 8] = [
    "UTC",
    "Etc/UTC",
    "Etc/UCT",
    "UCT",
    "Etc/Universal",
    "Universal",
    "Etc/Zulu",
    "Zulu",
];

/// What kind of zone information a date-time carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneKind {
    Utc,
    Floating,
    Zoned,
}

pub fn is_utc_name(name: &str) -> bool {
    UTC_ZONE_NAMES.contains(&name)
}

pub fn classify(dt: &CalDateTime) -> ZoneKind {
    match &dt.zone {
        None => ZoneKind::Floating,
        Some(Zone::Utc) => ZoneKind::Utc,
        Some(Zone::Named(name)) if is_utc_name(name) => ZoneKind::Utc,
        Some(Zone::Named(_)) => ZoneKind::Zoned,
    }
}

/// The zone attribute a date-time gets when it is expressed in `tz`.
pub fn zone_of(tz: Tz) -> Zone {
    if is_utc_name(tz.name()) {
        Zone::Utc
    } else {
        Zone::Named(tz.name().to_string())
    }
}

/// Express `dt` in `target` according to the table in the module docs.
///
/// Returns `Cow::Borrowed(dt)` whenever the result would equal the input, so
/// callers can tell "unchanged" apart from "changed to an equal value".
pub fn rewrite<'a>(dt: &'a CalDateTime, target: Tz) -> Cow<'a, CalDateTime> {
    let rewritten = match classify(dt) {
        ZoneKind::Zoned => return Cow::Borrowed(dt),
        ZoneKind::Utc => {
            let utc = Utc.from_utc_datetime(&dt.local);
            let local = utc.with_timezone(&target).naive_local();
            // The second occurrence of a repeated hour has no TZID reading.
            if localize(&target, local).with_timezone(&Utc) != utc {
                tracing::debug!(%utc, zone = target.name(), "no unambiguous local reading, keeping UTC");
                return Cow::Borrowed(dt);
            }
            CalDateTime {
                local,
                zone: Some(zone_of(target)),
            }
        }
        ZoneKind::Floating => CalDateTime {
            local: dt.local,
            zone: Some(zone_of(target)),
        },
    };

    if rewritten == *dt {
        Cow::Borrowed(dt)
    } else {
        Cow::Owned(rewritten)
    }
}

/// The absolute instant of a UTC or zoned date-time.
///
/// Named zones are looked up in the IANA database and resolved with
/// [`localize`]. Floating date-times and unknown zone names have no instant.
pub fn instant(dt: &CalDateTime) -> Option<DateTime<Utc>> {
    match classify(dt) {
        ZoneKind::Floating => None,
        ZoneKind::Utc => Some(Utc.from_utc_datetime(&dt.local)),
        ZoneKind::Zoned => {
            let tz: Tz = dt.tzid()?.parse().ok()?;
            Some(localize(&tz, dt.local).with_timezone(&Utc))
        }
    }
}
