//! Conversion entry point.

use std::sync::Arc;

use chrono_tz::Tz;
use ics_core::Component;

use crate::cache::TimezoneCache;
use crate::error::{ConvertError, Result};
use crate::walker::{walk, ZonePolicy};

/// The calendar property naming the document-wide default zone.
pub const X_WR_TIMEZONE: &str = "X-WR-TIMEZONE";

/// The zone to convert into, by name or already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetZone {
    Name(String),
    Resolved(Tz),
}

impl TargetZone {
    pub fn resolve(&self) -> Result<Tz> {
        match self {
            TargetZone::Name(name) => resolve_zone(name),
            TargetZone::Resolved(tz) => Ok(*tz),
        }
    }
}

impl From<&str> for TargetZone {
    fn from(name: &str) -> Self {
        TargetZone::Name(name.to_string())
    }
}

impl From<String> for TargetZone {
    fn from(name: String) -> Self {
        TargetZone::Name(name)
    }
}

impl From<Tz> for TargetZone {
    fn from(tz: Tz) -> Self {
        TargetZone::Resolved(tz)
    }
}

/// Look up an IANA zone name. Surrounding whitespace is ignored.
///
/// # Errors
/// Returns [`ConvertError::UnknownTimeZone`] if the name is not in the database.
pub fn resolve_zone(name: &str) -> Result<Tz> {
    let name = name.trim();
    name.parse::<Tz>()
        .map_err(|_| ConvertError::UnknownTimeZone(name.to_string()))
}

/// The calendar's `X-WR-TIMEZONE` value, if it has one.
pub fn x_wr_timezone(calendar: &Component) -> Option<&str> {
    calendar
        .property(X_WR_TIMEZONE)
        .and_then(|value| value.as_text())
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

/// Converts calendars and owns the `VTIMEZONE` cache used for them.
#[derive(Debug, Default)]
pub struct Converter {
    cache: TimezoneCache,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: TimezoneCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &TimezoneCache {
        &self.cache
    }

    /// Make `calendar` RFC 5545 compliant.
    ///
    /// The target zone is `zone` if given, else the calendar's `X-WR-TIMEZONE`.
    /// Without either, `calendar` itself is returned. The result is also
    /// `calendar` itself when no date-time needed rewriting and
    /// `add_timezone` is false. With `add_timezone`, the zone's `VTIMEZONE`
    /// is inserted as the first sub-component of a new calendar.
    ///
    /// # Errors
    /// Returns [`ConvertError::UnknownTimeZone`] before touching the calendar
    /// if the zone name cannot be resolved.
    pub fn to_standard(
        &self,
        calendar: &Arc<Component>,
        zone: Option<TargetZone>,
        add_timezone: bool,
    ) -> Result<Arc<Component>> {
        let tz = match zone {
            Some(zone) => zone.resolve()?,
            None => match x_wr_timezone(calendar) {
                Some(name) => resolve_zone(name)?,
                None => {
                    tracing::debug!("no X-WR-TIMEZONE and no explicit zone, nothing to do");
                    return Ok(Arc::clone(calendar));
                }
            },
        };
        tracing::debug!(zone = tz.name(), add_timezone, "converting calendar");

        let converted = walk(calendar, &ZonePolicy::new(tz));
        if Arc::ptr_eq(&converted, calendar) {
            tracing::debug!(zone = tz.name(), "no date-time needed rewriting");
        } else {
            tracing::info!(zone = tz.name(), "rewrote UTC and floating date-times");
        }

        if !add_timezone {
            return Ok(converted);
        }

        let mut with_block = Component::clone(&converted);
        with_block.components.insert(0, self.cache.get_or_build(tz));
        Ok(Arc::new(with_block))
    }
}

/// [`Converter::to_standard`] with the zone taken from `X-WR-TIMEZONE` and no
/// `VTIMEZONE` added.
pub fn to_standard(calendar: &Arc<Component>) -> Result<Arc<Component>> {
    Converter::new().to_standard(calendar, None, false)
}
