//! The temporal value shapes the walker understands.

use std::sync::Arc;

use ics_core::{DateTimeList, DateTimeValue, PropertyValue};

/// Event properties that carry date-times.
pub const TEMPORAL_PROPERTIES: [&str; 5] = ["DTSTART", "DTEND", "RDATE", "EXDATE", "RECURRENCE-ID"];

/// Whether `name` is one of [`TEMPORAL_PROPERTIES`] (case-insensitive).
pub fn is_temporal_property(name: &str) -> bool {
    TEMPORAL_PROPERTIES
        .iter()
        .any(|temporal| temporal.eq_ignore_ascii_case(name))
}

/// A borrowed view of a property value as one of the three temporal shapes.
#[derive(Debug, Clone, Copy)]
pub enum TemporalValue<'a> {
    /// One DATE or DATE-TIME.
    Scalar(&'a DateTimeValue),
    /// The same property on several content lines.
    List(&'a [Arc<PropertyValue>]),
    /// A comma-separated `RDATE`/`EXDATE` line.
    RecurrenceSet(&'a DateTimeList),
}

impl<'a> TemporalValue<'a> {
    /// Classify `value`. Anything that is not temporal (raw text, periods,
    /// unparseable dates) yields `None` and is left alone.
    pub fn of(value: &'a PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::DateTime(scalar) => Some(TemporalValue::Scalar(scalar)),
            PropertyValue::Multiple(values) => Some(TemporalValue::List(values)),
            PropertyValue::DateTimeList(set) => Some(TemporalValue::RecurrenceSet(set)),
            PropertyValue::Text(_) => None,
        }
    }

    /// Number of date-time entries (or lines, for a list).
    pub fn len(&self) -> usize {
        match self {
            TemporalValue::Scalar(_) => 1,
            TemporalValue::List(values) => values.len(),
            TemporalValue::RecurrenceSet(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
