//! Copy-on-write traversal of a calendar tree.
//!
//! [`walk`] hands every date-time found in an event's temporal properties to
//! a [`DateTimeVisitor`] and rebuilds only what changed:
//!
//! - a value is replaced only if the visitor returned `Cow::Owned` for one of
//!   its date-times
//! - a component is rebuilt only if one of its visited values or one of its
//!   sub-components was replaced
//! - everything else, the root included, comes back as the same `Arc`
//!
//! Callers can therefore use `Arc::ptr_eq(&input, &output)` to learn that a
//! walk changed nothing.

use std::borrow::Cow;
use std::sync::Arc;

use chrono_tz::Tz;
use ics_core::{CalDateTime, Component, DateOrDateTime, PropertyValue, Zone};

use crate::policy::{self, ZoneKind};
use crate::value::{is_temporal_property, TemporalValue};

/// Component whose temporal properties are visited.
pub const EVENT: &str = "VEVENT";

/// Rewrites single date-times for [`walk`].
pub trait DateTimeVisitor {
    /// Return `Cow::Borrowed(dt)` to keep `dt`, `Cow::Owned` to replace it.
    fn visit<'a>(&self, dt: &'a CalDateTime) -> Cow<'a, CalDateTime>;
}

/// Moves UTC and floating date-times into one target zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonePolicy {
    pub target: Tz,
}

impl ZonePolicy {
    pub fn new(target: Tz) -> Self {
        Self { target }
    }
}

impl DateTimeVisitor for ZonePolicy {
    fn visit<'a>(&self, dt: &'a CalDateTime) -> Cow<'a, CalDateTime> {
        policy::rewrite(dt, self.target)
    }
}

/// Walk `calendar` with `visitor`, returning the same `Arc` if nothing changed.
pub fn walk<V: DateTimeVisitor + ?Sized>(calendar: &Arc<Component>, visitor: &V) -> Arc<Component> {
    walk_component(calendar, visitor)
}

fn walk_component<V: DateTimeVisitor + ?Sized>(
    component: &Arc<Component>,
    visitor: &V,
) -> Arc<Component> {
    let mut changed_properties: Vec<(usize, Arc<PropertyValue>)> = Vec::new();
    if component.is(EVENT) {
        for (index, (name, value)) in component.properties.iter().enumerate() {
            if !is_temporal_property(name) {
                continue;
            }
            let visited = visit_value(value, visitor);
            if !Arc::ptr_eq(&visited, value) {
                debug_assert_eq!(visited.line_count(), value.line_count());
                debug_assert_eq!(
                    TemporalValue::of(&visited).map(|v| v.len()),
                    TemporalValue::of(value).map(|v| v.len())
                );
                changed_properties.push((index, visited));
            }
        }
    }

    let mut changed_components: Vec<(usize, Arc<Component>)> = Vec::new();
    for (index, child) in component.components.iter().enumerate() {
        let visited = walk_component(child, visitor);
        if !Arc::ptr_eq(&visited, child) {
            changed_components.push((index, visited));
        }
    }

    if changed_properties.is_empty() && changed_components.is_empty() {
        return Arc::clone(component);
    }

    let mut rebuilt = Component::clone(component);
    for (index, value) in changed_properties {
        rebuilt.properties[index].1 = value;
    }
    for (index, child) in changed_components {
        rebuilt.components[index] = child;
    }

    debug_assert_eq!(rebuilt.properties.len(), component.properties.len());
    debug_assert_eq!(rebuilt.components.len(), component.components.len());
    debug_assert!(rebuilt
        .properties
        .iter()
        .zip(&component.properties)
        .all(|((new, _), (old, _))| new == old));

    Arc::new(rebuilt)
}

/// Dispatch one property value by shape.
fn visit_value<V: DateTimeVisitor + ?Sized>(
    value: &Arc<PropertyValue>,
    visitor: &V,
) -> Arc<PropertyValue> {
    match TemporalValue::of(value) {
        Some(TemporalValue::Scalar(scalar)) => match visit_entry(&scalar.value, visitor) {
            Some(entry) => Arc::new(PropertyValue::DateTime(scalar.with_value(entry))),
            None => Arc::clone(value),
        },
        Some(TemporalValue::List(items)) => {
            let visited: Vec<Arc<PropertyValue>> =
                items.iter().map(|item| visit_value(item, visitor)).collect();
            if visited
                .iter()
                .zip(items)
                .all(|(new, old)| Arc::ptr_eq(new, old))
            {
                Arc::clone(value)
            } else {
                Arc::new(PropertyValue::Multiple(visited))
            }
        }
        Some(TemporalValue::RecurrenceSet(set)) => {
            // All entries of a line share its TZID. Entries that would move
            // into another named zone are kept as they are.
            let line_zone = named_zone(&set.values);
            let visited: Vec<Option<DateOrDateTime>> = set
                .values
                .iter()
                .map(|entry| {
                    visit_entry(entry, visitor)
                        .filter(|new| fits_line(new, line_zone))
                })
                .collect();
            if visited.iter().all(Option::is_none) {
                return Arc::clone(value);
            }
            let values: Vec<DateOrDateTime> = visited
                .into_iter()
                .zip(&set.values)
                .map(|(new, old)| new.unwrap_or_else(|| old.clone()))
                .collect();
            debug_assert_eq!(values.len(), set.len());
            Arc::new(PropertyValue::DateTimeList(set.with_values(values)))
        }
        None => Arc::clone(value),
    }
}

/// The named, non-UTC zone of a recurrence line, if it has one.
fn named_zone(values: &[DateOrDateTime]) -> Option<&Zone> {
    values
        .iter()
        .filter_map(DateOrDateTime::as_datetime)
        .find(|dt| policy::classify(dt) == ZoneKind::Zoned)
        .and_then(|dt| dt.zone.as_ref())
}

fn fits_line(entry: &DateOrDateTime, line_zone: Option<&Zone>) -> bool {
    match (entry.as_datetime().and_then(|dt| dt.zone.as_ref()), line_zone) {
        (Some(zone @ Zone::Named(_)), Some(line)) => zone == line,
        _ => true,
    }
}

/// Visit one DATE or DATE-TIME entry. `None` means unchanged; dates are never
/// visited.
fn visit_entry<V: DateTimeVisitor + ?Sized>(
    entry: &DateOrDateTime,
    visitor: &V,
) -> Option<DateOrDateTime> {
    let dt = entry.as_datetime()?;
    match visitor.visit(dt) {
        Cow::Borrowed(_) => None,
        Cow::Owned(new) => Some(DateOrDateTime::DateTime(new)),
    }
}
