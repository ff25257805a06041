//! iCalendar component tree.
//!
//! Components and property values are shared through `Arc` so that a
//! transformation can hand back the very same object when nothing changed and
//! rebuild only the path from a changed value up to the root. Cloning a
//! [`Component`] is shallow: the property and sub-component vectors are
//! duplicated, their elements are shared.
//!
//! Properties are stored as `Vec<(String, Arc<PropertyValue>)>` to keep the
//! document order without depending on `IndexMap`. Keys are upper-cased and
//! unique; a name that appears on several content lines is stored once as
//! [`PropertyValue::Multiple`].

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

/// Name of the parameter carrying a date-time's zone identifier.
pub const TZID: &str = "TZID";
/// Name of the parameter overriding a property's value type.
pub const VALUE: &str = "VALUE";

/// Zone attribute of a date-time. A date-time without a zone is floating.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Written with a trailing `Z`.
    Utc,
    /// Written with a `TZID` parameter.
    Named(String),
}

/// A DATE-TIME value: wall-clock fields plus an optional zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalDateTime {
    pub local: NaiveDateTime,
    pub zone: Option<Zone>,
}

impl CalDateTime {
    /// A date-time without zone information.
    pub fn floating(local: NaiveDateTime) -> Self {
        Self { local, zone: None }
    }

    /// A date-time designated as UTC.
    pub fn utc(local: NaiveDateTime) -> Self {
        Self {
            local,
            zone: Some(Zone::Utc),
        }
    }

    /// A date-time in the zone called `tzid`.
    pub fn zoned(local: NaiveDateTime, tzid: impl Into<String>) -> Self {
        Self {
            local,
            zone: Some(Zone::Named(tzid.into())),
        }
    }

    pub fn is_floating(&self) -> bool {
        self.zone.is_none()
    }

    /// The `TZID` this date-time is written with, if any.
    pub fn tzid(&self) -> Option<&str> {
        match &self.zone {
            Some(Zone::Named(name)) => Some(name),
            _ => None,
        }
    }
}

/// A DATE (all-day) or DATE-TIME entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateOrDateTime {
    Date(NaiveDate),
    DateTime(CalDateTime),
}

impl DateOrDateTime {
    pub fn as_datetime(&self) -> Option<&CalDateTime> {
        match self {
            DateOrDateTime::DateTime(dt) => Some(dt),
            DateOrDateTime::Date(_) => None,
        }
    }

    fn zone(&self) -> Option<&Zone> {
        self.as_datetime().and_then(|dt| dt.zone.as_ref())
    }
}

impl From<CalDateTime> for DateOrDateTime {
    fn from(dt: CalDateTime) -> Self {
        DateOrDateTime::DateTime(dt)
    }
}

impl From<NaiveDate> for DateOrDateTime {
    fn from(date: NaiveDate) -> Self {
        DateOrDateTime::Date(date)
    }
}

/// A property parameter. The value is kept as written, quotes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub value: String,
}

impl Param {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            value: value.into(),
        }
    }

    /// Case-insensitive name comparison.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// The value with one pair of surrounding double quotes removed.
    pub fn unquoted_value(&self) -> &str {
        self.value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(&self.value)
    }
}

/// Find a parameter by name (case-insensitive).
pub fn find_param<'a>(params: &'a [Param], name: &str) -> Option<&'a Param> {
    params.iter().find(|p| p.is(name))
}

/// Return `params` with the `TZID` parameter replaced to match `zone`.
///
/// An existing `TZID` keeps its position; a new one is appended. Floating and
/// UTC zones drop the parameter.
fn sync_tzid(params: &[Param], zone: Option<&Zone>) -> Vec<Param> {
    let tzid = match zone {
        Some(Zone::Named(name)) => Some(name.as_str()),
        _ => None,
    };
    let mut out = Vec::with_capacity(params.len() + 1);
    let mut placed = false;
    for param in params {
        if !param.is(TZID) {
            out.push(param.clone());
        } else if let (Some(name), false) = (tzid, placed) {
            out.push(Param::new(TZID, quote_param_value(name)));
            placed = true;
        }
    }
    if let (Some(name), false) = (tzid, placed) {
        out.push(Param::new(TZID, quote_param_value(name)));
    }
    out
}

fn quote_param_value(value: &str) -> String {
    if value.contains([':', ';', ',']) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

fn initial_params(first: Option<&DateOrDateTime>) -> Vec<Param> {
    let mut params = Vec::new();
    if let Some(DateOrDateTime::Date(_)) = first {
        params.push(Param::new(VALUE, "DATE"));
    }
    sync_tzid(&params, first.and_then(DateOrDateTime::zone))
}

/// A property holding a single DATE or DATE-TIME (`DTSTART`, `DTEND`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeValue {
    pub params: Vec<Param>,
    pub value: DateOrDateTime,
}

impl DateTimeValue {
    pub fn new(value: impl Into<DateOrDateTime>) -> Self {
        let value = value.into();
        Self {
            params: initial_params(Some(&value)),
            value,
        }
    }

    /// A copy holding `value`, with `TZID` adjusted and other parameters kept.
    pub fn with_value(&self, value: impl Into<DateOrDateTime>) -> Self {
        let value = value.into();
        Self {
            params: sync_tzid(&self.params, value.zone()),
            value,
        }
    }
}

/// A property line holding several DATE or DATE-TIME entries (`RDATE`, `EXDATE`).
///
/// All entries share the line's parameters, so they share one zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeList {
    pub params: Vec<Param>,
    pub values: Vec<DateOrDateTime>,
}

impl DateTimeList {
    pub fn new(values: Vec<DateOrDateTime>) -> Self {
        Self {
            params: initial_params(values.first()),
            values,
        }
    }

    /// A copy holding `values`, with `TZID` adjusted and other parameters kept.
    ///
    /// The line takes the first named zone among `values`. UTC entries keep
    /// their `Z` suffix under it.
    pub fn with_values(&self, values: Vec<DateOrDateTime>) -> Self {
        let zone = values
            .iter()
            .filter_map(DateOrDateTime::zone)
            .find(|zone| matches!(zone, Zone::Named(_)))
            .or_else(|| values.iter().find_map(DateOrDateTime::zone));
        Self {
            params: sync_tzid(&self.params, zone),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Any other property value, kept exactly as written (escapes included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextValue {
    pub params: Vec<Param>,
    pub raw: String,
}

impl TextValue {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            params: Vec::new(),
            raw: raw.into(),
        }
    }
}

/// The value stored under one property name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    DateTime(DateTimeValue),
    DateTimeList(DateTimeList),
    Text(TextValue),
    /// The property appeared on more than one content line.
    Multiple(Vec<Arc<PropertyValue>>),
}

impl PropertyValue {
    pub fn text(raw: impl Into<String>) -> Self {
        PropertyValue::Text(TextValue::new(raw))
    }

    /// The raw text of a text value. For `Multiple`, the first line's text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(&text.raw),
            PropertyValue::Multiple(values) => values.first().and_then(|v| v.as_text()),
            PropertyValue::DateTime(_) | PropertyValue::DateTimeList(_) => None,
        }
    }

    /// Number of content lines this value is written as.
    pub fn line_count(&self) -> usize {
        match self {
            PropertyValue::Multiple(values) => values.iter().map(|v| v.line_count()).sum(),
            _ => 1,
        }
    }
}

impl From<DateTimeValue> for PropertyValue {
    fn from(value: DateTimeValue) -> Self {
        PropertyValue::DateTime(value)
    }
}

impl From<DateTimeList> for PropertyValue {
    fn from(value: DateTimeList) -> Self {
        PropertyValue::DateTimeList(value)
    }
}

impl From<TextValue> for PropertyValue {
    fn from(value: TextValue) -> Self {
        PropertyValue::Text(value)
    }
}

/// A calendar component (`VCALENDAR`, `VEVENT`, `VTIMEZONE`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub name: String,
    pub properties: Vec<(String, Arc<PropertyValue>)>,
    pub components: Vec<Arc<Component>>,
}

impl Component {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().to_ascii_uppercase(),
            properties: Vec::new(),
            components: Vec::new(),
        }
    }

    /// Builder form of [`Component::push_property`].
    pub fn with_property(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.push_property(name, value);
        self
    }

    /// Builder form of [`Component::push_component`].
    pub fn with_component(mut self, component: impl Into<Arc<Component>>) -> Self {
        self.push_component(component);
        self
    }

    /// Add a property line. A second line with the same name turns the
    /// stored value into [`PropertyValue::Multiple`].
    pub fn push_property(&mut self, name: &str, value: impl Into<PropertyValue>) {
        let value = Arc::new(value.into());
        let Some(index) = self.property_index(name) else {
            self.properties.push((name.to_ascii_uppercase(), value));
            return;
        };
        let slot = &mut self.properties[index].1;
        let merged = match slot.as_ref() {
            PropertyValue::Multiple(existing) => {
                let mut values = existing.clone();
                values.push(value);
                values
            }
            _ => vec![Arc::clone(slot), value],
        };
        *slot = Arc::new(PropertyValue::Multiple(merged));
    }

    pub fn push_component(&mut self, component: impl Into<Arc<Component>>) {
        self.components.push(component.into());
    }

    /// Position of the property called `name` (case-insensitive).
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.properties
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    /// The value of the property called `name` (case-insensitive).
    pub fn property(&self, name: &str) -> Option<&Arc<PropertyValue>> {
        self.property_index(name)
            .and_then(|index| self.properties.get(index))
            .map(|(_, value)| value)
    }

    /// Case-insensitive component name comparison.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// This component and all its descendants called `name`, depth first.
    pub fn walk(&self, name: &str) -> Vec<&Component> {
        let mut found = Vec::new();
        self.collect(name, &mut found);
        found
    }

    fn collect<'a>(&'a self, name: &str, found: &mut Vec<&'a Component>) {
        if self.is(name) {
            found.push(self);
        }
        for child in &self.components {
            child.collect(name, found);
        }
    }
}
