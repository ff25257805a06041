//! iCalendar encoder: a [`Component`] tree back into text.
//!
//! Output uses CRLF line endings and folds content lines longer than 75
//! octets (RFC 5545 section 3.1), never splitting a UTF-8 character.
//! A [`PropertyValue::Multiple`] is written as consecutive content lines.
//!
//! # Example
//! ```
//! use ics_core::{decode, encode};
//! let ics = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n";
//! let calendar = decode(ics).unwrap();
//! assert_eq!(encode(&calendar), ics);
//! ```

use crate::types::{Component, DateOrDateTime, Param, PropertyValue, Zone};

/// Maximum content line length in octets, excluding the line break.
const MAX_LINE_OCTETS: usize = 75;

/// Encode a component and all of its descendants.
pub fn encode(component: &Component) -> String {
    let mut out = String::new();
    encode_component(component, &mut out);
    out
}

fn encode_component(component: &Component, out: &mut String) {
    push_folded(&format!("BEGIN:{}", component.name), out);
    for (name, value) in &component.properties {
        encode_property(name, value, out);
    }
    for child in &component.components {
        encode_component(child, out);
    }
    push_folded(&format!("END:{}", component.name), out);
}

fn encode_property(name: &str, value: &PropertyValue, out: &mut String) {
    match value {
        PropertyValue::DateTime(value) => {
            let text = format_date_or_datetime(&value.value);
            push_folded(&content_line(name, &value.params, &text), out);
        }
        PropertyValue::DateTimeList(list) => {
            let text = list
                .values
                .iter()
                .map(format_date_or_datetime)
                .collect::<Vec<_>>()
                .join(",");
            push_folded(&content_line(name, &list.params, &text), out);
        }
        PropertyValue::Text(text) => {
            push_folded(&content_line(name, &text.params, &text.raw), out);
        }
        PropertyValue::Multiple(values) => {
            for value in values {
                encode_property(name, value, out);
            }
        }
    }
}

fn content_line(name: &str, params: &[Param], value: &str) -> String {
    let mut line = String::with_capacity(name.len() + value.len() + 16);
    line.push_str(name);
    for param in params {
        line.push(';');
        line.push_str(&param.name);
        line.push('=');
        line.push_str(&param.value);
    }
    line.push(':');
    line.push_str(value);
    line
}

/// Format as `YYYYMMDD` or `YYYYMMDDTHHMMSS`, with `Z` for UTC.
pub fn format_date_or_datetime(value: &DateOrDateTime) -> String {
    match value {
        DateOrDateTime::Date(date) => date.format("%Y%m%d").to_string(),
        DateOrDateTime::DateTime(dt) => {
            let mut text = dt.local.format("%Y%m%dT%H%M%S").to_string();
            if dt.zone == Some(Zone::Utc) {
                text.push('Z');
            }
            text
        }
    }
}

/// Append `line` followed by CRLF, folding it so that no physical line
/// exceeds [`MAX_LINE_OCTETS`]. Continuation lines start with one space.
pub fn push_folded(line: &str, out: &mut String) {
    let mut width = 0;
    for c in line.chars() {
        let octets = c.len_utf8();
        if width + octets > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(c);
        width += octets;
    }
    out.push_str("\r\n");
}
