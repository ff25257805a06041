//! iCalendar decoder: text into a [`Component`] tree.
//!
//! Decoding happens in three passes over the input:
//!
//! - **Unfolding**: physical lines starting with a space or tab continue the
//!   previous content line (RFC 5545 section 3.1). CRLF and bare LF are both
//!   accepted.
//! - **Content lines**: each logical line is split into name, parameters and
//!   value. Quoted parameter values may contain `;`, `:` and `,`.
//! - **Tree building**: `BEGIN`/`END` lines open and close components; every
//!   other line becomes a property of the innermost open component.
//!
//! Only the date-time shaped properties get a typed value. Everything else is
//! kept as raw text so that it encodes back exactly as it was read.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{IcsError, Result};
use crate::types::{
    find_param, CalDateTime, Component, DateOrDateTime, DateTimeList, DateTimeValue, Param,
    PropertyValue, TextValue, Zone, TZID, VALUE,
};

/// Properties whose value is a single DATE or DATE-TIME.
pub const DATE_TIME_PROPERTIES: [&str; 8] = [
    "DTSTART",
    "DTEND",
    "DUE",
    "RECURRENCE-ID",
    "DTSTAMP",
    "CREATED",
    "LAST-MODIFIED",
    "COMPLETED",
];

/// Properties whose value is a comma-separated list of DATE or DATE-TIME.
pub const DATE_LIST_PROPERTIES: [&str; 2] = ["RDATE", "EXDATE"];

/// Decode iCalendar text into its root component (normally `VCALENDAR`).
///
/// # Errors
/// Returns [`IcsError::Parse`] for malformed content lines, unbalanced
/// `BEGIN`/`END` pairs, properties outside of any component, or a second root
/// component. Returns [`IcsError::Empty`] if there is no component at all.
pub fn decode(ics: &str) -> Result<Arc<Component>> {
    let mut stack: Vec<Component> = Vec::new();
    let mut root: Option<Component> = None;
    let lines = unfold(ics);
    let last_line = lines.last().map_or(0, |(line_no, _)| *line_no);

    for (line_no, line) in lines {
        let content = parse_content_line(&line, line_no)?;

        if content.name == "BEGIN" {
            if root.is_some() {
                return Err(IcsError::parse(line_no, "content after the root component"));
            }
            stack.push(Component::new(content.value.trim()));
            continue;
        }

        if content.name == "END" {
            let component = stack
                .pop()
                .ok_or_else(|| IcsError::parse(line_no, "END without matching BEGIN"))?;
            if !component.is(content.value.trim()) {
                return Err(IcsError::parse(
                    line_no,
                    format!(
                        "END:{} does not close BEGIN:{}",
                        content.value.trim(),
                        component.name
                    ),
                ));
            }
            match stack.last_mut() {
                Some(parent) => parent.push_component(component),
                None => root = Some(component),
            }
            continue;
        }

        let current = stack.last_mut().ok_or_else(|| {
            IcsError::parse(
                line_no,
                format!("property {} outside of a component", content.name),
            )
        })?;
        let value = typed_value(&content.name, content.params, content.value);
        current.push_property(&content.name, value);
    }

    if let Some(open) = stack.last() {
        return Err(IcsError::parse(
            last_line,
            format!("BEGIN:{} is never closed", open.name),
        ));
    }

    root.map(Arc::new).ok_or(IcsError::Empty)
}

/// Join folded lines. Returns each logical line with the 1-based number of
/// the physical line it starts on. Blank lines are skipped.
fn unfold(ics: &str) -> Vec<(usize, String)> {
    let ics = ics.strip_prefix('\u{feff}').unwrap_or(ics);
    let mut lines: Vec<(usize, String)> = Vec::new();

    for (index, physical) in ics.split('\n').enumerate() {
        let physical = physical.strip_suffix('\r').unwrap_or(physical);
        let continuation = physical
            .strip_prefix(' ')
            .or_else(|| physical.strip_prefix('\t'));

        if let (Some(rest), Some((_, previous))) = (continuation, lines.last_mut()) {
            previous.push_str(rest);
            continue;
        }
        if !physical.trim().is_empty() {
            lines.push((index + 1, physical.to_string()));
        }
    }

    lines
}

/// A content line split into its parts. The name is upper-cased.
struct ContentLine<'a> {
    name: String,
    params: Vec<Param>,
    value: &'a str,
}

/// Split `name *(";" param) ":" value`.
fn parse_content_line(line: &str, line_no: usize) -> Result<ContentLine<'_>> {
    let name_end = line
        .find([';', ':'])
        .ok_or_else(|| IcsError::parse(line_no, format!("missing ':' in {line:?}")))?;
    let name = &line[..name_end];
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(IcsError::parse(
            line_no,
            format!("invalid property name {name:?}"),
        ));
    }

    let mut params = Vec::new();
    let mut rest = &line[name_end..];

    while let Some(after_semicolon) = rest.strip_prefix(';') {
        let eq = after_semicolon.find('=').ok_or_else(|| {
            IcsError::parse(line_no, format!("parameter without '=' in {line:?}"))
        })?;
        let param_name = &after_semicolon[..eq];
        let (param_value, remaining) =
            split_param_value(&after_semicolon[eq + 1..]).ok_or_else(|| {
                IcsError::parse(line_no, format!("unterminated parameter in {line:?}"))
            })?;
        params.push(Param::new(param_name.trim(), param_value));
        rest = remaining;
    }

    let value = rest
        .strip_prefix(':')
        .ok_or_else(|| IcsError::parse(line_no, format!("missing ':' in {line:?}")))?;

    Ok(ContentLine {
        name: name.to_ascii_uppercase(),
        params,
        value,
    })
}

/// Split a parameter value (possibly a comma list of quoted strings) from the
/// rest of the line. The rest starts with the `;` or `:` that ended it.
fn split_param_value(input: &str) -> Option<(&str, &str)> {
    let mut in_quotes = false;
    for (index, c) in input.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ';' | ':' if !in_quotes => return Some((&input[..index], &input[index..])),
            _ => {}
        }
    }
    None
}

/// Give date-time shaped properties a typed value; fall back to raw text.
fn typed_value(name: &str, params: Vec<Param>, raw: &str) -> PropertyValue {
    let value_type = find_param(&params, VALUE).map(|p| p.unquoted_value().to_ascii_uppercase());
    let tzid = find_param(&params, TZID).map(|p| p.unquoted_value().to_string());
    let tzid = tzid.as_deref();

    if DATE_TIME_PROPERTIES.contains(&name)
        && matches!(value_type.as_deref(), None | Some("DATE") | Some("DATE-TIME"))
    {
        if let Some(value) = parse_date_or_datetime(raw.trim(), tzid) {
            return PropertyValue::DateTime(DateTimeValue { params, value });
        }
    } else if DATE_LIST_PROPERTIES.contains(&name) && value_type.as_deref() != Some("PERIOD") {
        let values: Option<Vec<DateOrDateTime>> = raw
            .split(',')
            .map(|entry| parse_date_or_datetime(entry.trim(), tzid))
            .collect();
        if let Some(values) = values {
            return PropertyValue::DateTimeList(DateTimeList { params, values });
        }
    }

    PropertyValue::Text(TextValue {
        params,
        raw: raw.to_string(),
    })
}

/// Parse `YYYYMMDD` or `YYYYMMDDTHHMMSS[Z]`.
///
/// `tzid` is attached to date-times without the `Z` suffix.
pub fn parse_date_or_datetime(text: &str, tzid: Option<&str>) -> Option<DateOrDateTime> {
    if text.len() == 8 {
        return NaiveDate::parse_from_str(text, "%Y%m%d")
            .ok()
            .map(DateOrDateTime::Date);
    }

    let (body, utc) = match text.strip_suffix(['Z', 'z']) {
        Some(body) => (body, true),
        None => (text, false),
    };
    if body.len() != 15 {
        return None;
    }
    let local = NaiveDateTime::parse_from_str(body, "%Y%m%dT%H%M%S").ok()?;
    let zone = if utc {
        Some(Zone::Utc)
    } else {
        tzid.map(|name| Zone::Named(name.to_string()))
    };

    Some(DateOrDateTime::DateTime(CalDateTime { local, zone }))
}
