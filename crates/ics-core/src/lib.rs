//! # ics-core
//!
//! Minimal iCalendar (RFC 5545) decoder and encoder built around a shared,
//! copy-on-write component tree.
//!
//! The decoder types only what a time-zone transformation needs: date-time
//! properties (`DTSTART`, `DTEND`, `RECURRENCE-ID`, ...) and the recurrence
//! date lists (`RDATE`, `EXDATE`). All other values are kept as raw text and
//! written back unchanged.
//!
//! ## Quick start
//!
//! ```rust
//! use ics_core::{decode, encode, PropertyValue};
//!
//! let ics = "BEGIN:VCALENDAR\r\n\
//!            BEGIN:VEVENT\r\n\
//!            DTSTART:20211222T170000Z\r\n\
//!            SUMMARY:Call\r\n\
//!            END:VEVENT\r\n\
//!            END:VCALENDAR\r\n";
//! let calendar = decode(ics).unwrap();
//! let event = &calendar.components[0];
//! assert!(matches!(
//!     event.property("DTSTART").map(|v| &**v),
//!     Some(PropertyValue::DateTime(_))
//! ));
//! assert_eq!(encode(&calendar), ics);
//! ```
//!
//! ## Modules
//!
//! - [`decoder`]: iCalendar text → `Arc<Component>`
//! - [`encoder`]: `Component` → iCalendar text
//! - [`types`]: `Component`, `PropertyValue` and the date-time model
//! - [`error`]: Error types for parse failures

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod types;

pub use decoder::decode;
pub use encoder::encode;
pub use error::IcsError;
pub use types::{
    CalDateTime, Component, DateOrDateTime, DateTimeList, DateTimeValue, Param, PropertyValue,
    TextValue, Zone,
};
