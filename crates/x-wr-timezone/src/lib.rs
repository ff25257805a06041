//! # x-wr-timezone
//!
//! Bring calendars that rely on the non-standard `X-WR-TIMEZONE` property into
//! RFC 5545 form. Google Calendar exports, for example, write event times in
//! UTC and state the calendar's zone only once, in `X-WR-TIMEZONE`. After
//! conversion every UTC or floating event time carries that zone explicitly
//! through a `TZID` parameter.
//!
//! Conversion is copy-on-write over the `Arc`-shared [`ics_core`] tree: when
//! nothing needs rewriting the very same calendar object comes back.
//!
//! ```rust
//! use std::sync::Arc;
//! use x_wr_timezone::to_standard;
//!
//! let ics = "BEGIN:VCALENDAR\r\n\
//!            X-WR-TIMEZONE:America/New_York\r\n\
//!            BEGIN:VEVENT\r\n\
//!            DTSTART:20211222T170000Z\r\n\
//!            END:VEVENT\r\n\
//!            END:VCALENDAR\r\n";
//! let calendar = ics_core::decode(ics).unwrap();
//! let converted = to_standard(&calendar).unwrap();
//! assert!(!Arc::ptr_eq(&calendar, &converted));
//! assert!(ics_core::encode(&converted)
//!     .contains("DTSTART;TZID=America/New_York:20211222T120000\r\n"));
//! ```
//!
//! ## Modules
//!
//! - [`convert`]: Zone resolution, walk, optional `VTIMEZONE`
//! - [`walker`]: Copy-on-write tree traversal with a date-time visitor
//! - [`policy`]: UTC / floating / zoned classification and rewrite rule
//! - [`dst`]: Ambiguous and nonexistent wall-clock times
//! - [`value`]: The temporal property shapes
//! - [`cache`]: Per-zone `VTIMEZONE` cache
//! - [`vtimezone`]: `VTIMEZONE` construction from the IANA database
//! - [`error`]: Error types

pub mod cache;
pub mod convert;
pub mod dst;
pub mod error;
pub mod policy;
pub mod value;
pub mod vtimezone;
pub mod walker;

pub use cache::TimezoneCache;
pub use convert::{resolve_zone, to_standard, Converter, TargetZone, X_WR_TIMEZONE};
pub use error::ConvertError;
pub use policy::{classify, rewrite, ZoneKind};
pub use vtimezone::{build_vtimezone, VTimezoneWindow};
pub use walker::{walk, DateTimeVisitor, ZonePolicy};
