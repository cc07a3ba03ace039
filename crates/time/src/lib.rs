//! Utilities for dealing with time.
//!
//! This crate is divided into four parts:
//! - [`time`] converts between Unix timestamps and proleptic Gregorian calendar time, with no
//!   understanding of timezones.
//! - [`tz`] parses TZif data and TZ strings into [`tz::Timezone`]s, which answer "what is the UTC
//!   offset at this instant?". With the `std` feature it also reads whole zoneinfo directories.
//! - [`format`] renders calendar time in the `MMM d, yyyy hh:mm:ss a` pattern.
//! - [`parse`] reads date time strings like `2024-01-15 12:30:00 -05:00`.
//!
//! The crate is `no_std` but requires [`alloc`]. Enabling `std` adds file and directory access
//! ([`tz::parse_file`], [`tz::Zoneinfo`]); enabling `now` adds [`time::now`].
//!
//! # Examples
//!
//! Rendering a timestamp in US Eastern time.
//! ```
//! # use time::{format::DatePattern, tz::parse_tzstring};
//! let timezone = parse_tzstring(b"EST5EDT,M3.2.0,M11.1.0").unwrap();
//! let date = timezone.date(1705321800000);
//! assert_eq!(DatePattern::description().format(&date), "Jan 15, 2024 07:30:00 AM");
//! ```

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod time;
pub mod tz;
pub mod format;
pub mod parse;

pub use time::*;
pub use parse::*;
