//! Timezones built from compiled timezone files (TZif files) and TZ strings.
//!
//! A [`Timezone`] answers one question: what is the UTC offset at a given instant? It combines a
//! table of precomputed transitions (from TZif data) with an optional POSIX TZ rule used for
//! instants past the end of that table. Leap seconds are not supported; Unix timestamps do not
//! count them either.
//!
//! With the `std` feature, [`Zoneinfo`] resolves timezone identifiers such as
//! `America/New_York` against a zoneinfo directory and lists the identifiers it contains.
//!
//! # Examples
//!
//! ```
//! # use time::tz::{parse_tzstring, TzInfo};
//! let timezone = parse_tzstring(b"PST8PDT,M3.2.0,M11.1.0").unwrap();
//!
//! // Getting info for a given unix timestamp
//! assert_eq!(timezone.info(1723433665), TzInfo { utoff: -25200, isdst: true });
//!
//! // Offsets in milliseconds, for arithmetic on millisecond timestamps
//! assert_eq!(timezone.offset_millis(1705321800000), -28800000);
//! ```

use alloc::boxed::Box;
use crate::time::{Tm, MILLIS_PER_SECOND};

pub mod tzstring;
pub use tzstring::*;

pub mod tzfile;
pub use tzfile::*;

#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[cfg(feature = "std")]
pub mod zoneinfo;
#[cfg(feature = "std")]
pub use zoneinfo::*;

/// Timezone information at a moment in time.
///
/// UTC offsets are added to UTC to get local time: New York during standard time has a UTC offset
/// of `-18000` seconds, so `16:00 UTC` becomes `11:00 EST`.
///
/// The default value is UTC: `{ utoff: 0, isdst: false }`.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct TzInfo {
	/// The UTC offset in seconds
	pub utoff: i32,
	/// Whether daylight savings time is in effect
	pub isdst: bool
}

/// Timezone configuration.
///
/// Transition times are sorted ascending; each entry's [`TzInfo`] applies from that instant
/// until the next entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timezone {
	/// Precomputed transition times (Unix seconds) and the info taking effect at each
	times: Box<[(i64, TzInfo)]>,
	/// Info for instants before the first transition, or for all instants if there is no table
	/// and no rule
	initial: TzInfo,
	/// TZ rule for instants at or after the last transition
	spec: Option<TzSpec>
}

impl Timezone {
	/// Coordinated Universal Time.
	///
	/// This is also what unknown timezone identifiers resolve to.
	pub fn utc() -> Timezone {
		Timezone::default()
	}

	/// A timezone with a fixed UTC offset (in seconds) and no daylight savings time.
	pub fn fixed(utoff: i32) -> Timezone {
		Timezone {
			initial: TzInfo { utoff, isdst: false },
			..Timezone::default()
		}
	}

	/// Build a timezone from its parts.
	///
	/// `times` must be sorted by transition time. `initial` applies before the first transition.
	pub fn new(times: Box<[(i64, TzInfo)]>, initial: TzInfo, spec: Option<TzSpec>) -> Timezone {
		Timezone { times, initial, spec }
	}

	/// Get timezone info for a given moment in time (Unix seconds).
	///
	/// Before the first precomputed transition, the zone's initial info applies. At or after the
	/// last one, the TZ rule applies if present, otherwise the last transition stays in effect.
	///
	/// # Examples
	///
	/// ```
	/// # use time::tz::{parse_tzstring, TzInfo};
	/// let timezone = parse_tzstring(b"EST5EDT,M3.2.0,M11.1.0").unwrap();
	/// assert_eq!(timezone.info(1710053999), TzInfo { utoff: -18000, isdst: false });
	/// assert_eq!(timezone.info(1710054000), TzInfo { utoff: -14400, isdst: true });
	/// ```
	pub fn info(&self, time: i64) -> TzInfo {
		let Some(&(last, last_info)) = self.times.last() else {
			return match self.spec {
				Some(spec) => spec.info(time),
				None => self.initial
			};
		};

		if time >= last {
			return match self.spec {
				Some(spec) => spec.info(time),
				None => last_info
			};
		}

		// Number of transitions at or before `time`
		match self.times.partition_point(|&(t, _)| t <= time) {
			0 => self.initial,
			n => self.times[n - 1].1
		}
	}

	/// The UTC offset in milliseconds at a moment given in milliseconds since the Unix epoch.
	pub fn offset_millis(&self, millis: i64) -> i64 {
		self.info(millis.div_euclid(MILLIS_PER_SECOND)).utoff as i64 * MILLIS_PER_SECOND
	}

	/// Local calendar time in this timezone for a moment given in milliseconds since the Unix
	/// epoch.
	///
	/// # Examples
	///
	/// ```
	/// # use time::tz::parse_tzstring;
	/// let timezone = parse_tzstring(b"JST-9").unwrap();
	/// let date = timezone.date(1705321800000);
	/// assert_eq!((date.day, date.hour, date.min), (15, 21, 30));
	/// ```
	pub fn date(&self, millis: i64) -> Tm {
		Tm::from_millis(millis.saturating_add(self.offset_millis(millis)))
	}

	/// The TZ rule for this timezone, if any.
	///
	/// The rule is only authoritative at or after the last precomputed transition.
	pub fn spec(&self) -> Option<TzSpec> {
		self.spec
	}
}

impl From<TzSpec> for Timezone {
	fn from(spec: TzSpec) -> Self {
		Timezone {
			times: Box::default(),
			initial: TzInfo { utoff: spec.utoff, isdst: false },
			spec: Some(spec)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn timezone_info() {
		let mut tz = Timezone::utc();
		assert_eq!(tz.info(1704672000), TzInfo { utoff: 0, isdst: false });

		tz.spec = TzSpec::parse(b"EST5EDT,M3.2.0,M11.1.0").ok();
		assert_eq!(tz.info(1704672000), TzInfo { utoff: -18000, isdst: false });
		assert_eq!(tz.info(1710053999), TzInfo { utoff: -18000, isdst: false });
		assert_eq!(tz.info(1710054000), TzInfo { utoff: -14400, isdst: true });
		assert_eq!(tz.info(1730613599), TzInfo { utoff: -14400, isdst: true });
		assert_eq!(tz.info(1730613600), TzInfo { utoff: -18000, isdst: false });

		tz.initial = TzInfo { utoff: -17762, isdst: false };
		tz.times = Box::new([(1710054000, TzInfo { utoff: -20000, isdst: false }),
		                     (1720054000, TzInfo { utoff: -10000, isdst: true }),
		                     (1730054000, TzInfo { utoff: -5000, isdst: false })]);
		assert_eq!(tz.info(1704672000), TzInfo { utoff: -17762, isdst: false });
		assert_eq!(tz.info(1710054000), TzInfo { utoff: -20000, isdst: false });
		assert_eq!(tz.info(1720053999), TzInfo { utoff: -20000, isdst: false });
		assert_eq!(tz.info(1720054001), TzInfo { utoff: -10000, isdst: true });
		// Past the table, the rule takes over
		assert_eq!(tz.info(1730613599), TzInfo { utoff: -14400, isdst: true });
		assert_eq!(tz.info(1730613600), TzInfo { utoff: -18000, isdst: false });

		tz.spec = None;
		assert_eq!(tz.info(1830613600), TzInfo { utoff: -5000, isdst: false });
	}

	#[test]
	fn fixed_offsets() {
		let tz = Timezone::fixed(19800);
		assert_eq!(tz.info(i64::MIN), TzInfo { utoff: 19800, isdst: false });
		assert_eq!(tz.info(i64::MAX), TzInfo { utoff: 19800, isdst: false });
		assert_eq!(tz.offset_millis(-1), 19800000);
		assert_eq!(Timezone::utc().offset_millis(1705321800000), 0);
	}

	#[test]
	fn local_dates() {
		let tz = Timezone::fixed(-18000);
		let date = tz.date(1705321800000);
		assert_eq!((date.year, date.mon, date.day, date.hour, date.min), (2024, 1, 15, 7, 30));

		// Extreme inputs cannot overflow
		tz.date(i64::MIN);
		Timezone::fixed(18000).date(i64::MAX);
	}
}
