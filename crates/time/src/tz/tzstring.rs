//! Support for parsing TZ strings.
//!
//! [TZ strings] describe a standard time offset and, optionally, a daylight savings time offset
//! with the rules for switching between them. They appear on their own (the `TZ` environment
//! variable) and as the footer of version 2+ TZif files, where they cover every instant after the
//! last precomputed transition.
//!
//! Supported syntax: alphabetic or `<...>` quoted names, `[+-]hh[:mm[:ss]]` offsets, and the
//! three POSIX date rules (`Jn`, `n`, `Mm.w.d`) with optional `/time` suffixes. Transition times
//! may use the extended range of ±167 hours allowed by RFC 8536.
//!
//! [TZ strings]: https://www.gnu.org/software/libc/manual/html_node/TZ-Variable.html
//!
//! # Examples
//!
//! ```
//! # use time::tz::{parse_tzstring, TzInfo};
//! let timezone = parse_tzstring(b"<+0330>-3:30").unwrap();
//! assert_eq!(timezone.info(1723433665), TzInfo { utoff: 12600, isdst: false });
//!
//! let timezone = parse_tzstring(b"CET-1CEST,M3.5.0,M10.5.0/3").unwrap();
//! assert_eq!(timezone.info(1723433665), TzInfo { utoff: 7200, isdst: true });
//! ```

use thiserror::Error;
use crate::time::{days_from_civil, days_per_month, isleapyear, wday_from_days, y_from_timestamp, SECONDS_PER_DAY};
use super::{Timezone, TzInfo};

/// The error type for parsing TZ strings.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum TzStringError {
	/// Empty input.
	#[error("Missing TZ string")]
	MissingTzString,
	/// A timezone name was missing, too short, or an unterminated `<...>` name.
	#[error("Invalid timezone name in TZ string")]
	InvalidName,
	/// The standard time offset was missing or malformed.
	#[error("Missing or malformed UTC offset in TZ string")]
	InvalidOffset,
	/// Daylight savings time was named without transition rules.
	#[error("Missing TZ date rule")]
	MissingTzDateRule,
	/// A date component of a [`TzDateRule`] was out of range.
	#[error("Date component out of range")]
	DateOutOfRange,
	/// A time component was out of range.
	#[error("Time component out of range")]
	TimeOutOfRange,
	/// The [`TzDateRule`] had an invalid specifier (only 'J', 'M', or a digit are allowed).
	#[error("Invalid date rule")]
	InvalidTzDateRuleSpecifier,
	/// Found unexpected bytes after a valid [`TzSpec`].
	#[error("Unexpected input at end of TZ string")]
	UnexpectedInput
}

/// Byte cursor over a TZ string.
struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize
}

impl<'a> Cursor<'a> {
	fn new(bytes: &'a [u8]) -> Cursor<'a> {
		Cursor { bytes, pos: 0 }
	}

	fn peek(&self) -> Option<u8> {
		self.bytes.get(self.pos).copied()
	}

	fn at_end(&self) -> bool {
		self.pos >= self.bytes.len()
	}

	/// Consume `b` if it is next.
	fn eat(&mut self, b: u8) -> bool {
		if self.peek() == Some(b) {
			self.pos += 1;
			true
		} else {
			false
		}
	}

	/// Consume a run of ASCII digits, returning `None` if there are none.
	fn number(&mut self) -> Option<u32> {
		let start = self.pos;
		let mut r: u32 = 0;
		while let Some(v @ b'0'..=b'9') = self.peek() {
			r = r.saturating_mul(10).saturating_add((v - b'0') as u32);
			self.pos += 1;
		}
		(self.pos > start).then_some(r)
	}

	/// Consume a timezone name: three or more letters, or any text in `<...>`.
	fn name(&mut self) -> Result<(), TzStringError> {
		if self.eat(b'<') {
			let start = self.pos;
			while let Some(b) = self.peek() {
				if b == b'>' {
					let len = self.pos - start;
					self.pos += 1;
					return if len > 0 { Ok(()) } else { Err(TzStringError::InvalidName) };
				}
				self.pos += 1;
			}
			Err(TzStringError::InvalidName)
		} else {
			let start = self.pos;
			while self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
				self.pos += 1;
			}
			if self.pos - start >= 3 { Ok(()) } else { Err(TzStringError::InvalidName) }
		}
	}

	/// Consume `[+-]hh[:mm[:ss]]`, returning signed seconds.
	///
	/// Hours are limited to 24, or 167 in `extended` mode (rule transition times).
	fn time(&mut self, extended: bool) -> Result<Option<i32>, TzStringError> {
		let sign = if self.eat(b'-') { -1 } else { self.eat(b'+'); 1 };
		let Some(hours) = self.number() else {
			return Ok(None);
		};
		if hours > if extended { 167 } else { 24 } {
			return Err(TzStringError::TimeOutOfRange);
		}

		let mut result = hours as i32 * 3600;
		for scale in [60, 1] {
			if !self.eat(b':') {
				break;
			}
			match self.number() {
				Some(v) if v <= 59 => result += v as i32 * scale,
				Some(_) => return Err(TzStringError::TimeOutOfRange),
				None => return Err(TzStringError::InvalidOffset)
			}
		}

		Ok(Some(sign * result))
	}
}

/// A TZ string date rule.
///
/// There are three types of date rules supported in POSIX TZ strings: 1-indexed Julian day
/// ignoring leap days, 0-indexed day of year, and month/week/day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TzDateRule {
	/// 'J`n`' where `n` is the Julian day between 1 and 365. Leap days are not counted, so day 60
	/// is always March 1st.
	J(u16),
	/// '`n`' where `n` is the zero-based day of year between 0 and 365. Leap days are counted.
	N(u16),
	/// 'M`m`.`w`.`d`': day `d` (0-6 => Sunday-Saturday) of week `w` (1-5) of month `m` (1-12).
	/// Week 5 means the last such day of the month.
	M(u8, u8, u8)
}

impl TzDateRule {
	/// Parse one date rule from the cursor.
	fn read(c: &mut Cursor) -> Result<TzDateRule, TzStringError> {
		match c.peek() {
			None => Err(TzStringError::MissingTzDateRule),
			Some(b'J') => {
				c.pos += 1;
				match c.number() {
					Some(n @ 1..=365) => Ok(TzDateRule::J(n as u16)),
					Some(_) => Err(TzStringError::DateOutOfRange),
					None => Err(TzStringError::MissingTzDateRule)
				}
			},
			Some(b'0'..=b'9') => match c.number() {
				Some(n @ 0..=365) => Ok(TzDateRule::N(n as u16)),
				_ => Err(TzStringError::DateOutOfRange)
			},
			Some(b'M') => {
				c.pos += 1;
				let m = c.number().ok_or(TzStringError::MissingTzDateRule)?;
				if !c.eat(b'.') {
					return Err(TzStringError::MissingTzDateRule);
				}
				let w = c.number().ok_or(TzStringError::MissingTzDateRule)?;
				if !c.eat(b'.') {
					return Err(TzStringError::MissingTzDateRule);
				}
				let d = c.number().ok_or(TzStringError::MissingTzDateRule)?;
				if !(1..=12).contains(&m) || !(1..=5).contains(&w) || d > 6 {
					return Err(TzStringError::DateOutOfRange);
				}
				Ok(TzDateRule::M(m as u8, w as u8, d as u8))
			},
			Some(_) => Err(TzStringError::InvalidTzDateRuleSpecifier)
		}
	}

	/// Parse a date rule.
	///
	/// # Errors
	///
	/// Returns [`TzStringError::UnexpectedInput`] if anything follows the rule.
	///
	/// # Examples
	///
	/// ```
	/// # use time::tz::{TzStringError, TzDateRule};
	/// assert_eq!(TzDateRule::parse(b"57"), Ok(TzDateRule::N(57)));
	/// assert_eq!(TzDateRule::parse(b"J60"), Ok(TzDateRule::J(60)));
	/// assert_eq!(TzDateRule::parse(b"M3.2.0"), Ok(TzDateRule::M(3, 2, 0)));
	/// assert_eq!(TzDateRule::parse(b"J0"), Err(TzStringError::DateOutOfRange));
	/// assert_eq!(TzDateRule::parse(b"M13.1.0"), Err(TzStringError::DateOutOfRange));
	/// assert_eq!(TzDateRule::parse(b"X1"), Err(TzStringError::InvalidTzDateRuleSpecifier));
	/// ```
	pub fn parse(bytes: &[u8]) -> Result<TzDateRule, TzStringError> {
		let mut c = Cursor::new(bytes);
		let rule = TzDateRule::read(&mut c)?;
		if c.at_end() { Ok(rule) } else { Err(TzStringError::UnexpectedInput) }
	}

	/// Days since the Unix epoch of the date this rule selects in `year`.
	///
	/// # Examples
	///
	/// ```
	/// # use time::tz::TzDateRule;
	/// # use time::time::days_from_civil;
	/// assert_eq!(TzDateRule::J(60).as_days(2024), days_from_civil(2024, 3, 1));
	/// assert_eq!(TzDateRule::N(59).as_days(2024), days_from_civil(2024, 2, 29));
	/// assert_eq!(TzDateRule::M(3, 2, 0).as_days(2024), days_from_civil(2024, 3, 10));
	/// assert_eq!(TzDateRule::M(2, 5, 4).as_days(2024), days_from_civil(2024, 2, 29));
	/// ```
	pub fn as_days(&self, year: i64) -> i64 {
		let jan1 = days_from_civil(year, 1, 1);
		match *self {
			TzDateRule::J(n) => {
				let skip_leap_day = isleapyear(year) && n >= 60;
				jan1 + n as i64 - 1 + skip_leap_day as i64
			},
			TzDateRule::N(n) => jan1 + n as i64,
			TzDateRule::M(m, w, d) => {
				let first = days_from_civil(year, m, 1);
				let first_match = (d as i64 - wday_from_days(first) as i64).rem_euclid(7);
				let mut day = first_match + 7 * (w as i64 - 1);
				// Week 5 means "last", which may be the 4th occurrence
				while day >= days_per_month(year, m) as i64 {
					day -= 7;
				}
				first + day
			}
		}
	}
}

/// A TZ string rule set: when daylight savings time starts and ends.
///
/// Each transition is a date rule plus a time of day in seconds, in the local time in effect
/// just before the transition. Times default to 2am.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TzRule {
	/// Transition from standard time to daylight savings time (date & time)
	pub todst: (TzDateRule, i32),
	/// Transition from daylight savings time to standard time (date & time)
	pub fromdst: (TzDateRule, i32)
}

/// A TZ spec.
///
/// Specifies a standard time UTC offset and optional daylight savings time configuration. Offsets
/// are stored the way they are added to UTC, the opposite sign of the TZ string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TzSpec {
	/// UTC offset for standard time, in seconds
	pub utoff: i32,
	/// Optional DST configuration (UTC offset in seconds and corresponding TZ rule set)
	pub dst: Option<(i32, TzRule)>
}

impl TzSpec {
	/// Parse a TZ spec from a TZ string.
	///
	/// # Errors
	///
	/// Returns a [`TzStringError`] if `bytes` is empty, is not a POSIX TZ string, names daylight
	/// savings time without rules, or has data after the TZ string.
	///
	/// # Examples
	///
	/// ```
	/// # use time::tz::{TzSpec, TzDateRule, TzRule, TzStringError};
	/// assert_eq!(TzSpec::parse(b""), Err(TzStringError::MissingTzString));
	/// assert_eq!(TzSpec::parse(b"EST"), Err(TzStringError::InvalidOffset));
	/// assert_eq!(TzSpec::parse(b"EST5"), Ok(TzSpec { utoff: -18000, dst: None }));
	/// assert_eq!(TzSpec::parse(b"XXX4YYY,J1/0,J365/25"), Ok(TzSpec {
	/// 	utoff: -14400,
	/// 	dst: Some((
	/// 		-10800,
	/// 		TzRule {
	/// 			todst: (TzDateRule::J(1), 0),
	/// 			fromdst: (TzDateRule::J(365), 90000)
	/// 		}
	/// 	))
	/// }));
	/// ```
	pub fn parse(bytes: &[u8]) -> Result<TzSpec, TzStringError> {
		if bytes.is_empty() {
			return Err(TzStringError::MissingTzString);
		}
		let mut c = Cursor::new(bytes);

		c.name()?;
		let stdoff = c.time(false)?.ok_or(TzStringError::InvalidOffset)?;

		let dst = if c.at_end() {
			None
		} else {
			c.name()?;
			// Daylight savings time defaults to one hour ahead of standard time
			let dstoff = c.time(false)?.unwrap_or(stdoff - 3600);

			if !c.eat(b',') {
				return Err(TzStringError::MissingTzDateRule);
			}
			let todst = TzSpec::read_transition(&mut c)?;
			if !c.eat(b',') {
				return Err(TzStringError::MissingTzDateRule);
			}
			let fromdst = TzSpec::read_transition(&mut c)?;

			Some((-dstoff, TzRule { todst, fromdst }))
		};

		if !c.at_end() {
			return Err(TzStringError::UnexpectedInput);
		}

		// TZ strings count offsets west of UTC as positive
		Ok(TzSpec { utoff: -stdoff, dst })
	}

	/// Read `date[/time]`, defaulting the time to 2am.
	fn read_transition(c: &mut Cursor) -> Result<(TzDateRule, i32), TzStringError> {
		let date = TzDateRule::read(c)?;
		let time = if c.eat(b'/') {
			c.time(true)?.ok_or(TzStringError::InvalidOffset)?
		} else {
			7200
		};
		Ok((date, time))
	}

	/// Get timezone info for a given moment in time (Unix seconds).
	///
	/// # Examples
	///
	/// ```
	/// # use time::tz::{TzSpec, TzInfo};
	/// let spec = TzSpec::parse(b"EST5EDT,M3.2.0,M11.1.0").unwrap();
	/// assert_eq!(spec.info(1710053999), TzInfo { utoff: -18000, isdst: false });
	/// assert_eq!(spec.info(1710054000), TzInfo { utoff: -14400, isdst: true });
	/// assert_eq!(spec.info(1730613599), TzInfo { utoff: -14400, isdst: true });
	/// assert_eq!(spec.info(1730613600), TzInfo { utoff: -18000, isdst: false });
	/// ```
	pub fn info(&self, time: i64) -> TzInfo {
		let standard = TzInfo { utoff: self.utoff, isdst: false };
		let Some((dstoff, rule)) = self.dst else {
			return standard;
		};

		// Transition times for the local year, converted from local wall time to UTC
		let y = y_from_timestamp(time.saturating_add(self.utoff as i64));
		let at = |(date, secs): (TzDateRule, i32), utoff: i32| {
			date.as_days(y)
				.saturating_mul(SECONDS_PER_DAY)
				.saturating_add(secs as i64 - utoff as i64)
		};
		let todst = at(rule.todst, self.utoff);
		let fromdst = at(rule.fromdst, dstoff);

		// Northern hemisphere rules start DST before ending it within a calendar year; southern
		// hemisphere rules end it first
		let isdst = if todst < fromdst {
			todst <= time && time < fromdst
		} else {
			time < fromdst || todst <= time
		};

		if isdst { TzInfo { utoff: dstoff, isdst } } else { standard }
	}
}

/// Parse a byte slice containing a TZ string.
///
/// # Errors
///
/// Returns [`TzStringError`] if the TZ string is malformed.
///
/// # Examples
///
/// ```
/// # use time::tz::{parse_tzstring, TzInfo};
/// let timezone = parse_tzstring(b"PST8PDT,M3.2.0,M11.1.0").unwrap();
/// assert_eq!(timezone.info(1723433665), TzInfo { utoff: -25200, isdst: true });
/// ```
pub fn parse_tzstring(tzstring: &[u8]) -> Result<Timezone, TzStringError> {
	TzSpec::parse(tzstring).map(Timezone::from)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn time(s: &[u8], extended: bool) -> Result<Option<i32>, TzStringError> {
		Cursor::new(s).time(extended)
	}

	#[test]
	fn parse_time() {
		assert_eq!(time(b"5", false), Ok(Some(18000)));
		assert_eq!(time(b"-5", false), Ok(Some(-18000)));
		assert_eq!(time(b"+05", false), Ok(Some(18000)));
		assert_eq!(time(b"05:23", false), Ok(Some(19380)));
		assert_eq!(time(b"05:23:17", false), Ok(Some(19397)));
		assert_eq!(time(b"167", true), Ok(Some(601200)));
		assert_eq!(time(b"-30", true), Ok(Some(-108000)));

		assert_eq!(time(b"", false), Ok(None));
		assert_eq!(time(b"g", false), Ok(None));
		assert_eq!(time(b"5:", false), Err(TzStringError::InvalidOffset));
		assert_eq!(time(b"25", false), Err(TzStringError::TimeOutOfRange));
		assert_eq!(time(b"5:70", false), Err(TzStringError::TimeOutOfRange));
		assert_eq!(time(b"168", true), Err(TzStringError::TimeOutOfRange));
	}

	#[test]
	fn parse_names() {
		assert!(Cursor::new(b"EST").name().is_ok());
		assert!(Cursor::new(b"<-03>").name().is_ok());
		assert_eq!(Cursor::new(b"ES").name(), Err(TzStringError::InvalidName));
		assert_eq!(Cursor::new(b"<>").name(), Err(TzStringError::InvalidName));
		assert_eq!(Cursor::new(b"<+03").name(), Err(TzStringError::InvalidName));
	}

	#[test]
	fn parse_spec() {
		assert_eq!(TzSpec::parse(b"UTC0"), Ok(TzSpec { utoff: 0, dst: None }));
		assert_eq!(TzSpec::parse(b"<-03>3"), Ok(TzSpec { utoff: -10800, dst: None }));
		assert_eq!(TzSpec::parse(b"IST-5:30"), Ok(TzSpec { utoff: 19800, dst: None }));
		assert_eq!(TzSpec::parse(b"CET-1CEST,M3.5.0,M10.5.0/3"), Ok(TzSpec {
			utoff: 3600,
			dst: Some((7200, TzRule {
				todst: (TzDateRule::M(3, 5, 0), 7200),
				fromdst: (TzDateRule::M(10, 5, 0), 10800)
			}))
		}));
		// Extended transition times, as used by some TZif footers
		assert_eq!(TzSpec::parse(b"<-02>2<-01>,M3.5.0/-1,M10.5.0/0"), Ok(TzSpec {
			utoff: -7200,
			dst: Some((-3600, TzRule {
				todst: (TzDateRule::M(3, 5, 0), -3600),
				fromdst: (TzDateRule::M(10, 5, 0), 0)
			}))
		}));

		assert_eq!(TzSpec::parse(b"EST5EDT"), Err(TzStringError::MissingTzDateRule));
		assert_eq!(TzSpec::parse(b"EST5EDT,M3.2.0"), Err(TzStringError::MissingTzDateRule));
		assert_eq!(TzSpec::parse(b"EST5EDT,M3.2.0,M11.1.0x"), Err(TzStringError::UnexpectedInput));
		assert_eq!(TzSpec::parse(b"EST5EDT,M3.2.0,M11.1"), Err(TzStringError::MissingTzDateRule));
		assert_eq!(TzSpec::parse(b"5EST"), Err(TzStringError::InvalidName));
	}

	#[test]
	fn southern_hemisphere() {
		// Sydney: DST from first Sunday in October until first Sunday in April
		let spec = TzSpec::parse(b"AEST-10AEDT,M10.1.0,M4.1.0/3").unwrap();
		// Jan 15, 2024 is summer
		assert_eq!(spec.info(1705321800), TzInfo { utoff: 39600, isdst: true });
		// Jul 15, 2024 is winter
		assert_eq!(spec.info(1721046600), TzInfo { utoff: 36000, isdst: false });
	}

	#[test]
	fn last_week_rules() {
		// Last Sunday of March 2024 is the 31st, of October 2024 the 27th
		assert_eq!(TzDateRule::M(3, 5, 0).as_days(2024), days_from_civil(2024, 3, 31));
		assert_eq!(TzDateRule::M(10, 5, 0).as_days(2024), days_from_civil(2024, 10, 27));
		// Julian days skip Feb 29
		assert_eq!(TzDateRule::J(59).as_days(2024), days_from_civil(2024, 2, 28));
		assert_eq!(TzDateRule::J(365).as_days(2024), days_from_civil(2024, 12, 31));
		assert_eq!(TzDateRule::N(365).as_days(2024), days_from_civil(2024, 12, 31));
	}

	#[test]
	fn extreme_times() {
		let spec = TzSpec::parse(b"EST5EDT,M3.2.0,M11.1.0").unwrap();
		spec.info(i64::MIN);
		spec.info(i64::MAX);
	}
}
