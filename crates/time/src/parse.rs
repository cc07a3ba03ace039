//! Parse date time strings like `2024-01-15 07:30:00 -05:00` into millisecond timestamps.
//!
//! # Examples
//! ```
//! # use time::parse::parse_timestamp;
//! assert_eq!(parse_timestamp("2024-01-15T12:30:00Z"), Ok(1705321800000));
//! assert_eq!(parse_timestamp("2024-01-15 07:30 -05:00"), Ok(1705321800000));
//! assert_eq!(parse_timestamp("2024-01-15 18:00:00.250+0530"), Ok(1705321800250));
//! ```
//!
//! See [`parse_timestamp`] for the accepted formats.

use thiserror::Error;
use crate::time::{days_per_month, timestamp_from_ymd, MILLIS_PER_SECOND};

/// Error type for parsing date time strings.
#[derive(Debug, PartialEq, Error)]
pub enum ParseError {
	/// Expected a four digit year.
	#[error("Year missing or malformed")]
	MissingYear,
	/// Expected a two digit month.
	#[error("Month missing or malformed")]
	MissingMonth,
	/// The month was outside of [1, 12].
	#[error("Month out of range")]
	MonthOutOfRange,
	/// Expected a two digit day.
	#[error("Day missing or malformed")]
	MissingDay,
	/// The day was past the end of its month.
	#[error("Day out of range")]
	DayOutOfRange,
	/// Expected two digit hours.
	#[error("Hours missing or malformed")]
	MissingHours,
	/// The hours were outside of [0, 23].
	#[error("Hours out of range")]
	HoursOutOfRange,
	/// Expected two digit minutes.
	#[error("Minutes missing or malformed")]
	MissingMinutes,
	/// The minutes were outside of [0, 59].
	#[error("Minutes out of range")]
	MinutesOutOfRange,
	/// Expected two digit seconds.
	#[error("Seconds missing or malformed")]
	MissingSeconds,
	/// The seconds were outside of [0, 59].
	#[error("Seconds out of range")]
	SecondsOutOfRange,
	/// Expected three digit milliseconds.
	#[error("Milliseconds missing or malformed")]
	MissingMilliseconds,
	/// Bytes remained after a complete date time string.
	#[error("Unexpected input at end of date time string")]
	UnexpectedInput
}

/// Reads fixed width fields off the front of the input.
struct Fields<'a> {
	bytes: &'a [u8]
}

impl Fields<'_> {
	fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Consume `b` if it is next.
	fn eat(&mut self, b: u8) -> bool {
		match self.bytes.split_first() {
			Some((&first, rest)) if first == b => {
				self.bytes = rest;
				true
			},
			_ => false
		}
	}

	/// Consume one of `bs` and return it.
	fn eat_any(&mut self, bs: &[u8]) -> Option<u8> {
		let (&first, rest) = self.bytes.split_first()?;
		if !bs.contains(&first) {
			return None;
		}
		self.bytes = rest;
		Some(first)
	}

	/// Read exactly `n` ASCII digits. `n` is at most 4, so the value always fits.
	fn digits(&mut self, n: usize, e: ParseError) -> Result<i64, ParseError> {
		let Some((digits, rest)) = self.bytes.split_at_checked(n) else {
			return Err(e);
		};
		if !digits.iter().all(u8::is_ascii_digit) {
			return Err(e);
		}
		self.bytes = rest;
		Ok(digits.iter().fold(0, |acc, &d| acc * 10 + (d - b'0') as i64))
	}

	/// Read `n` digits no greater than `max`.
	fn bounded(&mut self, n: usize, max: i64, missing: ParseError, range: ParseError)
		-> Result<i64, ParseError>
	{
		match self.digits(n, missing)? {
			v if v > max => Err(range),
			v => Ok(v)
		}
	}
}

/// Parse a date time string into milliseconds since the Unix epoch.
///
/// Accepted formats:
/// - `YYYY-MM-DD`
/// - `YYYY-MM-DDTHH:mm` or `YYYY-MM-DD HH:mm`
/// - `YYYY-MM-DDTHH:mm:ss` or `YYYY-MM-DD HH:mm:ss`
/// - `YYYY-MM-DDTHH:mm:ss.sss` or `YYYY-MM-DD HH:mm:ss.sss`
/// - Any of the formats with a time, followed by an optional space and then `Z`, `+HH:mm`,
///   `-HH:mm`, `+HHmm`, or `-HHmm`
///
/// Without an offset the time is taken to be UTC. `24:00` is not accepted.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is malformed or out of range, including when a valid date
/// time is followed by extra input.
///
/// # Examples
/// ```
/// # use time::parse::{parse_timestamp, ParseError};
/// assert_eq!(parse_timestamp("1970-01-02"), Ok(86400000));
/// assert_eq!(parse_timestamp("2024-02-30"), Err(ParseError::DayOutOfRange));
/// assert_eq!(parse_timestamp("2024-01-15 12:30:00 PST"), Err(ParseError::UnexpectedInput));
/// ```
pub fn parse_timestamp(s: &str) -> Result<i64, ParseError> {
	let mut f = Fields { bytes: s.as_bytes() };

	let year = f.digits(4, ParseError::MissingYear)?;
	if !f.eat(b'-') {
		return Err(if f.is_empty() { ParseError::MissingMonth } else { ParseError::UnexpectedInput });
	}
	let month = f.digits(2, ParseError::MissingMonth)?;
	if !(1..=12).contains(&month) {
		return Err(ParseError::MonthOutOfRange);
	}
	if !f.eat(b'-') {
		return Err(if f.is_empty() { ParseError::MissingDay } else { ParseError::UnexpectedInput });
	}
	let day = f.digits(2, ParseError::MissingDay)?;
	if day == 0 || day > days_per_month(year, month as u8) as i64 {
		return Err(ParseError::DayOutOfRange);
	}

	let date = timestamp_from_ymd(year, month as u8, day as u8) * MILLIS_PER_SECOND;
	if f.is_empty() {
		return Ok(date);
	}
	if f.eat_any(b"T ").is_none() {
		return Err(ParseError::UnexpectedInput);
	}

	let hours = f.bounded(2, 23, ParseError::MissingHours, ParseError::HoursOutOfRange)?;
	if !f.eat(b':') {
		return Err(ParseError::MissingMinutes);
	}
	let minutes = f.bounded(2, 59, ParseError::MissingMinutes, ParseError::MinutesOutOfRange)?;
	let (seconds, millis) = match f.eat(b':') {
		true => {
			let seconds = f.bounded(2, 59, ParseError::MissingSeconds, ParseError::SecondsOutOfRange)?;
			match f.eat(b'.') {
				true => (seconds, f.digits(3, ParseError::MissingMilliseconds)?),
				false => (seconds, 0)
			}
		},
		false => (0, 0)
	};

	let time = ((hours * 60 + minutes) * 60 + seconds) * MILLIS_PER_SECOND + millis;
	let offset = read_offset(&mut f)?;
	if !f.is_empty() {
		return Err(ParseError::UnexpectedInput);
	}

	Ok(date + time - offset)
}

/// Read an optional UTC offset, in milliseconds.
fn read_offset(f: &mut Fields<'_>) -> Result<i64, ParseError> {
	if f.is_empty() {
		return Ok(0);
	}
	f.eat(b' ');
	let sign = match f.eat_any(b"Z+-") {
		Some(b'Z') => return Ok(0),
		Some(b'+') => 1,
		Some(_) => -1,
		None => return Err(ParseError::UnexpectedInput)
	};

	let hours = f.bounded(2, 23, ParseError::MissingHours, ParseError::HoursOutOfRange)?;
	f.eat(b':');
	let minutes = f.bounded(2, 59, ParseError::MissingMinutes, ParseError::MinutesOutOfRange)?;
	Ok(sign * (hours * 60 + minutes) * 60 * MILLIS_PER_SECOND)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dates() {
		assert_eq!(parse_timestamp("1970-01-01"), Ok(0));
		assert_eq!(parse_timestamp("2024-01-15"), Ok(1705276800000));
		assert_eq!(parse_timestamp("2024-02-29"), Ok(1709164800000));
		assert_eq!(parse_timestamp("1969-12-31"), Ok(-86400000));

		assert_eq!(parse_timestamp(""), Err(ParseError::MissingYear));
		assert_eq!(parse_timestamp("24-01-15"), Err(ParseError::MissingYear));
		assert_eq!(parse_timestamp("2024"), Err(ParseError::MissingMonth));
		assert_eq!(parse_timestamp("2024/01/15"), Err(ParseError::UnexpectedInput));
		assert_eq!(parse_timestamp("2024-1-15"), Err(ParseError::MissingMonth));
		assert_eq!(parse_timestamp("2024-13-01"), Err(ParseError::MonthOutOfRange));
		assert_eq!(parse_timestamp("2024-01"), Err(ParseError::MissingDay));
		assert_eq!(parse_timestamp("2024-01-5"), Err(ParseError::MissingDay));
		assert_eq!(parse_timestamp("2023-02-29"), Err(ParseError::DayOutOfRange));
		assert_eq!(parse_timestamp("2024-01-00"), Err(ParseError::DayOutOfRange));
	}

	#[test]
	fn times() {
		assert_eq!(parse_timestamp("2024-01-15T12:30"), Ok(1705321800000));
		assert_eq!(parse_timestamp("2024-01-15 12:30"), Ok(1705321800000));
		assert_eq!(parse_timestamp("2024-01-15 12:30:45"), Ok(1705321845000));
		assert_eq!(parse_timestamp("2024-01-15 12:30:45.007"), Ok(1705321845007));

		assert_eq!(parse_timestamp("2024-01-15 "), Err(ParseError::MissingHours));
		assert_eq!(parse_timestamp("2024-01-15x12:30"), Err(ParseError::UnexpectedInput));
		assert_eq!(parse_timestamp("2024-01-15 12"), Err(ParseError::MissingMinutes));
		assert_eq!(parse_timestamp("2024-01-15 24:00"), Err(ParseError::HoursOutOfRange));
		assert_eq!(parse_timestamp("2024-01-15 12:60"), Err(ParseError::MinutesOutOfRange));
		assert_eq!(parse_timestamp("2024-01-15 12:30:"), Err(ParseError::MissingSeconds));
		assert_eq!(parse_timestamp("2024-01-15 12:30:60"), Err(ParseError::SecondsOutOfRange));
		assert_eq!(parse_timestamp("2024-01-15 12:30:45."), Err(ParseError::MissingMilliseconds));
		assert_eq!(parse_timestamp("2024-01-15 12:30:45.12"), Err(ParseError::MissingMilliseconds));
	}

	#[test]
	fn offsets() {
		assert_eq!(parse_timestamp("2024-01-15T12:30:00Z"), Ok(1705321800000));
		assert_eq!(parse_timestamp("2024-01-15 12:30:00 Z"), Ok(1705321800000));
		assert_eq!(parse_timestamp("2024-01-15T07:30:00-05:00"), Ok(1705321800000));
		assert_eq!(parse_timestamp("2024-01-15 07:30 -0500"), Ok(1705321800000));
		assert_eq!(parse_timestamp("2024-01-15 18:00:00 +05:30"), Ok(1705321800000));

		assert_eq!(parse_timestamp("2024-01-15 12:30Zulu"), Err(ParseError::UnexpectedInput));
		assert_eq!(parse_timestamp("2024-01-15 12:30 UTC"), Err(ParseError::UnexpectedInput));
		assert_eq!(parse_timestamp("2024-01-15 12:30+"), Err(ParseError::MissingHours));
		assert_eq!(parse_timestamp("2024-01-15 12:30+05"), Err(ParseError::MissingMinutes));
		assert_eq!(parse_timestamp("2024-01-15 12:30+24:00"), Err(ParseError::HoursOutOfRange));
		assert_eq!(parse_timestamp("2024-01-15 12:30+05:60"), Err(ParseError::MinutesOutOfRange));
		assert_eq!(parse_timestamp("2024-01-15 12:30+05:30:00"), Err(ParseError::UnexpectedInput));
	}
}
