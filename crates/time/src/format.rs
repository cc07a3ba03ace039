//! Render calendar time as `MMM d, yyyy hh:mm:ss a`, e.g. `Jan 15, 2024 07:30:00 AM`.
//!
//! The letters follow Java's `SimpleDateFormat`: `MMM` is the English month abbreviation, `hh`
//! the zero padded hour [1, 12] and `a` the `AM`/`PM` marker. Other numeric fields are zero
//! padded to their letter count.
//!
//! # Examples
//!
//! ```
//! # use time::{format::DatePattern, time::Tm};
//! let pattern = DatePattern::description();
//! assert_eq!(pattern.format(&Tm::from_millis(1705321800000)), "Jan 15, 2024 12:30:00 PM");
//! ```

use alloc::{string::{String, ToString}, vec::Vec};
use core::fmt;
use crate::time::Tm;

/// The pattern used for run descriptions, e.g. `Jan 15, 2024 07:30:00 AM`.
pub const DESCRIPTION_PATTERN: &str = "MMM d, yyyy hh:mm:ss a";

const MONTHS: [&str; 12] = [
	"Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"
];

/// A calendar field of a date pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
	Year,
	/// `MMM`
	MonthName,
	Day,
	/// `hh`
	Hour1To12,
	Minute,
	Second,
	AmPm
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token {
	/// A field and its letter count
	Field(Field, usize),
	Literal(&'static str)
}

/// A date pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatePattern {
	tokens: Vec<Token>
}

impl DatePattern {
	/// The pattern of [`DESCRIPTION_PATTERN`].
	pub fn description() -> DatePattern {
		DatePattern {
			tokens: Vec::from([
				Token::Field(Field::MonthName, 3),
				Token::Literal(" "),
				Token::Field(Field::Day, 1),
				Token::Literal(", "),
				Token::Field(Field::Year, 4),
				Token::Literal(" "),
				Token::Field(Field::Hour1To12, 2),
				Token::Literal(":"),
				Token::Field(Field::Minute, 2),
				Token::Literal(":"),
				Token::Field(Field::Second, 2),
				Token::Literal(" "),
				Token::Field(Field::AmPm, 1)
			])
		}
	}

	/// Format `tm` into a new string.
	pub fn format(&self, tm: &Tm) -> String {
		self.display(tm).to_string()
	}

	/// A value that formats `tm` when displayed.
	pub fn display<'a>(&'a self, tm: &'a Tm) -> Formatted<'a> {
		Formatted { pattern: self, tm }
	}
}

/// A [`Tm`] rendered with a [`DatePattern`]. See [`DatePattern::display`].
#[derive(Clone, Copy, Debug)]
pub struct Formatted<'a> {
	pattern: &'a DatePattern,
	tm: &'a Tm
}

impl fmt::Display for Formatted<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for token in &self.pattern.tokens {
			match *token {
				Token::Literal(s) => f.write_str(s)?,
				Token::Field(field, count) => write_field(f, self.tm, field, count)?
			}
		}
		Ok(())
	}
}

fn write_field(f: &mut fmt::Formatter<'_>, tm: &Tm, field: Field, count: usize) -> fmt::Result {
	let hour = i64::from(tm.hour);

	let number = match field {
		Field::Year => tm.year,
		Field::MonthName => return f.write_str(MONTHS[usize::from(tm.mon.clamp(1, 12)) - 1]),
		Field::Day => i64::from(tm.day),
		Field::Hour1To12 => if hour % 12 == 0 { 12 } else { hour % 12 },
		Field::Minute => i64::from(tm.min),
		Field::Second => i64::from(tm.sec),
		Field::AmPm => return f.write_str(if hour < 12 { "AM" } else { "PM" })
	};
	write!(f, "{:0count$}", number)
}
