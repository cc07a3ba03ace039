//! Support for command line argument parsing.
//!
//! See [crate] documentation for details on command line arguments and examples.

use std::ffi::OsString;
use thiserror::Error;
use time::{parse_timestamp, ParseError};

/// The error type for parsing command line arguments.
#[derive(Debug, Error)]
#[cfg_attr(test, derive(PartialEq))]
pub enum ArgumentsError {
	/// The option was unrecognized. The option is returned as the payload of this variant.
	#[error("Unrecognized option: {0}")]
	UnrecognizedOption(String),
	/// Error converting an argument to UTF-8. The argument index and original [`OsString`] that
	/// could not be converted are returned as the payload of this variant.
	#[error("Invalid UTF-8 in argument {0}: {1:?}")]
	InvalidUTF8(usize, OsString),
	/// Neither a timezone nor form data was supplied.
	#[error("Missing timezone input")]
	MissingTimezone,
	/// More than one timezone was supplied. The extra argument is returned as the payload of this
	/// variant.
	#[error("Unexpected argument: {0}")]
	UnexpectedArgument(String),
	/// The parameter for an option was not supplied. The option is returned as the payload for this
	/// variant.
	#[error("Missing parameter for option {0}")]
	MissingParameter(String),
	/// An error occured while parsing the provided date time string. The underlying parse error is
	/// returned as the payload for this variant.
	#[error("Datetime parsing error: {0}")]
	DateTimeParseError(#[from] ParseError),
	/// Help option (-h) was included, so print help details and exit.
	#[error("Help requested")]
	Help
}

/// Convert an argument to [`&str`].
///
/// The function takes the argument index `i`, optional argument name `a`, and the argument `s`.
///
/// # Errors
///
/// Returns [`ArgumentsError::InvalidUTF8`] if the argument could not be converted to UTF-8 or
/// [`ArgumentsError::MissingParameter`] if the argument is `None`.
fn arg_to_str<'b>(i: usize, a: Option<&str>, s: Option<&'b OsString>) -> Result<&'b str, ArgumentsError> {
	match s {
		Some(v) => v.to_str().ok_or_else(|| ArgumentsError::InvalidUTF8(i, v.clone())),
		None => Err(ArgumentsError::MissingParameter(a.map(String::from).unwrap_or_default()))
	}
}

/// Parse a start time: either milliseconds since the Unix epoch or a [date time string].
///
/// [date time string]: time::parse::parse_timestamp
fn parse_time(s: &str) -> Result<i64, ArgumentsError> {
	match s.parse::<i64>() {
		Ok(millis) => Ok(millis),
		Err(_) => Ok(parse_timestamp(s)?)
	}
}

/// Parsed command line arguments.
#[derive(Debug, Default)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Arguments {
	/// The secondary timezone identifier (if provided).
	pub timezone: Option<String>,
	/// Configuration form data as JSON (if provided). Takes precedence over `timezone`.
	pub form: Option<String>,
	/// The run's start time in milliseconds since the Unix epoch (if provided).
	pub time: Option<i64>,
	/// Descriptions of matrix child runs, in the order they finish.
	pub children: Vec<String>,
	/// Print the timezone choice list instead of stamping a run.
	pub list: bool
}

impl Arguments {
	/// Parse command line arguments.
	///
	/// The input can be any type that implements [`Iterator`] that yields [`OsString`], though
	/// typically this would be [`std::env::args_os`]. This function assumes that the application
	/// name is **not** supplied as the first item yielded by `args`.
	///
	/// A timezone (or `--form`) is required unless `--list` is given.
	///
	/// # Errors
	///
	/// This function can return any of the variants in [`ArgumentsError`]. See that documentation
	/// for more details.
	pub fn parse(mut args: impl Iterator<Item = OsString>) -> Result<Arguments, ArgumentsError> {
		let mut parsed = Arguments::default();
		let mut i = 0;
		while let Some(arg) = args.next() {
			match arg_to_str(i, None, Some(&arg))? {
				t @ ("-t" | "--time") => {
					parsed.time = Some(parse_time(arg_to_str(i + 1, Some(t), args.next().as_ref())?)?);
					// Increment because we called args.next()
					i += 1;
				},
				c @ ("-c" | "--child") => {
					parsed.children.push(String::from(arg_to_str(i + 1, Some(c), args.next().as_ref())?));
					i += 1;
				},
				"--form" => {
					parsed.form = Some(String::from(arg_to_str(i + 1, Some("--form"), args.next().as_ref())?));
					i += 1;
				},
				"-l" | "--list" => parsed.list = true,
				"-h" | "--help" => return Err(ArgumentsError::Help),
				v => {
					if v.starts_with('-') && v.len() > 1 {
						return Err(ArgumentsError::UnrecognizedOption(v.to_string()));
					}
					if parsed.timezone.is_some() {
						return Err(ArgumentsError::UnexpectedArgument(v.to_string()));
					}
					parsed.timezone = Some(v.to_string());
				}
			}
			i += 1;
		}

		if !parsed.list && parsed.timezone.is_none() && parsed.form.is_none() {
			return Err(ArgumentsError::MissingTimezone);
		}
		Ok(parsed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(args: &[&str]) -> Result<Arguments, ArgumentsError> {
		Arguments::parse(args.iter().map(OsString::from))
	}

	#[test]
	fn arg_to_str_test() {
		let valid = OsString::from("test");
		assert_eq!(arg_to_str(1, Some("arg"), Some(&valid)), Ok("test"));
		assert_eq!(
			arg_to_str(1, Some("arg"), None),
			Err(ArgumentsError::MissingParameter(String::from("arg")))
		);

		let invalid = unsafe { OsString::from_encoded_bytes_unchecked(vec![b't', 0xff, b's', b't']) };
		assert_eq!(
			arg_to_str(1, Some("arg"), Some(&invalid)),
			Err(ArgumentsError::InvalidUTF8(1, invalid.clone()))
		);
	}

	#[test]
	fn arguments_parse_test() {
		assert_eq!(parse(&["America/New_York"]), Ok(Arguments {
			timezone: Some(String::from("America/New_York")),
			..Arguments::default()
		}));

		assert_eq!(
			parse(&["-t", "2024-01-15 12:30:00 Z", "-c", "", "--child", "B", "-c", "C", "Asia/Tokyo"]),
			Ok(Arguments {
				timezone: Some(String::from("Asia/Tokyo")),
				time: Some(1705321800000),
				children: vec![String::new(), String::from("B"), String::from("C")],
				..Arguments::default()
			})
		);

		assert_eq!(parse(&["--time", "1705321800000", "UTC"]).map(|a| a.time), Ok(Some(1705321800000)));
		assert_eq!(parse(&["--time", "-1000", "UTC"]).map(|a| a.time), Ok(Some(-1000)));

		assert_eq!(parse(&["--form", r#"{"timezone":"UTC"}"#]), Ok(Arguments {
			form: Some(String::from(r#"{"timezone":"UTC"}"#)),
			..Arguments::default()
		}));

		assert_eq!(parse(&["-l"]), Ok(Arguments { list: true, ..Arguments::default() }));
		assert_eq!(parse(&["--list", "UTC"]).map(|a| (a.list, a.timezone)), Ok((true, Some(String::from("UTC")))));
	}

	#[test]
	fn arguments_errors_test() {
		assert_eq!(parse(&[]), Err(ArgumentsError::MissingTimezone));
		assert_eq!(parse(&["-c", "B"]), Err(ArgumentsError::MissingTimezone));
		assert_eq!(parse(&["-h", "UTC"]), Err(ArgumentsError::Help));
		assert_eq!(parse(&["UTC", "--help"]), Err(ArgumentsError::Help));
		assert_eq!(parse(&["-x", "UTC"]), Err(ArgumentsError::UnrecognizedOption(String::from("-x"))));
		assert_eq!(parse(&["UTC", "GMT"]), Err(ArgumentsError::UnexpectedArgument(String::from("GMT"))));
		assert_eq!(parse(&["UTC", "-t"]), Err(ArgumentsError::MissingParameter(String::from("-t"))));
		assert_eq!(parse(&["UTC", "--child"]), Err(ArgumentsError::MissingParameter(String::from("--child"))));
		assert_eq!(parse(&["--form"]), Err(ArgumentsError::MissingParameter(String::from("--form"))));
		assert_eq!(
			parse(&["-t", "yesterday", "UTC"]),
			Err(ArgumentsError::DateTimeParseError(ParseError::MissingYear))
		);
		assert_eq!(
			parse(&["-t", "2024-02-30", "UTC"]),
			Err(ArgumentsError::DateTimeParseError(ParseError::DayOutOfRange))
		);
	}
}
