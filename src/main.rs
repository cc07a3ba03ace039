//! Stamp build runs with their start time in a secondary timezone.
//!
//! This is a small host for the [`stamper`] publisher: it creates a run, stamps it the way a build
//! server would after the run completes, and prints the resulting description. With `-c` it
//! simulates a matrix build instead, aggregating child run descriptions into the parent run.
//!
//! # Command Line Arguments
//!
//! General form: `secondary-timestamper [options...] timezone`
//!
//! | Short form | Long form  | Argument             | Default      | Description                           |
//! | ---------- | ---------- | -------------------- | ------------ | ------------------------------------- |
//! | `-t`       | `--time`   | [Date time string] or milliseconds | Current time | The run's start time    |
//! | `-c`       | `--child`  | Description          | None         | A matrix child run (repeatable)       |
//! | `-l`       | `--list`   | None                 | Off          | Print the timezone choice list        |
//! |            | `--form`   | JSON                 | None         | Configuration form data               |
//!
//! The timezone is an identifier from the zoneinfo database (e.g. `America/New_York`) or a custom
//! `GMT±hh:mm` identifier. Unknown identifiers are treated as UTC.
//!
//! The following environment variables are read:
//! - `TZDIR`: the zoneinfo directory, default `/usr/share/zoneinfo`
//! - `TZ`: the local timezone, default `/etc/localtime`
//! - `RUST_LOG`: the log filter, default `warn`. Logs are written to stderr.
//!
//! [date time string]: time::parse::parse_timestamp
//!
//! # Examples
//!
//! Stamp a run starting now
//! ```sh
//! secondary-timestamper America/New_York
//! ```
//!
//! Stamp a run that started at a given time
//! ```sh
//! secondary-timestamper -t "2024-01-15 12:30:00 Z" Asia/Tokyo
//! ```
//!
//! Aggregate a matrix build whose first child has no description
//! ```sh
//! secondary-timestamper -c "" -c "linux done" -c "macos done" UTC
//! ```

use std::error::Error;
use std::process::ExitCode;

use stamper::{
	MatrixAggregator, Run, RunRecord, SecondaryTimestamp, SystemClock, TimestampConverter,
	TimezoneChoices, ZoneSource
};
use time::tz::Zoneinfo;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use args::{Arguments, ArgumentsError};

mod args;

const USAGE: &str = "\
Stamp build runs with their start time in a secondary timezone.

Usage: secondary-timestamper [OPTIONS] <TIMEZONE>

Options:
  -t, --time <DATETIME>       the run's start time, defaults to now
  -c, --child <DESCRIPTION>   simulate a matrix build with a child run (repeatable)
  -l, --list                  print the timezone choice list
  --form <JSON>               read the configuration from form data
  -h, --help                  print this help

Environment:
  TZDIR     zoneinfo directory, default /usr/share/zoneinfo
  TZ        local timezone, default /etc/localtime
  RUST_LOG  log filter, default warn

Examples:
  secondary-timestamper America/New_York
  secondary-timestamper -t \"2024-01-15 12:30:00 Z\" Asia/Tokyo
  secondary-timestamper --form '{\"timezone\": \"Europe/Berlin\"}'
  secondary-timestamper -c \"\" -c \"linux done\" -c \"macos done\" UTC
";

/// Install the log subscriber, writing to stderr so stdout only carries descriptions.
fn init_tracing() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::registry()
		.with(fmt::layer().with_writer(std::io::stderr))
		.with(filter)
		.init();
}

/// Print every timezone, marking the configured one with `*`.
fn list(publisher: Option<&SecondaryTimestamp>, zoneinfo: &Zoneinfo) {
	let choices = match publisher {
		Some(p) => p.choices(zoneinfo),
		None => TimezoneChoices::build(ZoneSource::ids(zoneinfo), None)
	};
	for choice in &choices {
		println!("{} {}", if choice.selected { '*' } else { ' ' }, choice.name);
	}
}

/// Stamp a run, or aggregate a matrix build, and print the resulting description.
///
/// # Errors
///
/// Returns malformed form data errors, or [`ArgumentsError::MissingTimezone`] if there is no
/// configuration to stamp with.
fn run(args: Arguments) -> Result<ExitCode, Box<dyn Error>> {
	let zoneinfo = Zoneinfo::from_env();
	debug!(root = %zoneinfo.root().display(), "Using zoneinfo directory");

	let publisher = match (args.form, args.timezone) {
		(Some(form), _) => Some(SecondaryTimestamp::from_form_data(&form)?),
		(None, Some(timezone)) => Some(SecondaryTimestamp::new(timezone)),
		(None, None) => None
	};

	if args.list {
		list(publisher.as_ref(), &zoneinfo);
		return Ok(ExitCode::SUCCESS);
	}

	let publisher = publisher.ok_or(ArgumentsError::MissingTimezone)?;
	let converter = TimestampConverter::new(&zoneinfo, SystemClock);
	let start = args.time.unwrap_or_else(|| converter.now_millis());

	if args.children.is_empty() {
		let mut run = RunRecord::new(start);
		publisher.perform(&mut run, &converter)?;
		println!("{}", run.description().unwrap_or_default());
		return Ok(ExitCode::SUCCESS);
	}

	let mut parent = RunRecord::new(start);
	let mut aggregator = publisher.create_aggregator(&mut parent);
	for (i, description) in args.children.into_iter().enumerate() {
		let child = RunRecord::with_description(start, description);
		aggregator.end_run(&child)?;
		debug!(child = i, state = ?aggregator.state(), "Child run finished");
	}
	println!("{}", parent.description().unwrap_or_default());

	Ok(ExitCode::SUCCESS)
}

/// Main program entry point.
///
/// Parses input arguments and stamps a run. See [`crate`] documentation for details.
fn main() -> ExitCode {
	let args = match Arguments::parse(std::env::args_os().skip(1)) {
		Ok(a) => a,
		Err(ArgumentsError::Help) => {
			print!("{}", USAGE);
			return ExitCode::SUCCESS;
		},
		Err(e) => {
			eprintln!("{}\n\n{}", e, USAGE);
			return ExitCode::FAILURE;
		}
	};

	init_tracing();

	run(args)
		.inspect_err(|e| eprintln!("{}", e))
		.unwrap_or(ExitCode::FAILURE)
}
