//! Timezone identifiers resolved against a zoneinfo directory.
//!
//! Identifiers are paths relative to the zoneinfo root, e.g. `America/New_York` is read from
//! `/usr/share/zoneinfo/America/New_York`. Lookups never fail: custom `GMT±hh:mm` identifiers
//! become fixed offsets and anything unrecognised resolves to UTC, the same way the JVM's
//! `TimeZone.getTimeZone` treats unknown IDs.
//!
//! # Examples
//!
//! ```
//! # use time::tz::{Zoneinfo, TzInfo};
//! let zoneinfo = Zoneinfo::new("/nonexistent");
//! assert_eq!(zoneinfo.lookup("GMT+05:30").info(0), TzInfo { utoff: 19800, isdst: false });
//! assert_eq!(zoneinfo.lookup("Not/A_Zone").info(0), TzInfo { utoff: 0, isdst: false });
//! ```

use std::{
	borrow::ToOwned,
	env,
	format,
	fs::{self, File},
	io::{self, Read},
	path::{Component, Path, PathBuf},
	string::String,
	vec::Vec
};
use super::tzfile::{parse_file, TzFileError, TZIF_MAGIC};
use super::tzstring::parse_tzstring;
use super::Timezone;

/// Where zoneinfo lives unless `TZDIR` says otherwise.
pub const DEFAULT_ZONEINFO_DIR: &str = "/usr/share/zoneinfo";
/// The system's local timezone, used when `TZ` is unset.
pub const LOCALTIME_FILE: &str = "/etc/localtime";
/// Top level directories holding duplicate trees of every zone.
const SKIPPED_DIRS: [&str; 2] = ["posix", "right"];
/// TZif files that are not timezone identifiers.
const SKIPPED_FILES: [&str; 3] = ["localtime", "posixrules", "Factory"];

/// A zoneinfo directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Zoneinfo {
	root: PathBuf
}

impl Zoneinfo {
	/// Use the zoneinfo directory at `root`.
	pub fn new<P: Into<PathBuf>>(root: P) -> Zoneinfo {
		Zoneinfo { root: root.into() }
	}

	/// Use `$TZDIR`, or [`DEFAULT_ZONEINFO_DIR`] if it is unset or empty.
	pub fn from_env() -> Zoneinfo {
		let root = env::var_os("TZDIR")
			.filter(|v| !v.is_empty())
			.map(PathBuf::from)
			.unwrap_or_else(|| PathBuf::from(DEFAULT_ZONEINFO_DIR));
		Zoneinfo { root }
	}

	/// The zoneinfo root directory.
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// The file backing timezone identifier `id`.
	///
	/// Returns `None` for identifiers that would escape the zoneinfo root: empty identifiers,
	/// absolute paths, and paths with `.` or `..` components.
	pub fn path(&self, id: &str) -> Option<PathBuf> {
		let relative = Path::new(id);
		let mut components = relative.components().peekable();
		if components.peek().is_none() || !components.all(|c| matches!(c, Component::Normal(_))) {
			return None;
		}
		Some(self.root.join(relative))
	}

	/// Load the timezone with identifier `id` from its TZif file.
	///
	/// # Errors
	///
	/// Returns [`TzFileError::FileReadError`] if `id` is not a valid identifier or the file cannot
	/// be read, or any other [`TzFileError`] if the file is not valid TZif data.
	pub fn load(&self, id: &str) -> Result<Timezone, TzFileError> {
		let path = self.path(id)
			.ok_or_else(|| TzFileError::FileReadError(format!("Invalid timezone identifier: {}", id)))?;
		parse_file(path)
	}

	/// Resolve a timezone identifier, never failing.
	///
	/// Custom `GMT±hh:mm` identifiers are tried first, then the zoneinfo file. Anything else is
	/// UTC.
	pub fn lookup(&self, id: &str) -> Timezone {
		parse_custom_id(id)
			.or_else(|| self.load(id).ok())
			.unwrap_or_else(Timezone::utc)
	}

	/// Every timezone identifier in the directory, sorted.
	///
	/// Only files starting with TZif magic bytes count, so tables like `zone.tab` are left out.
	/// The `posix/` and `right/` mirrors and symlinked directories are not descended into.
	/// Subdirectories that cannot be read are skipped.
	///
	/// # Errors
	///
	/// Returns [`TzFileError::FileReadError`] if the root directory cannot be read.
	pub fn ids(&self) -> Result<Vec<String>, TzFileError> {
		let mut ids = Vec::new();
		collect_ids(&self.root, None, &mut ids)?;
		ids.sort();
		ids.dedup();
		Ok(ids)
	}

	/// The local timezone described by a `TZ` environment variable value.
	///
	/// `tz` may be a zone identifier (optionally prefixed with `:`), an absolute path to a TZif
	/// file, or a POSIX TZ string. If `tz` is `None` or empty, [`LOCALTIME_FILE`] is used. Values
	/// that cannot be resolved mean UTC.
	pub fn local(&self, tz: Option<&str>) -> Timezone {
		let tz = tz
			.map(|v| v.strip_prefix(':').unwrap_or(v))
			.filter(|v| !v.is_empty());
		let resolved = match tz {
			None => parse_file(LOCALTIME_FILE),
			Some(v) if v.starts_with('/') => parse_file(v),
			Some(v) => self.load(v)
				.or_else(|_| parse_tzstring(v.as_bytes()).map_err(TzFileError::from))
		};
		resolved.unwrap_or_else(|_| Timezone::utc())
	}
}

/// The local timezone of this process, from `$TZ` or [`LOCALTIME_FILE`].
pub fn local_timezone(zoneinfo: &Zoneinfo) -> Timezone {
	zoneinfo.local(env::var("TZ").ok().as_deref())
}

/// Parse a custom identifier of the form `GMT+h`, `GMT+hh`, `GMT+hhmm`, or `GMT+hh:mm` (or with
/// `-`) into a fixed offset timezone.
///
/// Hours are limited to 23 and minutes to 59.
///
/// # Examples
///
/// ```
/// # use time::tz::{parse_custom_id, TzInfo};
/// assert_eq!(parse_custom_id("GMT-8").map(|tz| tz.info(0).utoff), Some(-28800));
/// assert_eq!(parse_custom_id("GMT+0530").map(|tz| tz.info(0).utoff), Some(19800));
/// assert_eq!(parse_custom_id("GMT+24"), None);
/// assert_eq!(parse_custom_id("America/New_York"), None);
/// ```
pub fn parse_custom_id(id: &str) -> Option<Timezone> {
	let rest = id.strip_prefix("GMT")?;
	let (sign, digits) = match rest.as_bytes().first()? {
		b'+' => (1, &rest[1..]),
		b'-' => (-1, &rest[1..]),
		_ => return None
	};
	// Byte offsets below are only char boundaries for ASCII input
	if !digits.bytes().all(|b| b.is_ascii_digit() || b == b':') {
		return None;
	}

	let (hours, minutes) = match digits.split_once(':') {
		Some((h, m)) if (1..=2).contains(&h.len()) && m.len() == 2 => (h, m),
		Some(_) => return None,
		None => match digits.len() {
			1 | 2 => (digits, "0"),
			3 | 4 => digits.split_at(digits.len() - 2),
			_ => return None
		}
	};

	if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
		return None;
	}
	let hours: i32 = hours.parse().ok()?;
	let minutes: i32 = minutes.parse().ok()?;
	if hours > 23 || minutes > 59 {
		return None;
	}

	Some(Timezone::fixed(sign * (hours * 3600 + minutes * 60)))
}

/// Append the identifiers of TZif files under `dir` to `ids`.
fn collect_ids(dir: &Path, prefix: Option<&str>, ids: &mut Vec<String>) -> io::Result<()> {
	for entry in fs::read_dir(dir)?.flatten() {
		let Some(name) = entry.file_name().to_str().map(ToOwned::to_owned) else {
			continue;
		};
		let id = match prefix {
			Some(p) => format!("{}/{}", p, name),
			None => name.clone()
		};
		let Ok(file_type) = entry.file_type() else {
			continue;
		};

		if file_type.is_dir() {
			if prefix.is_none() && SKIPPED_DIRS.contains(&name.as_str()) {
				continue;
			}
			collect_ids(&entry.path(), Some(&id), ids).ok();
		} else if !SKIPPED_FILES.contains(&name.as_str()) && is_tzif(&entry.path()) {
			ids.push(id);
		}
	}
	Ok(())
}

/// Check whether the file at `path` starts with TZif magic bytes.
fn is_tzif(path: &Path) -> bool {
	let mut magic = [0; 4];
	File::open(path)
		.and_then(|mut f| f.read_exact(&mut magic))
		.is_ok_and(|_| &magic == TZIF_MAGIC)
}
