//! Where the converter gets the current time and timezones from.

use time::tz::{self, Timezone, Zoneinfo};
use tracing::warn;

/// A source of the current instant.
pub trait Clock {
	/// Milliseconds since the Unix epoch.
	fn now_millis(&self) -> i64;
}

/// The system's real time clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now_millis(&self) -> i64 {
		match time::now() {
			Some(t) => t.as_millis(),
			None => {
				warn!("Failed to read the system clock, using the Unix epoch");
				0
			}
		}
	}
}

/// A clock frozen at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
	fn now_millis(&self) -> i64 {
		self.0
	}
}

/// A timezone database.
pub trait ZoneSource {
	/// Resolve a timezone identifier. Unknown identifiers resolve to UTC.
	fn lookup(&self, id: &str) -> Timezone;

	/// The execution environment's local timezone.
	fn local(&self) -> Timezone;

	/// Every known timezone identifier. Empty if the database cannot be listed.
	fn ids(&self) -> Vec<String>;
}

impl ZoneSource for Zoneinfo {
	fn lookup(&self, id: &str) -> Timezone {
		Zoneinfo::lookup(self, id)
	}

	fn local(&self) -> Timezone {
		tz::local_timezone(self)
	}

	fn ids(&self) -> Vec<String> {
		Zoneinfo::ids(self).unwrap_or_else(|e| {
			warn!(root = %self.root().display(), error = %e, "Failed to list timezones");
			Vec::new()
		})
	}
}
