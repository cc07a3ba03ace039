//! Render a run's start time in a secondary timezone.
//!
//! The offset of the secondary timezone is taken at the current instant, not at the start of
//! the run. A run that started in winter but is stamped in summer shows the summer offset. The
//! start instant is shifted by the difference between the secondary and the local offset, then
//! printed in the local timezone at the shifted instant. When the local timezone changes its
//! offset between now and the shifted instant, the printed time moves with it.
//!
//! # Examples
//!
//! ```
//! # use stamper::{FixedClock, TimestampConverter};
//! # use time::tz::Zoneinfo;
//! let zoneinfo = Zoneinfo::new("/nonexistent");
//! let converter = TimestampConverter::new(&zoneinfo, FixedClock(1705321800000));
//! let local = converter.local_offset_millis();
//! assert_eq!(
//! 	converter.convert(1705321800000, local, "GMT+05:30"),
//! 	"GMT+05:30 Jan 15, 2024 06:00:00 PM"
//! );
//! ```

use time::format::DatePattern;
use tracing::debug;
use crate::zones::{Clock, ZoneSource};

/// Formats run start times for a timezone identifier.
#[derive(Debug)]
pub struct TimestampConverter<'a, Z: ?Sized, C> {
	zones: &'a Z,
	clock: C
}

impl<'a, Z: ZoneSource + ?Sized, C: Clock> TimestampConverter<'a, Z, C> {
	/// A converter resolving timezones from `zones`, with `clock` as "now".
	pub fn new(zones: &'a Z, clock: C) -> Self {
		TimestampConverter { zones, clock }
	}

	/// The current instant, in milliseconds since the Unix epoch.
	pub fn now_millis(&self) -> i64 {
		self.clock.now_millis()
	}

	/// The UTC offset of the local timezone right now, in milliseconds.
	pub fn local_offset_millis(&self) -> i64 {
		self.zones.local().offset_millis(self.now_millis())
	}

	/// The UTC offset of `timezone` right now, in milliseconds. Unknown identifiers are UTC.
	pub fn target_offset_millis(&self, timezone: &str) -> i64 {
		let offset = self.zones.lookup(timezone).offset_millis(self.now_millis());
		debug!(timezone, offset_millis = offset, "Resolved timezone offset");
		offset
	}

	/// Format `start_millis` for `timezone` as `"<timezone> MMM d, yyyy hh:mm:ss a"`.
	///
	/// `local_offset_millis` is the local timezone's UTC offset, normally from
	/// [`local_offset_millis`](Self::local_offset_millis). The shifted instant is rendered in the
	/// local timezone at its own offset. Arithmetic saturates, so no input can panic.
	pub fn convert(&self, start_millis: i64, local_offset_millis: i64, timezone: &str) -> String {
		let shifted = start_millis
			.saturating_sub(local_offset_millis)
			.saturating_add(self.target_offset_millis(timezone));
		let wall_clock = self.zones.local().date(shifted);
		format!("{} {}", timezone, DatePattern::description().display(&wall_clock))
	}
}
