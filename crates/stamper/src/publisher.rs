//! The post-build step that stamps runs with a secondary timezone timestamp.

use serde::{Deserialize, Serialize};
use tracing::info;
use crate::aggregate::DescriptionAggregator;
use crate::choices::TimezoneChoices;
use crate::convert::TimestampConverter;
use crate::error::Result;
use crate::run::Run;
use crate::zones::{Clock, ZoneSource};

/// Publisher configuration: the secondary timezone to stamp runs with.
///
/// # Examples
///
/// ```
/// # use stamper::{FixedClock, Run, RunRecord, SecondaryTimestamp, TimestampConverter};
/// # use time::tz::Zoneinfo;
/// let publisher = SecondaryTimestamp::from_form_data(r#"{"timezone": "GMT-05:00"}"#).unwrap();
/// let zoneinfo = Zoneinfo::new("/nonexistent");
/// let converter = TimestampConverter::new(&zoneinfo, FixedClock(1705321800000));
///
/// let mut run = RunRecord::new(1705321800000);
/// publisher.perform(&mut run, &converter).unwrap();
/// assert!(run.description().unwrap().starts_with("GMT-05:00 Jan 15, 2024 "));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryTimestamp {
	timezone: String
}

impl SecondaryTimestamp {
	pub fn new<S: Into<String>>(timezone: S) -> SecondaryTimestamp {
		SecondaryTimestamp { timezone: timezone.into() }
	}

	/// Bind the configuration from submitted JSON form data, e.g. `{"timezone": "Asia/Tokyo"}`.
	///
	/// Other fields in the form are ignored.
	///
	/// # Errors
	///
	/// Returns [`StampError::Form`](crate::StampError::Form) if the data is not JSON or has no
	/// string `timezone` field.
	pub fn from_form_data(json: &str) -> Result<SecondaryTimestamp> {
		Ok(serde_json::from_str(json)?)
	}

	/// The configured timezone identifier.
	pub fn timezone(&self) -> &str {
		&self.timezone
	}

	/// Stamp a completed run, replacing its description with the start time in the configured
	/// timezone.
	///
	/// The local offset is taken from the converter's local timezone at the converter's current
	/// instant. Returns `Ok(true)` to let the build continue.
	///
	/// # Errors
	///
	/// Passes through errors from the host while updating the run.
	pub fn perform<R, Z, C>(&self, run: &mut R, converter: &TimestampConverter<'_, Z, C>) -> Result<bool>
	where
		R: Run + ?Sized,
		Z: ZoneSource + ?Sized,
		C: Clock
	{
		let local_offset = converter.local_offset_millis();
		let description = converter.convert(run.start_time_millis(), local_offset, &self.timezone);
		info!(description = %description, "Setting run description");
		run.set_description(description)?;
		Ok(true)
	}

	/// The aggregator for a composite run, called once per finished child.
	pub fn create_aggregator<'a, R: Run + ?Sized>(&self, parent: &'a mut R) -> DescriptionAggregator<'a, R> {
		DescriptionAggregator::new(parent)
	}

	/// Every timezone in `zones`, with this configuration's timezone selected.
	pub fn choices<Z: ZoneSource + ?Sized>(&self, zones: &Z) -> TimezoneChoices {
		TimezoneChoices::build(zones.ids(), Some(&self.timezone))
	}
}
