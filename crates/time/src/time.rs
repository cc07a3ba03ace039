//! Calendar utilities for Unix timestamps, unaware of timezones.
//!
//! All conversions use the proleptic Gregorian calendar and work for instants before and after
//! the Unix epoch. None of these functions call into libc's `gmtime`/`mktime`, so they are thread
//! safe and behave identically on every platform.
//!
//! # Examples
//!
//! ```
//! # use time::time::Tm;
//! let date = Tm::from_millis(1718617807250);
//! assert_eq!(date, Tm {
//! 	year: 2024,
//! 	mon: 6,
//! 	day: 17,
//! 	hour: 9,
//! 	min: 50,
//! 	sec: 7,
//! 	milli: 250,
//! 	wday: 1,
//! 	yday: 169
//! });
//! ```

#[cfg(feature = "now")]
use core::mem::MaybeUninit;
#[cfg(feature = "now")]
use libc::{timespec, clock_gettime, CLOCK_REALTIME};

/// Milliseconds per second.
pub const MILLIS_PER_SECOND: i64 = 1000;
/// Seconds per minute.
const SECONDS_PER_MINUTE: i64 = 60;
/// Seconds per hour.
const SECONDS_PER_HOUR: i64 = SECONDS_PER_MINUTE * 60;
/// Seconds per day.
pub const SECONDS_PER_DAY: i64 = SECONDS_PER_HOUR * 24;
/// Milliseconds per day.
const MILLIS_PER_DAY: i64 = SECONDS_PER_DAY * MILLIS_PER_SECOND;
/// Days per 400-year era. The Gregorian calendar repeats itself every era.
const DAYS_PER_ERA: i64 = 146097;
/// Years per era.
const YEARS_PER_ERA: i64 = 400;
/// Days from March 1, 0000 to January 1, 1970.
const DAYS_FROM_MARCH_0000_TO_EPOCH: i64 = 719468;

/// Unix time with nanosecond granularity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeSpec {
	/// Seconds since the Unix epoch
	pub sec: i64,
	/// Nanoseconds since the beginning of `sec`, ranging [0-999999999]
	pub nsec: i64
}

impl TimeSpec {
	/// Create a [`TimeSpec`] from milliseconds since the Unix epoch.
	///
	/// # Examples
	///
	/// ```
	/// # use time::time::TimeSpec;
	/// assert_eq!(TimeSpec::from_millis(1500), TimeSpec { sec: 1, nsec: 500000000 });
	/// assert_eq!(TimeSpec::from_millis(-1500), TimeSpec { sec: -2, nsec: 500000000 });
	/// ```
	pub fn from_millis(millis: i64) -> TimeSpec {
		TimeSpec {
			sec: millis.div_euclid(MILLIS_PER_SECOND),
			nsec: millis.rem_euclid(MILLIS_PER_SECOND) * 1_000_000
		}
	}

	/// Milliseconds since the Unix epoch, truncating sub-millisecond precision.
	///
	/// Saturates at the bounds of `i64`.
	pub fn as_millis(&self) -> i64 {
		self.sec
			.saturating_mul(MILLIS_PER_SECOND)
			.saturating_add(self.nsec / 1_000_000)
	}
}

#[cfg_attr(docsrs, doc(cfg(feature = "now")))]
#[cfg(feature = "now")]
impl From<timespec> for TimeSpec {
	fn from(value: timespec) -> Self {
		TimeSpec {
			sec: value.tv_sec,
			nsec: value.tv_nsec
		}
	}
}

/// Get the current time as a Unix timestamp with nanosecond granularity.
///
/// Returns `None` if `libc::clock_gettime` fails.
///
/// # Examples
///
/// ```
/// # use time::time::now;
/// let c = now().expect("Failed to get current time");
/// assert!(c.sec > 0);
/// ```
#[cfg_attr(docsrs, doc(cfg(feature = "now")))]
#[cfg(feature = "now")]
pub fn now() -> Option<TimeSpec> {
	let mut time = MaybeUninit::<timespec>::uninit();
	// Safety:
	// - clock_gettime does not read time, only writes
	// - if clock_gettime returns zero, time is successfully initialized
	unsafe {
		match clock_gettime(CLOCK_REALTIME, time.as_mut_ptr()) {
			0 => Some(time.assume_init().into()),
			_ => None
		}
	}
}

/// Check whether a given absolute Gregorian `year` is a leap year.
///
/// # Examples
///
/// ```
/// # use time::time::isleapyear;
/// assert_eq!(isleapyear(1900), false);
/// assert_eq!(isleapyear(2000), true);
/// assert_eq!(isleapyear(2023), false);
/// assert_eq!(isleapyear(2024), true);
/// assert_eq!(isleapyear(-4), true);
/// ```
#[inline(always)]
pub fn isleapyear(year: i64) -> bool {
	year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// The number of days in month `m` (1-12) of `year`.
///
/// Out of range months are treated as 31-day months.
pub fn days_per_month(year: i64, m: u8) -> u8 {
	match m {
		2 => if isleapyear(year) { 29 } else { 28 },
		4 | 6 | 9 | 11 => 30,
		_ => 31
	}
}

/// Days since the Unix epoch for a given year, month (1-12), and day of month.
///
/// The algorithm rotates the year to start in March so that the leap day is the last day of the
/// rotated year, then counts whole 400-year eras. Details:
/// <http://howardhinnant.github.io/date_algorithms.html#days_from_civil>
///
/// # Examples
///
/// ```
/// # use time::time::days_from_civil;
/// assert_eq!(days_from_civil(1970, 1, 1), 0);
/// assert_eq!(days_from_civil(2024, 2, 29), 19782);
/// assert_eq!(days_from_civil(1969, 12, 31), -1);
/// ```
pub fn days_from_civil(year: i64, m: u8, d: u8) -> i64 {
	let y = if m <= 2 { year - 1 } else { year };
	let era = y.div_euclid(YEARS_PER_ERA);
	let yoe = y.rem_euclid(YEARS_PER_ERA);
	let mp = if m > 2 { m as i64 - 3 } else { m as i64 + 9 };
	let doy = (153 * mp + 2) / 5 + d as i64 - 1;
	let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
	era * DAYS_PER_ERA + doe - DAYS_FROM_MARCH_0000_TO_EPOCH
}

/// Year, month (1-12), and day of month for a count of days since the Unix epoch.
///
/// Inverse of [`days_from_civil`].
///
/// # Examples
///
/// ```
/// # use time::time::civil_from_days;
/// assert_eq!(civil_from_days(0), (1970, 1, 1));
/// assert_eq!(civil_from_days(19782), (2024, 2, 29));
/// assert_eq!(civil_from_days(-1), (1969, 12, 31));
/// ```
pub fn civil_from_days(days: i64) -> (i64, u8, u8) {
	let z = days + DAYS_FROM_MARCH_0000_TO_EPOCH;
	let era = z.div_euclid(DAYS_PER_ERA);
	let doe = z.rem_euclid(DAYS_PER_ERA);
	let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
	let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
	// Linear equations mapping day of (March-based) year to month and back
	let mp = (5 * doy + 2) / 153;
	let d = (doy - (153 * mp + 2) / 5 + 1) as u8;
	let m = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
	let y = yoe + era * YEARS_PER_ERA + if m <= 2 { 1 } else { 0 };
	(y, m, d)
}

/// Day of week (0-6 => Sunday-Saturday) for a count of days since the Unix epoch.
#[inline(always)]
pub fn wday_from_days(days: i64) -> u8 {
	// Jan 1, 1970 was a Thursday
	(days + 4).rem_euclid(7) as u8
}

/// Unix timestamp (seconds) for 00:00:00 UTC on the given year, month, and day.
///
/// Saturates for years too far from the epoch to express in seconds.
///
/// # Examples
///
/// ```
/// # use time::time::timestamp_from_ymd;
/// assert_eq!(timestamp_from_ymd(2024, 2, 28), 1709078400);
/// assert_eq!(timestamp_from_ymd(2024, 3, 1), 1709251200);
/// ```
#[inline(always)]
pub fn timestamp_from_ymd(year: i64, m: u8, d: u8) -> i64 {
	days_from_civil(year, m, d).saturating_mul(SECONDS_PER_DAY)
}

/// The absolute Gregorian year containing a Unix timestamp (seconds).
#[inline(always)]
pub fn y_from_timestamp(secs: i64) -> i64 {
	civil_from_days(secs.div_euclid(SECONDS_PER_DAY)).0
}

/// Gregorian calendar date and time of day.
///
/// Unlike `libc::tm`, `mon` is [1, 12], `yday` is [1, 366], and `year` is the absolute year.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tm {
	/// Absolute Gregorian year (proleptic, so 0 is 1 BC)
	pub year: i64,
	/// Month of the year, ranged [1, 12]
	pub mon: u8,
	/// Day of the month, ranged [1, 31]
	pub day: u8,
	/// Hours, ranged [0, 23]
	pub hour: u8,
	/// Minutes, ranged [0, 59]
	pub min: u8,
	/// Seconds, ranged [0, 59]
	pub sec: u8,
	/// Milliseconds, ranged [0, 999]
	pub milli: u16,
	/// Day of the week, ranged [0, 6] => [Sunday, Saturday]
	pub wday: u8,
	/// Day of the year, ranged [1, 366]
	pub yday: u16
}

impl Tm {
	/// Convert milliseconds since the Unix epoch into a calendar date.
	///
	/// Every `i64` input is valid, including negative timestamps.
	pub fn from_millis(millis: i64) -> Tm {
		let days = millis.div_euclid(MILLIS_PER_DAY);
		let rem = millis.rem_euclid(MILLIS_PER_DAY);
		let (year, mon, day) = civil_from_days(days);
		let secs = rem / MILLIS_PER_SECOND;

		Tm {
			year,
			mon,
			day,
			hour: (secs / SECONDS_PER_HOUR) as u8,
			min: (secs % SECONDS_PER_HOUR / SECONDS_PER_MINUTE) as u8,
			sec: (secs % SECONDS_PER_MINUTE) as u8,
			milli: (rem % MILLIS_PER_SECOND) as u16,
			wday: wday_from_days(days),
			yday: (days - days_from_civil(year, 1, 1) + 1) as u16
		}
	}

	/// Convert a Unix timestamp in seconds into a calendar date.
	///
	/// Timestamps too large to express in milliseconds saturate.
	#[inline(always)]
	pub fn new(unixtimestamp: i64) -> Tm {
		Tm::from_millis(unixtimestamp.saturating_mul(MILLIS_PER_SECOND))
	}

	/// Check whether `self` is in a leap year.
	#[inline(always)]
	pub fn isleapyear(&self) -> bool {
		isleapyear(self.year)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use core::mem::MaybeUninit;
	use libc::{time_t, tm};

	// Get the libc version of UTC calendar time
	fn utc_time(time: time_t) -> tm {
		unsafe {
			let mut utc = MaybeUninit::<tm>::uninit();
			libc::gmtime_r(&time, utc.as_mut_ptr());
			utc.assume_init()
		}
	}

	fn compare_dates(time: i64) {
		let d1 = utc_time(time);
		let d2 = Tm::new(time);
		assert_eq!(d1.tm_sec, d2.sec as i32, "time: {}", time);
		assert_eq!(d1.tm_min, d2.min as i32, "time: {}", time);
		assert_eq!(d1.tm_hour, d2.hour as i32, "time: {}", time);
		assert_eq!(d1.tm_mday, d2.day as i32, "time: {}", time);
		assert_eq!(d1.tm_mon + 1, d2.mon as i32, "time: {}", time);
		assert_eq!(d1.tm_year as i64 + 1900, d2.year, "time: {}", time);
		assert_eq!(d1.tm_wday, d2.wday as i32, "time: {}", time);
		assert_eq!(d1.tm_yday + 1, d2.yday as i32, "time: {}", time);
	}

	#[test]
	fn date_test() {
		compare_dates(0);
		compare_dates(5097600);
		compare_dates(31449600);
		compare_dates(951782400);
		compare_dates(1718617807);
		compare_dates(1844848207);
		compare_dates(4107542399);
		compare_dates(-1);
		compare_dates(-94694400);
		compare_dates(-2208988800);

		// Make sure extreme inputs cannot panic
		Tm::from_millis(i64::MAX);
		Tm::from_millis(i64::MIN);
		Tm::new(i64::MAX);
		Tm::new(i64::MIN);
	}

	#[test]
	fn milliseconds_before_epoch() {
		let tm = Tm::from_millis(-1);
		assert_eq!((tm.year, tm.mon, tm.day), (1969, 12, 31));
		assert_eq!((tm.hour, tm.min, tm.sec, tm.milli), (23, 59, 59, 999));
	}

	#[test]
	fn civil_round_trip_test() {
		for days in [-719468, -1, 0, 59, 60, 10956, 11016, 19782, 2932896] {
			let (y, m, d) = civil_from_days(days);
			assert_eq!(days_from_civil(y, m, d), days, "days: {}", days);
		}
	}

	#[test]
	fn days_per_month_test() {
		assert_eq!(days_per_month(2024, 1), 31);
		assert_eq!(days_per_month(2024, 2), 29);
		assert_eq!(days_per_month(2023, 2), 28);
		assert_eq!(days_per_month(1900, 2), 28);
		assert_eq!(days_per_month(2000, 2), 29);
		assert_eq!(days_per_month(2024, 4), 30);
		assert_eq!(days_per_month(2024, 9), 30);
		assert_eq!(days_per_month(2024, 11), 30);
		assert_eq!(days_per_month(2024, 12), 31);
	}

	#[test]
	fn y_from_timestamp_test() {
		assert_eq!(y_from_timestamp(1704067199), 2023);
		assert_eq!(y_from_timestamp(1704067200), 2024);
		assert_eq!(y_from_timestamp(-1), 1969);
	}

	#[test]
	fn timespec_test() {
		assert_eq!(TimeSpec::from_millis(0), TimeSpec { sec: 0, nsec: 0 });
		assert_eq!(TimeSpec::from_millis(1705321800123).as_millis(), 1705321800123);
		assert_eq!(TimeSpec::from_millis(-1).as_millis(), -1);
		assert_eq!(TimeSpec { sec: i64::MAX, nsec: 0 }.as_millis(), i64::MAX);
	}
}
