//! Support for parsing TZif files.
//!
//! TZif is the binary format compiled by `zic` and installed under `/usr/share/zoneinfo`
//! ([RFC 8536]). Versions 1-4 are supported. Version 1 files are read from their 32-bit data
//! block; later versions skip it and read the 64-bit block plus the TZ string footer, which
//! covers instants after the last transition. Leap second records are skipped, as are timezone
//! abbreviations.
//!
//! [RFC 8536]: https://datatracker.ietf.org/doc/html/rfc8536
//!
//! # Examples
//!
//! ```
//! # use time::tz::{parse_bytes, TzFileError};
//! assert_eq!(parse_bytes(b"not a timezone"), Err(TzFileError::NotATzFile));
//! ```

use alloc::{boxed::Box, vec::Vec};
#[cfg(feature = "std")]
use std::{fs, io, path::Path, string::{String, ToString}};
use thiserror::Error;
use super::tzstring::{TzSpec, TzStringError};
use super::{Timezone, TzInfo};

/// The magic bytes every TZif file starts with.
pub const TZIF_MAGIC: &[u8; 4] = b"TZif";

/// The error type for parsing timezone data (TZif files).
#[derive(Debug, PartialEq, Error)]
pub enum TzFileError {
	/// Error reading the file. The reason is returned as a payload of this variant.
	#[cfg(feature = "std")]
	#[error("{0}")]
	FileReadError(String),
	/// The data does not begin with the "TZif" magic bytes.
	#[error("Not a TZ file")]
	NotATzFile,
	/// The file is not one of the four supported versions. The found version is returned as a
	/// payload of this variant.
	#[error("Unsupported TZ version: {0} ({0:#04x})")]
	UnsupportedVersion(u8),
	/// The file is truncated or internally inconsistent.
	#[error("Invalid TZ file")]
	InvalidTzFile,
	/// The footer TZ string is invalid or unsupported.
	#[error("{0}")]
	InvalidOrUnsupportedTzString(#[from] TzStringError)
}

#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[cfg(feature = "std")]
impl From<io::Error> for TzFileError {
	fn from(error: io::Error) -> Self {
		Self::FileReadError(error.to_string())
	}
}

/// Sequential big endian reader that reports running out of data as
/// [`TzFileError::InvalidTzFile`].
struct Reader<'a> {
	bytes: &'a [u8]
}

impl<'a> Reader<'a> {
	fn take(&mut self, n: usize) -> Result<&'a [u8], TzFileError> {
		let (head, tail) = self.bytes.split_at_checked(n).ok_or(TzFileError::InvalidTzFile)?;
		self.bytes = tail;
		Ok(head)
	}

	fn array<const N: usize>(&mut self) -> Result<[u8; N], TzFileError> {
		self.take(N)?.try_into().map_err(|_| TzFileError::InvalidTzFile)
	}

	fn u8(&mut self) -> Result<u8, TzFileError> {
		Ok(self.array::<1>()?[0])
	}

	fn u32(&mut self) -> Result<u32, TzFileError> {
		self.array().map(u32::from_be_bytes)
	}

	fn i32(&mut self) -> Result<i32, TzFileError> {
		self.array().map(i32::from_be_bytes)
	}

	fn i64(&mut self) -> Result<i64, TzFileError> {
		self.array().map(i64::from_be_bytes)
	}

	/// Skip `count` records of `size` bytes each.
	fn skip(&mut self, count: u32, size: usize) -> Result<(), TzFileError> {
		let n = (count as usize).checked_mul(size).ok_or(TzFileError::InvalidTzFile)?;
		self.take(n).map(|_| ())
	}
}

/// TZif header, after the magic bytes.
#[cfg_attr(test, derive(Debug, PartialEq))]
struct TzHeader {
	/// 0 for version 1, otherwise the ASCII digit of the version
	version: u8,
	/// Count of UT/local indicators
	isutcnt: u32,
	/// Count of standard/wall indicators
	isstdcnt: u32,
	/// Count of leap second records
	leapcnt: u32,
	/// Count of transition times
	timecnt: u32,
	/// Count of local time type records
	typecnt: u32,
	/// Number of bytes used for timezone abbreviations
	charcnt: u32
}

impl TzHeader {
	fn read(r: &mut Reader) -> Result<TzHeader, TzFileError> {
		if r.take(4).ok() != Some(TZIF_MAGIC.as_slice()) {
			return Err(TzFileError::NotATzFile);
		}
		let version = r.u8()?;
		r.take(15)?;
		Ok(TzHeader {
			version,
			isutcnt: r.u32()?,
			isstdcnt: r.u32()?,
			leapcnt: r.u32()?,
			timecnt: r.u32()?,
			typecnt: r.u32()?,
			charcnt: r.u32()?
		})
	}

	/// Length in bytes of the data block following this header, with `time_size`-byte times.
	fn block_len(&self, time_size: usize) -> Option<usize> {
		let timecnt = self.timecnt as usize;
		timecnt.checked_mul(time_size + 1)?
			.checked_add((self.typecnt as usize).checked_mul(6)?)?
			.checked_add(self.charcnt as usize)?
			.checked_add((self.leapcnt as usize).checked_mul(time_size + 4)?)?
			.checked_add(self.isstdcnt as usize)?
			.checked_add(self.isutcnt as usize)
	}
}

/// Read one data block into transition times, their local time type indices, and the types.
///
/// `read_time` reads a single transition time (4 bytes for version 1 blocks, 8 otherwise).
fn read_block<'a, F>(r: &mut Reader<'a>, h: &TzHeader, time_size: usize, mut read_time: F)
	-> Result<(Vec<i64>, Vec<u8>, Vec<TzInfo>), TzFileError>
where F: FnMut(&mut Reader<'a>) -> Result<i64, TzFileError>
{
	if h.typecnt == 0 {
		return Err(TzFileError::InvalidTzFile);
	}

	let times = (0..h.timecnt).map(|_| read_time(r)).collect::<Result<Vec<_>, _>>()?;
	let indices = r.take(h.timecnt as usize)?.to_vec();
	let types = (0..h.typecnt)
		.map(|_| {
			let utoff = r.i32()?;
			let isdst = r.u8()? != 0;
			// Abbreviation index, unused
			r.u8()?;
			Ok(TzInfo { utoff, isdst })
		})
		.collect::<Result<Vec<_>, TzFileError>>()?;

	// Abbreviations, leap seconds, and standard/wall and UT/local indicators are not needed
	r.skip(h.charcnt, 1)?;
	r.skip(h.leapcnt, time_size + 4)?;
	r.skip(h.isstdcnt, 1)?;
	r.skip(h.isutcnt, 1)?;

	if indices.iter().any(|&i| i as usize >= types.len()) {
		return Err(TzFileError::InvalidTzFile);
	}
	if times.windows(2).any(|w| w[0] >= w[1]) {
		return Err(TzFileError::InvalidTzFile);
	}

	Ok((times, indices, types))
}

/// Read the newline-enclosed TZ string footer of a version 2+ file.
///
/// An empty footer means there is no rule for instants after the last transition.
fn read_footer(r: &mut Reader) -> Result<Option<TzSpec>, TzFileError> {
	let rest = r.bytes;
	let inner = rest.strip_prefix(b"\n")
		.and_then(|v| v.strip_suffix(b"\n"))
		.ok_or(TzFileError::InvalidTzFile)?;
	if inner.is_empty() {
		Ok(None)
	} else {
		Ok(Some(TzSpec::parse(inner)?))
	}
}

/// Parse a byte slice containing a TZif file.
///
/// # Errors
///
/// May return the following errors:
/// - [`TzFileError::NotATzFile`] if the data does not begin with the 'TZif' magic bytes
/// - [`TzFileError::UnsupportedVersion`] if the version is not 1, 2, 3, or 4
/// - [`TzFileError::InvalidTzFile`] if the data is truncated or inconsistent
/// - [`TzFileError::InvalidOrUnsupportedTzString`] if the footer TZ string is malformed
pub fn parse_bytes(bytes: &[u8]) -> Result<Timezone, TzFileError> {
	let mut r = Reader { bytes };
	let v1 = TzHeader::read(&mut r)?;

	let (times, indices, types, spec) = match v1.version {
		0 => {
			let (times, indices, types) = read_block(&mut r, &v1, 4, |r| r.i32().map(i64::from))?;
			(times, indices, types, None)
		},
		b'2'..=b'4' => {
			// The 32-bit block is superseded by the 64-bit one that follows it
			let len = v1.block_len(4).ok_or(TzFileError::InvalidTzFile)?;
			r.take(len)?;
			let v2 = TzHeader::read(&mut r)?;
			let (times, indices, types) = read_block(&mut r, &v2, 8, Reader::i64)?;
			(times, indices, types, read_footer(&mut r)?)
		},
		v => return Err(TzFileError::UnsupportedVersion(v))
	};

	// Local time type 0 applies before the first transition
	let initial = types[0];
	let transitions: Box<[(i64, TzInfo)]> = times.into_iter()
		.zip(indices)
		.map(|(t, i)| (t, types[i as usize]))
		.collect();

	Ok(Timezone::new(transitions, initial, spec))
}

/// Parse a TZif file.
///
/// # Errors
///
/// Returns [`TzFileError::FileReadError`] if the file could not be read, otherwise the same
/// errors as [`parse_bytes`].
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[cfg(feature = "std")]
pub fn parse_file<P>(file: P) -> Result<Timezone, TzFileError>
where
	P: AsRef<Path>
{
	let bytes = fs::read(file)?;
	parse_bytes(&bytes)
}
