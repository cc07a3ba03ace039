//! Errors raised while stamping runs.

use std::io;
use thiserror::Error;

/// The error type for publishing and aggregating run descriptions.
///
/// Errors from the host (cancellation, failure to persist a run) are passed through unchanged.
/// An unknown timezone identifier is never an error; it resolves to UTC.
#[derive(Debug, Error)]
pub enum StampError {
	/// The host cancelled the build while the run was being updated.
	#[error("Run interrupted")]
	Interrupted,
	/// The host failed to persist the run.
	#[error("I/O error: {0}")]
	Io(#[from] io::Error),
	/// The submitted configuration form data was malformed.
	#[error("Invalid form data: {0}")]
	Form(#[from] serde_json::Error)
}

/// Result type alias for [`StampError`].
pub type Result<T> = std::result::Result<T, StampError>;
