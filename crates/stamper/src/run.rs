//! Build runs as seen by the publisher.

use crate::aggregate::{AggregatorState, DescriptionAggregator, MatrixAggregator};
use crate::error::Result;

/// A completed build run owned by the host.
///
/// Composite (matrix) runs are runs too: the aggregator only reads and writes their own
/// description.
pub trait Run {
	/// When the run started, in milliseconds since the Unix epoch.
	fn start_time_millis(&self) -> i64;

	/// The run's description, if any.
	fn description(&self) -> Option<&str>;

	/// Replace the run's description.
	///
	/// # Errors
	///
	/// Returns whatever the host reports while persisting the change, e.g.
	/// [`StampError::Io`](crate::StampError::Io) or
	/// [`StampError::Interrupted`](crate::StampError::Interrupted).
	fn set_description(&mut self, description: String) -> Result<()>;

	/// Whether the run has a non-empty description. An empty description counts as none.
	fn has_description(&self) -> bool {
		self.description().is_some_and(|d| !d.is_empty())
	}
}

/// An in-memory [`Run`].
///
/// # Examples
///
/// ```
/// # use stamper::{Run, RunRecord};
/// let mut run = RunRecord::new(1705321800000);
/// assert!(!run.has_description());
/// run.set_description(String::from("nightly")).unwrap();
/// assert_eq!(run.description(), Some("nightly"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunRecord {
	start_time_millis: i64,
	description: Option<String>
}

impl RunRecord {
	/// A run started at `start_time_millis` with no description.
	pub fn new(start_time_millis: i64) -> RunRecord {
		RunRecord { start_time_millis, description: None }
	}

	/// A run started at `start_time_millis` that already has a description.
	pub fn with_description<S: Into<String>>(start_time_millis: i64, description: S) -> RunRecord {
		RunRecord { start_time_millis, description: Some(description.into()) }
	}
}

impl Run for RunRecord {
	fn start_time_millis(&self) -> i64 {
		self.start_time_millis
	}

	fn description(&self) -> Option<&str> {
		self.description.as_deref()
	}

	fn set_description(&mut self, description: String) -> Result<()> {
		self.description = Some(description);
		Ok(())
	}
}

/// An in-memory composite (matrix) run: a [`RunRecord`] owning its child runs in completion
/// order.
///
/// # Examples
///
/// ```
/// # use stamper::{CompositeRunRecord, Run, RunRecord};
/// let mut matrix = CompositeRunRecord::new(0);
/// matrix.push_child(RunRecord::new(0));
/// matrix.push_child(RunRecord::with_description(0, "linux"));
/// matrix.aggregate_children().unwrap();
/// assert_eq!(matrix.description(), Some("linux"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompositeRunRecord {
	run: RunRecord,
	children: Vec<RunRecord>
}

impl CompositeRunRecord {
	pub fn new(start_time_millis: i64) -> CompositeRunRecord {
		CompositeRunRecord { run: RunRecord::new(start_time_millis), children: Vec::new() }
	}

	/// Record a finished child run.
	pub fn push_child(&mut self, child: RunRecord) {
		self.children.push(child);
	}

	pub fn children(&self) -> &[RunRecord] {
		&self.children
	}

	pub fn children_mut(&mut self) -> &mut [RunRecord] {
		&mut self.children
	}

	/// Feed every child, in order, to a [`DescriptionAggregator`] over this run.
	///
	/// # Errors
	///
	/// Passes through errors from updating this run's description.
	pub fn aggregate_children(&mut self) -> Result<AggregatorState> {
		let CompositeRunRecord { run, children } = self;
		let mut aggregator = DescriptionAggregator::new(run);
		for child in children.iter() {
			aggregator.end_run(child)?;
		}
		Ok(aggregator.state())
	}
}

impl Run for CompositeRunRecord {
	fn start_time_millis(&self) -> i64 {
		self.run.start_time_millis()
	}

	fn description(&self) -> Option<&str> {
		self.run.description()
	}

	fn set_description(&mut self, description: String) -> Result<()> {
		self.run.set_description(description)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn descriptions() {
		let mut run = RunRecord::new(0);
		assert_eq!(run.description(), None);
		assert!(!run.has_description());

		run.set_description(String::new()).unwrap();
		assert_eq!(run.description(), Some(""));
		assert!(!run.has_description());

		run.set_description(String::from("A")).unwrap();
		assert!(run.has_description());

		let run = RunRecord::with_description(42, "B");
		assert_eq!((run.start_time_millis(), run.description()), (42, Some("B")));
	}

	#[test]
	fn composite_runs() {
		let mut matrix = CompositeRunRecord::new(7);
		assert_eq!(matrix.aggregate_children().unwrap(), AggregatorState::DescriptionEmpty);

		for description in ["", "B", "C"] {
			matrix.push_child(RunRecord::with_description(7, description));
		}
		assert_eq!(matrix.children().len(), 3);
		assert_eq!(matrix.aggregate_children().unwrap(), AggregatorState::DescriptionSet);
		assert_eq!(matrix.description(), Some("B"));
		assert_eq!(matrix.start_time_millis(), 7);

		// A described parent is left alone
		matrix.children_mut()[0].set_description(String::from("A")).unwrap();
		matrix.aggregate_children().unwrap();
		assert_eq!(matrix.description(), Some("B"));
	}
}
