//! Propagate descriptions from matrix child runs to their parent.
//!
//! When a composite build finishes, the first child with a description donates it to the parent,
//! unless the parent already had one. Once the parent has a description it is never changed.
//!
//! # Examples
//!
//! ```
//! # use stamper::{DescriptionAggregator, MatrixAggregator, Run, RunRecord};
//! let mut parent = RunRecord::new(0);
//! let mut aggregator = DescriptionAggregator::new(&mut parent);
//! for child in ["", "B", "C"] {
//! 	aggregator.end_run(&RunRecord::with_description(0, child)).unwrap();
//! }
//! assert_eq!(parent.description(), Some("B"));
//! ```

use tracing::debug;
use crate::error::Result;
use crate::run::Run;

/// Whether the parent run has received a description yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregatorState {
	/// The parent has no description; the next child with one donates it.
	DescriptionEmpty,
	/// The parent has a description. Terminal.
	DescriptionSet
}

/// Called by the host once for each child run of a composite build, in completion order.
pub trait MatrixAggregator {
	/// A child run finished.
	///
	/// Returns `Ok(true)` to let the build continue.
	///
	/// # Errors
	///
	/// Passes through errors from the host while updating the parent run.
	fn end_run(&mut self, child: &dyn Run) -> Result<bool>;
}

/// Copies the first non-empty child description to the parent run.
#[derive(Debug)]
pub struct DescriptionAggregator<'a, R: ?Sized> {
	parent: &'a mut R,
	state: AggregatorState
}

impl<'a, R: Run + ?Sized> DescriptionAggregator<'a, R> {
	/// Start aggregating into `parent`.
	///
	/// A parent that already has a non-empty description starts out
	/// [`DescriptionSet`](AggregatorState::DescriptionSet) and is never modified.
	pub fn new(parent: &'a mut R) -> Self {
		let state = match parent.has_description() {
			true => AggregatorState::DescriptionSet,
			false => AggregatorState::DescriptionEmpty
		};
		DescriptionAggregator { parent, state }
	}

	/// Whether the parent has a description yet.
	pub fn state(&self) -> AggregatorState {
		self.state
	}

	/// The parent run receiving the description.
	pub fn parent(&self) -> &R {
		self.parent
	}
}

impl<R: Run + ?Sized> MatrixAggregator for DescriptionAggregator<'_, R> {
	fn end_run(&mut self, child: &dyn Run) -> Result<bool> {
		if self.state == AggregatorState::DescriptionEmpty && !self.parent.has_description() {
			if let Some(description) = child.description().filter(|d| !d.is_empty()) {
				debug!(description, "Copying child run description to parent");
				self.parent.set_description(description.to_owned())?;
				self.state = AggregatorState::DescriptionSet;
			}
		}
		Ok(true)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::StampError;
	use crate::run::RunRecord;

	fn aggregate(parent: &mut RunRecord, children: &[Option<&str>]) -> AggregatorState {
		let mut aggregator = DescriptionAggregator::new(parent);
		for child in children {
			let child = match child {
				Some(d) => RunRecord::with_description(0, *d),
				None => RunRecord::new(0)
			};
			assert!(aggregator.end_run(&child).unwrap());
		}
		aggregator.state()
	}

	#[test]
	fn first_description_wins() {
		let mut parent = RunRecord::new(0);
		let state = aggregate(&mut parent, &[Some(""), Some("B"), Some("C")]);
		assert_eq!(state, AggregatorState::DescriptionSet);
		assert_eq!(parent.description(), Some("B"));

		let mut parent = RunRecord::new(0);
		aggregate(&mut parent, &[None, None, Some("C"), Some("D")]);
		assert_eq!(parent.description(), Some("C"));
	}

	#[test]
	fn existing_description_kept() {
		let mut parent = RunRecord::with_description(0, "A");
		let state = aggregate(&mut parent, &[Some("B"), Some("C")]);
		assert_eq!(state, AggregatorState::DescriptionSet);
		assert_eq!(parent.description(), Some("A"));
	}

	#[test]
	fn empty_parent_description() {
		// An empty description is the same as none
		let mut parent = RunRecord::with_description(0, "");
		assert_eq!(DescriptionAggregator::new(&mut parent).state(), AggregatorState::DescriptionEmpty);
		aggregate(&mut parent, &[Some("B")]);
		assert_eq!(parent.description(), Some("B"));
	}

	#[test]
	fn no_child_descriptions() {
		let mut parent = RunRecord::new(0);
		assert_eq!(aggregate(&mut parent, &[Some("")]), AggregatorState::DescriptionEmpty);
		assert_eq!(parent.description(), None);

		assert_eq!(aggregate(&mut parent, &[]), AggregatorState::DescriptionEmpty);
		assert_eq!(aggregate(&mut parent, &[None, None]), AggregatorState::DescriptionEmpty);
		assert_eq!(parent.description(), None);
	}

	struct InterruptedRun;

	impl Run for InterruptedRun {
		fn start_time_millis(&self) -> i64 {
			0
		}

		fn description(&self) -> Option<&str> {
			None
		}

		fn set_description(&mut self, _: String) -> Result<()> {
			Err(StampError::Interrupted)
		}
	}

	#[test]
	fn host_errors() {
		let mut parent = InterruptedRun;
		let mut aggregator = DescriptionAggregator::new(&mut parent);
		let result = aggregator.end_run(&RunRecord::with_description(0, "B"));
		assert!(matches!(result, Err(StampError::Interrupted)));
		assert_eq!(aggregator.state(), AggregatorState::DescriptionEmpty);

		// Children without descriptions never touch the parent
		assert!(aggregator.end_run(&RunRecord::new(0)).unwrap());
	}

	#[test]
	fn dyn_parent() {
		let mut record = RunRecord::new(0);
		let parent: &mut dyn Run = &mut record;
		let mut aggregator = DescriptionAggregator::new(parent);
		aggregator.end_run(&RunRecord::with_description(0, "B")).unwrap();
		assert_eq!(aggregator.parent().description(), Some("B"));
	}
}
