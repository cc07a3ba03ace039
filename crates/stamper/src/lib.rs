//! Stamp build runs with their start time in a secondary timezone.
//!
//! After a run completes, [`SecondaryTimestamp::perform`] writes the run's start time, shown in a
//! configured timezone and prefixed with the timezone's identifier, into the run's description:
//! `America/New_York Jan 15, 2024 07:30:00 AM`. For composite (matrix) builds,
//! [`SecondaryTimestamp::create_aggregator`] returns a [`DescriptionAggregator`] that copies the
//! first child description up to the parent run.
//!
//! The host build system is abstracted by a few traits:
//! - [`Run`] is a run whose description can be read and replaced. [`RunRecord`] keeps one in
//!   memory.
//! - [`ZoneSource`] resolves timezone identifiers, implemented for [`time::tz::Zoneinfo`].
//! - [`Clock`] supplies the current instant, which decides the timezone offsets used.
//!
//! # Examples
//!
//! ```
//! # use stamper::{FixedClock, MatrixAggregator, Run, RunRecord, SecondaryTimestamp, TimestampConverter};
//! # use time::tz::Zoneinfo;
//! let zoneinfo = Zoneinfo::new("/nonexistent");
//! let converter = TimestampConverter::new(&zoneinfo, FixedClock(1705321800000));
//! let publisher = SecondaryTimestamp::new("GMT+09:00");
//!
//! let mut child = RunRecord::new(1705321800000);
//! publisher.perform(&mut child, &converter)?;
//! assert_eq!(child.description(), Some("GMT+09:00 Jan 15, 2024 09:30:00 PM"));
//!
//! let mut parent = RunRecord::new(1705321800000);
//! publisher.create_aggregator(&mut parent).end_run(&child)?;
//! assert_eq!(parent.description(), child.description());
//! # Ok::<(), stamper::StampError>(())
//! ```

pub mod aggregate;
pub mod choices;
pub mod convert;
pub mod error;
pub mod publisher;
pub mod run;
pub mod zones;

pub use aggregate::{AggregatorState, DescriptionAggregator, MatrixAggregator};
pub use choices::{TimezoneChoice, TimezoneChoices};
pub use convert::TimestampConverter;
pub use error::{Result, StampError};
pub use publisher::SecondaryTimestamp;
pub use run::{CompositeRunRecord, Run, RunRecord};
pub use zones::{Clock, FixedClock, SystemClock, ZoneSource};
