//! Record/playback mock harness for Robolink devices.
//!
//! Tests script the return values of device calls up front and run
//! against an in-process [`MockHost`](devices::MockHost) instead of a
//! live robot:
//!
//! - [`table`] — [`ValueSequenceTable`](table::ValueSequenceTable), the
//!   immutable component → method → values configuration
//! - [`cursor`] — per-pair consumption tracking and
//!   [`ExhaustionPolicy`](cursor::ExhaustionPolicy)
//! - [`dispatcher`] — [`MockDispatcher`](dispatcher::MockDispatcher),
//!   scripted-or-default resolution for one component
//! - [`registry`] — [`HarnessRegistry`](registry::HarnessRegistry), one
//!   dispatcher per component from a single script
//! - [`devices`] — device trait implementations over dispatchers and the
//!   [`MockHost`](devices::MockHost) aggregate
//! - [`snapshot`] — replay of recorded environment snapshots
//!
//! A method with no scripted sequence returns its caller-supplied default
//! forever; a scripted method replays its values one per call and then
//! follows its exhaustion policy.

pub mod cursor;
pub mod devices;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod snapshot;
pub mod table;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use cursor::{ExhaustionPolicy, SequenceCursor};
pub use devices::{MockHost, Reading};
pub use dispatcher::MockDispatcher;
pub use error::{ConfigurationError, PlaybackExhaustedError};
pub use registry::HarnessRegistry;
pub use snapshot::{Snapshot, SnapshotPlayback};
pub use table::{PlaybackScript, ValueSequenceTable};

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ExhaustionPolicy, HarnessRegistry, MockDispatcher, MockHost, PlaybackExhaustedError,
        PlaybackScript, Reading, Snapshot, SnapshotPlayback, ValueSequenceTable,
    };
}
