//! Host device API and remote transport for the Robolink client SDK.
//!
//! This crate defines the device surface a connected robot exposes and the
//! wire protocol used to reach it:
//!
//! - [`types`] — timestamps, poses, [`CommandStatus`](types::CommandStatus)
//!   response codes
//! - [`arm`], [`vacuum`], [`camera`], [`text`] — per-device state records
//!   and traits
//! - [`host`] — the [`Host`](host::Host) aggregate
//! - [`protocol`] — JSON-serialisable request/response types
//! - [`framing`] — length-prefixed JSON wire format (4-byte LE `u32` + payload)
//! - [`remote`] — [`RemoteHost`](remote::RemoteHost), the synchronous TCP client
//!
//! Everything here is synchronous call/return; streaming and callbacks are
//! a server-side concern this client does not carry.

pub mod arm;
pub mod camera;
pub mod framing;
pub mod host;
pub mod protocol;
pub mod remote;
pub mod text;
pub mod types;
pub mod vacuum;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use arm::{Arm, ArmState};
pub use camera::{CameraFrame, ColorCamera};
pub use host::Host;
pub use protocol::{MAX_MESSAGE_SIZE, ProtocolError, Request, Response};
pub use remote::RemoteHost;
pub use text::{TextInstruction, TextInstructions};
pub use types::{CommandStatus, Pose, RobotMode, StatusKind};
pub use vacuum::{Vacuum, VacuumGauge, VacuumState};

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Arm, ArmState, CameraFrame, ColorCamera, CommandStatus, Host, Pose, RemoteHost, RobotMode,
        StatusKind, TextInstruction, TextInstructions, Vacuum, VacuumGauge, VacuumState,
    };
}
