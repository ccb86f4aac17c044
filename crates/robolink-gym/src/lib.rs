//! Gymnasium-style step/reset environment over a Robolink host.
//!
//! - [`elements`] — per-device element configs and their observation and
//!   action sub-spaces
//! - [`env`] — [`RobotEnv`](env::RobotEnv), the environment itself
//!
//! The env runs against any [`Host`](robolink_host::host::Host)
//! implementation, a live `RemoteHost` or the scripted mock host, with no
//! code change.

pub mod elements;
pub mod env;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use elements::{
    ArmElement, ColorCameraElement, Element, TextInstructionsElement, VacuumElement,
};
pub use env::{RewardFn, RobotEnv};

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ArmElement, ColorCameraElement, Element, RobotEnv, TextInstructionsElement, VacuumElement,
    };
}
