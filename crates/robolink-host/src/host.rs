//! Top-level host surface aggregating every device.

use std::sync::Arc;

use robolink_core::error::DeviceError;

use crate::arm::Arm;
use crate::camera::ColorCamera;
use crate::text::TextInstructions;
use crate::vacuum::Vacuum;

/// A connected robot host.
///
/// The host owns the device handles; accessors return `None` for device
/// kinds the robot does not carry. Implementations are expected to be
/// cheap to clone behind an `Arc` and safe to share across threads.
pub trait Host: Send + Sync {
    /// The robot arm, if present.
    fn arm(&self) -> Option<Arc<dyn Arm>>;

    /// The vacuum gripper, if present.
    fn vacuum(&self) -> Option<Arc<dyn Vacuum>>;

    /// The color camera, if present.
    fn color_camera(&self) -> Option<Arc<dyn ColorCamera>>;

    /// The operator text instruction source, if present.
    fn text_instructions(&self) -> Option<Arc<dyn TextInstructions>>;

    /// Ask the remote host to reset its session state.
    fn reset(&self) -> Result<(), DeviceError>;

    /// Close the connection. Idempotent.
    fn close(&self) -> Result<(), DeviceError>;

    /// Whether the host has been closed.
    fn is_closed(&self) -> bool;
}
