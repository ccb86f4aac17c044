//! Multi-joint arm device surface.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use robolink_core::error::DeviceError;

use crate::types::{CommandStatus, Pose, RobotMode};

// ---------------------------------------------------------------------------
// ArmState
// ---------------------------------------------------------------------------

/// Latest reported state of a robot arm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmState {
    pub time: f64,
    pub sequence: u64,
    #[serde(default)]
    pub device_name: String,
    /// Joint angles in radians, base to tip.
    pub joint_angles: Vec<f64>,
    /// Flange pose in the base frame.
    #[serde(default)]
    pub pose: Pose,
    pub is_protective_stopped: bool,
    pub is_emergency_stopped: bool,
    pub is_safeguard_stopped: bool,
    pub is_program_running: bool,
    pub is_robot_power_on: bool,
    #[serde(default)]
    pub robot_mode: RobotMode,
    #[serde(default)]
    pub safety_message: String,
}

impl Default for ArmState {
    fn default() -> Self {
        Self {
            time: 0.0,
            sequence: 0,
            device_name: String::new(),
            joint_angles: vec![0.0; 6],
            pose: Pose::identity(),
            is_protective_stopped: false,
            is_emergency_stopped: false,
            is_safeguard_stopped: false,
            is_program_running: false,
            is_robot_power_on: false,
            robot_mode: RobotMode::Default,
            safety_message: String::new(),
        }
    }
}

impl ArmState {
    /// Whether any stop flag is raised.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.is_protective_stopped || self.is_emergency_stopped || self.is_safeguard_stopped
    }
}

// ---------------------------------------------------------------------------
// Arm
// ---------------------------------------------------------------------------

/// A multi-joint robot arm.
///
/// Motion commands block until the remote host reports a terminal
/// [`CommandStatus`]; a rejected or aborted command is returned as a
/// status, not an `Err` (transport failures are the `Err` cases).
pub trait Arm: Send + Sync {
    /// Device name; empty for the unnamed default arm.
    fn device_name(&self) -> &str;

    /// Latest cached state of the arm.
    fn state(&self) -> Result<ArmState, DeviceError>;

    /// Fetch a fresh state from the remote host, waiting up to `timeout`.
    fn fetch_state(&self, timeout: Duration) -> Result<ArmState, DeviceError>;

    /// Command the arm to the given joint angles (radians).
    fn to_joints(&self, joints: &[f64]) -> Result<CommandStatus, DeviceError>;

    /// Command the arm flange to the given pose in the base frame.
    fn to_pose(&self, pose: &Pose) -> Result<CommandStatus, DeviceError>;

    /// Stop any in-flight motion.
    fn stop(&self) -> Result<CommandStatus, DeviceError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
