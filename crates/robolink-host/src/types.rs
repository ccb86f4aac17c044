//! State records shared by every device surface.
//!
//! All device readings are timestamped with the server time at which the
//! remote host produced them (`time`, seconds since the Unix epoch) and a
//! per-device monotonic `sequence` number.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pose
// ---------------------------------------------------------------------------

/// A rigid-body pose: translation plus unit quaternion (x, y, z, w).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: [f64; 3],
    pub orientation: [f64; 4],
}

impl Pose {
    /// The identity pose at the origin.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            position: [0.0; 3],
            orientation: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

// ---------------------------------------------------------------------------
// RobotMode
// ---------------------------------------------------------------------------

/// Operating mode reported by the robot controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotMode {
    #[default]
    Default,
    Local,
    Remote,
    PoweredOff,
}

impl RobotMode {
    /// Parse the mode string the remote host reports. Unknown strings map
    /// to [`RobotMode::Default`].
    #[must_use]
    pub fn from_str_lossy(mode: &str) -> Self {
        match mode {
            "local" => Self::Local,
            "remote" => Self::Remote,
            "powered-off" => Self::PoweredOff,
            _ => Self::Default,
        }
    }
}

// ---------------------------------------------------------------------------
// CommandStatus
// ---------------------------------------------------------------------------

/// Terminal disposition of one device command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    #[default]
    Done,
    Rejected,
    Aborted,
    TimedOut,
}

/// Response-code record a device command resolves to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandStatus {
    pub time: f64,
    pub sequence: u64,
    pub kind: StatusKind,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: i32,
}

impl CommandStatus {
    /// A successfully completed command.
    #[must_use]
    pub fn done() -> Self {
        Self::default()
    }

    /// A command rejected by the remote host.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Rejected,
            message: message.into(),
            ..Self::default()
        }
    }

    /// A command aborted mid-execution.
    #[must_use]
    pub fn aborted(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Aborted,
            message: message.into(),
            ..Self::default()
        }
    }

    /// A command that ran out of time on the host side.
    #[must_use]
    pub fn timed_out() -> Self {
        Self {
            kind: StatusKind::TimedOut,
            ..Self::default()
        }
    }

    /// Whether the status represents a failed command.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        !matches!(self.kind, StatusKind::Done)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_identity() {
        let pose = Pose::identity();
        assert_eq!(pose.position, [0.0; 3]);
        assert_eq!(pose.orientation, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(pose, Pose::default());
    }

    #[test]
    fn pose_serialize_roundtrip() {
        let pose = Pose {
            position: [0.1, 0.2, 0.3],
            orientation: [0.0, 0.0, 0.0, 1.0],
        };
        let json = serde_json::to_string(&pose).unwrap();
        let pose2: Pose = serde_json::from_str(&json).unwrap();
        assert_eq!(pose, pose2);
    }

    #[test]
    fn robot_mode_default() {
        assert_eq!(RobotMode::default(), RobotMode::Default);
    }

    #[test]
    fn robot_mode_from_str_lossy() {
        assert_eq!(RobotMode::from_str_lossy("local"), RobotMode::Local);
        assert_eq!(RobotMode::from_str_lossy("remote"), RobotMode::Remote);
        assert_eq!(
            RobotMode::from_str_lossy("powered-off"),
            RobotMode::PoweredOff
        );
        assert_eq!(RobotMode::from_str_lossy("???"), RobotMode::Default);
    }

    #[test]
    fn robot_mode_serde_tag() {
        let json = serde_json::to_string(&RobotMode::PoweredOff).unwrap();
        assert_eq!(json, "\"powered_off\"");
    }

    #[test]
    fn command_status_done() {
        let status = CommandStatus::done();
        assert_eq!(status.kind, StatusKind::Done);
        assert!(!status.is_error());
    }

    #[test]
    fn command_status_rejected() {
        let status = CommandStatus::rejected("joint limit");
        assert_eq!(status.kind, StatusKind::Rejected);
        assert_eq!(status.message, "joint limit");
        assert!(status.is_error());
    }

    #[test]
    fn command_status_aborted_and_timed_out_are_errors() {
        assert!(CommandStatus::aborted("stopped").is_error());
        assert!(CommandStatus::timed_out().is_error());
    }

    #[test]
    fn command_status_serialize_roundtrip() {
        let status = CommandStatus {
            time: 12.5,
            sequence: 3,
            kind: StatusKind::Aborted,
            progress: 0.5,
            message: "halted".into(),
            code: -2,
        };
        let json = serde_json::to_string(&status).unwrap();
        let status2: CommandStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(status, status2);
    }

    #[test]
    fn command_status_missing_optional_fields() {
        let json = r#"{"time":1.0,"sequence":1,"kind":"done"}"#;
        let status: CommandStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.kind, StatusKind::Done);
        assert!(status.message.is_empty());
        assert_eq!(status.code, 0);
    }
}
