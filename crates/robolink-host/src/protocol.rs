//! Device command protocol.
//!
//! Defines the JSON-serialisable request/response types exchanged between
//! this client and the remote robot host. The protocol is a strict
//! command-response pattern over one connection:
//!
//! 1. Client sends a [`Request`]
//! 2. Host replies with exactly one [`Response`]
//!
//! All messages are length-prefixed JSON (see [`crate::framing`]).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arm::ArmState;
use crate::camera::CameraFrame;
use crate::text::TextInstruction;
use crate::types::{CommandStatus, Pose};
use crate::vacuum::{VacuumGauge, VacuumState};

/// Maximum message payload size in bytes (16 MiB).
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A request from the client to the robot host.
///
/// # Example
///
/// ```
/// use robolink_host::protocol::Request;
///
/// let json = r#"{"type":"arm_state","device":""}"#;
/// let req: Request = serde_json::from_str(json).unwrap();
/// assert!(matches!(req, Request::ArmState { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Query the latest arm state.
    ArmState {
        #[serde(default)]
        device: String,
    },
    /// Move the arm to the given joint angles.
    ToJoints {
        #[serde(default)]
        device: String,
        joints: Vec<f64>,
    },
    /// Move the arm flange to the given pose.
    ToPose {
        #[serde(default)]
        device: String,
        pose: Pose,
    },
    /// Stop any in-flight arm motion.
    Stop {
        #[serde(default)]
        device: String,
    },
    /// Query the vacuum on/off state.
    VacuumState {
        #[serde(default)]
        device: String,
    },
    /// Query the vacuum gauge.
    VacuumGauge {
        #[serde(default)]
        device: String,
    },
    /// Turn vacuum suction on or off.
    SetVacuum {
        #[serde(default)]
        device: String,
        on: bool,
    },
    /// Query the latest camera frame.
    Image {
        #[serde(default)]
        device: String,
    },
    /// Query the current operator text instruction.
    TextInstruction,
    /// Reset the host's session state.
    Reset,
    /// Close the connection.
    Close,
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// A response from the robot host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    ArmState(ArmState),
    Status(CommandStatus),
    VacuumState(VacuumState),
    VacuumGauge(VacuumGauge),
    Image(CameraFrame),
    TextInstruction(TextInstruction),
    /// Acknowledgement of reset.
    ResetDone,
    /// Acknowledgement of close.
    Closed,
    /// Error response.
    Error {
        message: String,
    },
}

impl Response {
    /// Create an error response.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Short variant name for diagnostics.
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::ArmState(_) => "arm_state",
            Self::Status(_) => "status",
            Self::VacuumState(_) => "vacuum_state",
            Self::VacuumGauge(_) => "vacuum_gauge",
            Self::Image(_) => "image",
            Self::TextInstruction(_) => "text_instruction",
            Self::ResetDone => "reset_done",
            Self::Closed => "closed",
            Self::Error { .. } => "error",
        }
    }
}

// ---------------------------------------------------------------------------
// ProtocolError
// ---------------------------------------------------------------------------

/// Transport-level failures below the device API.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Read timed out waiting for a frame")]
    TimedOut,

    #[error("Connection closed by peer")]
    Disconnected,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
