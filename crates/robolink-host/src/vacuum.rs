//! Vacuum gripper device surface.

use serde::{Deserialize, Serialize};

use robolink_core::error::DeviceError;

use crate::types::CommandStatus;

// ---------------------------------------------------------------------------
// VacuumState / VacuumGauge
// ---------------------------------------------------------------------------

/// On/off state of the vacuum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VacuumState {
    pub time: f64,
    pub sequence: u64,
    /// True when suction is enabled.
    pub state: bool,
}

/// Analog vacuum gauge reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VacuumGauge {
    pub time: f64,
    pub sequence: u64,
    /// Gauge pressure value; unit is device-specific.
    pub value: f64,
}

// ---------------------------------------------------------------------------
// Vacuum
// ---------------------------------------------------------------------------

/// A vacuum gripper.
pub trait Vacuum: Send + Sync {
    /// Device name; empty for the unnamed default vacuum.
    fn device_name(&self) -> &str;

    /// Latest on/off state.
    fn state(&self) -> Result<VacuumState, DeviceError>;

    /// Latest gauge reading. Fails with [`DeviceError::NotSupported`] on
    /// devices without a gauge.
    fn gauge(&self) -> Result<VacuumGauge, DeviceError>;

    /// Whether the device carries an analog gauge.
    fn support_gauge(&self) -> bool;

    /// Turn suction on or off.
    fn set(&self, on: bool) -> Result<CommandStatus, DeviceError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
