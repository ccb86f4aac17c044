//! Per-device element configuration.
//!
//! An element binds one host device into the environment's observation
//! and action dictionaries. Elements carry configuration only; the env
//! owns the device handles and does the actual I/O.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use robolink_core::error::ConfigError;
use robolink_core::types::{ActionSpace, Observation, ObservationSpace};
use robolink_host::arm::ArmState;
use robolink_host::camera::CameraFrame;
use robolink_host::text::TextInstruction;
use robolink_host::vacuum::VacuumState;

// ---------------------------------------------------------------------------
// Element configs
// ---------------------------------------------------------------------------

/// Arm element: observes joint angles, acts with target joint angles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmElement {
    pub name: String,
    /// Number of joints observed and commanded.
    pub joint_count: usize,
    /// Per-joint angle bound, radians; the space is symmetric.
    pub joint_limit: f32,
    /// Fetch a fresh state on every observation instead of the cached one.
    pub is_synchronous: bool,
}

impl ArmElement {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            joint_count: 6,
            joint_limit: PI,
            is_synchronous: false,
        }
    }

    #[must_use]
    pub fn synchronous(mut self) -> Self {
        self.is_synchronous = true;
        self
    }

    /// Joint angles as a flat vector, padded with zeros or truncated to
    /// the configured joint count.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_observation(&self, state: &ArmState) -> Observation {
        let mut data = vec![0.0_f32; self.joint_count];
        for (slot, angle) in data.iter_mut().zip(state.joint_angles.iter()) {
            *slot = *angle as f32;
        }
        Observation::new(data)
    }
}

/// Vacuum element: observes on/off, acts with a binary choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VacuumElement {
    pub name: String,
    pub is_synchronous: bool,
}

impl VacuumElement {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_synchronous: false,
        }
    }

    #[must_use]
    pub fn to_observation(state: &VacuumState) -> Observation {
        Observation::new(vec![f32::from(u8::from(state.state))])
    }
}

/// Camera element: observes raw pixel bytes. No action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorCameraElement {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    pub is_synchronous: bool,
}

impl ColorCameraElement {
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            channels: 3,
            is_synchronous: false,
        }
    }

    #[must_use]
    pub fn synchronous(mut self) -> Self {
        self.is_synchronous = true;
        self
    }

    /// Expected observation length in scalars.
    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }

    /// Pixel bytes as f32s in [0, 255], padded or truncated to the
    /// configured dimensions so the observation shape never varies.
    #[must_use]
    pub fn to_observation(&self, frame: &CameraFrame) -> Observation {
        let mut data = vec![0.0_f32; self.pixel_count()];
        for (slot, byte) in data.iter_mut().zip(frame.data.iter()) {
            *slot = f32::from(*byte);
        }
        Observation::new(data)
    }
}

/// Operator instruction element: observes the instruction text as a
/// fixed-length byte vector. No action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextInstructionsElement {
    pub name: String,
    /// Fixed observation length; longer instructions are truncated.
    pub max_len: usize,
}

impl TextInstructionsElement {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_len: 1024,
        }
    }

    /// UTF-8 bytes of the instruction, zero padded to `max_len`.
    #[must_use]
    pub fn to_observation(&self, text: &TextInstruction) -> Observation {
        let mut data = vec![0.0_f32; self.max_len];
        for (slot, byte) in data.iter_mut().zip(text.instruction.as_bytes()) {
            *slot = f32::from(*byte);
        }
        Observation::new(data)
    }
}

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// One device element of an environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    Arm(ArmElement),
    Vacuum(VacuumElement),
    ColorCamera(ColorCameraElement),
    TextInstructions(TextInstructionsElement),
}

impl Element {
    /// Dictionary key of this element.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Arm(e) => &e.name,
            Self::Vacuum(e) => &e.name,
            Self::ColorCamera(e) => &e.name,
            Self::TextInstructions(e) => &e.name,
        }
    }

    /// Whether observations fetch fresh device state.
    #[must_use]
    pub const fn is_synchronous(&self) -> bool {
        match self {
            Self::Arm(e) => e.is_synchronous,
            Self::Vacuum(e) => e.is_synchronous,
            Self::ColorCamera(e) => e.is_synchronous,
            Self::TextInstructions(_) => false,
        }
    }

    /// The element's observation sub-space.
    #[must_use]
    pub fn observation_space(&self) -> ObservationSpace {
        match self {
            Self::Arm(e) => ObservationSpace::Box {
                low: vec![-e.joint_limit; e.joint_count],
                high: vec![e.joint_limit; e.joint_count],
            },
            Self::Vacuum(_) => ObservationSpace::MultiBinary { n: 1 },
            Self::ColorCamera(e) => ObservationSpace::Image {
                height: e.height,
                width: e.width,
                channels: e.channels,
            },
            Self::TextInstructions(e) => ObservationSpace::Box {
                low: vec![0.0; e.max_len],
                high: vec![255.0; e.max_len],
            },
        }
    }

    /// The element's action sub-space; `None` for observation-only
    /// elements.
    #[must_use]
    pub fn action_space(&self) -> Option<ActionSpace> {
        match self {
            Self::Arm(e) => Some(ActionSpace::Box {
                low: vec![-e.joint_limit; e.joint_count],
                high: vec![e.joint_limit; e.joint_count],
            }),
            Self::Vacuum(_) => Some(ActionSpace::Discrete { n: 2 }),
            Self::ColorCamera(_) | Self::TextInstructions(_) => None,
        }
    }
}

/// Check that every element name is unique and identifier-like:
/// non-empty, starting with a letter or `_`, remaining characters
/// alphanumeric, `_` or `-`.
pub fn validate_element_names(elements: &[Element]) -> Result<(), ConfigError> {
    for (i, element) in elements.iter().enumerate() {
        let name = element.name();
        if !is_identifier_like(name) {
            return Err(ConfigError::InvalidElementName(name.to_string()));
        }
        if elements[..i].iter().any(|e| e.name() == name) {
            return Err(ConfigError::DuplicateElementName(name.to_string()));
        }
    }
    Ok(())
}

fn is_identifier_like(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
