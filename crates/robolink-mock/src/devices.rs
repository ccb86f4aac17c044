//! Scripted stand-ins for every host device surface.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use robolink_core::error::DeviceError;
use robolink_host::arm::{Arm, ArmState};
use robolink_host::camera::{CameraFrame, ColorCamera};
use robolink_host::host::Host;
use robolink_host::text::{TextInstruction, TextInstructions};
use robolink_host::types::{CommandStatus, Pose};
use robolink_host::vacuum::{Vacuum, VacuumGauge, VacuumState};

use crate::cursor::ExhaustionPolicy;
use crate::dispatcher::MockDispatcher;
use crate::error::ConfigurationError;
use crate::registry::HarnessRegistry;
use crate::table::PlaybackScript;

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// One scripted device reading.
///
/// Playback scripts for the mock host hold these; each device method
/// accepts exactly one variant and reports any other as an unexpected
/// response, so a fixture that scripts the wrong record type fails loudly
/// at the call site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reading {
    Arm(ArmState),
    Status(CommandStatus),
    Vacuum(VacuumState),
    Gauge(VacuumGauge),
    Frame(CameraFrame),
    Text(TextInstruction),
}

impl Reading {
    /// Record type name, used in unexpected-response diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Arm(_) => "ArmState",
            Self::Status(_) => "CommandStatus",
            Self::Vacuum(_) => "VacuumState",
            Self::Gauge(_) => "VacuumGauge",
            Self::Frame(_) => "CameraFrame",
            Self::Text(_) => "TextInstruction",
        }
    }
}

fn unexpected(expected: &str, got: &Reading) -> DeviceError {
    DeviceError::UnexpectedResponse {
        expected: expected.to_string(),
        got: got.kind().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Device mocks
// ---------------------------------------------------------------------------

/// Mock arm replaying scripted [`ArmState`]s and [`CommandStatus`]es.
pub struct MockArm {
    dispatcher: Arc<MockDispatcher<Reading>>,
}

impl Arm for MockArm {
    fn device_name(&self) -> &str {
        ""
    }

    fn state(&self) -> Result<ArmState, DeviceError> {
        match self.dispatcher.resolve("state", Reading::Arm(ArmState::default()))? {
            Reading::Arm(state) => Ok(state),
            other => Err(unexpected("ArmState", &other)),
        }
    }

    fn fetch_state(&self, _timeout: Duration) -> Result<ArmState, DeviceError> {
        self.state()
    }

    fn to_joints(&self, _joints: &[f64]) -> Result<CommandStatus, DeviceError> {
        match self
            .dispatcher
            .resolve("to_joints", Reading::Status(CommandStatus::done()))?
        {
            Reading::Status(status) => Ok(status),
            other => Err(unexpected("CommandStatus", &other)),
        }
    }

    fn to_pose(&self, _pose: &Pose) -> Result<CommandStatus, DeviceError> {
        match self
            .dispatcher
            .resolve("to_pose", Reading::Status(CommandStatus::done()))?
        {
            Reading::Status(status) => Ok(status),
            other => Err(unexpected("CommandStatus", &other)),
        }
    }

    fn stop(&self) -> Result<CommandStatus, DeviceError> {
        match self
            .dispatcher
            .resolve("stop", Reading::Status(CommandStatus::done()))?
        {
            Reading::Status(status) => Ok(status),
            other => Err(unexpected("CommandStatus", &other)),
        }
    }
}

/// Mock vacuum replaying scripted states, gauge readings and statuses.
pub struct MockVacuum {
    dispatcher: Arc<MockDispatcher<Reading>>,
}

impl Vacuum for MockVacuum {
    fn device_name(&self) -> &str {
        ""
    }

    fn state(&self) -> Result<VacuumState, DeviceError> {
        match self
            .dispatcher
            .resolve("state", Reading::Vacuum(VacuumState::default()))?
        {
            Reading::Vacuum(state) => Ok(state),
            other => Err(unexpected("VacuumState", &other)),
        }
    }

    fn gauge(&self) -> Result<VacuumGauge, DeviceError> {
        match self
            .dispatcher
            .resolve("gauge", Reading::Gauge(VacuumGauge::default()))?
        {
            Reading::Gauge(gauge) => Ok(gauge),
            other => Err(unexpected("VacuumGauge", &other)),
        }
    }

    fn support_gauge(&self) -> bool {
        true
    }

    fn set(&self, _on: bool) -> Result<CommandStatus, DeviceError> {
        match self
            .dispatcher
            .resolve("set", Reading::Status(CommandStatus::done()))?
        {
            Reading::Status(status) => Ok(status),
            other => Err(unexpected("CommandStatus", &other)),
        }
    }
}

/// Mock camera replaying scripted [`CameraFrame`]s.
pub struct MockColorCamera {
    dispatcher: Arc<MockDispatcher<Reading>>,
}

impl ColorCamera for MockColorCamera {
    fn device_name(&self) -> &str {
        ""
    }

    fn image(&self) -> Result<CameraFrame, DeviceError> {
        match self
            .dispatcher
            .resolve("image", Reading::Frame(CameraFrame::default()))?
        {
            Reading::Frame(frame) => Ok(frame),
            other => Err(unexpected("CameraFrame", &other)),
        }
    }

    fn fetch_image(&self, _timeout: Duration) -> Result<CameraFrame, DeviceError> {
        self.image()
    }
}

/// Mock operator instruction source.
pub struct MockTextInstructions {
    dispatcher: Arc<MockDispatcher<Reading>>,
}

impl TextInstructions for MockTextInstructions {
    fn instruction(&self) -> Result<TextInstruction, DeviceError> {
        match self
            .dispatcher
            .resolve("instruction", Reading::Text(TextInstruction::default()))?
        {
            Reading::Text(text) => Ok(text),
            other => Err(unexpected("TextInstruction", &other)),
        }
    }
}

// ---------------------------------------------------------------------------
// MockHost
// ---------------------------------------------------------------------------

/// Component names the mock host always builds dispatchers for.
pub const COMPONENTS: &[&str] = &["arm", "vacuum", "color_camera", "text_instructions"];

/// An in-process [`Host`] whose devices replay a playback script.
///
/// Every device is always present. Methods the script does not cover
/// return the record type's `Default`, so an empty script yields a host
/// that behaves like an idle robot.
pub struct MockHost {
    registry: HarnessRegistry<Reading>,
    arm: Arc<MockArm>,
    vacuum: Arc<MockVacuum>,
    color_camera: Arc<MockColorCamera>,
    text_instructions: Arc<MockTextInstructions>,
    closed: AtomicBool,
}

impl MockHost {
    /// Build a host whose devices replay `script` under `policy`.
    pub fn build(
        script: PlaybackScript<Reading>,
        policy: ExhaustionPolicy,
    ) -> Result<Self, ConfigurationError> {
        let registry = HarnessRegistry::build(script, COMPONENTS, policy)?;
        // COMPONENTS are always declared, so these lookups cannot miss
        let dispatcher = |name: &str| {
            registry
                .dispatcher(name)
                .unwrap_or_else(|| Arc::new(MockDispatcher::new(name, Arc::default(), policy)))
        };
        Ok(Self {
            arm: Arc::new(MockArm {
                dispatcher: dispatcher("arm"),
            }),
            vacuum: Arc::new(MockVacuum {
                dispatcher: dispatcher("vacuum"),
            }),
            color_camera: Arc::new(MockColorCamera {
                dispatcher: dispatcher("color_camera"),
            }),
            text_instructions: Arc::new(MockTextInstructions {
                dispatcher: dispatcher("text_instructions"),
            }),
            registry,
            closed: AtomicBool::new(false),
        })
    }

    /// A host with no scripted values; every call yields defaults.
    pub fn idle() -> Result<Self, ConfigurationError> {
        Self::build(PlaybackScript::new(), ExhaustionPolicy::default())
    }

    /// The underlying dispatcher registry, for cursor inspection and
    /// explicit rewinds between test cases.
    #[must_use]
    pub const fn registry(&self) -> &HarnessRegistry<Reading> {
        &self.registry
    }
}

impl Host for MockHost {
    fn arm(&self) -> Option<Arc<dyn Arm>> {
        Some(Arc::clone(&self.arm) as Arc<dyn Arm>)
    }

    fn vacuum(&self) -> Option<Arc<dyn Vacuum>> {
        Some(Arc::clone(&self.vacuum) as Arc<dyn Vacuum>)
    }

    fn color_camera(&self) -> Option<Arc<dyn ColorCamera>> {
        Some(Arc::clone(&self.color_camera) as Arc<dyn ColorCamera>)
    }

    fn text_instructions(&self) -> Option<Arc<dyn TextInstructions>> {
        Some(Arc::clone(&self.text_instructions) as Arc<dyn TextInstructions>)
    }

    fn reset(&self) -> Result<(), DeviceError> {
        // scripted cursors intentionally survive a session reset; rewind
        // explicitly through registry() when a fixture needs it
        Ok(())
    }

    fn close(&self) -> Result<(), DeviceError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!("mock host closed");
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
