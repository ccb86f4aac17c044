//! Operator text instruction surface.

use serde::{Deserialize, Serialize};

use robolink_core::error::DeviceError;

/// One text instruction for the agent, issued by a task operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextInstruction {
    pub time: f64,
    pub sequence: u64,
    pub instruction: String,
    /// Unique id so repeated identical instructions are distinguishable.
    pub uid: u64,
}

/// Source of operator text instructions.
pub trait TextInstructions: Send + Sync {
    /// The current instruction, if any has been issued.
    fn instruction(&self) -> Result<TextInstruction, DeviceError>;
}
