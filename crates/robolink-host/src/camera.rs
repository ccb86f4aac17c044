//! Color camera device surface.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use robolink_core::error::DeviceError;

// ---------------------------------------------------------------------------
// CameraFrame
// ---------------------------------------------------------------------------

/// One captured image.
///
/// Pixel data is row-major, `channels` bytes per pixel. The engine does
/// not interpret the pixel format; it is whatever the remote camera
/// produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraFrame {
    pub time: f64,
    pub sequence: u64,
    #[serde(default)]
    pub device_name: String,
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    #[serde(default)]
    pub data: Vec<u8>,
}

impl CameraFrame {
    /// Expected byte length given the declared dimensions.
    #[must_use]
    pub const fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }

    /// Whether the pixel buffer matches the declared dimensions.
    #[must_use]
    pub const fn is_well_formed(&self) -> bool {
        self.data.len() == self.expected_len()
    }
}

// ---------------------------------------------------------------------------
// ColorCamera
// ---------------------------------------------------------------------------

/// A color camera.
pub trait ColorCamera: Send + Sync {
    /// Device name; empty for the unnamed default camera.
    fn device_name(&self) -> &str;

    /// Latest cached frame.
    fn image(&self) -> Result<CameraFrame, DeviceError>;

    /// Fetch a fresh frame from the remote host, waiting up to `timeout`.
    fn fetch_image(&self, timeout: Duration) -> Result<CameraFrame, DeviceError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
