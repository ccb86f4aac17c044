use thiserror::Error;

use robolink_core::error::DeviceError;

/// Malformed harness setup, detected eagerly at construction so broken
/// test fixtures fail before any test logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Invalid component name: {0:?}")]
    InvalidComponentName(String),

    #[error("Invalid method name {method:?} for component {component:?}")]
    InvalidMethodName { component: String, method: String },
}

/// A scripted sequence ran out before the test stopped calling it.
///
/// Carries the exact (component, method) pair and how many calls were
/// consumed, so an under-specified fixture produces a clear diagnostic
/// instead of a stale value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Scripted values for {component}.{method} exhausted after {consumed} calls")]
pub struct PlaybackExhaustedError {
    pub component: String,
    pub method: String,
    pub consumed: usize,
}

impl From<PlaybackExhaustedError> for DeviceError {
    fn from(err: PlaybackExhaustedError) -> Self {
        Self::Playback {
            component: err.component,
            method: err.method,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_display() {
        assert_eq!(
            ConfigurationError::InvalidComponentName("1arm".into()).to_string(),
            "Invalid component name: \"1arm\""
        );
        assert_eq!(
            ConfigurationError::InvalidMethodName {
                component: "arm".into(),
                method: "".into()
            }
            .to_string(),
            "Invalid method name \"\" for component \"arm\""
        );
    }

    #[test]
    fn playback_exhausted_display() {
        let err = PlaybackExhaustedError {
            component: "Arm".into(),
            method: "state".into(),
            consumed: 3,
        };
        assert_eq!(
            err.to_string(),
            "Scripted values for Arm.state exhausted after 3 calls"
        );
    }

    #[test]
    fn playback_exhausted_converts_to_device_error() {
        let err = PlaybackExhaustedError {
            component: "vacuum".into(),
            method: "gauge".into(),
            consumed: 0,
        };
        let device_err: DeviceError = err.into();
        assert_eq!(
            device_err,
            DeviceError::Playback {
                component: "vacuum".into(),
                method: "gauge".into()
            }
        );
    }
}
