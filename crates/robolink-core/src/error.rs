use thiserror::Error;

/// Top-level error type for robolink-core.
#[derive(Debug, Error)]
pub enum RobolinkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid robot address: {0:?}")]
    InvalidAddress(String),

    #[error("Invalid timeout {field}: {value} (must be > 0)")]
    InvalidTimeout { field: &'static str, value: f64 },

    #[error("max_episode_steps must be > 0")]
    InvalidMaxEpisodeSteps,

    #[error("Invalid element name: {0:?}")]
    InvalidElementName(String),

    #[error("Duplicate element name: {0:?}")]
    DuplicateElementName(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors surfaced by a device call against a host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("Host is closed")]
    Closed,

    #[error("Device {device:?} timed out after {seconds} seconds")]
    Timeout { device: String, seconds: u64 },

    #[error("Command rejected: {message}")]
    Rejected { message: String },

    #[error("Unexpected response: expected {expected}, got {got}")]
    UnexpectedResponse { expected: String, got: String },

    #[error("Protocol failure: {0}")]
    Protocol(String),

    #[error("Operation not supported by {device:?}: {operation}")]
    NotSupported { device: String, operation: String },

    #[error("Scripted playback for {component}.{method} exhausted")]
    Playback { component: String, method: String },
}

/// Action/observation validation errors.
///
/// Copy-free static variants are kept where possible for cheap propagation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Action dimension mismatch for {element:?}: expected {expected}, got {got}")]
    ActionDimMismatch {
        element: String,
        expected: usize,
        got: usize,
    },

    #[error("Action contains NaN")]
    ActionContainsNan,

    #[error("Action contains Inf")]
    ActionContainsInf,

    #[error("Missing action for element {0:?}")]
    MissingElementAction(String),

    #[error("Action supplied for unknown element {0:?}")]
    UnknownElementAction(String),

    #[error("Action type mismatch for {element:?}: expected {expected}")]
    ActionTypeMismatch {
        element: String,
        expected: &'static str,
    },

    #[error("Discrete action out of range: {value} >= {max}")]
    DiscreteOutOfRange { value: u64, max: usize },
}
