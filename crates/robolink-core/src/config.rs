use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

fn default_robot_addr() -> String {
    "127.0.0.1:50051".into()
}
const fn default_connect_timeout_s() -> f64 {
    10.0
}
const fn default_read_timeout_s() -> f64 {
    15.0
}
const fn default_max_episode_steps() -> u32 {
    1000
}
fn default_env_id() -> String {
    "robolink-env".into()
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Connection and episode configuration for one client session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Robot host address as `host:port` (default: `127.0.0.1:50051`).
    #[serde(default = "default_robot_addr")]
    pub robot_addr: String,

    /// TCP connect timeout in seconds (default: 10).
    #[serde(default = "default_connect_timeout_s")]
    pub connect_timeout_s: f64,

    /// Per-request read timeout in seconds (default: 15).
    #[serde(default = "default_read_timeout_s")]
    pub read_timeout_s: f64,

    /// Maximum steps per episode before truncation (default: 1000).
    #[serde(default = "default_max_episode_steps")]
    pub max_episode_steps: u32,

    /// Identifier recorded in episode snapshots.
    #[serde(default = "default_env_id")]
    pub env_id: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            robot_addr: default_robot_addr(),
            connect_timeout_s: default_connect_timeout_s(),
            read_timeout_s: default_read_timeout_s(),
            max_episode_steps: default_max_episode_steps(),
            env_id: default_env_id(),
        }
    }
}

impl SessionConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.robot_addr.is_empty() || !self.robot_addr.contains(':') {
            return Err(ConfigError::InvalidAddress(self.robot_addr.clone()));
        }
        if self.connect_timeout_s <= 0.0 {
            return Err(ConfigError::InvalidTimeout {
                field: "connect_timeout_s",
                value: self.connect_timeout_s,
            });
        }
        if self.read_timeout_s <= 0.0 {
            return Err(ConfigError::InvalidTimeout {
                field: "read_timeout_s",
                value: self.read_timeout_s,
            });
        }
        if self.max_episode_steps == 0 {
            return Err(ConfigError::InvalidMaxEpisodeSteps);
        }
        Ok(())
    }

    /// Connect timeout as a [`std::time::Duration`].
    pub fn connect_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.connect_timeout_s)
    }

    /// Read timeout as a [`std::time::Duration`].
    pub fn read_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.read_timeout_s)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
