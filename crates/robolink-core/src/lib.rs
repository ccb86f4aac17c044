// robolink-core: Types, errors and session configuration for the Robolink client SDK.

pub mod config;
pub mod error;
pub mod types;
