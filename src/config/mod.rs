//! Startup configuration: webhook endpoint, delivery options and the branch table.
//!
//! Loaded once from a TOML file (plus environment and command-line
//! overrides) into an immutable [`Settings`].

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::{
    DEFAULT_TIMEOUT_SECS, ENDPOINT_ENV_VAR, FileConfig, Settings, default_config_path,
    default_log_path,
};
