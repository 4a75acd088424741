use std::path::PathBuf;

use crate::model::BranchTableError;

/// Errors that can occur while loading [`Settings`](super::Settings).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has unexpected keys.
    #[error("invalid config file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The platform does not provide a config directory.
    #[error("could not determine config directory")]
    NoConfigDir,

    /// The platform does not provide a data directory.
    #[error("could not determine data directory")]
    NoDataDir,

    /// No webhook endpoint was given in the file, environment, or command line.
    #[error("no webhook endpoint configured; set `endpoint` in the config file or {env}")]
    MissingEndpoint { env: &'static str },

    /// The endpoint could not be parsed as a URL.
    #[error("invalid webhook endpoint {value:?}: {source}")]
    InvalidEndpoint {
        value: String,
        #[source]
        source: url::ParseError,
    },

    /// The endpoint is a URL but not an HTTP one.
    #[error("webhook endpoint must use http or https: {0}")]
    UnsupportedScheme(String),

    /// The request timeout must be at least one second.
    #[error("timeout_secs must be greater than zero")]
    ZeroTimeout,

    /// The configured branch table is inconsistent.
    #[error("invalid branch table: {0}")]
    Branches(#[from] BranchTableError),
}
