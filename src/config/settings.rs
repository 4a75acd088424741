use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::error::ConfigError;
use crate::model::{BranchEntry, BranchSalesLookup};
use crate::webhook::DeliveryMode;

/// Environment variable that overrides the configured endpoint.
pub const ENDPOINT_ENV_VAR: &str = "DEADSTOCK_WEBHOOK_URL";

/// Request timeout used when the config file does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The config file as written on disk. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub delivery: Option<DeliveryMode>,
    #[serde(default, rename = "branch")]
    pub branches: Vec<BranchEntry>,
}

impl FileConfig {
    /// Parses config file contents.
    pub fn parse(raw: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads the config file at `path`.
    ///
    /// A missing file yields an empty config when `required` is false.
    pub fn read(path: &Path, required: bool) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw, path),
            Err(e) if e.kind() == ErrorKind::NotFound && !required => {
                tracing::info!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Immutable runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Where completed forms are posted.
    pub endpoint: Url,
    /// How long a delivery may take before it counts as a transport error.
    pub timeout: Duration,
    pub delivery: DeliveryMode,
    pub branches: BranchSalesLookup,
}

impl Settings {
    /// Loads settings from `config_path` (or the default location), then
    /// applies the environment and `cli_endpoint` overrides.
    ///
    /// An explicitly given config file must exist; the default one may be absent.
    pub fn load(config_path: Option<&Path>, cli_endpoint: Option<Url>) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(path) => path.to_path_buf(),
            None => default_config_path()?,
        };
        let file = FileConfig::read(&path, config_path.is_some())?;
        let env_endpoint = std::env::var(ENDPOINT_ENV_VAR).ok();
        tracing::info!(
            path = %path.display(),
            endpoint_source = endpoint_source(cli_endpoint.as_ref(), env_endpoint.as_deref()),
            "configuration loaded"
        );
        Self::resolve(file, env_endpoint, cli_endpoint)
    }

    /// Merges the file config with overrides.
    ///
    /// Endpoint precedence: command line, then environment, then file.
    pub fn resolve(
        file: FileConfig,
        env_endpoint: Option<String>,
        cli_endpoint: Option<Url>,
    ) -> Result<Self, ConfigError> {
        let endpoint = match cli_endpoint {
            Some(url) => url,
            None => {
                let raw = env_endpoint
                    .filter(|v| !v.is_empty())
                    .or(file.endpoint)
                    .ok_or(ConfigError::MissingEndpoint {
                        env: ENDPOINT_ENV_VAR,
                    })?;
                Url::parse(&raw).map_err(|source| ConfigError::InvalidEndpoint {
                    value: raw.clone(),
                    source,
                })?
            }
        };
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(endpoint.to_string()));
        }

        let timeout_secs = file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let branches = if file.branches.is_empty() {
            BranchSalesLookup::default()
        } else {
            BranchSalesLookup::from_entries(file.branches)?
        };

        Ok(Self {
            endpoint,
            timeout: Duration::from_secs(timeout_secs),
            delivery: file.delivery.unwrap_or_default(),
            branches,
        })
    }
}

/// Names where the endpoint will be taken from, following the precedence in
/// [`Settings::resolve`].
fn endpoint_source(cli_endpoint: Option<&Url>, env_endpoint: Option<&str>) -> &'static str {
    if cli_endpoint.is_some() {
        "command line"
    } else if env_endpoint.is_some_and(|v| !v.is_empty()) {
        "environment"
    } else {
        "config file"
    }
}

/// Returns `<config dir>/deadstock/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(dir.join("deadstock").join("config.toml"))
}

/// Returns `<data dir>/deadstock/deadstock.log`, creating the directory.
pub fn default_log_path() -> Result<PathBuf, ConfigError> {
    let dir = dirs::data_dir()
        .ok_or(ConfigError::NoDataDir)?
        .join("deadstock");
    fs::create_dir_all(&dir).map_err(|source| ConfigError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir.join("deadstock.log"))
}
