//! Client configuration, read from a RON file.
//!
//! Looks for `clipper.ron` in the working directory unless `--config` names a
//! file. A missing default file means defaults; a missing explicit file is an
//! error. Command-line flags override whatever the file says.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clipper_engine::ApiSettings;
use clipper_logging::clipper_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "clipper.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("could not write {path:?}: {message}")]
    Write { path: PathBuf, message: String },
    #[error("invalid server url '{url}': {source}")]
    ServerUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub output_dir: PathBuf,
    pub poll_interval_ms: u64,
    pub connect_timeout_ms: u64,
    /// No per-request timeout when absent.
    pub request_timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            output_dir: PathBuf::from("output"),
            poll_interval_ms: clipper_core::POLL_INTERVAL.as_millis() as u64,
            connect_timeout_ms: 10_000,
            request_timeout_ms: None,
        }
    }
}

impl ClientConfig {
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound && explicit.is_none() => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config = Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        clipper_info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(content)
    }

    pub fn with_overrides(mut self, server_url: Option<String>, output_dir: Option<PathBuf>) -> Self {
        if let Some(server_url) = server_url {
            self.server_url = server_url;
        }
        if let Some(output_dir) = output_dir {
            self.output_dir = output_dir;
        }
        self
    }

    pub fn poll_interval(&self) -> Result<Duration, ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(Duration::from_millis(self.poll_interval_ms))
    }

    pub fn api_settings(&self) -> Result<ApiSettings, ConfigError> {
        let base_url = Url::parse(&self.server_url).map_err(|source| ConfigError::ServerUrl {
            url: self.server_url.clone(),
            source,
        })?;
        let mut settings = ApiSettings::new(base_url);
        settings.connect_timeout = Duration::from_millis(self.connect_timeout_ms);
        settings.request_timeout = self.request_timeout_ms.map(Duration::from_millis);
        Ok(settings)
    }

    /// Writes this configuration as pretty RON, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |message: String| ConfigError::Write {
            path: path.to_path_buf(),
            message,
        };
        let pretty = ron::ser::PrettyConfig::new();
        let content =
            ron::ser::to_string_pretty(self, pretty).map_err(|err| write_error(err.to_string()))?;
        fs::write(path, content).map_err(|err| write_error(err.to_string()))
    }
}
