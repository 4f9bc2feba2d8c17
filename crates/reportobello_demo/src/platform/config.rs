use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reportobello_client::{ApiSettings, DEFAULT_HOST};
use serde::Deserialize;
use thiserror::Error;

pub(crate) const API_KEY_ENV: &str = "REPORTOBELLO_API_KEY";
pub(crate) const HOST_ENV: &str = "REPORTOBELLO_HOST";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub host: String,
    pub api_key: Option<String>,
    pub downloads_dir: PathBuf,
    /// Document shown in the page's preview frame.
    pub preview_path: PathBuf,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub open_browser: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_key: None,
            downloads_dir: PathBuf::from("downloads"),
            preview_path: PathBuf::from("preview").join("frame.pdf"),
            connect_timeout_secs: 10,
            request_timeout_secs: None,
            open_browser: true,
        }
    }
}

impl AppConfig {
    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Applies `REPORTOBELLO_API_KEY` / `REPORTOBELLO_HOST` on top of the file values.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_ENV).filter(|value| !value.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(host) = lookup(HOST_ENV).filter(|value| !value.is_empty()) {
            self.host = host;
        }
        self
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            host: self.host.clone(),
            api_key: self.api_key.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            ..ApiSettings::default()
        }
    }
}
