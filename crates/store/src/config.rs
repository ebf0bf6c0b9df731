// User configuration: `<config_dir>/zedrecent/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::paths::Channel;
use crate::query::sqlite_cli::DEFAULT_SQLITE_BIN;
use crate::query::Backend;
use crate::security::write_private_atomic;

pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 2000;

/// Path to the config file: `<config_dir>/zedrecent/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("zedrecent").join("config.toml"))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Release channel whose database is preferred during discovery.
    pub channel: Channel,
    /// Workspace database override. Skips discovery when set.
    pub db_path: Option<PathBuf>,
    /// Editor executable override.
    pub zed_path: Option<PathBuf>,
    pub backend: Backend,
    /// `sqlite3` binary used by the `sqlite3` backend.
    pub sqlite_bin: String,
    /// Busy timeout handed to SQLite, in milliseconds.
    pub query_timeout_ms: u64,
    /// Hide local workspaces whose folder no longer exists.
    pub hide_missing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel: Channel::Stable,
            db_path: None,
            zed_path: None,
            backend: Backend::Embedded,
            sqlite_bin: DEFAULT_SQLITE_BIN.to_string(),
            query_timeout_ms: DEFAULT_QUERY_TIMEOUT_MS,
            hide_missing: true,
        }
    }
}

impl Config {
    /// A missing file yields defaults; a file that exists but does not parse
    /// is an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load_from(path) {
            Err(ConfigError::Io(error)) if error.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&contents).map_err(ConfigError::Parse)
    }

    /// Save to a specific path (creates parent directories).
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        write_private_atomic(path, contents.as_bytes()).map_err(ConfigError::Io)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(_) => f.write_str("config I/O error"),
            Self::Parse(_) => f.write_str("config parse error"),
            Self::Serialize(_) => f.write_str("config serialize error"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Serialize(e) => Some(e),
        }
    }
}
