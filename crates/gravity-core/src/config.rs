//! Configuration management for gravityctl
//!
//! The tool's own settings live in an optional TOML file. The location of
//! `gravity.db` is resolved from, in order: an explicit path, the
//! `GRAVITYDB` key of the Pi-hole FTL config, and the stock default path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Pi-hole FTL configuration file
pub const DEFAULT_FTL_CONF: &str = "/etc/pihole/pihole-FTL.conf";

/// Stock location of the gravity database
pub const DEFAULT_GRAVITY_DB: &str = "/etc/pihole/gravity.db";

/// FTL config key holding an alternative database path
pub const GRAVITY_DB_KEY: &str = "GRAVITYDB";

/// Largest busy timeout SQLite accepts, in milliseconds
pub const MAX_BUSY_TIMEOUT_MS: u64 = i32::MAX as u64;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database location and connection settings
    pub database: DatabaseConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Explicit database path; skips FTL config lookup when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// FTL config file consulted for `GRAVITYDB`
    pub ftl_conf: PathBuf,
    /// How long a write waits on a locked database, in milliseconds
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            ftl_conf: PathBuf::from(DEFAULT_FTL_CONF),
            busy_timeout_ms: 5000,
        }
    }
}

impl DatabaseConfig {
    /// Busy timeout as a `Duration`
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

/// Where the resolved database path came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseSource {
    /// Given on the command line or in the TOML config
    Explicit,
    /// `GRAVITYDB` key of the given FTL config file
    FtlConfig(PathBuf),
    /// Neither was available
    Default,
}

impl fmt::Display for DatabaseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit => f.write_str("explicit setting"),
            Self::FtlConfig(path) => write!(f, "{} in {}", GRAVITY_DB_KEY, path.display()),
            Self::Default => f.write_str("built-in default"),
        }
    }
}

/// A resolved database path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseLocation {
    /// Path to `gravity.db`
    pub path: PathBuf,
    /// How the path was found
    pub source: DatabaseSource,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::ConfigNotFound {
                path: path.display().to_string(),
            },
            _ => Error::Io(e),
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(Error::from)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.busy_timeout_ms == 0 {
            return Err(Error::config_value(
                "database.busy_timeout_ms",
                "Must be greater than zero",
            ));
        }
        if self.database.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(Error::config_value(
                "database.busy_timeout_ms",
                format!("Must not exceed {}", MAX_BUSY_TIMEOUT_MS),
            ));
        }

        if let Some(path) = &self.database.path {
            if path.as_os_str().is_empty() {
                return Err(Error::config_value("database.path", "Must not be empty"));
            }
        }

        Ok(())
    }

    /// Resolve the gravity database path
    pub fn resolve_database(&self) -> Result<DatabaseLocation> {
        if let Some(path) = &self.database.path {
            debug!("Using explicit database path {}", path.display());
            return Ok(DatabaseLocation {
                path: path.clone(),
                source: DatabaseSource::Explicit,
            });
        }

        let ftl_conf = &self.database.ftl_conf;
        if let Some(value) = read_ftl_value(ftl_conf, GRAVITY_DB_KEY)? {
            debug!("{} found in {}: {}", GRAVITY_DB_KEY, ftl_conf.display(), value);
            return Ok(DatabaseLocation {
                path: PathBuf::from(value),
                source: DatabaseSource::FtlConfig(ftl_conf.clone()),
            });
        }

        Ok(DatabaseLocation {
            path: PathBuf::from(DEFAULT_GRAVITY_DB),
            source: DatabaseSource::Default,
        })
    }
}

/// Read `key` from an FTL config file.
///
/// A missing file is not an error; an unreadable one is.
pub fn read_ftl_value<P: AsRef<Path>>(path: P, key: &str) -> Result<Option<String>> {
    let path = path.as_ref();
    if !path.is_file() {
        debug!("FTL config {} not present", path.display());
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let value = parse_ftl_value(&content, key);
    if value.as_deref() == Some("") {
        warn!("{} is empty in {}, ignoring it", key, path.display());
        return Ok(None);
    }
    Ok(value)
}

/// Look up `key` in FTL config text.
///
/// The file is a flat list of `KEY=VALUE` (or `KEY: VALUE`) lines without
/// sections; the first `=` or `:` separates key and value. Keys match
/// case-insensitively, surrounding whitespace is dropped, lines starting with
/// `#` or `;` are comments, and a repeated key keeps its last value.
pub fn parse_ftl_value(content: &str, key: &str) -> Option<String> {
    let mut found = None;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let Some(split) = line.find(|c: char| c == '=' || c == ':') else {
            continue;
        };
        let (name, value) = (&line[..split], &line[split + 1..]);
        if name.trim().eq_ignore_ascii_case(key) {
            found = Some(value.trim().to_string());
        }
    }
    found
}
