//! Configuration loading and command-line overrides

use anyhow::{Context, Result};
use gravity_core::Config;
use std::path::PathBuf;
use tracing::debug;

use crate::args::Args;

const CONFIG_FILE_NAME: &str = "gravityctl.toml";

/// Settings given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `-c/--config`
    pub config_file: Option<PathBuf>,
    /// `--database` or `GRAVITYCTL_DATABASE`
    pub database: Option<PathBuf>,
    /// `--ftl-conf`
    pub ftl_conf: Option<PathBuf>,
}

impl From<&Args> for Overrides {
    fn from(args: &Args) -> Self {
        Self {
            config_file: args.config.clone(),
            database: args.database.clone(),
            ftl_conf: args.ftl_conf.clone(),
        }
    }
}

/// Effective configuration for one run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Merged configuration
    pub config: Config,
    /// TOML file it was read from, if any
    pub file: Option<PathBuf>,
}

impl Overrides {
    /// Load the TOML config and apply the command-line overrides on top
    pub fn load(&self) -> Result<Settings> {
        let file = match &self.config_file {
            Some(path) => Some(path.clone()),
            None => find_config_file(),
        };

        let mut config = match &file {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Config::load(path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?
            }
            None => Config::default(),
        };

        if let Some(database) = &self.database {
            config.database.path = Some(database.clone());
        }
        if let Some(ftl_conf) = &self.ftl_conf {
            config.database.ftl_conf = ftl_conf.clone();
        }

        config
            .validate()
            .context("Configuration validation failed")?;

        Ok(Settings { config, file })
    }
}

/// Locations searched for a config file when `-c` is not given, in order
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dirs) = directories::ProjectDirs::from("", "", "gravityctl") {
        paths.push(dirs.config_dir().join("config.toml"));
    }
    paths
}

fn find_config_file() -> Option<PathBuf> {
    config_search_paths().into_iter().find(|path| path.is_file())
}
