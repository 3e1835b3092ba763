//! Config command - configuration management

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::settings::{config_search_paths, Settings};

/// Config command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration and the resolved database path
    Show,

    /// Show config file locations
    Paths,
}

/// Execute config command
pub fn execute(args: ConfigArgs, settings: &Settings) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(settings),
        ConfigAction::Paths => show_paths(settings),
    }
}

fn show_config(settings: &Settings) -> Result<()> {
    let location = settings
        .config
        .resolve_database()
        .context("Failed to resolve the gravity database path")?;

    match &settings.file {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: {}", "none (defaults)".dimmed()),
    }
    println!("Database:    {} ({})", location.path.display(), location.source);
    if !location.path.is_file() {
        println!("             {}", "file does not exist".yellow());
    }
    println!();

    let toml_str = settings
        .config
        .to_toml()
        .context("Failed to serialize config")?;
    println!("{}", toml_str);
    Ok(())
}

fn show_paths(settings: &Settings) -> Result<()> {
    println!("Configuration file search paths:");
    println!();
    for (i, path) in config_search_paths().iter().enumerate() {
        println!("  {}. {}", i + 1, path.display());
    }

    println!();
    println!("Gravity database lookup order:");
    println!();
    println!("  1. --database / GRAVITYCTL_DATABASE / [database] path");
    println!(
        "  2. {} in {}",
        gravity_core::config::GRAVITY_DB_KEY,
        settings.config.database.ftl_conf.display()
    );
    println!("  3. {}", gravity_core::config::DEFAULT_GRAVITY_DB);

    Ok(())
}
