//! gravityctl CLI
//!
//! Command-line interface for the Pi-hole domain list tools.

mod args;
mod commands;
mod logging;
mod settings;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use args::Args;
use commands::Command;
use settings::Overrides;

fn main() -> Result<()> {
    let args = Args::parse();

    logging::init(&args)?;

    let result = run(args);

    if let Err(ref e) = result {
        error!("Fatal error: {:#}", e);
    }

    result
}

fn run(args: Args) -> Result<()> {
    let overrides = Overrides::from(&args);

    match args.command {
        Command::ToggleDomain(cmd_args) => {
            commands::toggle_domain::execute(cmd_args, &overrides.load()?)
        }
        Command::ToggleGroup(cmd_args) => {
            commands::toggle_group::execute(cmd_args, &overrides.load()?)
        }
        Command::UpdateGroup(cmd_args) => {
            commands::update_group::execute(cmd_args, &overrides.load()?)
        }
        Command::Config(config_args) => commands::config::execute(config_args, &overrides.load()?),
        Command::Completions(comp_args) => commands::completions::execute(comp_args),
    }
}
