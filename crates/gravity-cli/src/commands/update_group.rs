//! update-group command

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use gravity_core::ops::{self, UpdateGroupParams};

use super::{dry_run_prefix, open_database, plural, print_entry, report_lookup, ListFlags};
use crate::settings::Settings;

/// update-group arguments
#[derive(Args, Debug)]
pub struct UpdateGroupArgs {
    /// Domain or regex, matched literally against the stored text
    pub domain: String,

    /// Groups the entries will belong to; replaces all current memberships
    #[arg(short = 'g', long = "group", value_name = "GROUP", required = true, num_args = 1..)]
    pub groups: Vec<String>,

    #[command(flatten)]
    pub lists: ListFlags,

    /// Show what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute update-group command
pub fn execute(args: UpdateGroupArgs, settings: &Settings) -> Result<()> {
    let params = UpdateGroupParams::new(args.domain, args.groups, args.lists.selection())?
        .with_dry_run(args.dry_run);

    let mut db = open_database(settings)?;
    let result = ops::update_group(&mut db, &params);
    db.close().context("Failed to close gravity database")?;

    let Some(outcome) = report_lookup(result)? else {
        return Ok(());
    };

    println!(
        "{}{} Moved {} {} to {}",
        dry_run_prefix(outcome.dry_run),
        "✓".green(),
        outcome.entries.len(),
        plural(outcome.entries.len()),
        params.groups().join(", ").bold()
    );
    for entry in &outcome.entries {
        print_entry(entry);
    }
    Ok(())
}
