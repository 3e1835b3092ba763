//! toggle-group command

use anyhow::{Context, Result};
use clap::Args;
use gravity_core::ops::{self, ToggleGroupParams};
use gravity_core::ToggleAction;

use super::{open_database, print_toggle_summary, report_lookup, ActionArg, ListFlags};
use crate::settings::Settings;

/// toggle-group arguments
#[derive(Args, Debug)]
pub struct ToggleGroupArgs {
    /// Group whose member entries are changed
    pub group: String,

    /// enable (e), disable (d) or toggle (t)
    #[arg(value_enum, ignore_case = true)]
    pub action: ActionArg,

    #[command(flatten)]
    pub lists: ListFlags,

    /// Show what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute toggle-group command
pub fn execute(args: ToggleGroupArgs, settings: &Settings) -> Result<()> {
    let action = ToggleAction::from(args.action);
    let params = ToggleGroupParams::new(args.group, action, args.lists.selection())?
        .with_dry_run(args.dry_run);

    let mut db = open_database(settings)?;
    let result = ops::toggle_group(&mut db, &params);
    db.close().context("Failed to close gravity database")?;

    if let Some(outcome) = report_lookup(result)? {
        print_toggle_summary(&outcome, action);
    }
    Ok(())
}
