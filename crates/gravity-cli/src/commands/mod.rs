//! CLI commands

pub mod completions;
pub mod config;
pub mod toggle_domain;
pub mod toggle_group;
pub mod update_group;

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use colored::Colorize;
use gravity_core::{DomainEntry, GravityDb, ListSelection, ToggleAction};

use crate::settings::Settings;

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Enable, disable or toggle the entries for a domain
    ToggleDomain(toggle_domain::ToggleDomainArgs),

    /// Enable, disable or toggle every entry in a group
    ToggleGroup(toggle_group::ToggleGroupArgs),

    /// Replace the group memberships of the entries for a domain
    UpdateGroup(update_group::UpdateGroupArgs),

    /// Configuration management
    Config(config::ConfigArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// `-b`/`-w` list selection shared by the domain commands.
///
/// Neither flag selects both lists.
#[derive(Args, Debug, Clone, Copy)]
pub struct ListFlags {
    /// Only blacklist entries (exact and regex)
    #[arg(short = 'b', long)]
    pub blacklist: bool,

    /// Only whitelist entries (exact and regex)
    #[arg(short = 'w', long)]
    pub whitelist: bool,
}

impl ListFlags {
    /// Lists the command operates on
    pub fn selection(&self) -> ListSelection {
        ListSelection::from_flags(self.blacklist, self.whitelist)
    }
}

/// Toggle action as typed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    /// Set entries enabled
    #[value(alias = "e")]
    Enable,
    /// Set entries disabled
    #[value(alias = "d")]
    Disable,
    /// Flip each entry
    #[value(alias = "t")]
    Toggle,
}

impl From<ActionArg> for ToggleAction {
    fn from(action: ActionArg) -> Self {
        match action {
            ActionArg::Enable => ToggleAction::Enable,
            ActionArg::Disable => ToggleAction::Disable,
            ActionArg::Toggle => ToggleAction::Toggle,
        }
    }
}

/// Resolve and open the gravity database
pub(crate) fn open_database(settings: &Settings) -> Result<GravityDb> {
    let location = settings.config.resolve_database()?;
    GravityDb::open(&location.path, settings.config.database.busy_timeout()).with_context(|| {
        format!(
            "Failed to open gravity database {} ({})",
            location.path.display(),
            location.source
        )
    })
}

/// Report lookup failures on stdout; they end the command normally
pub(crate) fn report_lookup<T>(result: gravity_core::Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_lookup() => {
            println!("{}", e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn print_entry(entry: &DomainEntry) {
    let state = if entry.enabled {
        "enabled".green()
    } else {
        "disabled".red()
    };
    println!(
        "  #{:<5} {:<10} {} {}",
        entry.id,
        entry.kind.short_name(),
        entry.pattern,
        state
    );
}

pub(crate) fn dry_run_prefix(dry_run: bool) -> String {
    if dry_run {
        format!("{} ", "[dry run]".yellow())
    } else {
        String::new()
    }
}

pub(crate) fn plural(count: usize) -> &'static str {
    if count == 1 {
        "entry"
    } else {
        "entries"
    }
}

/// Summary shared by `toggle-domain` and `toggle-group`
pub(crate) fn print_toggle_summary(
    outcome: &gravity_core::ops::ToggleOutcome,
    action: ToggleAction,
) {
    let prefix = dry_run_prefix(outcome.dry_run);
    if outcome.changed.is_empty() {
        println!(
            "{}Nothing to do: {} matching {} already {}",
            prefix,
            outcome.matched.len(),
            plural(outcome.matched.len()),
            action.past_tense()
        );
        return;
    }

    println!(
        "{}{} {} {} {}",
        prefix,
        "✓".green(),
        capitalize(action.past_tense()),
        outcome.changed.len(),
        plural(outcome.changed.len())
    );
    for entry in &outcome.changed {
        print_entry(entry);
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
