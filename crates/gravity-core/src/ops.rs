//! Command operations
//!
//! One validated parameter struct and one function per command. Each
//! function performs a single read-filter-mutate sequence against an open
//! [`GravityDb`]. Lookups complete before anything is written, so a lookup
//! error always leaves the database untouched.

use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::filter::{filter_by_group, filter_by_pattern};
use crate::model::{DomainEntry, ListSelection, ToggleAction};
use crate::mutator::plan_toggle;
use crate::repository::{group_name_index, GravityDb};

fn non_empty(name: &'static str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::invalid_parameter(name, "must not be empty"));
    }
    Ok(value)
}

/// Parameters of `toggle-domain`
#[derive(Debug, Clone)]
pub struct ToggleDomainParams {
    pattern: String,
    action: ToggleAction,
    selection: ListSelection,
    dry_run: bool,
}

impl ToggleDomainParams {
    /// Validate and build the parameters
    pub fn new(
        pattern: impl Into<String>,
        action: ToggleAction,
        selection: ListSelection,
    ) -> Result<Self> {
        Ok(Self {
            pattern: non_empty("domain", pattern.into())?,
            action,
            selection,
            dry_run: false,
        })
    }

    /// Compute the outcome without writing
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Domain or regex text to look up
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Requested action
    pub fn action(&self) -> ToggleAction {
        self.action
    }
}

/// Parameters of `toggle-group`
#[derive(Debug, Clone)]
pub struct ToggleGroupParams {
    group: String,
    action: ToggleAction,
    selection: ListSelection,
    dry_run: bool,
}

impl ToggleGroupParams {
    /// Validate and build the parameters
    pub fn new(
        group: impl Into<String>,
        action: ToggleAction,
        selection: ListSelection,
    ) -> Result<Self> {
        Ok(Self {
            group: non_empty("group", group.into())?,
            action,
            selection,
            dry_run: false,
        })
    }

    /// Compute the outcome without writing
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Group whose members are toggled
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Requested action
    pub fn action(&self) -> ToggleAction {
        self.action
    }
}

/// Parameters of `update-group`
#[derive(Debug, Clone)]
pub struct UpdateGroupParams {
    pattern: String,
    groups: Vec<String>,
    selection: ListSelection,
    dry_run: bool,
}

impl UpdateGroupParams {
    /// Validate and build the parameters
    pub fn new(
        pattern: impl Into<String>,
        groups: Vec<String>,
        selection: ListSelection,
    ) -> Result<Self> {
        if groups.is_empty() {
            return Err(Error::invalid_parameter("group", "at least one group is required"));
        }
        let groups = groups
            .into_iter()
            .map(|g| non_empty("group", g))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            pattern: non_empty("domain", pattern.into())?,
            groups,
            selection,
            dry_run: false,
        })
    }

    /// Compute the outcome without writing
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Domain or regex text to look up
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Names of the groups the entries are moved to
    pub fn groups(&self) -> &[String] {
        &self.groups
    }
}

/// Result of `toggle-domain` and `toggle-group`
#[derive(Debug, Clone)]
pub struct ToggleOutcome {
    /// Entries selected by the filter
    pub matched: Vec<DomainEntry>,
    /// Entries written, with their new state
    pub changed: Vec<DomainEntry>,
    /// Nothing was written
    pub dry_run: bool,
}

/// Result of `update-group`
#[derive(Debug, Clone)]
pub struct UpdateGroupOutcome {
    /// Entries whose memberships were replaced
    pub entries: Vec<DomainEntry>,
    /// Ids of the groups they now belong to
    pub group_ids: BTreeSet<i64>,
    /// Nothing was written
    pub dry_run: bool,
}

/// Toggle the entries whose pattern matches exactly
pub fn toggle_domain(db: &mut GravityDb, params: &ToggleDomainParams) -> Result<ToggleOutcome> {
    let matched = filter_by_pattern(&*db, &params.pattern, params.selection)?;
    apply_toggle(db, matched, params.action, params.dry_run)
}

/// Toggle every member of a group
pub fn toggle_group(db: &mut GravityDb, params: &ToggleGroupParams) -> Result<ToggleOutcome> {
    let matched = filter_by_group(&*db, &params.group, params.selection)?;
    apply_toggle(db, matched, params.action, params.dry_run)
}

/// Move the entries whose pattern matches exactly into the given groups.
///
/// Every group name is resolved before the domain lookup, so an unknown
/// group aborts the command before any membership is touched. All matched
/// entries are regrouped in one transaction.
pub fn update_group(db: &mut GravityDb, params: &UpdateGroupParams) -> Result<UpdateGroupOutcome> {
    let index = group_name_index(&*db)?;
    let mut group_ids = BTreeSet::new();
    for name in &params.groups {
        let id = index.get(name).ok_or_else(|| Error::UnknownGroup { name: name.clone() })?;
        group_ids.insert(*id);
    }

    let entries = filter_by_pattern(&*db, &params.pattern, params.selection)?;

    if params.dry_run {
        debug!("Dry run: {} entries would be regrouped", entries.len());
    } else {
        let ids: Vec<i64> = entries.iter().map(|entry| entry.id).collect();
        db.reassign_groups_many(&ids, &group_ids)?;
        info!(
            "Reassigned {} entries matching {} to {} groups",
            entries.len(),
            params.pattern,
            group_ids.len()
        );
    }

    Ok(UpdateGroupOutcome {
        entries,
        group_ids,
        dry_run: params.dry_run,
    })
}

fn apply_toggle(
    db: &mut GravityDb,
    matched: Vec<DomainEntry>,
    action: ToggleAction,
    dry_run: bool,
) -> Result<ToggleOutcome> {
    let changed = if dry_run {
        let planned = plan_toggle(&matched, action.target());
        debug!("Dry run: {} entries would be {}", planned.len(), action.past_tense());
        planned
    } else {
        db.toggle_enabled(&matched, action.target())?
    };

    Ok(ToggleOutcome {
        matched,
        changed,
        dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_reject_empty_values() {
        assert!(ToggleDomainParams::new("  ", ToggleAction::Toggle, ListSelection::ALL).is_err());
        assert!(ToggleGroupParams::new("", ToggleAction::Enable, ListSelection::ALL).is_err());
        assert!(UpdateGroupParams::new("ads.example.com", vec![], ListSelection::ALL).is_err());
        assert!(UpdateGroupParams::new(
            "ads.example.com",
            vec!["kids".to_string(), " ".to_string()],
            ListSelection::ALL
        )
        .is_err());
    }

    #[test]
    fn test_params_accept_valid_values() {
        let params = ToggleDomainParams::new("ads.example.com", ToggleAction::Disable, ListSelection::ALL)
            .unwrap()
            .with_dry_run(true);
        assert_eq!(params.pattern(), "ads.example.com");
        assert_eq!(params.action(), ToggleAction::Disable);
        assert!(params.dry_run);

        let params = UpdateGroupParams::new(
            "ads.example.com",
            vec!["kids".to_string(), "guests".to_string()],
            ListSelection::from_flags(true, false),
        )
        .unwrap();
        assert_eq!(params.groups(), ["kids", "guests"]);
    }
}
