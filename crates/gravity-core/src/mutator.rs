//! Bulk updates to the gravity database
//!
//! Each public operation runs inside one transaction: either every row of
//! the call is written or none is.

use rusqlite::params;
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::error::Result;
use crate::model::DomainEntry;
use crate::repository::GravityDb;

// comment and type are written back unchanged alongside the new flag
const DOMAIN_TOGGLE_STMT: &str =
    "UPDATE domainlist SET enabled = ?1, comment = ?2, type = ?3 WHERE id = ?4";
const GROUP_REMOVE_STMT: &str = "DELETE FROM domainlist_by_group WHERE domainlist_id = ?1";
const GROUP_INSERT_STMT: &str =
    "INSERT INTO domainlist_by_group (domainlist_id, group_id) VALUES (?1, ?2)";

/// Compute the rows a toggle would write.
///
/// Without a target every entry is flipped. With a target only entries not
/// already in that state are returned, carrying the new state.
pub fn plan_toggle(entries: &[DomainEntry], target: Option<bool>) -> Vec<DomainEntry> {
    entries
        .iter()
        .filter(|entry| target.map_or(true, |t| entry.enabled != t))
        .map(|entry| DomainEntry {
            enabled: target.unwrap_or(!entry.enabled),
            ..entry.clone()
        })
        .collect()
}

impl GravityDb {
    /// Flip or set the `enabled` flag of `entries`.
    ///
    /// Returns the rows that were written, with their new state.
    pub fn toggle_enabled(
        &mut self,
        entries: &[DomainEntry],
        target: Option<bool>,
    ) -> Result<Vec<DomainEntry>> {
        let updates = plan_toggle(entries, target);
        if updates.is_empty() {
            debug!("All {} entries already in the requested state", entries.len());
            return Ok(updates);
        }

        let tx = self.connection_mut().transaction()?;
        {
            let mut stmt = tx.prepare_cached(DOMAIN_TOGGLE_STMT)?;
            for entry in &updates {
                stmt.execute(params![entry.enabled, entry.comment, entry.kind, entry.id])?;
            }
        }
        tx.commit()?;

        info!("Updated enabled flag of {} domain-list entries", updates.len());
        Ok(updates)
    }

    /// Replace the group memberships of `domain_id` with `group_ids`
    pub fn reassign_groups(&mut self, domain_id: i64, group_ids: &BTreeSet<i64>) -> Result<()> {
        self.reassign_groups_many(&[domain_id], group_ids)
    }

    /// Replace the group memberships of every id in `domain_ids` with
    /// `group_ids`, in a single transaction
    pub fn reassign_groups_many(
        &mut self,
        domain_ids: &[i64],
        group_ids: &BTreeSet<i64>,
    ) -> Result<()> {
        let tx = self.connection_mut().transaction()?;
        {
            let mut remove = tx.prepare_cached(GROUP_REMOVE_STMT)?;
            let mut insert = tx.prepare_cached(GROUP_INSERT_STMT)?;
            for &domain_id in domain_ids {
                let removed = remove.execute([domain_id])?;
                for group_id in group_ids {
                    insert.execute([domain_id, *group_id])?;
                }
                debug!(
                    "Domain #{} moved from {} to {} groups",
                    domain_id,
                    removed,
                    group_ids.len()
                );
            }
        }
        tx.commit()?;

        info!(
            "Reassigned {} domain-list entries to {} groups",
            domain_ids.len(),
            group_ids.len()
        );
        Ok(())
    }
}
