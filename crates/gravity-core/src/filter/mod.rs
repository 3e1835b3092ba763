//! Domain-list filter engine
//!
//! Selects entries by literal pattern, by id, or by group membership, then
//! narrows the result to the requested list types. Every entry point is
//! terminal and reports an empty result as a lookup error:
//! - nothing matched the lookup: [`Error::DomainNotFound`]
//! - matches exist but none is on a requested list:
//!   [`Error::DomainNotInRequestedLists`]
//!
//! Regex entries are matched by their stored source text; no pattern is ever
//! evaluated.

use std::collections::BTreeSet;
use tracing::debug;

use crate::error::{Error, Result, Subject};
use crate::model::{DomainEntry, ListSelection};
use crate::repository::{group_name_index, Repository};

/// Keep the entries whose list kind `selection` accepts
pub fn narrow(entries: Vec<DomainEntry>, selection: ListSelection) -> Vec<DomainEntry> {
    entries
        .into_iter()
        .filter(|entry| selection.accepts(entry.kind))
        .collect()
}

/// Entries whose stored pattern equals `pattern` exactly
pub fn filter_by_pattern<R: Repository + ?Sized>(
    repo: &R,
    pattern: &str,
    selection: ListSelection,
) -> Result<Vec<DomainEntry>> {
    let matched: Vec<DomainEntry> = repo
        .list_domains()?
        .into_iter()
        .filter(|entry| entry.pattern == pattern)
        .collect();

    debug!("{} entries match pattern {}", matched.len(), pattern);
    finish(matched, selection, Subject::Pattern(pattern.to_string()))
}

/// Entries whose id is in `ids`
pub fn filter_by_id<R: Repository + ?Sized>(
    repo: &R,
    ids: &BTreeSet<i64>,
    selection: ListSelection,
) -> Result<Vec<DomainEntry>> {
    select_by_ids(repo, ids, selection, Subject::Ids(ids.clone()))
}

/// Entries that are members of the group called `group_name`
pub fn filter_by_group<R: Repository + ?Sized>(
    repo: &R,
    group_name: &str,
    selection: ListSelection,
) -> Result<Vec<DomainEntry>> {
    let index = group_name_index(repo)?;
    let group_id = *index.get(group_name).ok_or_else(|| Error::UnknownGroup {
        name: group_name.to_string(),
    })?;

    let ids = repo.domain_ids_in_group(group_id)?;
    if ids.is_empty() {
        return Err(Error::EmptyGroup {
            name: group_name.to_string(),
        });
    }

    select_by_ids(repo, &ids, selection, Subject::Group(group_name.to_string()))
}

fn select_by_ids<R: Repository + ?Sized>(
    repo: &R,
    ids: &BTreeSet<i64>,
    selection: ListSelection,
    subject: Subject,
) -> Result<Vec<DomainEntry>> {
    let matched: Vec<DomainEntry> = repo
        .list_domains()?
        .into_iter()
        .filter(|entry| ids.contains(&entry.id))
        .collect();

    debug!("{} of {} requested ids found", matched.len(), ids.len());
    finish(matched, selection, subject)
}

fn finish(
    matched: Vec<DomainEntry>,
    selection: ListSelection,
    subject: Subject,
) -> Result<Vec<DomainEntry>> {
    if matched.is_empty() {
        return Err(Error::DomainNotFound { subject });
    }

    let narrowed = narrow(matched, selection);
    if narrowed.is_empty() {
        return Err(Error::DomainNotInRequestedLists { subject, selection });
    }

    Ok(narrowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Group, ListKind};
    use crate::repository::MockRepository;
    use mockall::predicate::eq;

    fn entry(id: i64, kind: ListKind, pattern: &str, enabled: bool) -> DomainEntry {
        DomainEntry {
            id,
            kind,
            pattern: pattern.to_string(),
            enabled,
            comment: None,
        }
    }

    fn sample_domains() -> Vec<DomainEntry> {
        vec![
            entry(1, ListKind::BlacklistExact, "ads.example.com", false),
            entry(2, ListKind::WhitelistExact, "ads.example.com", true),
            entry(3, ListKind::BlacklistRegex, r"(\.|^)doubleclick\.net$", true),
            entry(4, ListKind::WhitelistExact, "cdn.example.com", true),
        ]
    }

    fn group(id: i64, name: &str) -> Group {
        Group {
            id,
            enabled: true,
            name: name.to_string(),
            comment: None,
        }
    }

    fn repo_with_domains() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_list_domains()
            .returning(|| Ok(sample_domains()));
        repo
    }

    fn ids(entries: &[DomainEntry]) -> Vec<i64> {
        let mut ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_pattern_matches_every_list() {
        let repo = repo_with_domains();
        let found = filter_by_pattern(&repo, "ads.example.com", ListSelection::ALL).unwrap();
        assert_eq!(ids(&found), vec![1, 2]);
    }

    #[test]
    fn test_pattern_narrowed_to_blacklist() {
        let repo = repo_with_domains();
        let found =
            filter_by_pattern(&repo, "ads.example.com", ListSelection::from_flags(true, false))
                .unwrap();
        assert_eq!(ids(&found), vec![1]);
    }

    #[test]
    fn test_pattern_narrowed_to_whitelist() {
        let repo = repo_with_domains();
        let found =
            filter_by_pattern(&repo, "ads.example.com", ListSelection::from_flags(false, true))
                .unwrap();
        assert_eq!(ids(&found), vec![2]);
    }

    #[test]
    fn test_regex_entry_matched_by_source_text() {
        let repo = repo_with_domains();
        let found =
            filter_by_pattern(&repo, r"(\.|^)doubleclick\.net$", ListSelection::ALL).unwrap();
        assert_eq!(ids(&found), vec![3]);

        // The regex is never evaluated against the pattern
        let repo = repo_with_domains();
        let err = filter_by_pattern(&repo, "ads.doubleclick.net", ListSelection::ALL).unwrap_err();
        assert!(matches!(err, Error::DomainNotFound { .. }));
    }

    #[test]
    fn test_pattern_not_found() {
        let repo = repo_with_domains();
        let err = filter_by_pattern(&repo, "missing.example", ListSelection::ALL).unwrap_err();
        assert_eq!(err.to_string(), "missing.example is not in domain list");
    }

    #[test]
    fn test_pattern_not_in_requested_lists() {
        let repo = repo_with_domains();
        let err = filter_by_pattern(&repo, "cdn.example.com", ListSelection::from_flags(true, false))
            .unwrap_err();
        assert!(matches!(err, Error::DomainNotInRequestedLists { .. }));
        assert_eq!(err.to_string(), "cdn.example.com is not blacklisted");
    }

    #[test]
    fn test_filter_by_id() {
        let repo = repo_with_domains();
        let found = filter_by_id(&repo, &BTreeSet::from([3, 4]), ListSelection::ALL).unwrap();
        assert_eq!(ids(&found), vec![3, 4]);
    }

    #[test]
    fn test_filter_by_missing_id() {
        let repo = repo_with_domains();
        let err = filter_by_id(&repo, &BTreeSet::from([99]), ListSelection::ALL).unwrap_err();
        assert!(matches!(err, Error::DomainNotFound { .. }));
    }

    #[test]
    fn test_filter_by_group_whitelist_only() {
        let mut repo = repo_with_domains();
        repo.expect_list_groups()
            .returning(|| Ok(vec![group(0, "Default"), group(5, "kids")]));
        repo.expect_domain_ids_in_group()
            .with(eq(5))
            .times(1)
            .returning(|_| Ok(BTreeSet::from([1, 2])));

        let found =
            filter_by_group(&repo, "kids", ListSelection::from_flags(false, true)).unwrap();
        assert_eq!(ids(&found), vec![2]);
    }

    #[test]
    fn test_filter_by_group_nothing_on_requested_list() {
        let mut repo = repo_with_domains();
        repo.expect_list_groups()
            .returning(|| Ok(vec![group(5, "kids")]));
        repo.expect_domain_ids_in_group()
            .with(eq(5))
            .returning(|_| Ok(BTreeSet::from([1, 3])));

        let err =
            filter_by_group(&repo, "kids", ListSelection::from_flags(false, true)).unwrap_err();
        assert!(matches!(err, Error::DomainNotInRequestedLists { .. }));
    }

    #[test]
    fn test_filter_by_unknown_group() {
        let mut repo = MockRepository::new();
        repo.expect_list_groups()
            .returning(|| Ok(vec![group(0, "Default")]));
        repo.expect_domain_ids_in_group().never();
        repo.expect_list_domains().never();

        let err = filter_by_group(&repo, "kids", ListSelection::ALL).unwrap_err();
        assert!(matches!(err, Error::UnknownGroup { ref name } if name == "kids"));
    }

    #[test]
    fn test_filter_by_empty_group() {
        let mut repo = MockRepository::new();
        repo.expect_list_groups()
            .returning(|| Ok(vec![group(5, "kids")]));
        repo.expect_domain_ids_in_group()
            .returning(|_| Ok(BTreeSet::new()));
        repo.expect_list_domains().never();

        let err = filter_by_group(&repo, "kids", ListSelection::ALL).unwrap_err();
        assert_eq!(err.to_string(), "No domains are in group kids");
    }

    #[test]
    fn test_filter_by_group_with_duplicate_names() {
        let mut repo = MockRepository::new();
        repo.expect_list_groups()
            .returning(|| Ok(vec![group(5, "kids"), group(6, "kids")]));
        repo.expect_domain_ids_in_group().never();

        let err = filter_by_group(&repo, "kids", ListSelection::ALL).unwrap_err();
        assert!(matches!(err, Error::DuplicateGroupName { .. }));
    }

    #[test]
    fn test_storage_errors_propagate() {
        let mut repo = MockRepository::new();
        repo.expect_list_domains()
            .returning(|| Err(Error::Database(rusqlite::Error::InvalidQuery)));

        let err = filter_by_pattern(&repo, "ads.example.com", ListSelection::ALL).unwrap_err();
        assert!(!err.is_lookup());
    }

    #[test]
    fn test_narrow_is_idempotent() {
        let white_only = ListSelection::from_flags(false, true);
        let once = narrow(sample_domains(), white_only);
        let twice = narrow(once.clone(), white_only);
        assert_eq!(once, twice);
        assert!(once.iter().all(|e| e.kind.is_white()));
    }
}
