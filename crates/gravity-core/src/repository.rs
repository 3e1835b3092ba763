//! Read access to the gravity database
//!
//! [`GravityDb`] owns the SQLite connection for the lifetime of one command.
//! The connection is released when the value is dropped, on every exit path.

use rusqlite::{Connection, OpenFlags, Row};
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::config::{Config, MAX_BUSY_TIMEOUT_MS};
use crate::error::{Error, Result};
use crate::model::{DomainEntry, Group};

const DOMAIN_LIST_SELECT: &str = "SELECT id, type, domain, enabled, comment FROM domainlist ORDER BY id";
const GROUP_SELECT: &str = r#"SELECT id, enabled, name, description FROM "group" ORDER BY id"#;
const GROUP_MEMBERS_SELECT: &str =
    "SELECT domainlist_id FROM domainlist_by_group WHERE group_id = ?1";

/// Read-only accessors for domain-list and group rows
#[cfg_attr(test, mockall::automock)]
pub trait Repository {
    /// All domain-list entries, in no particular order
    fn list_domains(&self) -> Result<Vec<DomainEntry>>;

    /// All groups
    fn list_groups(&self) -> Result<Vec<Group>>;

    /// Ids of the domain-list entries that are members of `group_id`
    fn domain_ids_in_group(&self, group_id: i64) -> Result<BTreeSet<i64>>;
}

/// Map each group name to its id.
///
/// Fails with [`Error::DuplicateGroupName`] when two groups share a name.
pub fn group_name_index<R: Repository + ?Sized>(repo: &R) -> Result<HashMap<String, i64>> {
    let groups = repo.list_groups()?;
    let mut index = HashMap::with_capacity(groups.len());

    for group in groups {
        match index.entry(group.name) {
            Entry::Occupied(existing) => {
                return Err(Error::DuplicateGroupName {
                    name: existing.key().clone(),
                    first: *existing.get(),
                    second: group.id,
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(group.id);
            }
        }
    }

    Ok(index)
}

/// Handle to an existing gravity database
#[derive(Debug)]
pub struct GravityDb {
    path: PathBuf,
    conn: Connection,
}

impl GravityDb {
    /// Open an existing database file for reading and writing.
    ///
    /// The file is never created; opening a missing path fails. The busy
    /// timeout must fit SQLite's `int` milliseconds.
    pub fn open<P: AsRef<Path>>(path: P, busy_timeout: Duration) -> Result<Self> {
        let path = path.as_ref();
        if busy_timeout.as_millis() > u128::from(MAX_BUSY_TIMEOUT_MS) {
            return Err(Error::invalid_parameter(
                "busy_timeout",
                format!("must not exceed {} ms", MAX_BUSY_TIMEOUT_MS),
            ));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(busy_timeout)?;
        debug!("Opened gravity database at {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }

    /// Resolve the database location from `config` and open it
    pub fn open_with_config(config: &Config) -> Result<Self> {
        let location = config.resolve_database()?;
        debug!("Database path {} ({})", location.path.display(), location.source);
        Self::open(&location.path, config.database.busy_timeout())
    }

    /// Wrap an already open connection
    pub fn from_connection(conn: Connection) -> Self {
        let path = conn
            .path()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(":memory:"));
        Self { path, conn }
    }

    /// Path of the open database
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Close the connection, reporting any error SQLite raises while closing
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, e)| Error::from(e))?;
        debug!("Closed gravity database at {}", path.display());
        Ok(())
    }
}

impl Repository for GravityDb {
    fn list_domains(&self) -> Result<Vec<DomainEntry>> {
        let mut stmt = self.conn.prepare_cached(DOMAIN_LIST_SELECT)?;
        let domains = stmt
            .query_map([], domain_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!("Read {} domain-list entries", domains.len());
        Ok(domains)
    }

    fn list_groups(&self) -> Result<Vec<Group>> {
        let mut stmt = self.conn.prepare_cached(GROUP_SELECT)?;
        let groups = stmt
            .query_map([], |row| {
                Ok(Group {
                    id: row.get(0)?,
                    enabled: row.get(1)?,
                    name: row.get(2)?,
                    comment: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!("Read {} groups", groups.len());
        Ok(groups)
    }

    fn domain_ids_in_group(&self, group_id: i64) -> Result<BTreeSet<i64>> {
        let mut stmt = self.conn.prepare_cached(GROUP_MEMBERS_SELECT)?;
        let ids = stmt
            .query_map([group_id], |row| row.get::<_, i64>(0))?
            .collect::<rusqlite::Result<BTreeSet<i64>>>()?;

        debug!("Group #{} has {} members", group_id, ids.len());
        Ok(ids)
    }
}

fn domain_from_row(row: &Row<'_>) -> rusqlite::Result<DomainEntry> {
    Ok(DomainEntry {
        id: row.get(0)?,
        kind: row.get(1)?,
        pattern: row.get(2)?,
        enabled: row.get(3)?,
        comment: row.get(4)?,
    })
}
