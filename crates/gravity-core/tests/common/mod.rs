//! Shared gravity database fixture

#![allow(dead_code)]

use gravity_core::GravityDb;
use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

/// Tables as laid out by the appliance, trimmed to what the tools touch
pub const SCHEMA: &str = r#"
CREATE TABLE "group" (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    enabled BOOLEAN NOT NULL DEFAULT 1,
    name TEXT UNIQUE NOT NULL,
    date_added INTEGER NOT NULL DEFAULT (cast(strftime('%s', 'now') as int)),
    date_modified INTEGER NOT NULL DEFAULT (cast(strftime('%s', 'now') as int)),
    description TEXT
);
CREATE TABLE domainlist (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type INTEGER NOT NULL DEFAULT 0,
    domain TEXT NOT NULL,
    enabled BOOLEAN NOT NULL DEFAULT 1,
    date_added INTEGER NOT NULL DEFAULT (cast(strftime('%s', 'now') as int)),
    date_modified INTEGER NOT NULL DEFAULT (cast(strftime('%s', 'now') as int)),
    comment TEXT,
    UNIQUE(domain, type)
);
CREATE TABLE domainlist_by_group (
    domainlist_id INTEGER NOT NULL REFERENCES domainlist (id),
    group_id INTEGER NOT NULL REFERENCES "group" (id),
    PRIMARY KEY (domainlist_id, group_id)
);
"#;

/// Sample rows:
/// - 1 `ads.example.com` exact blacklist, disabled
/// - 2 `ads.example.com` exact whitelist, enabled
/// - 3 `(\.|^)tracker\.net$` regex blacklist, enabled
/// - 4 `cdn.example.com` exact whitelist, enabled
/// - 5 `^safe\.` regex whitelist, disabled
///
/// Groups: 0 `Default` {1, 3}, 5 `kids` {1, 2}, 6 `guests` {}, 7 `iot` {3}
pub const SEED: &str = r#"
INSERT INTO "group" (id, enabled, name, description) VALUES
    (0, 1, 'Default', 'The default group'),
    (5, 1, 'kids', NULL),
    (6, 1, 'guests', NULL),
    (7, 0, 'iot', 'Smart home devices');
INSERT INTO domainlist (id, type, domain, enabled, comment) VALUES
    (1, 1, 'ads.example.com', 0, 'added by hand'),
    (2, 0, 'ads.example.com', 1, NULL),
    (3, 3, '(\.|^)tracker\.net$', 1, 'regex'),
    (4, 0, 'cdn.example.com', 1, NULL),
    (5, 2, '^safe\.', 0, NULL);
INSERT INTO domainlist_by_group (domainlist_id, group_id) VALUES
    (1, 0), (3, 0),
    (1, 5), (2, 5),
    (3, 7);
"#;

/// A seeded database file in a temporary directory
pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gravity.db");

        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(SEED).unwrap();
        conn.close().unwrap();

        Self { _dir: dir, path }
    }

    pub fn open(&self) -> GravityDb {
        GravityDb::open(&self.path, Duration::from_millis(500)).unwrap()
    }

    /// Side connection for inspecting state
    pub fn inspect(&self) -> Connection {
        Connection::open(&self.path).unwrap()
    }

    pub fn enabled(&self, id: i64) -> bool {
        self.inspect()
            .query_row("SELECT enabled FROM domainlist WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .unwrap()
    }

    pub fn comment(&self, id: i64) -> Option<String> {
        self.inspect()
            .query_row("SELECT comment FROM domainlist WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .unwrap()
    }

    pub fn groups_of(&self, domain_id: i64) -> Vec<i64> {
        let conn = self.inspect();
        let mut stmt = conn
            .prepare(
                "SELECT group_id FROM domainlist_by_group WHERE domainlist_id = ?1 ORDER BY group_id",
            )
            .unwrap();
        let ids = stmt
            .query_map([domain_id], |row| row.get::<_, i64>(0))
            .unwrap()
            .collect::<rusqlite::Result<Vec<_>>>()
            .unwrap();
        ids
    }

    pub fn membership_count(&self) -> i64 {
        self.inspect()
            .query_row("SELECT COUNT(*) FROM domainlist_by_group", [], |row| row.get(0))
            .unwrap()
    }
}
