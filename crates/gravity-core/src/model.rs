//! Domain-list rows, groups, and the selectors applied to them

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Which list a domain-list entry belongs to
///
/// Stored as the integer `type` column of `domainlist`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// Exact domain on the allow list
    WhitelistExact,
    /// Exact domain on the deny list
    BlacklistExact,
    /// Regex on the allow list
    WhitelistRegex,
    /// Regex on the deny list
    BlacklistRegex,
}

impl ListKind {
    /// All kinds in storage order
    pub const ALL: [ListKind; 4] = [
        ListKind::WhitelistExact,
        ListKind::BlacklistExact,
        ListKind::WhitelistRegex,
        ListKind::BlacklistRegex,
    ];

    /// Integer code used in the database
    pub fn code(self) -> i64 {
        match self {
            Self::WhitelistExact => 0,
            Self::BlacklistExact => 1,
            Self::WhitelistRegex => 2,
            Self::BlacklistRegex => 3,
        }
    }

    /// Short name: `white`, `black`, `white_re` or `black_re`
    pub fn short_name(self) -> &'static str {
        match self {
            Self::WhitelistExact => "white",
            Self::BlacklistExact => "black",
            Self::WhitelistRegex => "white_re",
            Self::BlacklistRegex => "black_re",
        }
    }

    /// Whether this is one of the allow-list variants
    pub fn is_white(self) -> bool {
        matches!(self, Self::WhitelistExact | Self::WhitelistRegex)
    }

    /// Whether this is one of the deny-list variants
    pub fn is_black(self) -> bool {
        matches!(self, Self::BlacklistExact | Self::BlacklistRegex)
    }

    /// Whether the pattern is a regular expression
    pub fn is_regex(self) -> bool {
        matches!(self, Self::WhitelistRegex | Self::BlacklistRegex)
    }
}

impl TryFrom<i64> for ListKind {
    type Error = i64;

    fn try_from(code: i64) -> std::result::Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::WhitelistExact),
            1 => Ok(Self::BlacklistExact),
            2 => Ok(Self::WhitelistRegex),
            3 => Ok(Self::BlacklistRegex),
            other => Err(other),
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromSql for ListKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = i64::column_result(value)?;
        Self::try_from(code).map_err(FromSqlError::OutOfRange)
    }
}

impl ToSql for ListKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

/// One row of `domainlist`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    /// Row id, stable for the lifetime of the entry
    pub id: i64,
    /// List the entry belongs to
    pub kind: ListKind,
    /// Literal domain or regex source text
    pub pattern: String,
    /// Whether the entry is active
    pub enabled: bool,
    /// Free-form comment; `None` when the column is NULL
    pub comment: Option<String>,
}

/// One row of `"group"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Row id
    pub id: i64,
    /// Whether the group is active
    pub enabled: bool,
    /// Group name
    pub name: String,
    /// Free-form description; `None` when the column is NULL
    pub comment: Option<String>,
}

/// Which list types a command operates on
///
/// Built from the `-b`/`-w` flag pair with [`ListSelection::from_flags`].
/// Supplying neither flag selects both lists; supplying only `-b` turns the
/// whitelist branch off, and supplying only `-w` turns the blacklist branch off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSelection {
    /// Blacklist entries are processed
    pub want_black: bool,
    /// Whitelist entries are processed
    pub want_white: bool,
}

impl Default for ListSelection {
    fn default() -> Self {
        Self::ALL
    }
}

impl ListSelection {
    /// Both lists
    pub const ALL: ListSelection = ListSelection {
        want_black: true,
        want_white: true,
    };

    /// Build a selection from the `-b` (blacklist only) and `-w`
    /// (whitelist only) command-line flags.
    pub fn from_flags(blacklist_flag: bool, whitelist_flag: bool) -> Self {
        if !blacklist_flag && !whitelist_flag {
            return Self::ALL;
        }
        Self {
            want_black: blacklist_flag,
            want_white: whitelist_flag,
        }
    }

    /// Whether an entry of `kind` survives narrowing.
    ///
    /// The blacklist branch is checked first: with `want_black` off only
    /// whitelist kinds pass, whatever `want_white` says.
    pub fn accepts(&self, kind: ListKind) -> bool {
        if !self.want_black {
            kind.is_white()
        } else if !self.want_white {
            kind.is_black()
        } else {
            true
        }
    }

    /// Phrase used when narrowing leaves nothing
    pub fn missing_phrase(&self) -> &'static str {
        if !self.want_black {
            "whitelisted"
        } else if !self.want_white {
            "blacklisted"
        } else {
            "in domain list"
        }
    }
}

/// What to do with the `enabled` flag of the selected entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    /// Set `enabled = true`
    Enable,
    /// Set `enabled = false`
    Disable,
    /// Flip each entry
    Toggle,
}

impl ToggleAction {
    /// Target state, or `None` when every entry is flipped
    pub fn target(self) -> Option<bool> {
        match self {
            Self::Enable => Some(true),
            Self::Disable => Some(false),
            Self::Toggle => None,
        }
    }

    /// Past-tense verb for summaries
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Enable => "enabled",
            Self::Disable => "disabled",
            Self::Toggle => "toggled",
        }
    }
}

impl FromStr for ToggleAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "e" | "enable" => Ok(Self::Enable),
            "d" | "disable" => Ok(Self::Disable),
            "t" | "toggle" => Ok(Self::Toggle),
            _ => Err(Error::invalid_parameter(
                "toggle",
                format!("expected enable, disable or toggle, got '{s}'"),
            )),
        }
    }
}

impl fmt::Display for ToggleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Enable => "enable",
            Self::Disable => "disable",
            Self::Toggle => "toggle",
        })
    }
}
