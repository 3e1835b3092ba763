//! Error types for gravity-core
//!
//! Centralized error handling using `thiserror` for ergonomic error definitions.
//! Lookup failures (nothing matched, unknown group, ...) are ordinary outcomes
//! of a command and are told apart from storage failures by [`Error::is_lookup`].

use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::model::ListSelection;

/// What a lookup was searching for, used to phrase lookup failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// A literal domain or regex pattern
    Pattern(String),
    /// A set of domain-list ids
    Ids(BTreeSet<i64>),
    /// The members of a named group
    Group(String),
}

impl Subject {
    fn verb(&self) -> &'static str {
        match self {
            Self::Pattern(_) => "is",
            Self::Ids(ids) if ids.len() == 1 => "is",
            Self::Ids(_) | Self::Group(_) => "are",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(pattern) => f.write_str(pattern),
            Self::Ids(ids) => {
                let joined = ids
                    .iter()
                    .map(|id| format!("#{id}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                if ids.len() == 1 {
                    write!(f, "Domain {joined}")
                } else {
                    write!(f, "Domains {joined}")
                }
            }
            Self::Group(name) => write!(f, "Domains in group {name}"),
        }
    }
}

/// Main error type for gravity-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// No domain-list entry matched the lookup
    #[error("{subject} {} not in domain list", .subject.verb())]
    DomainNotFound {
        /// What was looked up
        subject: Subject,
    },

    /// Entries matched, but none of them is on the requested list type
    #[error("{subject} {} not {}", .subject.verb(), .selection.missing_phrase())]
    DomainNotInRequestedLists {
        /// What was looked up
        subject: Subject,
        /// The list types that were asked for
        selection: ListSelection,
    },

    /// No group carries the given name
    #[error("{name} is not a valid group name")]
    UnknownGroup {
        /// Requested group name
        name: String,
    },

    /// The group exists but has no members
    #[error("No domains are in group {name}")]
    EmptyGroup {
        /// Group name
        name: String,
    },

    /// Two groups share one name, so a name lookup would be ambiguous
    #[error("Group name '{name}' is ambiguous: used by groups #{first} and #{second}")]
    DuplicateGroupName {
        /// The shared name
        name: String,
        /// Id of the first group seen with this name
        first: i64,
        /// Id of the second group seen with this name
        second: i64,
    },

    /// A command parameter failed validation
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Error message
        message: String,
    },

    /// SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path to the missing config file
        path: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    ConfigValue {
        /// Configuration key
        key: String,
        /// Error message
        message: String,
    },

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid parameter error
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    /// Create a config value error
    pub fn config_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValue {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Whether this is a lookup failure rather than a storage or usage failure.
    ///
    /// Lookup failures are reported to the user and end the command without
    /// an error status. Nothing has been written when one is returned.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            Self::DomainNotFound { .. }
                | Self::DomainNotInRequestedLists { .. }
                | Self::UnknownGroup { .. }
                | Self::EmptyGroup { .. }
                | Self::DuplicateGroupName { .. }
        )
    }
}
