//! # gravity-core
//!
//! Filter and bulk-update engine for the Pi-hole gravity database.
//!
//! ## Architecture
//!
//! This crate provides:
//! - **Repository** - Read access to domain-list entries, groups and memberships
//! - **Filter engine** - Selection by pattern, id or group, narrowed by list type
//! - **Mutator** - Transactional enable-toggles and group reassignment
//! - **Operations** - The `toggle-domain`, `toggle-group` and `update-group` flows
//! - **Configuration** - Database path discovery and TOML settings
//!
//! ## Example
//!
//! ```rust,no_run
//! use gravity_core::{Config, GravityDb, ListSelection, ToggleAction};
//! use gravity_core::ops::{toggle_domain, ToggleDomainParams};
//!
//! let config = Config::default();
//! let mut db = GravityDb::open_with_config(&config)?;
//!
//! let params = ToggleDomainParams::new(
//!     "ads.example.com",
//!     ToggleAction::Toggle,
//!     ListSelection::from_flags(true, false),
//! )?;
//! let outcome = toggle_domain(&mut db, &params)?;
//! println!("{} entries changed", outcome.changed.len());
//! # Ok::<(), gravity_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod mutator;
pub mod ops;
pub mod repository;

// Re-exports for convenience
pub use config::Config;
pub use error::{Error, Result};
pub use model::{DomainEntry, Group, ListKind, ListSelection, ToggleAction};
pub use repository::{GravityDb, Repository};
