//! chm-core - Core library for chm
//!
//! This crate provides the migration data model, directory-based migration
//! discovery, statement splitting, and the reconciliation algorithm that
//! decides which migrations are pending.

pub mod checksum;
pub mod error;
pub mod migration;
pub mod reconcile;
pub mod selector;
pub mod source;
pub mod sql_utils;
pub mod statements;

pub use checksum::compute_checksum;
pub use error::{CoreError, CoreResult};
pub use migration::{LedgerEntry, Migration};
pub use reconcile::pending;
pub use selector::MigrationSelector;
pub use source::MigrationSource;
pub use statements::script_to_statements;
