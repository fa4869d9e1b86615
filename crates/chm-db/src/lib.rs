//! chm-db - Database abstraction layer for chm
//!
//! This crate provides the `Database` trait and a ClickHouse implementation
//! speaking the HTTP interface.

pub mod clickhouse;
pub mod error;
pub mod settings;
pub mod traits;

pub use clickhouse::ClickHouseBackend;
pub use error::{DbError, DbResult};
pub use settings::DbSettings;
pub use traits::{Database, Row};
