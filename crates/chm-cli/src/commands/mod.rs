//! Command implementations

pub mod applied;
pub mod common;
pub mod migrate;
