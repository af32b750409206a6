//! Database management for the sync system.
//!
//! Creates the `employee` table through embedded SQLx migrations.

pub mod migration;

pub use migration::{initialize, reset_table};
