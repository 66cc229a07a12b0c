//! CtrGT Store - SQLite persistence layer
//!
//! Provides:
//! - Connection lifecycle and configuration
//! - Idempotent schema bootstrap with checksummed migrations
//! - Generic, registry-driven record repository
//! - Atomic stock movement transaction
//! - Snapshot dump and transactional restore

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod snapshot;
pub mod sql;

// Re-export key types
pub use db::StoreConfig;
pub use errors::Result;
pub use repo::{MovementRepo, RecordRepo};
pub use snapshot::{DumpMode, RestoreAck};
