//! Whole-database export and import
//!
//! - `dump`: read every collection (collection-at-a-time or in one read transaction)
//! - `restore`: replace every supplied collection inside a single write transaction

pub mod dump;
pub mod restore;

pub use dump::{dump_collections, DumpMode};
pub use restore::{replace_collections, RestoreAck};
