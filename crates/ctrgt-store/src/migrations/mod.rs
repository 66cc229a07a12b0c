//! Schema bootstrap
//!
//! - Embedded SQL, applied once at open
//! - Idempotent: every statement is create-if-absent and applied ids are recorded
//! - Checksums detect an embedded script edited after it was applied

mod checksums;
mod embedded;
mod runner;

pub use runner::{applied_migrations, apply_migrations};
