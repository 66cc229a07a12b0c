//! CtrGT Core - storage-agnostic domain layer
//!
//! This crate provides the building blocks shared by the store and engine:
//! - Canonical error facility (`ExError`, `ExErrorKind`)
//! - Structured logging facility and macros
//! - Dynamic records (`Record`, `FieldValue`)
//! - Entity registry describing the five collections
//! - Identifier/timestamp synthesis
//! - Pluggable credential hashing

pub mod credentials;
pub mod errors;
pub mod ids;
pub mod logging_facility;
pub mod model;
pub mod registry;

pub use ctrgt_core_types as core_types;

// Re-export commonly used types
pub use credentials::{Argon2Hasher, CredentialHasher};
pub use errors::{ExError, ExErrorKind, RecordError, Result};
pub use model::{FieldValue, Record, Snapshot};
pub use registry::{Entity, EntityRegistry, IdPolicy};
