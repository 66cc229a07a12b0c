//! CtrGT Engine - Orchestration layer
//!
//! Validates and prepares requests with core domain logic, runs them
//! through the store, and owns lifecycle logging for every operation.
//! `Backend` is the façade an outer request layer or the CLI holds.

pub mod backend;
pub mod commands;

pub use backend::Backend;
pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use commands::identity::{PublicUser, RegisterRequest};
pub use commands::movement::MovementRequest;
