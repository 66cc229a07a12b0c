//! Command orchestration layer.
//!
//! Each public function wraps one operation with boundary logging and
//! delegates to an `_impl` that does the work.
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` for internal details.

pub mod engine_command;
pub mod identity;
pub mod movement;
pub mod records;
pub mod snapshot;

/// Milliseconds elapsed since `start`, for `duration_ms` fields
pub(crate) fn elapsed_ms(start: std::time::Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
