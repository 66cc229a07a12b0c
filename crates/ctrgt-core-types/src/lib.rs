//! Core types shared across the CtrGT crates
//!
//! - **Schema constants**: canonical structured-logging field keys and event names
//! - **Sensitive data**: `Sensitive<T>` wrapper that redacts credentials in logs

pub mod schema;
pub mod sensitive;

pub use sensitive::Sensitive;
