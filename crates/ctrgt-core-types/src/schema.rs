//! Canonical schema constants for structured logging
//!
//! Every `log_op_*!` event carries these keys so log consumers can filter
//! on them without knowing which crate emitted the line.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Record addressing
pub const FIELD_COLLECTION: &str = "collection";
pub const FIELD_RECORD_ID: &str = "record_id";
pub const FIELD_ROW_COUNT: &str = "row_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
