//! Stock movement command
//!
//! Validates the request, builds the ledger row and hands both the stock
//! delta and the row to the store's single-transaction movement write.

#![allow(clippy::result_large_err)]

use crate::commands::elapsed_ms;
use ctrgt_core::errors::RecordError;
use ctrgt_core::ids::{generate_id, now_timestamp};
use ctrgt_core::model::record::ID_FIELD;
use ctrgt_core::model::{FieldValue, Record};
use ctrgt_core::registry::{
    Entity, EntityRegistry, MOVEMENT_DATE_FIELD, MOVEMENT_DIRECTION_FIELD, MOVEMENT_PRODUCT_FIELD,
    MOVEMENT_QTY_FIELD,
};
use ctrgt_core::{log_op_end, log_op_error, log_op_start};
use ctrgt_store::errors::Result;
use ctrgt_store::MovementRepo;
use rusqlite::Connection;
use std::time::Instant;

/// Identifier prefix for rows written by `record_movement`
pub const MOVEMENT_ID_PREFIX: &str = "move";

/// Direction that adds to stock; every other direction subtracts
pub const DIRECTION_INPUT: &str = "input";

/// A request to move stock in or out of one inventory item
#[derive(Debug, Clone, PartialEq)]
pub struct MovementRequest {
    pub product_id: String,
    pub quantity: i64,
    pub direction: String,
    /// Additional ledger columns (`destination`, `value`, `date`)
    pub extra: Record,
}

impl MovementRequest {
    pub fn new(product_id: impl Into<String>, quantity: i64, direction: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            direction: direction.into(),
            extra: Record::new(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.extra.insert(field, value);
        self
    }

    /// Split a raw payload into the required fields and the extra columns
    ///
    /// `qty` may arrive as an integral number or a numeric string.
    pub fn from_record(mut record: Record) -> std::result::Result<Self, RecordError> {
        let product_id = take_text(&mut record, MOVEMENT_PRODUCT_FIELD)?;
        let direction = take_text(&mut record, MOVEMENT_DIRECTION_FIELD)?;

        let qty = record
            .remove(MOVEMENT_QTY_FIELD)
            .filter(|v| !v.is_null())
            .ok_or_else(|| RecordError::MissingField {
                field: MOVEMENT_QTY_FIELD.to_string(),
            })?;
        let quantity = qty.as_integer().ok_or_else(|| RecordError::InvalidQuantity {
            value: serde_json::Value::from(qty.clone()).to_string(),
        })?;

        Ok(Self {
            product_id,
            quantity,
            direction,
            extra: record,
        })
    }

    /// Signed stock change this movement applies
    pub fn delta(&self) -> i64 {
        if self.direction == DIRECTION_INPUT {
            self.quantity
        } else {
            -self.quantity
        }
    }

    fn validate(&self, movements: &Entity) -> std::result::Result<(), RecordError> {
        if self.product_id.trim().is_empty() {
            return Err(RecordError::MissingField {
                field: MOVEMENT_PRODUCT_FIELD.to_string(),
            });
        }
        if self.direction.trim().is_empty() {
            return Err(RecordError::MissingField {
                field: MOVEMENT_DIRECTION_FIELD.to_string(),
            });
        }
        if self.quantity <= 0 {
            return Err(RecordError::InvalidQuantity {
                value: self.quantity.to_string(),
            });
        }
        movements.check_fields(&self.extra)
    }

    /// Ledger row: extra columns, then the required fields and a fresh id
    fn to_row(&self) -> Record {
        let mut row = self.extra.clone();
        row.insert(ID_FIELD, generate_id(MOVEMENT_ID_PREFIX));
        row.insert(MOVEMENT_PRODUCT_FIELD, self.product_id.as_str());
        row.insert(MOVEMENT_QTY_FIELD, self.quantity);
        row.insert(MOVEMENT_DIRECTION_FIELD, self.direction.as_str());
        if row.get(MOVEMENT_DATE_FIELD).map_or(true, FieldValue::is_null) {
            row.insert(MOVEMENT_DATE_FIELD, now_timestamp());
        }
        row
    }
}

fn take_text(record: &mut Record, field: &str) -> std::result::Result<String, RecordError> {
    record
        .remove(field)
        .and_then(|v| v.to_key_string())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| RecordError::MissingField {
            field: field.to_string(),
        })
}

/// Adjust stock and append the movement ledger row atomically
///
/// ## Returns
///
/// The inserted movement row
///
/// ## Errors
///
/// - `Validation`: missing product/direction, non-positive quantity, unknown field
/// - `NotFound`: no inventory item has `product_id` (nothing written)
/// - `Conflict` / `Persistence`: ledger insert failed (stock change rolled back)
pub fn record_movement(
    conn: &mut Connection,
    registry: &EntityRegistry,
    request: MovementRequest,
) -> Result<Record> {
    log_op_start!(
        "record_movement",
        product_id = request.product_id.as_str(),
        direction = request.direction.as_str()
    );
    let start = Instant::now();

    let row = record_movement_impl(conn, registry, &request).map_err(|e| {
        log_op_error!(
            "record_movement",
            &e,
            duration_ms = elapsed_ms(start),
            product_id = request.product_id.as_str()
        );
        e
    })?;

    let movement_id = row.id();
    log_op_end!(
        "record_movement",
        duration_ms = elapsed_ms(start),
        product_id = request.product_id.as_str(),
        record_id = movement_id.as_deref()
    );
    Ok(row)
}

fn record_movement_impl(
    conn: &mut Connection,
    registry: &EntityRegistry,
    request: &MovementRequest,
) -> Result<Record> {
    request.validate(registry.movements())?;

    let row = request.to_row();
    MovementRepo::apply(
        conn,
        registry.inventory(),
        registry.movements(),
        &request.product_id,
        request.delta(),
        &row,
    )?;
    Ok(row)
}
