//! Stock movement persistence
//!
//! Adjusting stock and appending the ledger row happen in one transaction:
//! a movement row exists if and only if its stock delta was applied.

use crate::errors::{from_rusqlite, record_not_found, Result};
use crate::repo::records::RecordRepo;
use crate::sql::quote_ident;
use ctrgt_core::model::record::ID_FIELD;
use ctrgt_core::model::Record;
use ctrgt_core::registry::{Entity, STOCK_FIELD};
use ctrgt_core::ExError;
use rusqlite::{Connection, Transaction};

pub struct MovementRepo;

impl MovementRepo {
    /// Add `delta` to the product's stock and insert `movement`
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no inventory row has `product_id` (nothing written)
    /// - any insert failure, after the stock update has been rolled back
    pub fn apply(
        conn: &mut Connection,
        inventory: &Entity,
        movements: &Entity,
        product_id: &str,
        delta: i64,
        movement: &Record,
    ) -> Result<()> {
        let tx = conn.transaction().map_err(from_rusqlite)?;

        let sql = format!(
            "UPDATE {table} SET {stock} = {stock} + ?1 WHERE {id} = ?2",
            table = quote_ident(inventory.name),
            stock = quote_ident(STOCK_FIELD),
            id = quote_ident(ID_FIELD)
        );
        let changed = match tx.execute(&sql, rusqlite::params![delta, product_id]) {
            Ok(n) => n,
            Err(e) => return Err(rollback(tx, from_rusqlite(e))),
        };

        if changed == 0 {
            return Err(rollback(
                tx,
                record_not_found("record_movement", inventory.name, product_id),
            ));
        }

        if let Err(err) = RecordRepo::insert(&tx, movements, movement) {
            return Err(rollback(tx, err));
        }

        tx.commit().map_err(from_rusqlite)?;

        tracing::debug!(
            product_id,
            delta,
            movement_id = ?movement.id(),
            "Recorded stock movement"
        );
        Ok(())
    }
}

/// Roll back and hand back the error that caused it
///
/// A failed rollback is logged; the original cause is what the caller sees.
pub(crate) fn rollback(tx: Transaction<'_>, cause: ExError) -> ExError {
    if let Err(e) = tx.rollback() {
        tracing::error!(error = %e, cause = %cause, "Rollback failed");
    }
    cause
}
