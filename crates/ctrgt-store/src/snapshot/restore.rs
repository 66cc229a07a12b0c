//! Snapshot restore
//!
//! The caller supplies prepared rows per collection (validated, user ids
//! dropped, credentials filled). This module only guarantees the
//! all-or-nothing replacement.

use crate::errors::{from_rusqlite, transaction_failed, Result};
use crate::repo::movements::rollback;
use crate::repo::records::RecordRepo;
use ctrgt_core::model::Record;
use ctrgt_core::registry::Entity;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Acknowledgement of a completed restore
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreAck {
    pub message: String,
    /// Rows inserted per collection storage name
    pub restored: BTreeMap<String, usize>,
}

/// Replace the contents of each listed collection, in the given order
///
/// Every collection is emptied and refilled inside one transaction. Any
/// failure rolls back all deletions and insertions and is reported as
/// `Persistence`, with the underlying error as its source.
pub fn replace_collections(
    conn: &mut Connection,
    plan: &[(&Entity, Vec<Record>)],
) -> Result<RestoreAck> {
    let tx = conn
        .transaction()
        .map_err(|e| transaction_failed("restore", from_rusqlite(e)))?;

    let mut restored = BTreeMap::new();
    for (entity, rows) in plan {
        if let Err(err) = RecordRepo::delete_all(&tx, entity) {
            return Err(transaction_failed("restore", rollback(tx, err)));
        }
        for row in rows {
            if let Err(err) = RecordRepo::insert(&tx, entity, row) {
                let cause = match row.id() {
                    Some(id) => err.with_record_id(id),
                    None => err,
                };
                return Err(transaction_failed("restore", rollback(tx, cause)));
            }
        }
        tracing::debug!(
            collection = entity.name,
            row_count = rows.len(),
            "Replaced collection"
        );
        restored.insert(entity.name.to_string(), rows.len());
    }

    tx.commit()
        .map_err(|e| transaction_failed("restore", from_rusqlite(e)))?;

    Ok(RestoreAck {
        message: "Restored successfully".to_string(),
        restored,
    })
}
