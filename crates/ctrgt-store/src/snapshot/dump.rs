//! Snapshot dump

use crate::errors::{from_rusqlite, Result};
use crate::repo::records::RecordRepo;
use ctrgt_core::model::Snapshot;
use ctrgt_core::registry::EntityRegistry;
use rusqlite::{Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};

/// Read consistency of a dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DumpMode {
    /// Each collection is read on its own; concurrent writers may land
    /// between reads
    #[default]
    CollectionAtATime,
    /// All collections are read inside one deferred transaction
    SingleTransaction,
}

/// Read every registered collection
///
/// Users are projected without the credential column, like every other read.
pub fn dump_collections(
    conn: &mut Connection,
    registry: &EntityRegistry,
    mode: DumpMode,
) -> Result<Snapshot> {
    match mode {
        DumpMode::CollectionAtATime => read_all(conn, registry),
        DumpMode::SingleTransaction => {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Deferred)
                .map_err(from_rusqlite)?;
            let snapshot = read_all(&tx, registry)?;
            tx.commit().map_err(from_rusqlite)?;
            Ok(snapshot)
        }
    }
}

fn read_all(conn: &Connection, registry: &EntityRegistry) -> Result<Snapshot> {
    let mut snapshot = Snapshot::new();
    for entity in registry.entities() {
        let records = RecordRepo::list(conn, entity)?;
        snapshot.insert(entity.name.to_string(), records);
    }
    Ok(snapshot)
}
