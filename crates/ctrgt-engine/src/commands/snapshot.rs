//! Snapshot dump and restore orchestration
//!
//! ## Restore pipeline (in order):
//! 1. Resolve every snapshot key through the registry (hard stop, no writes)
//! 2. Check every row's fields and key against its collection (hard stop, no writes)
//! 3. Drop user ids and fill missing user credentials with the default
//! 4. Replace all supplied collections in one transaction (store)

#![allow(clippy::result_large_err)]

use crate::commands::elapsed_ms;
use ctrgt_core::credentials::{CredentialHasher, DEFAULT_RESTORE_PASSWORD};
use ctrgt_core::errors::{ExError, ExErrorKind};
use ctrgt_core::model::record::ID_FIELD;
use ctrgt_core::model::{FieldValue, Record, Snapshot};
use ctrgt_core::registry::{Entity, EntityRegistry};
use ctrgt_core::{log_op_end, log_op_error, log_op_start};
use ctrgt_store::errors::Result;
use ctrgt_store::snapshot::{dump_collections, replace_collections};
use ctrgt_store::{DumpMode, RestoreAck};
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::time::Instant;

/// Export every collection
///
/// ## Errors
///
/// - `Persistence`: database error
pub fn snapshot_dump(
    conn: &mut Connection,
    registry: &EntityRegistry,
    mode: DumpMode,
) -> Result<Snapshot> {
    log_op_start!("snapshot_dump", dump_mode = ?mode);
    let start = Instant::now();

    let snapshot = dump_collections(conn, registry, mode).map_err(|e| {
        log_op_error!("snapshot_dump", &e, duration_ms = elapsed_ms(start));
        e
    })?;

    log_op_end!(
        "snapshot_dump",
        duration_ms = elapsed_ms(start),
        row_count = snapshot.values().map(Vec::len).sum::<usize>()
    );
    Ok(snapshot)
}

/// Replace the supplied collections with the snapshot's rows
///
/// Collections absent from the snapshot are left untouched.
///
/// ## Errors
///
/// - `Validation`: unknown collection or field, or a row without an `id` in a
///   collection with generated keys (nothing written)
/// - `Persistence`: the replacement failed and was rolled back; the cause is
///   the error's source
pub fn snapshot_restore(
    conn: &mut Connection,
    registry: &EntityRegistry,
    hasher: &dyn CredentialHasher,
    snapshot: Snapshot,
) -> Result<RestoreAck> {
    log_op_start!("snapshot_restore", collection_count = snapshot.len());
    let start = Instant::now();

    let ack = prepare_restore(registry, hasher, snapshot)
        .and_then(|plan| replace_collections(conn, &plan))
        .map_err(|e| {
            log_op_error!("snapshot_restore", &e, duration_ms = elapsed_ms(start));
            e
        })?;

    log_op_end!(
        "snapshot_restore",
        duration_ms = elapsed_ms(start),
        row_count = ack.restored.values().sum::<usize>()
    );
    Ok(ack)
}

/// Validate and normalize a snapshot into registry order
fn prepare_restore(
    registry: &EntityRegistry,
    hasher: &dyn CredentialHasher,
    snapshot: Snapshot,
) -> Result<Vec<(&'static Entity, Vec<Record>)>> {
    let mut by_entity: BTreeMap<&'static str, (&'static Entity, Vec<Record>)> = BTreeMap::new();
    for (key, rows) in snapshot {
        let entity = registry.lookup(&key)?;
        if by_entity.contains_key(entity.name) {
            return Err(ExError::new(ExErrorKind::Validation)
                .with_op("snapshot_restore")
                .with_collection(entity.name)
                .with_message(format!("collection supplied twice (as '{}')", key)));
        }
        for row in &rows {
            entity.check_fields(row)?;
            if !entity.is_store_assigned() && row_key(row).is_none() {
                return Err(ExError::new(ExErrorKind::Validation)
                    .with_op("snapshot_restore")
                    .with_collection(entity.name)
                    .with_message("every restored row needs a non-empty 'id'"));
            }
        }
        by_entity.insert(entity.name, (entity, rows));
    }

    // Hashed once and shared by every user row lacking a credential
    let mut default_credential: Option<String> = None;

    let mut plan = Vec::with_capacity(by_entity.len());
    for entity in registry.entities() {
        let Some((_, mut rows)) = by_entity.remove(entity.name) else {
            continue;
        };
        if entity.is_store_assigned() {
            for row in &mut rows {
                row.remove(ID_FIELD);
            }
        }
        if let Some(field) = entity.credential_field {
            for row in rows.iter_mut().filter(|r| lacks(r, field)) {
                let token = match &default_credential {
                    Some(token) => token.clone(),
                    None => {
                        let token = hasher.hash(DEFAULT_RESTORE_PASSWORD)?;
                        default_credential = Some(token.clone());
                        token
                    }
                };
                row.insert(field, token);
            }
        }
        plan.push((entity, rows));
    }
    Ok(plan)
}

fn row_key(record: &Record) -> Option<String> {
    record
        .get(ID_FIELD)
        .and_then(FieldValue::to_key_string)
        .filter(|id| !id.trim().is_empty())
}

fn lacks(record: &Record, field: &str) -> bool {
    record.get(field).map_or(true, FieldValue::is_null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctrgt_core::registry::{CATEGORIES, USERS};

    struct PlainHasher;

    impl CredentialHasher for PlainHasher {
        fn hash(&self, plaintext: &str) -> ctrgt_core::Result<String> {
            Ok(format!("plain:{}", plaintext))
        }

        fn verify(&self, plaintext: &str, token: &str) -> bool {
            token == format!("plain:{}", plaintext)
        }
    }

    #[test]
    fn test_prepare_orders_by_registry_and_resolves_routes() {
        let registry = EntityRegistry::standard();
        let mut snapshot = Snapshot::new();
        snapshot.insert(USERS.to_string(), vec![]);
        snapshot.insert("movements".to_string(), vec![]);
        snapshot.insert(CATEGORIES.to_string(), vec![]);

        let plan = prepare_restore(&registry, &PlainHasher, snapshot).unwrap();
        let names: Vec<_> = plan.iter().map(|(e, _)| e.name).collect();
        assert_eq!(names, vec![CATEGORIES, "input_and_output_products", USERS]);
    }

    #[test]
    fn test_prepare_drops_user_ids_and_fills_credentials() {
        let registry = EntityRegistry::standard();
        let mut snapshot = Snapshot::new();
        snapshot.insert(
            USERS.to_string(),
            vec![
                Record::new().with("id", 7_i64).with("username", "ana"),
                Record::new()
                    .with("username", "bob")
                    .with("password_hash", "kept"),
            ],
        );

        let plan = prepare_restore(&registry, &PlainHasher, snapshot).unwrap();
        let rows = &plan[0].1;
        assert!(!rows[0].contains_key("id"));
        assert_eq!(
            rows[0].get("password_hash"),
            Some(&FieldValue::from("plain:123456"))
        );
        assert_eq!(rows[1].get("password_hash"), Some(&FieldValue::from("kept")));
    }

    #[test]
    fn test_prepare_rejects_unknown_collection_and_field() {
        let registry = EntityRegistry::standard();

        let mut unknown = Snapshot::new();
        unknown.insert("orders".to_string(), vec![]);
        let err = prepare_restore(&registry, &PlainHasher, unknown).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Validation);

        let mut bad_field = Snapshot::new();
        bad_field.insert(
            CATEGORIES.to_string(),
            vec![Record::new().with("id", "cate_1").with("shade", "red")],
        );
        let err = prepare_restore(&registry, &PlainHasher, bad_field).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Validation);
        assert_eq!(err.collection(), Some(CATEGORIES));
    }

    #[test]
    fn test_prepare_rejects_collection_given_twice() {
        let registry = EntityRegistry::standard();
        let mut snapshot = Snapshot::new();
        snapshot.insert("movements".to_string(), vec![]);
        snapshot.insert("input_and_output_products".to_string(), vec![]);

        let err = prepare_restore(&registry, &PlainHasher, snapshot).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Validation);
    }

    #[test]
    fn test_prepare_requires_ids_for_generated_keys() {
        let registry = EntityRegistry::standard();
        let rows = [
            Record::new().with("name", "no id"),
            Record::new().with("id", FieldValue::Null).with("name", "null id"),
            Record::new().with("id", "  ").with("name", "blank id"),
        ];

        for row in rows {
            let mut snapshot = Snapshot::new();
            snapshot.insert(CATEGORIES.to_string(), vec![row]);
            let err = prepare_restore(&registry, &PlainHasher, snapshot).unwrap_err();
            assert_eq!(err.kind(), ExErrorKind::Validation);
            assert_eq!(err.collection(), Some(CATEGORIES));
        }
    }
}
