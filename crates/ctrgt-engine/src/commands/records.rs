//! Generic record commands
//!
//! List, create, update and delete for any registry collection. Field sets
//! are checked against the registry before any statement is built.

#![allow(clippy::result_large_err)]

use crate::commands::elapsed_ms;
use ctrgt_core::errors::{ExError, ExErrorKind, RecordError};
use ctrgt_core::ids::{generate_id, now_timestamp};
use ctrgt_core::model::record::ID_FIELD;
use ctrgt_core::model::Record;
use ctrgt_core::registry::{Entity, EntityRegistry};
use ctrgt_core::{log_op_end, log_op_error, log_op_start};
use ctrgt_store::errors::{record_not_found, Result};
use ctrgt_store::RecordRepo;
use rusqlite::Connection;
use std::time::Instant;

/// Every record of a collection
///
/// ## Errors
///
/// - `Validation`: unknown collection
/// - `Persistence`: database error
pub fn record_list(
    conn: &Connection,
    registry: &EntityRegistry,
    collection: &str,
) -> Result<Vec<Record>> {
    log_op_start!("record_list", collection = collection);
    let start = Instant::now();

    let records = registry
        .lookup(collection)
        .map_err(ExError::from)
        .and_then(|entity| RecordRepo::list(conn, entity))
        .map_err(|e| {
            log_op_error!(
                "record_list",
                &e,
                duration_ms = elapsed_ms(start),
                collection = collection
            );
            e
        })?;

    log_op_end!(
        "record_list",
        duration_ms = elapsed_ms(start),
        collection = collection,
        row_count = records.len()
    );
    Ok(records)
}

/// Create a record and return it as stored
///
/// The identifier is always synthesized (or storage-assigned for users), and
/// the creation timestamp is stamped for collections that declare one.
/// Credential columns are only written by registration.
///
/// ## Errors
///
/// - `Validation`: unknown collection or field, a credential column in the
///   field set, or a CHECK/NOT NULL rejection
/// - `Conflict`: uniqueness violation
/// - `Persistence`: database error
pub fn record_create(
    conn: &Connection,
    registry: &EntityRegistry,
    collection: &str,
    fields: Record,
) -> Result<Record> {
    log_op_start!("record_create", collection = collection);
    let start = Instant::now();

    let created = registry
        .lookup(collection)
        .map_err(ExError::from)
        .and_then(|entity| {
            reject_credential(entity, &fields)?;
            create_impl(conn, entity, fields)
        })
        .map_err(|e| {
            log_op_error!(
                "record_create",
                &e,
                duration_ms = elapsed_ms(start),
                collection = collection
            );
            e
        })?;

    let created_id = created.id();
    log_op_end!(
        "record_create",
        duration_ms = elapsed_ms(start),
        collection = collection,
        record_id = created_id.as_deref()
    );
    Ok(created)
}

pub(crate) fn create_impl(conn: &Connection, entity: &Entity, fields: Record) -> Result<Record> {
    entity.check_fields(&fields)?;
    let record = prepare_new(entity, fields);

    let rowid = RecordRepo::insert(conn, entity, &record)?;

    if !entity.is_store_assigned() {
        return Ok(record);
    }

    // Storage-assigned keys and column defaults are only known after the insert
    RecordRepo::get_by_rowid(conn, entity, rowid)?.ok_or_else(|| {
        ExError::new(ExErrorKind::Persistence)
            .with_op("record_create")
            .with_collection(entity.name)
            .with_record_id(rowid.to_string())
            .with_message("inserted row could not be read back")
    })
}

fn reject_credential(entity: &Entity, fields: &Record) -> Result<()> {
    match entity.credential_field {
        Some(field) if fields.contains_key(field) => Err(RecordError::CredentialField {
            collection: entity.name.to_string(),
            field: field.to_string(),
        }
        .into()),
        _ => Ok(()),
    }
}

/// Replace any caller-supplied id and stamp the creation time
fn prepare_new(entity: &Entity, mut fields: Record) -> Record {
    fields.remove(ID_FIELD);
    if let Some(prefix) = entity.id_prefix() {
        fields.insert(ID_FIELD, generate_id(prefix));
    }
    if let Some(created_at) = entity.created_at_field {
        fields.insert(created_at, now_timestamp());
    }
    fields
}

/// Rewrite the supplied fields of one record
///
/// Returns the submitted fields merged with `id`; the row is not re-read.
///
/// ## Errors
///
/// - `Validation`: unknown collection or field, empty field set, `id` in the
///   field set, or a collection that does not expose update
/// - `NotFound`: no record has `id`
/// - `Persistence`: database error
pub fn record_update(
    conn: &Connection,
    registry: &EntityRegistry,
    collection: &str,
    id: &str,
    fields: Record,
) -> Result<Record> {
    log_op_start!("record_update", collection = collection, record_id = id);
    let start = Instant::now();

    let updated = update_impl(conn, registry, collection, id, fields).map_err(|e| {
        log_op_error!(
            "record_update",
            &e,
            duration_ms = elapsed_ms(start),
            collection = collection,
            record_id = id
        );
        e
    })?;

    log_op_end!(
        "record_update",
        duration_ms = elapsed_ms(start),
        collection = collection,
        record_id = id
    );
    Ok(updated)
}

fn update_impl(
    conn: &Connection,
    registry: &EntityRegistry,
    collection: &str,
    id: &str,
    fields: Record,
) -> Result<Record> {
    let entity = registry.lookup(collection)?;
    if !entity.updatable {
        return Err(not_exposed(entity, "update"));
    }
    if fields.is_empty() {
        return Err(RecordError::EmptyUpdate {
            collection: entity.name.to_string(),
        }
        .into());
    }
    if fields.contains_key(ID_FIELD) {
        return Err(ExError::from(RecordError::ImmutableId)
            .with_collection(entity.name)
            .with_record_id(id));
    }
    entity.check_fields(&fields)?;

    let changed = RecordRepo::update(conn, entity, id, &fields)?;
    if changed == 0 {
        return Err(record_not_found("record_update", entity.name, id));
    }

    Ok(fields.with(ID_FIELD, id))
}

/// Delete one record
///
/// ## Errors
///
/// - `Validation`: unknown collection, or a collection that does not expose delete
/// - `NotFound`: no record has `id`
/// - `Persistence`: database error
pub fn record_delete(
    conn: &Connection,
    registry: &EntityRegistry,
    collection: &str,
    id: &str,
) -> Result<()> {
    log_op_start!("record_delete", collection = collection, record_id = id);
    let start = Instant::now();

    delete_impl(conn, registry, collection, id).map_err(|e| {
        log_op_error!(
            "record_delete",
            &e,
            duration_ms = elapsed_ms(start),
            collection = collection,
            record_id = id
        );
        e
    })?;

    log_op_end!(
        "record_delete",
        duration_ms = elapsed_ms(start),
        collection = collection,
        record_id = id
    );
    Ok(())
}

fn delete_impl(
    conn: &Connection,
    registry: &EntityRegistry,
    collection: &str,
    id: &str,
) -> Result<()> {
    let entity = registry.lookup(collection)?;
    if !entity.deletable {
        return Err(not_exposed(entity, "delete"));
    }

    match RecordRepo::delete(conn, entity, id)? {
        0 => Err(record_not_found("record_delete", entity.name, id)),
        _ => Ok(()),
    }
}

fn not_exposed(entity: &Entity, op: &str) -> ExError {
    RecordError::OperationNotExposed {
        collection: entity.name.to_string(),
        op: op.to_string(),
    }
    .into()
}
