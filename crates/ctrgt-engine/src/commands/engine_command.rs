//! Single-entry command dispatch.
//!
//! An outer request layer (or the CLI) builds an `EngineCommand` and hands
//! it to `apply_engine_command`; results come back as one enum that
//! serializes to the natural JSON shape of each operation.

#![allow(clippy::result_large_err)]

use crate::backend::Backend;
use crate::commands::identity::{PublicUser, RegisterRequest};
use crate::commands::movement::MovementRequest;
use ctrgt_core::model::{Record, Snapshot};
use ctrgt_core_types::Sensitive;
use ctrgt_store::errors::Result;
use ctrgt_store::RestoreAck;
use serde::Serialize;

/// Every operation the backend exposes
#[derive(Debug, Clone)]
pub enum EngineCommand {
    RecordList {
        collection: String,
    },
    RecordCreate {
        collection: String,
        fields: Record,
    },
    RecordUpdate {
        collection: String,
        id: String,
        fields: Record,
    },
    RecordDelete {
        collection: String,
        id: String,
    },
    MovementRecord(MovementRequest),
    SnapshotDump,
    SnapshotRestore(Snapshot),
    UserRegister(RegisterRequest),
    UserAuthenticate {
        username: String,
        password: Sensitive<String>,
    },
}

/// Result of applying an engine command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EngineCommandResult {
    Records(Vec<Record>),
    /// Created, updated, movement or authenticated user record
    Record(Record),
    /// Delete succeeded; carries no body
    Deleted,
    Snapshot(Snapshot),
    Restored(RestoreAck),
    User(PublicUser),
}

/// Apply an engine command against an open backend
///
/// ## Errors
///
/// Whatever the dispatched operation returns.
pub fn apply_engine_command(
    cmd: EngineCommand,
    backend: &mut Backend,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::RecordList { collection } => {
            backend.list(&collection).map(EngineCommandResult::Records)
        }
        EngineCommand::RecordCreate { collection, fields } => backend
            .create(&collection, fields)
            .map(EngineCommandResult::Record),
        EngineCommand::RecordUpdate {
            collection,
            id,
            fields,
        } => backend
            .update(&collection, &id, fields)
            .map(EngineCommandResult::Record),
        EngineCommand::RecordDelete { collection, id } => backend
            .delete(&collection, &id)
            .map(|()| EngineCommandResult::Deleted),
        EngineCommand::MovementRecord(request) => backend
            .record_movement(request)
            .map(EngineCommandResult::Record),
        EngineCommand::SnapshotDump => backend.dump().map(EngineCommandResult::Snapshot),
        EngineCommand::SnapshotRestore(snapshot) => {
            backend.restore(snapshot).map(EngineCommandResult::Restored)
        }
        EngineCommand::UserRegister(request) => {
            backend.register(request).map(EngineCommandResult::User)
        }
        EngineCommand::UserAuthenticate { username, password } => backend
            .authenticate(&username, &password)
            .map(EngineCommandResult::Record),
    }
}
