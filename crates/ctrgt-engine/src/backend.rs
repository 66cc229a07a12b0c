//! Backend façade
//!
//! Owns the one SQLite connection, the entity registry and the credential
//! hasher for its whole lifetime. Opened explicitly with a `StoreConfig` and
//! closed explicitly so close errors are not lost on drop.

#![allow(clippy::result_large_err)]

use crate::commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
use crate::commands::identity::{user_authenticate, user_register, PublicUser, RegisterRequest};
use crate::commands::movement::{record_movement, MovementRequest};
use crate::commands::records::{record_create, record_delete, record_list, record_update};
use crate::commands::snapshot::{snapshot_dump, snapshot_restore};
use ctrgt_core::credentials::{Argon2Hasher, CredentialHasher};
use ctrgt_core::model::{Record, Snapshot};
use ctrgt_core::registry::EntityRegistry;
use ctrgt_core_types::Sensitive;
use ctrgt_store::db::{self, StoreConfig};
use ctrgt_store::errors::Result;
use ctrgt_store::{DumpMode, RestoreAck};
use rusqlite::Connection;

pub struct Backend {
    conn: Connection,
    registry: EntityRegistry,
    hasher: Box<dyn CredentialHasher>,
    dump_mode: DumpMode,
}

impl Backend {
    /// Open storage per `config` with the default argon2id hasher
    pub fn open(config: &StoreConfig) -> Result<Self> {
        Self::open_with_hasher(config, Box::new(Argon2Hasher::new()))
    }

    pub fn open_with_hasher(
        config: &StoreConfig,
        hasher: Box<dyn CredentialHasher>,
    ) -> Result<Self> {
        let conn = db::open(config)?;
        Ok(Self {
            conn,
            registry: EntityRegistry::standard(),
            hasher,
            dump_mode: config.dump_mode,
        })
    }

    /// Release the connection, reporting any error SQLite raises on close
    pub fn close(self) -> Result<()> {
        db::close(self.conn)
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// The underlying connection, for inspection and fault injection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn list(&self, collection: &str) -> Result<Vec<Record>> {
        record_list(&self.conn, &self.registry, collection)
    }

    pub fn create(&self, collection: &str, fields: Record) -> Result<Record> {
        record_create(&self.conn, &self.registry, collection, fields)
    }

    pub fn update(&self, collection: &str, id: &str, fields: Record) -> Result<Record> {
        record_update(&self.conn, &self.registry, collection, id, fields)
    }

    pub fn delete(&self, collection: &str, id: &str) -> Result<()> {
        record_delete(&self.conn, &self.registry, collection, id)
    }

    pub fn record_movement(&mut self, request: MovementRequest) -> Result<Record> {
        record_movement(&mut self.conn, &self.registry, request)
    }

    pub fn dump(&mut self) -> Result<Snapshot> {
        snapshot_dump(&mut self.conn, &self.registry, self.dump_mode)
    }

    pub fn restore(&mut self, snapshot: Snapshot) -> Result<RestoreAck> {
        snapshot_restore(
            &mut self.conn,
            &self.registry,
            self.hasher.as_ref(),
            snapshot,
        )
    }

    pub fn register(&self, request: RegisterRequest) -> Result<PublicUser> {
        user_register(&self.conn, &self.registry, self.hasher.as_ref(), request)
    }

    pub fn authenticate(&self, username: &str, password: &Sensitive<String>) -> Result<Record> {
        user_authenticate(
            &self.conn,
            &self.registry,
            self.hasher.as_ref(),
            username,
            password,
        )
    }

    pub fn apply(&mut self, cmd: EngineCommand) -> Result<EngineCommandResult> {
        apply_engine_command(cmd, self)
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("dump_mode", &self.dump_mode)
            .finish_non_exhaustive()
    }
}
