//! Generic record persistence
//!
//! Every function takes the `Entity` describing the target table. Callers
//! are expected to have checked record fields against the entity first;
//! the repo re-checks so that no unknown name can reach statement text.

use crate::errors::{from_rusqlite, Result};
use crate::sql::{column_list, placeholders, query_records, quote_ident, SqlParam};
use ctrgt_core::model::record::ID_FIELD;
use ctrgt_core::model::{FieldValue, Record};
use ctrgt_core::registry::Entity;
use ctrgt_core::ExError;
use rusqlite::{params_from_iter, Connection};

/// SQLite repository for registry-described collections
pub struct RecordRepo;

impl RecordRepo {
    /// Every row of the collection, credential column excluded
    pub fn list(conn: &Connection, entity: &Entity) -> Result<Vec<Record>> {
        let sql = format!(
            "SELECT {} FROM {}",
            column_list(entity.public_columns()),
            quote_ident(entity.name)
        );
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let records =
            query_records(&mut stmt, rusqlite::params![]).map_err(from_rusqlite)?;

        tracing::debug!(
            collection = entity.name,
            row_count = records.len(),
            "Listed records"
        );
        Ok(records)
    }

    /// Insert one row and return SQLite's rowid for it
    pub fn insert(conn: &Connection, entity: &Entity, record: &Record) -> Result<i64> {
        entity.check_fields(record).map_err(ExError::from)?;

        let sql = if record.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", quote_ident(entity.name))
        } else {
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_ident(entity.name),
                column_list(record.keys().map(String::as_str)),
                placeholders(record.len())
            )
        };

        conn.execute(&sql, params_from_iter(record.iter().map(|(_, v)| SqlParam(v))))
            .map_err(|e| from_rusqlite(e).with_collection(entity.name))?;

        Ok(conn.last_insert_rowid())
    }

    /// Rewrite the given fields on the row matching `id`; returns rows affected
    pub fn update(conn: &Connection, entity: &Entity, id: &str, fields: &Record) -> Result<usize> {
        entity.check_fields(fields).map_err(ExError::from)?;

        let assignments = fields
            .keys()
            .enumerate()
            .map(|(i, column)| format!("{} = ?{}", quote_ident(column), i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            quote_ident(entity.name),
            assignments,
            quote_ident(ID_FIELD),
            fields.len() + 1
        );

        let id_value = FieldValue::from(id);
        let params = fields
            .iter()
            .map(|(_, v)| SqlParam(v))
            .chain(std::iter::once(SqlParam(&id_value)));

        conn.execute(&sql, params_from_iter(params))
            .map_err(|e| {
                from_rusqlite(e)
                    .with_collection(entity.name)
                    .with_record_id(id)
            })
    }

    /// Delete the row matching `id`; returns rows affected
    pub fn delete(conn: &Connection, entity: &Entity, id: &str) -> Result<usize> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?1",
            quote_ident(entity.name),
            quote_ident(ID_FIELD)
        );
        conn.execute(&sql, [id]).map_err(|e| {
            from_rusqlite(e)
                .with_collection(entity.name)
                .with_record_id(id)
        })
    }

    /// Delete every row; returns rows affected
    pub fn delete_all(conn: &Connection, entity: &Entity) -> Result<usize> {
        let sql = format!("DELETE FROM {}", quote_ident(entity.name));
        conn.execute(&sql, [])
            .map_err(|e| from_rusqlite(e).with_collection(entity.name))
    }

    /// First row whose `column` equals `value`, all columns included
    ///
    /// This is the one read that returns the credential column; it exists
    /// for credential verification and must not be handed to callers as is.
    pub fn find_by(
        conn: &Connection,
        entity: &Entity,
        column: &str,
        value: &FieldValue,
    ) -> Result<Option<Record>> {
        let probe = Record::new().with(column, value.clone());
        entity.check_fields(&probe).map_err(ExError::from)?;

        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1 LIMIT 1",
            column_list(entity.fields.iter().copied()),
            quote_ident(entity.name),
            quote_ident(column)
        );
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let mut records =
            query_records(&mut stmt, rusqlite::params![SqlParam(value)]).map_err(from_rusqlite)?;
        Ok(records.pop())
    }

    /// Row with the given storage-assigned rowid, public columns only
    pub fn get_by_rowid(conn: &Connection, entity: &Entity, rowid: i64) -> Result<Option<Record>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE rowid = ?1",
            column_list(entity.public_columns()),
            quote_ident(entity.name)
        );
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let mut records =
            query_records(&mut stmt, rusqlite::params![rowid]).map_err(from_rusqlite)?;
        Ok(records.pop())
    }

    pub fn count(conn: &Connection, entity: &Entity) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(entity.name));
        conn.query_row(&sql, [], |row| row.get(0))
            .map_err(from_rusqlite)
    }
}
