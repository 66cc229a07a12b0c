//! Bridging between `FieldValue` and SQLite
//!
//! Values always travel as bound parameters. The only text spliced into
//! statements is table and column names taken from the entity registry,
//! and those are double-quoted.

use ctrgt_core::model::{FieldValue, Record};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Value, ValueRef};
use rusqlite::{Row, Statement, ToSql};

/// Borrowed `FieldValue` bound as a statement parameter
pub struct SqlParam<'a>(pub &'a FieldValue);

impl ToSql for SqlParam<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self.0 {
            FieldValue::Null => ToSqlOutput::Owned(Value::Null),
            FieldValue::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            FieldValue::Real(f) => ToSqlOutput::Owned(Value::Real(*f)),
            FieldValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            FieldValue::Bool(b) => ToSqlOutput::Owned(Value::Integer(i64::from(*b))),
        })
    }
}

/// Column value read back as a `FieldValue`
pub struct SqlField(pub FieldValue);

impl FromSql for SqlField {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let field = match value {
            ValueRef::Null => FieldValue::Null,
            ValueRef::Integer(i) => FieldValue::Integer(i),
            ValueRef::Real(f) => FieldValue::Real(f),
            ValueRef::Text(bytes) => FieldValue::Text(
                std::str::from_utf8(bytes)
                    .map_err(|e| FromSqlError::Other(Box::new(e)))?
                    .to_string(),
            ),
            ValueRef::Blob(_) => return Err(FromSqlError::InvalidType),
        };
        Ok(SqlField(field))
    }
}

pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Comma-separated quoted column list
pub fn column_list<'a>(columns: impl IntoIterator<Item = &'a str>) -> String {
    columns
        .into_iter()
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `?1, ?2, ...` for `n` parameters
pub fn placeholders(n: usize) -> String {
    (1..=n)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run a SELECT and materialize every row as a `Record`
pub fn query_records(
    stmt: &mut Statement<'_>,
    params: &[&dyn ToSql],
) -> rusqlite::Result<Vec<Record>> {
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let rows = stmt.query_map(params, |row| read_record(row, &columns))?;
    rows.collect()
}

fn read_record(row: &Row<'_>, columns: &[String]) -> rusqlite::Result<Record> {
    let mut record = Record::new();
    for (idx, name) in columns.iter().enumerate() {
        let value: SqlField = row.get(idx)?;
        record.insert(name.clone(), value.0);
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_values_survive_sqlite() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE v (a, b, c, d, e)").unwrap();

        let values = [
            FieldValue::Null,
            FieldValue::Integer(-4),
            FieldValue::Real(2.5),
            FieldValue::from("text"),
            FieldValue::Bool(true),
        ];
        conn.execute(
            "INSERT INTO v (a, b, c, d, e) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params_from_iter(values.iter().map(SqlParam)),
        )
        .unwrap();

        let mut stmt = conn.prepare("SELECT a, b, c, d, e FROM v").unwrap();
        let records = query_records(&mut stmt, rusqlite::params![]).unwrap();
        let row = &records[0];
        assert_eq!(row.get("a"), Some(&FieldValue::Null));
        assert_eq!(row.get("b"), Some(&FieldValue::Integer(-4)));
        assert_eq!(row.get("c"), Some(&FieldValue::Real(2.5)));
        assert_eq!(row.get("d"), Some(&FieldValue::from("text")));
        // booleans come back as SQLite integers
        assert_eq!(row.get("e"), Some(&FieldValue::Integer(1)));
    }

    #[test]
    fn test_quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("type"), "\"type\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
        assert_eq!(column_list(["id", "name"]), "\"id\", \"name\"");
        assert_eq!(placeholders(3), "?1, ?2, ?3");
    }
}
