//! Read-only query execution.

use crate::database::Database;
use crate::error::{DbError, DbResult};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::params_from_iter;
use serde_json::Value;
use tracing::debug;

/// One result row: column name to value, in the statement's column order.
pub type Row = serde_json::Map<String, Value>;

impl Database {
    /// Execute a read-only statement and collect every row.
    ///
    /// Statements that could modify the database are rejected before they run.
    pub fn query(&self, sql: &str, params: &[Value]) -> DbResult<Vec<Row>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;

        if !stmt.readonly() {
            return Err(DbError::NotReadOnly(sql.trim().to_string()));
        }

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        debug!("Running query with {} columns: {}", columns.len(), sql.trim());

        let bound = params.iter().map(to_sql_value);
        let mut rows = stmt.query(params_from_iter(bound))?;

        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            let mut out = Row::new();
            for (i, name) in columns.iter().enumerate() {
                out.insert(name.clone(), from_sql_value(row.get_ref(i)?));
            }
            results.push(out);
        }

        Ok(results)
    }
}

/// Interpret a command-line parameter.
///
/// Parameters bind as text unless prefixed: `int:42` binds an integer,
/// `real:1.5` a float, `null:` a NULL. `text:` forces text, so a value that
/// itself starts with a prefix can still be passed literally.
pub fn parse_param(raw: &str) -> DbResult<Value> {
    let Some((prefix, rest)) = raw.split_once(':') else {
        return Ok(Value::String(raw.to_string()));
    };

    match prefix {
        "int" => rest
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| DbError::InvalidParam(raw.to_string())),
        "real" => rest
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| DbError::InvalidParam(raw.to_string())),
        "null" if rest.is_empty() => Ok(Value::Null),
        "text" => Ok(Value::String(rest.to_string())),
        _ => Ok(Value::String(raw.to_string())),
    }
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn from_sql_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(hex::encode(bytes)),
    }
}
