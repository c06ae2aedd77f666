use std::collections::HashMap;

use base64::prelude::*;
use serde_json::Value;
use sqlx::{sqlite::SqliteRow, Column, Row, TypeInfo, ValueRef};

use crate::{
    db::DbPool,
    error::{AppError, Result},
    models::table::{KnownTable, TableRows},
};

/// Generic CRUD over the registered tables.
///
/// Table and column identifiers in query text always come from the
/// `KnownTable` allow-list; request values are only ever bound as
/// parameters.
#[derive(Clone)]
pub struct TableStore {
    pool: DbPool,
}

impl TableStore {
    /// Create a new TableStore with the provided database pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Select every column of every row, in engine order.
    pub async fn fetch_all(&self, table: KnownTable) -> Result<TableRows> {
        let query = format!("SELECT * FROM {}", table.name());
        let db_rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)?;

        // Column names come from the result set; an empty table falls back
        // to the registered schema, which is identical by invariant.
        let columns: Vec<String> = match db_rows.first() {
            Some(row) => row.columns().iter().map(|c| c.name().to_string()).collect(),
            None => table.columns().iter().map(|c| c.to_string()).collect(),
        };

        let mut rows = Vec::with_capacity(db_rows.len());
        for row in &db_rows {
            let mut values = Vec::with_capacity(columns.len());
            for index in 0..row.len() {
                values.push(row_value_to_json(row, index)?);
            }
            rows.push(values);
        }

        Ok(TableRows { table, columns, rows })
    }

    /// Insert a row built from exactly the submitted columns.
    ///
    /// A uniqueness violation is reported as `RecordExists`, distinct from
    /// other database errors.
    pub async fn insert(&self, table: KnownTable, fields: &HashMap<String, String>) -> Result<()> {
        let pairs = checked_columns(table, fields)?;

        let columns: Vec<&str> = pairs.iter().map(|(c, _)| *c).collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let query = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.name(),
            columns.join(", "),
            placeholders
        );

        let mut insert = sqlx::query(&query);
        for (_, value) in &pairs {
            insert = insert.bind(*value);
        }

        match insert.execute(&self.pool).await {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::RecordExists { table: table.name() })
            }
            Err(e) => Err(AppError::Database(e)),
        }
    }

    /// Update every submitted non-key column for the row matching the
    /// primary key. Returns the number of affected rows; zero means no
    /// record carried the submitted key.
    pub async fn update(&self, table: KnownTable, fields: &HashMap<String, String>) -> Result<u64> {
        let key = table.primary_key();
        let key_value = fields
            .get(key)
            .ok_or(AppError::MissingKey { table: table.name(), key })?;

        let pairs = checked_columns(table, fields)?;
        let assignments: Vec<String> = pairs
            .iter()
            .filter(|(column, _)| *column != key)
            .map(|(column, _)| format!("{column} = ?"))
            .collect();

        if assignments.is_empty() {
            return Err(AppError::NoFields);
        }

        let query = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            table.name(),
            assignments.join(", "),
            key
        );

        let mut update = sqlx::query(&query);
        for (column, value) in &pairs {
            if *column != key {
                update = update.bind(*value);
            }
        }
        update = update.bind(key_value.as_str());

        let result = update.execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }

    /// Delete the row whose primary key matches `id`. Returns the number
    /// of affected rows, with the same zero-rows meaning as update.
    pub async fn delete(&self, table: KnownTable, id: &str) -> Result<u64> {
        let query = format!(
            "DELETE FROM {} WHERE {} = ?",
            table.name(),
            table.primary_key()
        );

        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }
}

/// Validate submitted column names against the table's allow-list and pair
/// each canonical column name with its submitted value.
fn checked_columns<'a>(
    table: KnownTable,
    fields: &'a HashMap<String, String>,
) -> Result<Vec<(&'static str, &'a str)>> {
    if fields.is_empty() {
        return Err(AppError::NoFields);
    }

    let mut pairs = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        let column = table.column(name).ok_or_else(|| AppError::UnknownColumn {
            table: table.name(),
            column: name.clone(),
        })?;
        pairs.push((column, value.as_str()));
    }

    Ok(pairs)
}

/// Decode one result-set cell into a JSON value by its storage class.
fn row_value_to_json(row: &SqliteRow, index: usize) -> Result<Value> {
    let raw = row.try_get_raw(index).map_err(AppError::Database)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let type_name = raw.type_info().name().to_string();
    match type_name.as_str() {
        "INTEGER" => {
            let value: i64 = row.try_get(index).map_err(AppError::Database)?;
            Ok(Value::Number(value.into()))
        }
        "REAL" => {
            let value: f64 = row.try_get(index).map_err(AppError::Database)?;
            Ok(serde_json::Number::from_f64(value)
                .map(Value::Number)
                .unwrap_or(Value::Null))
        }
        "TEXT" => {
            let value: String = row.try_get(index).map_err(AppError::Database)?;
            Ok(Value::String(value))
        }
        "BLOB" => {
            let value: Vec<u8> = row.try_get(index).map_err(AppError::Database)?;
            Ok(Value::String(BASE64_STANDARD.encode(&value)))
        }
        _ => Ok(row
            .try_get::<String, _>(index)
            .map(Value::String)
            .unwrap_or(Value::Null)),
    }
}
