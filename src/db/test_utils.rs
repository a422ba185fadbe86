#![allow(dead_code)]
use crate::db::{DbPool, schema};
use crate::errors::{Error, Result};
use rusqlite::Connection;
use rusqlite::{OptionalExtension, params};
use std::sync::Arc;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

// Fresh in-memory database with the schema applied and FK enforcement on,
// matching what init_db does for a file-backed database.
pub(crate) async fn setup_test_db() -> Result<DbPool> {
    let conn = Connection::open_in_memory()
        .map_err(|e| Error::Database(format!("Test DB: Failed to open in-memory: {e}")))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| Error::Database(format!("Test DB: Failed to enable foreign keys: {e}")))?;
    schema::create_tables(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

// Raw insert helpers bypassing the domain operations, for focused test setup.

pub(crate) fn direct_insert_customer(
    conn: &Connection,
    name: &str,
    email: Option<&str>,
    phone: Option<&str>,
) -> Result<i64> {
    let mut stmt = conn
        .prepare_cached("INSERT INTO customers (name, email, phone) VALUES (?1, ?2, ?3)")?;
    let id = stmt.insert(params![name, email, phone])?;
    Ok(id)
}

pub(crate) fn direct_insert_order(
    conn: &Connection,
    customer_id: i64,
    date: &str,
    total: f64,
) -> Result<i64> {
    let mut stmt = conn
        .prepare_cached("INSERT INTO orders (customer_id, date, total) VALUES (?1, ?2, ?3)")?;
    let id = stmt.insert(params![customer_id, date, total])?;
    Ok(id)
}

pub(crate) fn direct_insert_item(
    conn: &Connection,
    order_id: i64,
    product: &str,
    quantity: i64,
    unit_price: f64,
) -> Result<i64> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO order_items (order_id, product, quantity, unit_price) VALUES (?1, ?2, ?3, ?4)",
    )?;
    let id = stmt.insert(params![order_id, product, quantity, unit_price])?;
    Ok(id)
}

pub(crate) fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(count)
}

// Fetches the stored order header for test verification.
pub(crate) fn get_order_header_for_test(
    conn: &Connection,
    order_id: i64,
) -> Result<Option<(i64, String, f64)>> {
    let mut stmt =
        conn.prepare_cached("SELECT customer_id, date, total FROM orders WHERE id = ?1")?;
    stmt.query_row(params![order_id], |row| {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
    })
    .optional()
    .map_err(Error::from)
}
