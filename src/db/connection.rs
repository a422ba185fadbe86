use crate::db::schema::create_tables;
use crate::errors::{Error, Result};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};

/// Shared handle to the single application connection.
///
/// A single-user desktop tool needs no pool; every logical operation locks
/// the one connection for its duration, and multi-statement writes open a
/// rusqlite transaction scope on it.
pub type DbPool = Arc<Mutex<Connection>>;

/// Opens the database, enables foreign-key enforcement, and ensures the
/// schema exists. Must run before any other db operation.
#[instrument]
pub async fn init_db(db_path: &str) -> Result<DbPool> {
    debug!("Initializing database connection to: {}", db_path);
    if let Some(parent) = std::path::Path::new(db_path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(db_path)
        .map_err(|e| Error::Database(format!("Failed to open database at {db_path}: {e}")))?;

    // SQLite leaves foreign keys off per connection unless asked
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| Error::Database(format!("Failed to enable foreign keys: {e}")))?;

    info!("Database connection opened. Ensuring tables are created...");
    create_tables(&conn)?;

    Ok(Arc::new(Mutex::new(conn)))
}
