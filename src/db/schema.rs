use crate::errors::{Error, Result};
use rusqlite::Connection;
use tracing::{debug, info, instrument};

#[instrument(skip(conn))]
pub(crate) fn create_tables(conn: &Connection) -> Result<()> {
    debug!("Executing CREATE TABLE statements if tables do not exist.");
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS customers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT UNIQUE, -- optional; empty input is stored as NULL
            phone TEXT
        );

        CREATE TABLE IF NOT EXISTS orders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            total REAL NOT NULL,
            FOREIGN KEY (customer_id) REFERENCES customers (id)
                ON DELETE RESTRICT -- customers with orders cannot be deleted
                ON UPDATE CASCADE
        );

        CREATE TABLE IF NOT EXISTS order_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id INTEGER NOT NULL,
            product TEXT NOT NULL,
            quantity INTEGER NOT NULL CHECK (quantity > 0),
            unit_price REAL NOT NULL CHECK (unit_price >= 0),
            FOREIGN KEY (order_id) REFERENCES orders (id)
                ON DELETE CASCADE -- items go with their order
                ON UPDATE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_customer_name ON customers(name);
        CREATE INDEX IF NOT EXISTS idx_order_customer ON orders(customer_id);
        CREATE INDEX IF NOT EXISTS idx_item_order ON order_items(order_id);

        COMMIT;",
    )
    .map_err(|e| Error::Database(format!("Failed to create tables: {e}")))?;
    info!("Database tables ensured.");
    Ok(())
}
