use crate::db::DbPool;
use crate::errors::{Error, Result};
use crate::models::{OrderDetails, OrderDraft, OrderItem, OrderSummary};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{OptionalExtension, params, params_from_iter};
use tracing::{debug, info, instrument};

/// Filters for [`search_orders`]. All present filters are ANDed together.
#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    /// Substring matched against the customer name or email
    /// (case-insensitive)
    pub term: Option<String>,
    /// Inclusive lower bound on the order date
    pub date_start: Option<NaiveDate>,
    /// Inclusive upper bound on the order date
    pub date_end: Option<NaiveDate>,
}

/// Inserts a new order and its line items in one transaction and returns the
/// order id. The stored total is recomputed from the items; a draft with no
/// items is rejected before anything is written.
#[instrument(skip(pool, draft), fields(customer_id = draft.customer_id, items = draft.items.len()))]
pub async fn save_order(pool: &DbPool, draft: &OrderDraft) -> Result<i64> {
    if draft.items.is_empty() {
        return Err(Error::Validation(
            "An order needs at least one item".to_string(),
        ));
    }

    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for order save".to_string()))?;
    let tx = conn
        .transaction()
        .map_err(|e| Error::Database(format!("Failed to start transaction: {e}")))?;

    let order_id = {
        let mut stmt_order = tx.prepare_cached(
            "INSERT INTO orders (customer_id, date, total) VALUES (?1, ?2, ?3)",
        )?;
        let order_id = stmt_order.insert(params![draft.customer_id, draft.date, draft.total()])?;

        let mut stmt_item = tx.prepare_cached(
            "INSERT INTO order_items (order_id, product, quantity, unit_price)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for item in &draft.items {
            stmt_item.execute(params![order_id, item.product, item.quantity, item.unit_price])?;
        }
        order_id
    };

    tx.commit()
        .map_err(|e| Error::Database(format!("Failed to commit order save: {e}")))?;
    info!(
        "Saved order {} with {} items, total {:.2}.",
        order_id,
        draft.items.len(),
        draft.total()
    );
    Ok(order_id)
}

/// Replaces an existing order's header and full item list in one transaction.
///
/// Old items are deleted and the draft's items inserted fresh; item row ids
/// are not preserved across an update.
#[instrument(skip(pool, draft), fields(items = draft.items.len()))]
pub async fn update_order(pool: &DbPool, order_id: i64, draft: &OrderDraft) -> Result<()> {
    if draft.items.is_empty() {
        return Err(Error::Validation(
            "An order needs at least one item".to_string(),
        ));
    }

    let mut conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for order update".to_string()))?;
    let tx = conn
        .transaction()
        .map_err(|e| Error::Database(format!("Failed to start transaction: {e}")))?;

    {
        let mut stmt_header = tx.prepare_cached(
            "UPDATE orders SET customer_id = ?1, date = ?2, total = ?3 WHERE id = ?4",
        )?;
        let rows =
            stmt_header.execute(params![draft.customer_id, draft.date, draft.total(), order_id])?;
        if rows == 0 {
            // Rolls back on drop
            return Err(Error::NotFound {
                entity: "order",
                id: order_id,
            });
        }

        tx.execute("DELETE FROM order_items WHERE order_id = ?1", params![order_id])?;

        let mut stmt_item = tx.prepare_cached(
            "INSERT INTO order_items (order_id, product, quantity, unit_price)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for item in &draft.items {
            stmt_item.execute(params![order_id, item.product, item.quantity, item.unit_price])?;
        }
    }

    tx.commit()
        .map_err(|e| Error::Database(format!("Failed to commit order update: {e}")))?;
    info!("Updated order {}.", order_id);
    Ok(())
}

/// Deletes an order; its line items go with it via the schema's CASCADE rule.
#[instrument(skip(pool))]
pub async fn delete_order(pool: &DbPool, order_id: i64) -> Result<()> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for order delete".to_string()))?;

    let rows = conn.execute("DELETE FROM orders WHERE id = ?1", params![order_id])?;
    if rows == 0 {
        return Err(Error::NotFound {
            entity: "order",
            id: order_id,
        });
    }
    info!("Deleted order {}.", order_id);
    Ok(())
}

/// Lists order summaries matching the filter, newest first. The term
/// matches the customer's name or email as a substring.
#[instrument(skip(pool))]
pub async fn search_orders(pool: &DbPool, filter: &OrderFilter) -> Result<Vec<OrderSummary>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for order search".to_string()))?;

    let mut sql = String::from(
        "SELECT o.id, c.name, o.date, o.total
         FROM orders o JOIN customers c ON c.id = o.customer_id
         WHERE 1=1",
    );
    let mut values: Vec<Value> = Vec::new();

    if let Some(term) = filter.term.as_deref().map(str::trim)
        && !term.is_empty()
    {
        let placeholder = values.len() + 1;
        sql.push_str(&format!(
            " AND (c.name LIKE ?{placeholder} OR c.email LIKE ?{placeholder})"
        ));
        values.push(Value::Text(format!("%{term}%")));
    }
    if let Some(start) = filter.date_start {
        sql.push_str(&format!(" AND o.date >= ?{}", values.len() + 1));
        values.push(Value::Text(start.format("%Y-%m-%d").to_string()));
    }
    if let Some(end) = filter.date_end {
        sql.push_str(&format!(" AND o.date <= ?{}", values.len() + 1));
        values.push(Value::Text(end.format("%Y-%m-%d").to_string()));
    }
    sql.push_str(" ORDER BY o.date DESC, o.id DESC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values), |row| {
        Ok(OrderSummary {
            id: row.get(0)?,
            customer_name: row.get(1)?,
            date: row.get(2)?,
            total: row.get(3)?,
        })
    })?;

    let mut summaries = Vec::new();
    for row in rows {
        summaries.push(row?);
    }
    debug!("Order search matched {} rows.", summaries.len());
    Ok(summaries)
}

/// Resolves one order with its customer display fields and line items, the
/// shape the export writers consume.
#[instrument(skip(pool))]
pub async fn order_details(pool: &DbPool, order_id: i64) -> Result<OrderDetails> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for order details".to_string()))?;

    let mut stmt_header = conn.prepare_cached(
        "SELECT o.id, o.customer_id, c.name, c.email, c.phone, o.date, o.total
         FROM orders o JOIN customers c ON c.id = o.customer_id
         WHERE o.id = ?1",
    )?;
    let header = stmt_header
        .query_row(params![order_id], |row| {
            Ok(OrderDetails {
                id: row.get(0)?,
                customer_id: row.get(1)?,
                customer_name: row.get(2)?,
                customer_email: row.get(3)?,
                customer_phone: row.get(4)?,
                date: row.get(5)?,
                total: row.get(6)?,
                items: Vec::new(),
            })
        })
        .optional()?;

    let mut details = header.ok_or(Error::NotFound {
        entity: "order",
        id: order_id,
    })?;

    let mut stmt_items = conn.prepare_cached(
        "SELECT id, order_id, product, quantity, unit_price
         FROM order_items WHERE order_id = ?1 ORDER BY id",
    )?;
    let rows = stmt_items.query_map(params![order_id], |row| {
        Ok(OrderItem {
            id: row.get(0)?,
            order_id: row.get(1)?,
            product: row.get(2)?,
            quantity: row.get(3)?,
            unit_price: row.get(4)?,
        })
    })?;
    for row in rows {
        details.items.push(row?);
    }

    Ok(details)
}
