use crate::db::DbPool;
use crate::errors::{Error, Result};
use crate::models::{Customer, CustomerPayload};
use rusqlite::{OptionalExtension, params};
use tracing::{debug, info, instrument};

// Empty or whitespace-only optional fields are stored as NULL so the UNIQUE
// constraint on email never fires for two customers without one.
fn normalize_optional(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn row_to_customer(row: &rusqlite::Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
    })
}

/// Lists customers matching `term` against name or email (case-insensitive,
/// substring). An empty or whitespace-only term lists everyone, ordered by
/// name.
#[instrument(skip(pool))]
pub async fn search_customers(pool: &DbPool, term: &str) -> Result<Vec<Customer>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for customer search".to_string()))?;

    let term = term.trim();
    let mut customers = Vec::new();
    if term.is_empty() {
        let mut stmt = conn
            .prepare_cached("SELECT id, name, email, phone FROM customers ORDER BY name")?;
        let rows = stmt.query_map([], row_to_customer)?;
        for row in rows {
            customers.push(row?);
        }
    } else {
        let pattern = format!("%{term}%");
        let mut stmt = conn.prepare_cached(
            "SELECT id, name, email, phone FROM customers
             WHERE name LIKE ?1 OR email LIKE ?1
             ORDER BY name",
        )?;
        let rows = stmt.query_map(params![pattern], row_to_customer)?;
        for row in rows {
            customers.push(row?);
        }
    }

    debug!("Customer search for '{}' matched {} rows.", term, customers.len());
    Ok(customers)
}

/// Fetches one customer by id.
#[instrument(skip(pool))]
pub async fn get_customer(pool: &DbPool, id: i64) -> Result<Customer> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for customer fetch".to_string()))?;

    let mut stmt =
        conn.prepare_cached("SELECT id, name, email, phone FROM customers WHERE id = ?1")?;
    stmt.query_row(params![id], row_to_customer)
        .optional()?
        .ok_or(Error::NotFound {
            entity: "customer",
            id,
        })
}

/// Inserts or updates a customer and returns its row id.
///
/// A payload without an id inserts; with one it updates, failing with
/// [`Error::NotFound`] when no such row exists. Duplicate emails surface as
/// [`Error::UniqueViolation`].
#[instrument(skip(pool, payload), fields(customer_id = ?payload.id, name = %payload.name))]
pub async fn save_customer(pool: &DbPool, payload: &CustomerPayload) -> Result<i64> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for customer save".to_string()))?;

    let email = normalize_optional(payload.email.as_deref());
    let phone = normalize_optional(payload.phone.as_deref());

    match payload.id {
        None => {
            let mut stmt = conn
                .prepare_cached("INSERT INTO customers (name, email, phone) VALUES (?1, ?2, ?3)")?;
            let id = stmt.insert(params![payload.name, email, phone])?;
            info!("Inserted customer '{}' with id {}.", payload.name, id);
            Ok(id)
        }
        Some(id) => {
            let mut stmt = conn.prepare_cached(
                "UPDATE customers SET name = ?1, email = ?2, phone = ?3 WHERE id = ?4",
            )?;
            let rows = stmt.execute(params![payload.name, email, phone, id])?;
            if rows == 0 {
                return Err(Error::NotFound {
                    entity: "customer",
                    id,
                });
            }
            info!("Updated customer {}.", id);
            Ok(id)
        }
    }
}

/// Deletes a customer. Customers that still have orders are protected by the
/// schema's RESTRICT rule, which surfaces as [`Error::ForeignKeyViolation`].
#[instrument(skip(pool))]
pub async fn delete_customer(pool: &DbPool, id: i64) -> Result<()> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for customer delete".to_string()))?;

    let rows = conn.execute("DELETE FROM customers WHERE id = ?1", params![id])?;
    if rows == 0 {
        return Err(Error::NotFound {
            entity: "customer",
            id,
        });
    }
    info!("Deleted customer {}.", id);
    Ok(())
}

/// `(id, name)` pairs for customer pickers, ordered by name.
#[instrument(skip(pool))]
pub async fn list_for_picker(pool: &DbPool) -> Result<Vec<(i64, String)>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for customer list".to_string()))?;

    let mut stmt = conn.prepare_cached("SELECT id, name FROM customers ORDER BY name")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut pairs = Vec::new();
    for row in rows {
        pairs.push(row?);
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{direct_insert_customer, direct_insert_order, setup_test_db};

    #[tokio::test]
    async fn test_save_and_get_customer() -> Result<()> {
        let pool = setup_test_db().await?;

        let payload = CustomerPayload {
            id: None,
            name: "Alice Martin".to_string(),
            email: Some("alice@example.com".to_string()),
            phone: Some("11987654321".to_string()),
        };
        let id = save_customer(&pool, &payload).await?;

        let fetched = get_customer(&pool, id).await?;
        assert_eq!(fetched.name, "Alice Martin");
        assert_eq!(fetched.email.as_deref(), Some("alice@example.com"));
        assert_eq!(fetched.phone.as_deref(), Some("11987654321"));
        Ok(())
    }

    #[tokio::test]
    async fn test_save_normalizes_empty_email_to_null() -> Result<()> {
        let pool = setup_test_db().await?;

        for name in ["First", "Second"] {
            let payload = CustomerPayload {
                id: None,
                name: name.to_string(),
                email: Some("   ".to_string()),
                phone: None,
            };
            // Two blank emails must both store as NULL, not collide on UNIQUE
            save_customer(&pool, &payload).await?;
        }

        let all = search_customers(&pool, "").await?;
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|c| c.email.is_none()));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() -> Result<()> {
        let pool = setup_test_db().await?;
        {
            let conn = pool.lock().unwrap();
            direct_insert_customer(&conn, "Taken", Some("dup@example.com"), None)?;
        }

        let payload = CustomerPayload {
            id: None,
            name: "Other".to_string(),
            email: Some("dup@example.com".to_string()),
            phone: None,
        };
        let err = save_customer(&pool, &payload).await.unwrap_err();
        assert!(
            matches!(err, Error::UniqueViolation { ref field } if field.contains("email")),
            "expected unique violation on email, got {err:?}"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_customer_is_not_found() -> Result<()> {
        let pool = setup_test_db().await?;

        let payload = CustomerPayload {
            id: Some(999),
            name: "Ghost".to_string(),
            email: None,
            phone: None,
        };
        let err = save_customer(&pool, &payload).await.unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound {
                entity: "customer",
                id: 999
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_search_matches_name_and_email_substrings() -> Result<()> {
        let pool = setup_test_db().await?;
        {
            let conn = pool.lock().unwrap();
            direct_insert_customer(&conn, "Alice Martin", Some("alice@acme.com"), None)?;
            direct_insert_customer(&conn, "Bob Stone", Some("bob@widgets.net"), None)?;
            direct_insert_customer(&conn, "Carla Reyes", None, None)?;
        }

        let by_name = search_customers(&pool, "mart").await?;
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Alice Martin");

        let by_email = search_customers(&pool, "widgets").await?;
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].name, "Bob Stone");

        let all = search_customers(&pool, "  ").await?;
        assert_eq!(all.len(), 3);
        // Ordered by name
        assert_eq!(all[0].name, "Alice Martin");
        assert_eq!(all[2].name, "Carla Reyes");
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_customer_with_orders_is_blocked() -> Result<()> {
        let pool = setup_test_db().await?;
        let customer_id;
        {
            let conn = pool.lock().unwrap();
            customer_id = direct_insert_customer(&conn, "Has Orders", None, None)?;
            direct_insert_order(&conn, customer_id, "2025-03-10", 50.0)?;
        }

        let err = delete_customer(&pool, customer_id).await.unwrap_err();
        assert!(
            matches!(err, Error::ForeignKeyViolation { .. }),
            "expected foreign key violation, got {err:?}"
        );

        // Still present
        assert!(get_customer(&pool, customer_id).await.is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_customer_is_not_found() -> Result<()> {
        let pool = setup_test_db().await?;
        let err = delete_customer(&pool, 42).await.unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound {
                entity: "customer",
                id: 42
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_for_picker_is_name_ordered_pairs() -> Result<()> {
        let pool = setup_test_db().await?;
        {
            let conn = pool.lock().unwrap();
            direct_insert_customer(&conn, "Zoe", None, None)?;
            direct_insert_customer(&conn, "Adam", None, None)?;
        }

        let pairs = list_for_picker(&pool).await?;
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].1, "Adam");
        assert_eq!(pairs[1].1, "Zoe");
        Ok(())
    }
}
