use crate::db::DbPool;
use crate::errors::{Error, Result};
use crate::models::{DashboardStats, ReportRow, round2};
use chrono::{Datelike, Local, NaiveDate};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter};
use tracing::{debug, instrument};

/// `(year, month)` of today in local time, the default dashboard window.
#[must_use]
pub fn current_month() -> (i32, u32) {
    let today = Local::now().date_naive();
    (today.year(), today.month())
}

/// Aggregate figures for the dashboard: customer count plus order count,
/// revenue, and average order value for the given calendar month.
#[instrument(skip(pool))]
pub async fn dashboard_stats(pool: &DbPool, year: i32, month: u32) -> Result<DashboardStats> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for dashboard stats".to_string()))?;

    let total_customers: i64 =
        conn.query_row("SELECT COUNT(*) FROM customers", [], |row| row.get(0))?;

    let month_key = format!("{year:04}-{month:02}");
    let (orders_this_month, revenue_this_month): (i64, f64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(total), 0)
         FROM orders WHERE strftime('%Y-%m', date) = ?1",
        params![month_key],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let average_order_value = if orders_this_month > 0 {
        round2(revenue_this_month / orders_this_month as f64)
    } else {
        0.0
    };

    debug!(
        "Dashboard for {}: {} customers, {} orders, revenue {:.2}.",
        month_key, total_customers, orders_this_month, revenue_this_month
    );
    Ok(DashboardStats {
        total_customers,
        orders_this_month,
        revenue_this_month: round2(revenue_this_month),
        average_order_value,
    })
}

/// Filters for [`report_rows`]. All present filters are ANDed together.
#[derive(Debug, Default, Clone)]
pub struct ReportFilter {
    /// Restrict to one customer
    pub customer_id: Option<i64>,
    /// Inclusive lower bound on the order date
    pub date_start: Option<NaiveDate>,
    /// Inclusive upper bound on the order date
    pub date_end: Option<NaiveDate>,
}

/// Report rows grouped per order, each carrying a display-ready item string
/// like `"Widget (2), Gadget (1)"`. Newest orders first, then customer name.
#[instrument(skip(pool))]
pub async fn report_rows(pool: &DbPool, filter: &ReportFilter) -> Result<Vec<ReportRow>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock for report".to_string()))?;

    let mut sql = String::from(
        "SELECT o.id, o.date, c.name,
                COALESCE(GROUP_CONCAT(i.product || ' (' || i.quantity || ')', ', '), ''),
                o.total
         FROM orders o
         JOIN customers c ON c.id = o.customer_id
         LEFT JOIN order_items i ON i.order_id = o.id
         WHERE 1=1",
    );
    let mut values: Vec<Value> = Vec::new();

    if let Some(customer_id) = filter.customer_id {
        sql.push_str(&format!(" AND o.customer_id = ?{}", values.len() + 1));
        values.push(Value::Integer(customer_id));
    }
    if let Some(start) = filter.date_start {
        sql.push_str(&format!(" AND o.date >= ?{}", values.len() + 1));
        values.push(Value::Text(start.format("%Y-%m-%d").to_string()));
    }
    if let Some(end) = filter.date_end {
        sql.push_str(&format!(" AND o.date <= ?{}", values.len() + 1));
        values.push(Value::Text(end.format("%Y-%m-%d").to_string()));
    }
    sql.push_str(" GROUP BY o.id ORDER BY o.date DESC, c.name ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values), |row| {
        Ok(ReportRow {
            order_id: row.get(0)?,
            date: row.get(1)?,
            customer_name: row.get(2)?,
            items: row.get(3)?,
            total: row.get(4)?,
        })
    })?;

    let mut report = Vec::new();
    for row in rows {
        report.push(row?);
    }
    debug!("Report query produced {} rows.", report.len());
    Ok(report)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::db::test_utils::{
        direct_insert_customer, direct_insert_item, direct_insert_order, setup_test_db,
    };

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_dashboard_stats_for_month() -> Result<()> {
        let pool = setup_test_db().await?;
        {
            let conn = pool.lock().unwrap();
            let alice = direct_insert_customer(&conn, "Alice", None, None)?;
            let bob = direct_insert_customer(&conn, "Bob", None, None)?;
            direct_insert_order(&conn, alice, "2025-03-05", 10.0)?;
            direct_insert_order(&conn, bob, "2025-03-20", 30.0)?;
            // Outside the requested month
            direct_insert_order(&conn, alice, "2025-04-01", 99.0)?;
        }

        let stats = dashboard_stats(&pool, 2025, 3).await?;
        assert_eq!(stats.total_customers, 2);
        assert_eq!(stats.orders_this_month, 2);
        assert_eq!(stats.revenue_this_month, 40.0);
        assert_eq!(stats.average_order_value, 20.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_stats_empty_month_avg_is_zero() -> Result<()> {
        let pool = setup_test_db().await?;
        {
            let conn = pool.lock().unwrap();
            direct_insert_customer(&conn, "Alice", None, None)?;
        }

        let stats = dashboard_stats(&pool, 2025, 6).await?;
        assert_eq!(stats.total_customers, 1);
        assert_eq!(stats.orders_this_month, 0);
        assert_eq!(stats.revenue_this_month, 0.0);
        assert_eq!(stats.average_order_value, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_report_rows_concatenate_items() -> Result<()> {
        let pool = setup_test_db().await?;
        {
            let conn = pool.lock().unwrap();
            let alice = direct_insert_customer(&conn, "Alice", None, None)?;
            let order = direct_insert_order(&conn, alice, "2025-01-10", 24.98)?;
            direct_insert_item(&conn, order, "Widget", 2, 9.99)?;
            direct_insert_item(&conn, order, "Gadget", 1, 5.00)?;
        }

        let rows = report_rows(&pool, &ReportFilter::default()).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].items, "Widget (2), Gadget (1)");
        assert_eq!(rows[0].customer_name, "Alice");
        assert_eq!(rows[0].total, 24.98);
        Ok(())
    }

    #[tokio::test]
    async fn test_report_rows_filter_by_customer_and_dates() -> Result<()> {
        let pool = setup_test_db().await?;
        let alice;
        {
            let conn = pool.lock().unwrap();
            alice = direct_insert_customer(&conn, "Alice", None, None)?;
            let bob = direct_insert_customer(&conn, "Bob", None, None)?;
            let o1 = direct_insert_order(&conn, alice, "2025-01-10", 10.0)?;
            direct_insert_item(&conn, o1, "A", 1, 10.0)?;
            let o2 = direct_insert_order(&conn, alice, "2025-03-10", 20.0)?;
            direct_insert_item(&conn, o2, "B", 1, 20.0)?;
            let o3 = direct_insert_order(&conn, bob, "2025-03-15", 30.0)?;
            direct_insert_item(&conn, o3, "C", 1, 30.0)?;
        }

        let filter = ReportFilter {
            customer_id: Some(alice),
            date_start: Some(date("2025-02-01")),
            date_end: Some(date("2025-03-31")),
        };
        let rows = report_rows(&pool, &filter).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].items, "B (1)");
        Ok(())
    }

    #[tokio::test]
    async fn test_report_row_for_itemless_order_is_empty_string() -> Result<()> {
        let pool = setup_test_db().await?;
        {
            let conn = pool.lock().unwrap();
            let alice = direct_insert_customer(&conn, "Alice", None, None)?;
            direct_insert_order(&conn, alice, "2025-01-10", 0.0)?;
        }

        let rows = report_rows(&pool, &ReportFilter::default()).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].items, "");
        Ok(())
    }
}
