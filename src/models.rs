//! Plain-data row and payload types shared by the db, export, and form layers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A customer row as stored in the `customers` table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Customer {
    /// Surrogate primary key
    pub id: i64,
    /// Required display name
    pub name: String,
    /// Optional, unique when present (empty input is stored as NULL)
    pub email: Option<String>,
    /// Optional digit string
    pub phone: Option<String>,
}

/// Insert/update payload for a customer. `id` of `None` means insert.
#[derive(Debug, Clone)]
pub struct CustomerPayload {
    #[allow(missing_docs)]
    pub id: Option<i64>,
    #[allow(missing_docs)]
    pub name: String,
    #[allow(missing_docs)]
    pub email: Option<String>,
    #[allow(missing_docs)]
    pub phone: Option<String>,
}

/// An order summary row joined with its customer's name, as shown in list
/// views and produced by [`crate::db::orders::search_orders`].
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OrderSummary {
    #[allow(missing_docs)]
    pub id: i64,
    #[allow(missing_docs)]
    pub customer_name: String,
    #[allow(missing_docs)]
    pub date: NaiveDate,
    /// Stored total, derived from the line items at save time
    pub total: f64,
}

/// A line item row as stored in the `order_items` table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OrderItem {
    #[allow(missing_docs)]
    pub id: i64,
    #[allow(missing_docs)]
    pub order_id: i64,
    #[allow(missing_docs)]
    pub product: String,
    #[allow(missing_docs)]
    pub quantity: i64,
    #[allow(missing_docs)]
    pub unit_price: f64,
}

impl OrderItem {
    /// Subtotal = quantity x unit price. Computed, never stored.
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        round2(self.quantity as f64 * self.unit_price)
    }
}

/// One line item in an order draft, before it has a row id.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemInput {
    #[allow(missing_docs)]
    pub product: String,
    #[allow(missing_docs)]
    pub quantity: i64,
    #[allow(missing_docs)]
    pub unit_price: f64,
}

impl ItemInput {
    #[allow(missing_docs)]
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        round2(self.quantity as f64 * self.unit_price)
    }
}

/// Validated payload for a transactional order save or update.
///
/// The stored order total is always recomputed from `items` inside the save
/// operation; drafts never carry a caller-supplied total.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    #[allow(missing_docs)]
    pub customer_id: i64,
    #[allow(missing_docs)]
    pub date: NaiveDate,
    #[allow(missing_docs)]
    pub items: Vec<ItemInput>,
}

impl OrderDraft {
    /// Sum of the item subtotals, rounded to two decimals.
    #[must_use]
    pub fn total(&self) -> f64 {
        round2(self.items.iter().map(ItemInput::subtotal).sum())
    }
}

/// A fully resolved order: header fields, customer display fields, and the
/// ordered list of line items. Input to the export helpers.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    #[allow(missing_docs)]
    pub id: i64,
    #[allow(missing_docs)]
    pub customer_id: i64,
    #[allow(missing_docs)]
    pub customer_name: String,
    #[allow(missing_docs)]
    pub customer_email: Option<String>,
    #[allow(missing_docs)]
    pub customer_phone: Option<String>,
    #[allow(missing_docs)]
    pub date: NaiveDate,
    #[allow(missing_docs)]
    pub total: f64,
    #[allow(missing_docs)]
    pub items: Vec<OrderItem>,
}

/// One line of the grouped report: an order joined to its customer with the
/// line items concatenated into a single display string like
/// `"Widget (2), Gadget (1)"`.
#[derive(Debug, Clone)]
pub struct ReportRow {
    #[allow(missing_docs)]
    pub order_id: i64,
    #[allow(missing_docs)]
    pub date: NaiveDate,
    #[allow(missing_docs)]
    pub customer_name: String,
    #[allow(missing_docs)]
    pub items: String,
    #[allow(missing_docs)]
    pub total: f64,
}

/// Aggregate figures for the dashboard cards.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    #[allow(missing_docs)]
    pub total_customers: i64,
    /// Orders dated within the requested calendar month
    pub orders_this_month: i64,
    /// Summed totals of those orders
    pub revenue_this_month: f64,
    /// `revenue / orders`, or 0.0 when the month has no orders
    pub average_order_value: f64,
}

/// Rounds a currency amount to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
