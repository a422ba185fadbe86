//! Persistence gateway and domain operations over SQLite.

pub mod connection;
pub mod customers;
pub mod orders;
pub(crate) mod schema;
pub mod stats;
#[cfg(test)]
pub(crate) mod test_utils;

pub use connection::{DbPool, init_db};
pub use customers::{
    delete_customer, get_customer, list_for_picker, save_customer, search_customers,
};
pub use orders::{
    OrderFilter, delete_order, order_details, save_order, search_orders, update_order,
};
pub use stats::{ReportFilter, current_month, dashboard_stats, report_rows};
