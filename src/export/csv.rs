//! Semicolon-delimited CSV renderings.
//!
//! Semicolons keep the files readable in spreadsheet tools whose locales
//! treat commas as decimal separators; the report's item strings also
//! contain commas of their own.

use crate::errors::{Error, Result};
use crate::export::{discard_partial, money};
use crate::models::{OrderDetails, ReportRow};
use csv::WriterBuilder;
use std::path::Path;
use tracing::{info, instrument};

fn csv_err(path: &Path, e: &csv::Error) -> Error {
    Error::Export(format!("Failed to write CSV {path:?}: {e}"))
}

/// Writes one fully resolved order: a header block, a customer block, then
/// the line-item table with a grand-total row.
#[instrument(skip(path, order), fields(order_id = order.id))]
pub fn write_order<P: AsRef<Path>>(path: P, order: &OrderDetails) -> Result<()> {
    let path = path.as_ref();
    let result = (|| -> std::result::Result<(), csv::Error> {
        let mut wtr = WriterBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_path(path)?;

        wtr.write_record(["Order", &order.id.to_string()])?;
        wtr.write_record(["Date", &order.date.format("%Y-%m-%d").to_string()])?;
        wtr.write_record(["Total", &money(order.total)])?;
        wtr.write_record([""])?;

        wtr.write_record(["Customer", &order.customer_name])?;
        wtr.write_record(["Email", order.customer_email.as_deref().unwrap_or("")])?;
        wtr.write_record(["Phone", order.customer_phone.as_deref().unwrap_or("")])?;
        wtr.write_record([""])?;

        wtr.write_record(["Product", "Quantity", "Unit price", "Subtotal"])?;
        for item in &order.items {
            wtr.write_record([
                item.product.as_str(),
                &item.quantity.to_string(),
                &money(item.unit_price),
                &money(item.subtotal()),
            ])?;
        }
        wtr.write_record(["", "", "Total", &money(order.total)])?;
        wtr.flush()?;
        Ok(())
    })();

    if let Err(e) = result {
        discard_partial(path);
        return Err(csv_err(path, &e));
    }
    info!("Wrote order CSV to {:?}.", path);
    Ok(())
}

/// Writes a filtered report: one row per order, items collapsed into a
/// single display column.
#[instrument(skip(path, rows), fields(rows = rows.len()))]
pub fn write_report<P: AsRef<Path>>(path: P, rows: &[ReportRow]) -> Result<()> {
    let path = path.as_ref();
    let result = (|| -> std::result::Result<(), csv::Error> {
        let mut wtr = WriterBuilder::new().delimiter(b';').from_path(path)?;

        wtr.write_record(["Order", "Date", "Customer", "Items", "Total"])?;
        for row in rows {
            wtr.write_record([
                row.order_id.to_string().as_str(),
                &row.date.format("%Y-%m-%d").to_string(),
                &row.customer_name,
                &row.items,
                &money(row.total),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    })();

    if let Err(e) = result {
        discard_partial(path);
        return Err(csv_err(path, &e));
    }
    info!("Wrote report CSV with {} rows to {:?}.", rows.len(), path);
    Ok(())
}
