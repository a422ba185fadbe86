//! Paginated PDF renderings via `printpdf` built-in fonts.
//!
//! Layout is a fixed grid of `use_text` calls on A4 pages; no text wrapping,
//! long product names simply run into the next column's whitespace.

use crate::errors::{Error, Result};
use crate::export::{discard_partial, money};
use crate::models::{OrderDetails, ReportRow};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{info, instrument};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 15.0;
const TOP_Y: f32 = 277.0;
const BOTTOM_Y: f32 = 20.0;
const LINE_STEP: f32 = 7.0;

fn pdf_err(path: &Path, e: &printpdf::Error) -> Error {
    Error::Export(format!("Failed to write PDF {path:?}: {e}"))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn load_fonts(doc: &PdfDocumentReference) -> std::result::Result<Fonts, printpdf::Error> {
    Ok(Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
    })
}

fn save_doc(doc: PdfDocumentReference, path: &Path) -> Result<()> {
    let file = match File::create(path) {
        Ok(file) => file,
        Err(e) => return Err(e.into()),
    };
    if let Err(e) = doc.save(&mut BufWriter::new(file)) {
        discard_partial(path);
        return Err(pdf_err(path, &e));
    }
    Ok(())
}

/// Renders one fully resolved order: title, header fields, the line-item
/// table, and a total row.
#[instrument(skip(path, order), fields(order_id = order.id))]
pub fn write_order<P: AsRef<Path>>(path: P, order: &OrderDetails) -> Result<()> {
    let path = path.as_ref();
    let (doc, page, layer) = PdfDocument::new(
        format!("Order {}", order.id),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let fonts = load_fonts(&doc).map_err(|e| pdf_err(path, &e))?;
    let mut layer = doc.get_page(page).get_layer(layer);

    let mut y = TOP_Y;
    layer.use_text(
        format!("Order {}", order.id),
        16.0,
        Mm(MARGIN_LEFT),
        Mm(y),
        &fonts.bold,
    );
    y -= 2.0 * LINE_STEP;

    let header = [
        ("Date", order.date.format("%Y-%m-%d").to_string()),
        ("Customer", order.customer_name.clone()),
        (
            "Email",
            order.customer_email.clone().unwrap_or_default(),
        ),
        (
            "Phone",
            order.customer_phone.clone().unwrap_or_default(),
        ),
    ];
    for (label, value) in header {
        layer.use_text(format!("{label}:"), 11.0, Mm(MARGIN_LEFT), Mm(y), &fonts.bold);
        layer.use_text(value, 11.0, Mm(MARGIN_LEFT + 30.0), Mm(y), &fonts.regular);
        y -= LINE_STEP;
    }
    y -= LINE_STEP;

    write_item_header(&layer, &fonts, y);
    y -= LINE_STEP;

    for item in &order.items {
        if y < BOTTOM_Y {
            let (next_page, next_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            layer = doc.get_page(next_page).get_layer(next_layer);
            y = TOP_Y;
            write_item_header(&layer, &fonts, y);
            y -= LINE_STEP;
        }
        layer.use_text(item.product.clone(), 11.0, Mm(MARGIN_LEFT), Mm(y), &fonts.regular);
        layer.use_text(item.quantity.to_string(), 11.0, Mm(100.0), Mm(y), &fonts.regular);
        layer.use_text(money(item.unit_price), 11.0, Mm(130.0), Mm(y), &fonts.regular);
        layer.use_text(money(item.subtotal()), 11.0, Mm(165.0), Mm(y), &fonts.regular);
        y -= LINE_STEP;
    }

    y -= LINE_STEP;
    layer.use_text("Total:", 12.0, Mm(130.0), Mm(y), &fonts.bold);
    layer.use_text(money(order.total), 12.0, Mm(165.0), Mm(y), &fonts.bold);

    save_doc(doc, path)?;
    info!("Wrote order PDF to {:?}.", path);
    Ok(())
}

fn write_item_header(layer: &PdfLayerReference, fonts: &Fonts, y: f32) {
    layer.use_text("Product", 11.0, Mm(MARGIN_LEFT), Mm(y), &fonts.bold);
    layer.use_text("Qty", 11.0, Mm(100.0), Mm(y), &fonts.bold);
    layer.use_text("Unit price", 11.0, Mm(130.0), Mm(y), &fonts.bold);
    layer.use_text("Subtotal", 11.0, Mm(165.0), Mm(y), &fonts.bold);
}

/// Renders a filtered report, one row per order, paginating when rows run
/// past the bottom margin. The closing total row sums the listed orders.
#[instrument(skip(path, rows), fields(rows = rows.len()))]
pub fn write_report<P: AsRef<Path>>(path: P, rows: &[ReportRow]) -> Result<()> {
    let path = path.as_ref();
    let (doc, page, layer) = PdfDocument::new(
        "Order report",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let fonts = load_fonts(&doc).map_err(|e| pdf_err(path, &e))?;
    let mut layer = doc.get_page(page).get_layer(layer);

    let mut y = TOP_Y;
    layer.use_text("Order report", 16.0, Mm(MARGIN_LEFT), Mm(y), &fonts.bold);
    y -= 2.0 * LINE_STEP;

    write_report_header(&layer, &fonts, y);
    y -= LINE_STEP;

    let mut grand_total = 0.0;
    for row in rows {
        if y < BOTTOM_Y {
            let (next_page, next_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            layer = doc.get_page(next_page).get_layer(next_layer);
            y = TOP_Y;
            write_report_header(&layer, &fonts, y);
            y -= LINE_STEP;
        }
        layer.use_text(row.order_id.to_string(), 10.0, Mm(MARGIN_LEFT), Mm(y), &fonts.regular);
        layer.use_text(
            row.date.format("%Y-%m-%d").to_string(),
            10.0,
            Mm(32.0),
            Mm(y),
            &fonts.regular,
        );
        layer.use_text(row.customer_name.clone(), 10.0, Mm(58.0), Mm(y), &fonts.regular);
        layer.use_text(row.items.clone(), 10.0, Mm(100.0), Mm(y), &fonts.regular);
        layer.use_text(money(row.total), 10.0, Mm(180.0), Mm(y), &fonts.regular);
        grand_total += row.total;
        y -= LINE_STEP;
    }

    y -= LINE_STEP;
    layer.use_text("Total:", 12.0, Mm(150.0), Mm(y), &fonts.bold);
    layer.use_text(money(grand_total), 12.0, Mm(180.0), Mm(y), &fonts.bold);

    save_doc(doc, path)?;
    info!("Wrote report PDF with {} rows to {:?}.", rows.len(), path);
    Ok(())
}

fn write_report_header(layer: &PdfLayerReference, fonts: &Fonts, y: f32) {
    layer.use_text("Order", 10.0, Mm(MARGIN_LEFT), Mm(y), &fonts.bold);
    layer.use_text("Date", 10.0, Mm(32.0), Mm(y), &fonts.bold);
    layer.use_text("Customer", 10.0, Mm(58.0), Mm(y), &fonts.bold);
    layer.use_text("Items", 10.0, Mm(100.0), Mm(y), &fonts.bold);
    layer.use_text("Total", 10.0, Mm(180.0), Mm(y), &fonts.bold);
}
