//! Form reducers for the customer and order dialogs.
//!
//! A form holds raw text exactly as typed; `validate()` is the single exit
//! toward the storage layer and returns either a clean payload or per-field
//! errors. A failed save leaves the form untouched, so nothing the user
//! typed is lost.

use crate::models::{CustomerPayload, ItemInput, OrderDraft, round2};
use crate::ui::validate;
use chrono::NaiveDate;

/// Validation errors keyed by field label, in display order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(String, String)>,
}

impl FieldErrors {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.entries.push((field.into(), message.into()));
    }

    /// `(field, message)` pairs in the order the fields appear on screen.
    #[must_use]
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// First message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_str())
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// State behind the customer add/edit dialog.
#[derive(Debug, Default, Clone)]
pub struct CustomerForm {
    id: Option<i64>,
    name: String,
    email: String,
    phone: String,
    dirty: bool,
}

impl CustomerForm {
    /// An empty form for creating a customer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A form pre-filled for editing.
    #[must_use]
    pub fn edit(customer: &crate::models::Customer) -> Self {
        Self {
            id: Some(customer.id),
            name: customer.name.clone(),
            email: customer.email.clone().unwrap_or_default(),
            phone: customer.phone.clone().unwrap_or_default(),
            dirty: false,
        }
    }

    #[allow(missing_docs)]
    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
        self.dirty = true;
    }

    #[allow(missing_docs)]
    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
        self.dirty = true;
    }

    #[allow(missing_docs)]
    pub fn set_phone(&mut self, value: impl Into<String>) {
        self.phone = value.into();
        self.dirty = true;
    }

    /// Whether any field changed since load or the last [`Self::mark_clean`].
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Called after a successful save.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Turns the raw fields into a payload, or reports every bad field at
    /// once.
    pub fn validate(&self) -> Result<CustomerPayload, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = match validate::require("Name", &self.name) {
            Ok(name) => name,
            Err(msg) => {
                errors.push("name", msg);
                String::new()
            }
        };
        let email = match validate::email_format(&self.email) {
            Ok(email) => email,
            Err(msg) => {
                errors.push("email", msg);
                None
            }
        };
        let phone = match validate::phone_format(&self.phone) {
            Ok(phone) => phone,
            Err(msg) => {
                errors.push("phone", msg);
                None
            }
        };

        if errors.is_empty() {
            Ok(CustomerPayload {
                id: self.id,
                name,
                email,
                phone,
            })
        } else {
            Err(errors)
        }
    }
}

/// One editable item row, raw as typed.
#[derive(Debug, Default, Clone)]
pub struct ItemRow {
    #[allow(missing_docs)]
    pub product: String,
    #[allow(missing_docs)]
    pub quantity: String,
    #[allow(missing_docs)]
    pub unit_price: String,
}

/// State behind the order add/edit dialog.
#[derive(Debug, Default, Clone)]
pub struct OrderForm {
    order_id: Option<i64>,
    customer_id: Option<i64>,
    date: String,
    items: Vec<ItemRow>,
    displayed_total: String,
    dirty: bool,
}

impl OrderForm {
    /// An empty form for creating an order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A form pre-filled from a resolved order for editing.
    #[must_use]
    pub fn edit(details: &crate::models::OrderDetails) -> Self {
        Self {
            order_id: Some(details.id),
            customer_id: Some(details.customer_id),
            date: details.date.format("%Y-%m-%d").to_string(),
            items: details
                .items
                .iter()
                .map(|item| ItemRow {
                    product: item.product.clone(),
                    quantity: item.quantity.to_string(),
                    unit_price: format!("{:.2}", item.unit_price),
                })
                .collect(),
            displayed_total: format!("{:.2}", details.total),
            dirty: false,
        }
    }

    /// The order being edited, or `None` when creating.
    #[must_use]
    pub fn order_id(&self) -> Option<i64> {
        self.order_id
    }

    #[allow(missing_docs)]
    pub fn select_customer(&mut self, customer_id: i64) {
        self.customer_id = Some(customer_id);
        self.dirty = true;
    }

    #[allow(missing_docs)]
    pub fn set_date(&mut self, value: impl Into<String>) {
        self.date = value.into();
        self.dirty = true;
    }

    /// The total the screen currently shows, cross-checked at validation.
    pub fn set_displayed_total(&mut self, value: impl Into<String>) {
        self.displayed_total = value.into();
        self.dirty = true;
    }

    /// Appends an item row.
    pub fn add_item(&mut self, row: ItemRow) {
        self.items.push(row);
        self.dirty = true;
    }

    /// Removes the item row at `index`; out-of-range indexes are ignored.
    pub fn remove_item(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
            self.dirty = true;
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn items(&self) -> &[ItemRow] {
        &self.items
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Called after a successful save.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Turns the raw fields into a draft, or reports every bad field at
    /// once. The displayed total must agree with the recomputed item sum.
    pub fn validate(&self) -> Result<OrderDraft, FieldErrors> {
        let mut errors = FieldErrors::default();

        let customer_id = self.customer_id.unwrap_or_else(|| {
            errors.push("customer", "Select a customer");
            0
        });

        let date = match NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                errors.push("date", "Date must look like 2025-01-31");
                NaiveDate::default()
            }
        };

        if self.items.is_empty() {
            errors.push("items", "Add at least one item");
        }

        let mut items = Vec::with_capacity(self.items.len());
        for (index, row) in self.items.iter().enumerate() {
            let label = format!("item {}", index + 1);
            let mut bad = false;

            let product = match validate::require("Product", &row.product) {
                Ok(product) => product,
                Err(msg) => {
                    errors.push(label.clone(), msg);
                    bad = true;
                    String::new()
                }
            };
            let quantity = match validate::positive_int("Quantity", &row.quantity) {
                Ok(quantity) => quantity,
                Err(msg) => {
                    errors.push(label.clone(), msg);
                    bad = true;
                    0
                }
            };
            let unit_price = match validate::positive_price("Unit price", &row.unit_price) {
                Ok(price) => price,
                Err(msg) => {
                    errors.push(label.clone(), msg);
                    bad = true;
                    0.0
                }
            };

            if !bad {
                items.push(ItemInput {
                    product,
                    quantity,
                    unit_price,
                });
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let draft = OrderDraft {
            customer_id,
            date,
            items,
        };

        // The screen recomputes the total as rows change; a mismatch here
        // means a display bug, and the order must not be saved with it.
        if !self.displayed_total.trim().is_empty() {
            match validate::positive_price("Total", &self.displayed_total) {
                Ok(displayed) if (displayed - draft.total()).abs() < 0.005 => {}
                Ok(displayed) => {
                    errors.push(
                        "total",
                        format!(
                            "Displayed total {displayed:.2} does not match the item sum {:.2}",
                            round2(draft.total())
                        ),
                    );
                }
                Err(msg) => errors.push("total", msg),
            }
        }

        if errors.is_empty() { Ok(draft) } else { Err(errors) }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp, clippy::unwrap_used)]
    use super::*;
    use crate::models::{Customer, OrderDetails, OrderItem};

    fn raw_item(product: &str, quantity: &str, unit_price: &str) -> ItemRow {
        ItemRow {
            product: product.to_string(),
            quantity: quantity.to_string(),
            unit_price: unit_price.to_string(),
        }
    }

    #[test]
    fn test_customer_form_validates_payload() {
        let mut form = CustomerForm::new();
        form.set_name("  Ana  ");
        form.set_email("ana@x.com");
        form.set_phone("(11) 98765-4321");

        let payload = form.validate().unwrap();
        assert_eq!(payload.id, None);
        assert_eq!(payload.name, "Ana");
        assert_eq!(payload.email.as_deref(), Some("ana@x.com"));
        assert_eq!(payload.phone.as_deref(), Some("11987654321"));
        assert!(form.is_dirty());
    }

    #[test]
    fn test_customer_form_collects_all_field_errors() {
        let mut form = CustomerForm::new();
        form.set_email("not-an-email");
        form.set_phone("123");

        let errors = form.validate().unwrap_err();
        assert!(errors.get("name").is_some());
        assert!(errors.get("email").is_some());
        assert!(errors.get("phone").is_some());
        assert_eq!(errors.entries().len(), 3);
    }

    #[test]
    fn test_customer_form_edit_carries_id_and_starts_clean() {
        let customer = Customer {
            id: 7,
            name: "Ana".to_string(),
            email: None,
            phone: None,
        };
        let mut form = CustomerForm::edit(&customer);
        assert!(!form.is_dirty());

        form.set_phone("11987654321");
        assert!(form.is_dirty());

        let payload = form.validate().unwrap();
        assert_eq!(payload.id, Some(7));
    }

    #[test]
    fn test_order_form_happy_path() {
        let mut form = OrderForm::new();
        form.select_customer(1);
        form.set_date("2025-01-10");
        form.add_item(raw_item("Widget", "2", "9,99"));
        form.add_item(raw_item("Gadget", "1", "5.00"));
        form.set_displayed_total("24.98");

        let draft = form.validate().unwrap();
        assert_eq!(draft.customer_id, 1);
        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.total(), 24.98);
    }

    #[test]
    fn test_order_form_rejects_missing_customer_and_bad_date() {
        let mut form = OrderForm::new();
        form.set_date("10/01/2025");
        form.add_item(raw_item("Widget", "1", "1.00"));

        let errors = form.validate().unwrap_err();
        assert!(errors.get("customer").is_some());
        assert!(errors.get("date").is_some());
    }

    #[test]
    fn test_order_form_rejects_empty_items() {
        let mut form = OrderForm::new();
        form.select_customer(1);
        form.set_date("2025-01-10");

        let errors = form.validate().unwrap_err();
        assert!(errors.get("items").is_some());
    }

    #[test]
    fn test_order_form_flags_bad_item_row() {
        let mut form = OrderForm::new();
        form.select_customer(1);
        form.set_date("2025-01-10");
        form.add_item(raw_item("Widget", "0", "1.00"));

        let errors = form.validate().unwrap_err();
        assert!(errors.get("item 1").is_some());
    }

    #[test]
    fn test_order_form_cross_checks_displayed_total() {
        let mut form = OrderForm::new();
        form.select_customer(1);
        form.set_date("2025-01-10");
        form.add_item(raw_item("Widget", "2", "9.99"));
        form.set_displayed_total("99.99");

        let errors = form.validate().unwrap_err();
        assert!(errors.get("total").unwrap().contains("19.98"));
    }

    #[test]
    fn test_order_form_remove_item_and_clean_flag() {
        let mut form = OrderForm::new();
        form.select_customer(1);
        form.set_date("2025-01-10");
        form.add_item(raw_item("Widget", "1", "1.00"));
        form.add_item(raw_item("Gadget", "1", "2.00"));

        form.remove_item(0);
        assert_eq!(form.items().len(), 1);
        assert_eq!(form.items()[0].product, "Gadget");

        // Out of range is a no-op
        form.remove_item(10);
        assert_eq!(form.items().len(), 1);

        form.mark_clean();
        assert!(!form.is_dirty());
    }

    #[test]
    fn test_order_form_edit_prefills_from_details() {
        let details = OrderDetails {
            id: 12,
            customer_id: 3,
            customer_name: "Ana".to_string(),
            customer_email: None,
            customer_phone: None,
            date: chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            total: 19.98,
            items: vec![OrderItem {
                id: 1,
                order_id: 12,
                product: "Widget".to_string(),
                quantity: 2,
                unit_price: 9.99,
            }],
        };

        let form = OrderForm::edit(&details);
        assert_eq!(form.order_id(), Some(12));
        assert!(!form.is_dirty());

        let draft = form.validate().unwrap();
        assert_eq!(draft.customer_id, 3);
        assert_eq!(draft.total(), 19.98);
    }
}
