//! Toolkit-agnostic form state and field validation.
//!
//! Everything a form screen does besides drawing widgets lives here: the
//! current field values, dirty tracking, and the validation that turns raw
//! text into a storage payload. A GUI shell binds widget events to the
//! setters and renders the per-field errors.

pub mod forms;
pub mod validate;

pub use forms::{CustomerForm, FieldErrors, OrderForm};
