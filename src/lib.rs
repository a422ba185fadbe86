//! `OrderDesk` - a local customer/order management core
//!
//! This crate provides the non-visual half of a small desktop order manager:
//! a SQLite-backed store of customers, orders, and order line items, CRUD
//! domain operations with filtered search and dashboard aggregates, CSV/PDF
//! export, an append-only action log, an optional AI order summary, and a
//! GUI-agnostic form-state layer the screens sit on top of.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,

    // Correctness
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Style consistency
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
    clippy::missing_panics_doc,        // Will add gradually
)]

/// Optional AI order summary via a locally hosted LLM endpoint
pub mod ai;
/// Append-only, user-facing action log (distinct from diagnostics)
pub mod applog;
/// Application configuration from config.toml and the environment
pub mod config;
/// Persistence gateway and domain operations over SQLite
pub mod db;
/// Unified error types and result handling
pub mod errors;
/// CSV and PDF export of orders and report lists
pub mod export;
/// Plain-data row types shared across the db, export, and form layers
pub mod models;
/// GUI-toolkit-agnostic form state and field validation
pub mod ui;
