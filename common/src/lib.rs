//! Types and pure logic shared by the sales-plan backend and the browser editor.
//!
//! Everything in this crate is free of I/O so the same code decides what the
//! server persists and what the editor displays:
//! - `model`: rows, dated plan tables and the reference lists they draw from.
//! - `requests` / `responses`: JSON bodies exchanged over `/api/*`.
//! - `reconcile`: which rows to delete, insert and update when a table is saved.
//! - `view`: filtering, sorting, totals and per-forest aggregates.
//! - `template`: filling a row from a buyer's historical purchase.
//! - `store`: the editor's table collection and its mutations.
//! - `save_queue`: quiet-period coalescing of outgoing saves.

pub mod date;
pub mod model;
pub mod reconcile;
pub mod requests;
pub mod responses;
pub mod save_queue;
pub mod store;
pub mod template;
pub mod view;
