//! Lien coverage analysis for a single property title.
//!
//! The `ledger` module is the model: appraisal value, new credit risk and
//! the liens registered on the title, with derived totals and a text
//! summary. `ui` is the terminal front end built on top of it.

pub mod clipboard;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod ui;

pub use ledger::{Ledger, Lien, LienDraft, LienKind, Totals, Upsert};
