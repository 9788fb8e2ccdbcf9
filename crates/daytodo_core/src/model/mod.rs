//! Memo domain model.
//!
//! # Responsibility
//! - Define the canonical memo record shared by the host app and widget.
//! - Define calendar-month keys used by record views.
//!
//! # Invariants
//! - Every memo is identified by a stable, non-nil `MemoId`.
//! - The JSON wire shape is the shared-storage contract; field names are
//!   camelCase and must not drift.

pub mod memo;
pub mod year_month;
