//! Core use-case services.
//!
//! # Responsibility
//! - Own the memo list and its mutation surface for the host app.
//! - Provide the read-only widget loader and pure list projections.

pub mod memo_store;
pub mod memo_views;
pub mod widget_service;
