//! Flutter Rust Bridge surface for the DayTodo host app and widget.

pub mod api;
