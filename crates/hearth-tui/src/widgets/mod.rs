//! Shared rendering helpers for the dashboard screen.

pub mod control_row;
pub mod text_fmt;
