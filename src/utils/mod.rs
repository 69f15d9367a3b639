//! Shared utilities.

pub mod color;
pub mod short_code;
