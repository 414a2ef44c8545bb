//! Structural address checks, no I/O.

mod format;

pub use format::{is_valid_format, split_address};
