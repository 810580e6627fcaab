//! Display formatting for terminal output
//!
//! Provides utilities for formatting audit records for terminal display.

pub mod records;

pub use records::{format_record_details, format_record_list};
