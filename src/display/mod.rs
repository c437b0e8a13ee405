//! Display formatting for terminal output

pub mod audit;

pub use audit::{format_record_details, format_record_table, format_trail};
