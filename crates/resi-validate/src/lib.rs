//! Per-field validation of mapped spreadsheet rows.
//!
//! Each mapped cell is parsed and normalized by the rule for its field kind.
//! Rows with any error are excluded from import; warnings are reported and
//! the affected value is dropped. When two columns map to the same field the
//! rightmost column wins.

pub mod date;
pub mod report;
pub mod text;
pub mod validator;

pub use date::{date_from_serial, format_date, parse_date_cell, parse_date_text};
pub use report::ValidationReport;
pub use text::{digits_only, format_address, title_case};
pub use validator::{
    DEFAULT_ETHNICITY, DEFAULT_RELIGION, RowValidator, ValidationOptions, avatar_url, is_truthy,
    is_valid_email, parse_gender,
};
