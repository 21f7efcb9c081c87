//! Date parsing for birth and party-join dates.
//!
//! Accepted inputs, all normalized to `YYYY-MM-DD`:
//!
//! - `DD/MM/YYYY`, also with `-` or `.` separators and 1-digit day/month
//! - `YYYY-MM-DD`, also with `/` or `.` separators
//! - date-time text such as `2014-08-15T00:00:00` (time ignored)
//! - a spreadsheet date serial: whole days since 1899-12-30

use chrono::{Days, NaiveDate};
use resi_model::CellValue;

/// Largest serial a spreadsheet can represent (9999-12-31).
const MAX_SERIAL: f64 = 2_958_465.0;

fn serial_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

/// Convert a spreadsheet serial; any fractional time of day is dropped.
pub fn date_from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(0.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }
    serial_epoch()?.checked_add_days(Days::new(serial.floor() as u64))
}

/// Parse date text in any accepted form.
pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(serial) = text.parse::<f64>() {
        return date_from_serial(serial);
    }

    let date_part = text.split(['T', ' ']).next().unwrap_or(text);
    let parts: Vec<&str> = date_part.split(['/', '-', '.']).collect();
    let [first, second, third] = parts.as_slice() else {
        return None;
    };
    if !parts.iter().all(|part| is_digits(part)) {
        return None;
    }
    match (first.len(), third.len()) {
        (4, 1..=2) if second.len() <= 2 => from_parts(first, second, third),
        (1..=2, 4) if second.len() <= 2 => from_parts(third, second, first),
        _ => None,
    }
}

/// Parse a cell: numeric cells are serials, text goes through [`parse_date_text`].
pub fn parse_date_cell(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Number(serial) | CellValue::DateTime(serial) => date_from_serial(*serial),
        CellValue::Text(text) => parse_date_text(text),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn is_digits(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit())
}

fn from_parts(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn day_first_and_iso_forms() {
        assert_eq!(parse_date_text("15/08/2014"), Some(ymd(2014, 8, 15)));
        assert_eq!(parse_date_text("2014-08-15"), Some(ymd(2014, 8, 15)));
        assert_eq!(parse_date_text("5-8-2014"), Some(ymd(2014, 8, 5)));
        assert_eq!(parse_date_text("15.08.2014"), Some(ymd(2014, 8, 15)));
        assert_eq!(parse_date_text("2014-08-15T07:30:00"), Some(ymd(2014, 8, 15)));
    }

    #[test]
    fn spreadsheet_serials() {
        assert_eq!(date_from_serial(1.0), Some(ymd(1899, 12, 31)));
        assert_eq!(date_from_serial(41866.0), Some(ymd(2014, 8, 15)));
        assert_eq!(date_from_serial(41866.75), Some(ymd(2014, 8, 15)));
        assert_eq!(parse_date_text("41866"), Some(ymd(2014, 8, 15)));
        assert_eq!(date_from_serial(-1.0), None);
        assert_eq!(date_from_serial(f64::NAN), None);
    }

    #[test]
    fn rejects_impossible_or_ambiguous_input() {
        assert_eq!(parse_date_text("31/02/2020"), None);
        assert_eq!(parse_date_text("15/08/14"), None);
        assert_eq!(parse_date_text("tháng 8"), None);
        assert_eq!(parse_date_text("2014/8"), None);
        assert_eq!(parse_date_text(""), None);
    }

    #[test]
    fn formats_canonically() {
        assert_eq!(format_date(ymd(1991, 1, 30)), "1991-01-30");
    }
}
