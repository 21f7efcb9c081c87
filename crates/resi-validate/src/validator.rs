//! Row validation and transformation.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use resi_map::normalize_header;
use resi_model::{
    CellValue, FieldIssue, FieldKind, FieldMapping, Gender, ResidentRecord, ResidentStatus,
    SpreadsheetTable, TargetField, ValidationOutcome,
};

use crate::date::{format_date, parse_date_cell, parse_date_text};
use crate::report::ValidationReport;
use crate::text::{digits_only, format_address, title_case};

pub const MIN_PHONE_DIGITS: usize = 10;
pub const IDENTITY_CARD_DIGITS: std::ops::RangeInclusive<usize> = 9..=12;

const AVATAR_BASE_URL: &str = "https://ui-avatars.com/api/";

/// Registry defaults for residents whose sheet leaves these blank.
pub const DEFAULT_ETHNICITY: &str = "Kinh";
pub const DEFAULT_RELIGION: &str = "Không";

/// Characters `encodeURIComponent` leaves alone.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex")
});

static EMPTY_CELL: CellValue = CellValue::Empty;

// Tokens are compared after header normalization, so they are diacritic-free.
const MALE_TOKENS: &[&str] = &["nam", "male", "m", "boy", "trai"];
const FEMALE_TOKENS: &[&str] = &["nu", "female", "f", "girl", "gai"];
const OTHER_TOKENS: &[&str] = &["khac", "other", "o"];
const TRUTHY_TOKENS: &[&str] = &["true", "yes", "y", "1", "x", "co"];

/// Knobs for row transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Title-case names and proper-case addresses and hometowns.
    pub normalize_case: bool,
    /// Status given to records that do not carry one.
    pub default_status: ResidentStatus,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            normalize_case: true,
            default_status: ResidentStatus::Active,
        }
    }
}

/// Applies one rule per mapped field and collects errors and warnings.
#[derive(Debug, Clone, Default)]
pub struct RowValidator {
    options: ValidationOptions,
}

impl RowValidator {
    pub fn new(options: ValidationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ValidationOptions {
        self.options
    }

    /// Validate one data row; `row_number` is the 1-based spreadsheet row.
    pub fn validate_row(
        &self,
        row: &[CellValue],
        headers: &[String],
        mapping: &FieldMapping,
        row_number: usize,
    ) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new(row_number);
        for (field, column) in effective_columns(headers, mapping) {
            let cell = row.get(column).unwrap_or(&EMPTY_CELL);
            self.apply_rule(field, cell, &mut outcome);
        }
        require_present(&mut outcome);
        self.apply_defaults(&mut outcome.record);
        outcome
    }

    /// Validate every row in order. The first data row is spreadsheet row 2.
    pub fn validate_all(
        &self,
        rows: &[Vec<CellValue>],
        headers: &[String],
        mapping: &FieldMapping,
    ) -> Vec<ValidationOutcome> {
        rows.iter()
            .enumerate()
            .map(|(index, row)| self.validate_row(row, headers, mapping, index + 2))
            .collect()
    }

    /// Validate every row of `table`, numbering rows by their sheet position.
    pub fn validate_table(&self, table: &SpreadsheetTable, mapping: &FieldMapping) -> ValidationReport {
        let outcomes = table
            .rows()
            .iter()
            .enumerate()
            .map(|(index, row)| {
                self.validate_row(row, table.headers(), mapping, table.row_number(index))
            })
            .collect();
        let report = ValidationReport::new(outcomes);
        tracing::info!(
            rows = table.row_count(),
            valid = report.valid_count(),
            invalid = report.invalid_count(),
            warnings = report.warning_count(),
            "validated rows"
        );
        report
    }

    fn apply_rule(&self, field: TargetField, cell: &CellValue, outcome: &mut ValidationOutcome) {
        let raw = cell.to_text();
        match field.kind() {
            FieldKind::Name | FieldKind::Address => {
                if raw.is_empty() {
                    outcome.push_error(FieldIssue::new(field, raw, "is required"));
                    return;
                }
                let value = match (self.options.normalize_case, field.kind()) {
                    (false, _) => raw,
                    (true, FieldKind::Name) => title_case(&raw),
                    (true, _) => format_address(&raw),
                };
                set_text(&mut outcome.record, field, value);
            }
            FieldKind::Phone => {
                if raw.is_empty() {
                    outcome.push_error(FieldIssue::new(field, raw, "is required"));
                    return;
                }
                let digits = digits_only(&raw);
                if digits.len() < MIN_PHONE_DIGITS {
                    let message = format!(
                        "must contain at least {MIN_PHONE_DIGITS} digits (found {})",
                        digits.len()
                    );
                    outcome.push_error(FieldIssue::new(field, raw, message));
                    return;
                }
                set_text(&mut outcome.record, field, digits);
            }
            FieldKind::Date => {
                if cell.is_blank() {
                    outcome.push_error(FieldIssue::new(field, raw, "is required"));
                    return;
                }
                match parse_date_cell(cell) {
                    Some(date) => set_text(&mut outcome.record, field, format_date(date)),
                    None => outcome.push_error(FieldIssue::new(
                        field,
                        raw,
                        "unrecognized date, expected DD/MM/YYYY, YYYY-MM-DD or a spreadsheet date",
                    )),
                }
            }
            FieldKind::OptionalDate => {
                if cell.is_blank() {
                    return;
                }
                match parse_date_cell(cell).or_else(|| parse_date_text(&raw)) {
                    Some(date) => set_text(&mut outcome.record, field, format_date(date)),
                    None => outcome.push_warning(FieldIssue::new(
                        field,
                        raw,
                        "unrecognized date, value dropped",
                    )),
                }
            }
            FieldKind::Gender => {
                if raw.is_empty() {
                    outcome.push_error(FieldIssue::new(field, raw, "is required"));
                    return;
                }
                match parse_gender(&raw) {
                    Some(gender) => outcome.record.gender = Some(gender),
                    None => outcome.push_error(FieldIssue::new(
                        field,
                        raw,
                        "unrecognized gender, expected Nam, Nữ or Khác",
                    )),
                }
            }
            FieldKind::Email => {
                if raw.is_empty() {
                    return;
                }
                if is_valid_email(&raw) {
                    set_text(&mut outcome.record, field, raw.to_lowercase());
                } else {
                    outcome.push_warning(FieldIssue::new(
                        field,
                        raw,
                        "malformed email address, value dropped",
                    ));
                }
            }
            FieldKind::IdentityCard => {
                if raw.is_empty() {
                    return;
                }
                let digits = digits_only(&raw);
                if !IDENTITY_CARD_DIGITS.contains(&digits.len()) {
                    let message = format!(
                        "expected {} to {} digits (found {})",
                        IDENTITY_CARD_DIGITS.start(),
                        IDENTITY_CARD_DIGITS.end(),
                        digits.len()
                    );
                    outcome.push_warning(FieldIssue::new(field, raw, message));
                }
                if !digits.is_empty() {
                    set_text(&mut outcome.record, field, digits);
                }
            }
            FieldKind::Flag => {
                if raw.is_empty() {
                    return;
                }
                if let Some(slot) = outcome.record.flag_slot(field) {
                    *slot = Some(is_truthy(&raw));
                }
            }
            FieldKind::Text => {
                if raw.is_empty() {
                    return;
                }
                let value = if self.options.normalize_case && field == TargetField::Hometown {
                    format_address(&raw)
                } else {
                    raw
                };
                set_text(&mut outcome.record, field, value);
            }
        }
    }

    fn apply_defaults(&self, record: &mut ResidentRecord) {
        if record.status.is_none() {
            record.status = Some(self.options.default_status);
        }
        if record.ethnicity.is_none() {
            record.ethnicity = Some(DEFAULT_ETHNICITY.to_string());
        }
        if record.religion.is_none() {
            record.religion = Some(DEFAULT_RELIGION.to_string());
        }
        record.is_party_member.get_or_insert(false);
        if record.avatar.is_none()
            && let Some(name) = record.full_name.as_deref()
        {
            record.avatar = Some(avatar_url(name));
        }
    }
}

/// Column feeding each field; when several columns share a field the
/// rightmost one wins.
fn effective_columns(headers: &[String], mapping: &FieldMapping) -> BTreeMap<TargetField, usize> {
    let mut columns = BTreeMap::new();
    for (index, header) in headers.iter().enumerate() {
        if let Some(field) = mapping.get(header) {
            columns.insert(field, index);
        }
    }
    columns
}

/// Every required field ends up either in the record or in the errors.
fn require_present(outcome: &mut ValidationOutcome) {
    for field in TargetField::required() {
        let reported = outcome.errors.iter().any(|issue| issue.field == field);
        if !reported && !outcome.record.has_value(field) {
            outcome.push_error(FieldIssue::new(field, "", "is required"));
        }
    }
}

fn set_text(record: &mut ResidentRecord, field: TargetField, value: String) {
    if let Some(slot) = record.text_slot(field) {
        *slot = Some(value);
    }
}

/// Map a gender token onto one of the three buckets.
pub fn parse_gender(raw: &str) -> Option<Gender> {
    let token = normalize_header(raw);
    if MALE_TOKENS.contains(&token.as_str()) {
        Some(Gender::Male)
    } else if FEMALE_TOKENS.contains(&token.as_str()) {
        Some(Gender::Female)
    } else if OTHER_TOKENS.contains(&token.as_str()) {
        Some(Gender::Other)
    } else {
        None
    }
}

pub fn is_truthy(raw: &str) -> bool {
    TRUTHY_TOKENS.contains(&normalize_header(raw).as_str())
}

pub fn is_valid_email(raw: &str) -> bool {
    EMAIL_PATTERN.is_match(raw.trim())
}

/// Generated avatar for residents without a photo.
pub fn avatar_url(name: &str) -> String {
    format!(
        "{AVATAR_BASE_URL}?name={}&background=random&color=fff",
        utf8_percent_encode(name, URI_COMPONENT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_synonyms() {
        assert_eq!(parse_gender("NAM"), Some(Gender::Male));
        assert_eq!(parse_gender("Nữ"), Some(Gender::Female));
        assert_eq!(parse_gender("female"), Some(Gender::Female));
        assert_eq!(parse_gender("Khác"), Some(Gender::Other));
        assert_eq!(parse_gender("unknown"), None);
    }

    #[test]
    fn truthy_tokens() {
        assert!(is_truthy("Có"));
        assert!(is_truthy("x"));
        assert!(is_truthy("1"));
        assert!(!is_truthy("Không"));
        assert!(!is_truthy("0"));
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("nguyenvana@email.com"));
        assert!(!is_valid_email("nguyenvana@email"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(is_valid_email("  lethid@email.com "));
    }

    #[test]
    fn avatar_encodes_name() {
        assert_eq!(
            avatar_url("Lê Văn C"),
            "https://ui-avatars.com/api/?name=L%C3%AA%20V%C4%83n%20C&background=random&color=fff"
        );
    }
}
