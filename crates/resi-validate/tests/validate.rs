use chrono::NaiveDate;
use proptest::prelude::*;
use resi_model::{
    CellValue, FieldMapping, Gender, ResidentStatus, SpreadsheetTable, TargetField,
};
use resi_validate::{RowValidator, ValidationOptions, format_date, parse_date_text};

const HEADERS: [&str; 8] = [
    "Họ tên",
    "SĐT",
    "Ngày sinh",
    "Giới tính",
    "Địa chỉ",
    "Email",
    "CCCD",
    "Đảng viên",
];

fn headers() -> Vec<String> {
    HEADERS.iter().map(|header| (*header).to_string()).collect()
}

fn mapping() -> FieldMapping {
    let mut mapping = FieldMapping::new();
    let fields = [
        TargetField::FullName,
        TargetField::PhoneNumber,
        TargetField::Dob,
        TargetField::Gender,
        TargetField::Address,
        TargetField::Email,
        TargetField::IdentityCard,
        TargetField::IsPartyMember,
    ];
    for (header, field) in HEADERS.iter().zip(fields) {
        mapping.set(header, Some(field));
    }
    mapping
}

fn row(cells: &[&str]) -> Vec<CellValue> {
    cells.iter().map(|cell| CellValue::from(*cell)).collect()
}

fn complete_row() -> Vec<CellValue> {
    row(&[
        "NGUYỄN VĂN A",
        "090 123 4567",
        "15/08/2014",
        "Nam",
        "28/c4, khu phố 3, phường an phú",
        "NguyenVanA@Email.com",
        "001234567890",
        "Có",
    ])
}

#[test]
fn complete_row_is_normalized() {
    let outcome = RowValidator::default().validate_row(&complete_row(), &headers(), &mapping(), 2);

    assert!(outcome.valid(), "{:?}", outcome.errors);
    assert!(outcome.warnings.is_empty());
    let record = &outcome.record;
    assert_eq!(record.full_name.as_deref(), Some("Nguyễn Văn A"));
    assert_eq!(record.phone_number.as_deref(), Some("0901234567"));
    assert_eq!(record.dob.as_deref(), Some("2014-08-15"));
    assert_eq!(record.gender, Some(Gender::Male));
    assert_eq!(record.address.as_deref(), Some("28/C4, Khu Phố 3, Phường An Phú"));
    assert_eq!(record.email.as_deref(), Some("nguyenvana@email.com"));
    assert_eq!(record.identity_card.as_deref(), Some("001234567890"));
    assert_eq!(record.is_party_member, Some(true));
    assert_eq!(record.status, Some(ResidentStatus::Active));
    assert!(record.avatar.as_deref().is_some_and(|url| url.contains("name=Nguy")));
}

#[test]
fn day_first_birth_date_is_stored_iso() {
    let outcome = RowValidator::default().validate_row(&complete_row(), &headers(), &mapping(), 2);
    assert_eq!(outcome.record.dob.as_deref(), Some("2014-08-15"));
}

#[test]
fn serial_birth_date_is_accepted() {
    let mut cells = complete_row();
    cells[2] = CellValue::DateTime(41866.0);
    let outcome = RowValidator::default().validate_row(&cells, &headers(), &mapping(), 2);
    assert_eq!(outcome.record.dob.as_deref(), Some("2014-08-15"));
}

#[test]
fn missing_phone_column_yields_exactly_one_phone_error() {
    let mut mapping = mapping();
    mapping.set("SĐT", None);

    let outcome = RowValidator::default().validate_row(&complete_row(), &headers(), &mapping, 5);

    assert!(!outcome.valid());
    let phone_errors: Vec<_> = outcome
        .errors
        .iter()
        .filter(|issue| issue.field == TargetField::PhoneNumber)
        .collect();
    assert_eq!(phone_errors.len(), 1);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(
        outcome.error_messages().collect::<Vec<_>>(),
        vec!["Row 5: phoneNumber: is required".to_string()]
    );
}

#[test]
fn blank_phone_cell_yields_exactly_one_phone_error() {
    let mut cells = complete_row();
    cells[1] = CellValue::Empty;
    let outcome = RowValidator::default().validate_row(&cells, &headers(), &mapping(), 2);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].field, TargetField::PhoneNumber);
}

#[test]
fn short_phone_and_bad_gender_are_errors() {
    let mut cells = complete_row();
    cells[1] = CellValue::from("12345");
    cells[3] = CellValue::from("unknown");
    let outcome = RowValidator::default().validate_row(&cells, &headers(), &mapping(), 2);
    let fields: Vec<_> = outcome.errors.iter().map(|issue| issue.field).collect();
    assert_eq!(fields, vec![TargetField::PhoneNumber, TargetField::Gender]);
}

#[test]
fn malformed_optional_values_are_warnings() {
    let mut cells = complete_row();
    cells[5] = CellValue::from("not-an-email");
    cells[6] = CellValue::from("1234");
    let outcome = RowValidator::default().validate_row(&cells, &headers(), &mapping(), 2);

    assert!(outcome.valid());
    assert_eq!(outcome.warnings.len(), 2);
    assert_eq!(outcome.record.email, None);
    assert_eq!(outcome.record.identity_card.as_deref(), Some("1234"));
}

#[test]
fn blank_cells_fall_back_to_registry_defaults() {
    let mut cells = complete_row();
    cells[7] = CellValue::Empty;
    let outcome = RowValidator::default().validate_row(&cells, &headers(), &mapping(), 2);
    let record = &outcome.record;
    assert_eq!(record.is_party_member, Some(false));
    assert_eq!(record.ethnicity.as_deref(), Some("Kinh"));
    assert_eq!(record.religion.as_deref(), Some("Không"));
    assert_eq!(record.is_head_of_household, None);
}

#[test]
fn pending_status_option_marks_every_record() {
    let validator = RowValidator::new(ValidationOptions {
        default_status: ResidentStatus::PendingApproval,
        ..ValidationOptions::default()
    });
    let outcome = validator.validate_row(&complete_row(), &headers(), &mapping(), 2);
    assert_eq!(outcome.record.status, Some(ResidentStatus::PendingApproval));
}

#[test]
fn rightmost_duplicate_column_wins() {
    let mut headers = headers();
    headers.push("Tên khác".to_string());
    let mut mapping = mapping();
    mapping.set("Tên khác", Some(TargetField::FullName));
    let mut cells = complete_row();
    cells.push(CellValue::from("trần thị b"));

    let outcome = RowValidator::default().validate_row(&cells, &headers, &mapping, 2);
    assert_eq!(outcome.record.full_name.as_deref(), Some("Trần Thị B"));
}

#[test]
fn case_normalization_can_be_disabled() {
    let validator = RowValidator::new(ValidationOptions {
        normalize_case: false,
        ..ValidationOptions::default()
    });
    let outcome = validator.validate_row(&complete_row(), &headers(), &mapping(), 2);
    assert_eq!(outcome.record.full_name.as_deref(), Some("NGUYỄN VĂN A"));
}

#[test]
fn report_counts_and_collects_valid_records() {
    let mut broken = complete_row();
    broken[0] = CellValue::Empty;
    let table = SpreadsheetTable::new(headers(), vec![complete_row(), broken, complete_row()]);

    let report = RowValidator::default().validate_table(&table, &mapping());

    assert_eq!(report.total(), 3);
    assert_eq!(report.valid_count(), 2);
    assert_eq!(report.invalid_count(), 1);
    assert_eq!(report.valid_records().len(), 2);
    assert_eq!(report.first_messages(10), vec!["Row 3: fullName: is required".to_string()]);
}

#[test]
fn report_uses_sheet_row_numbers() {
    let mut broken = complete_row();
    broken[0] = CellValue::Empty;
    let table = SpreadsheetTable::with_row_numbers(
        headers(),
        vec![complete_row(), broken],
        vec![2, 5],
    );

    let report = RowValidator::default().validate_table(&table, &mapping());

    assert_eq!(report.valid_row_numbers(), vec![2]);
    assert_eq!(report.first_messages(10), vec!["Row 5: fullName: is required".to_string()]);
}

proptest! {
    #[test]
    fn day_first_dates_round_trip(year in 1900i32..2100, month in 1u32..=12, day in 1u32..=28) {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        let text = format!("{day:02}/{month:02}/{year}");
        let parsed = parse_date_text(&text);
        prop_assert_eq!(parsed, Some(date));
        prop_assert_eq!(format_date(date), format!("{year:04}-{month:02}-{day:02}"));
    }

    #[test]
    fn required_fields_are_present_or_reported(
        blanks in prop::collection::vec(any::<bool>(), 8)
    ) {
        let cells: Vec<CellValue> = complete_row()
            .into_iter()
            .zip(&blanks)
            .map(|(cell, blank)| if *blank { CellValue::Empty } else { cell })
            .collect();
        let outcome = RowValidator::default().validate_row(&cells, &headers(), &mapping(), 2);

        for field in TargetField::required() {
            let reported = outcome.errors.iter().filter(|issue| issue.field == field).count();
            prop_assert!(outcome.record.has_value(field) != (reported == 1));
            prop_assert!(reported <= 1);
        }
        prop_assert_eq!(outcome.valid(), outcome.errors.is_empty());
    }
}
