pub mod error;
pub mod field;
pub mod mapping;
pub mod outcome;
pub mod record;
pub mod stats;
pub mod table;

pub use error::{ModelError, Result};
pub use field::{FieldKind, FieldSpec, SCHEMA, TargetField};
pub use mapping::FieldMapping;
pub use outcome::{FieldIssue, ValidationOutcome};
pub use record::{Gender, ResidentRecord, ResidentStatus};
pub use stats::{ImportRunStats, RecordFailure};
pub use table::{CellValue, SpreadsheetTable};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_validity_follows_errors() {
        let mut outcome = ValidationOutcome::new(2);
        outcome.push_warning(FieldIssue::new(TargetField::Email, "x@", "malformed email"));
        assert!(outcome.valid());
        outcome.push_error(FieldIssue::new(TargetField::PhoneNumber, "", "phone number is required"));
        assert!(!outcome.valid());
        assert_eq!(
            outcome.error_messages().collect::<Vec<_>>(),
            vec!["Row 2: phoneNumber: phone number is required".to_string()]
        );
    }

    #[test]
    fn outcome_serializes() {
        let outcome = ValidationOutcome::new(3);
        let json = serde_json::to_string(&outcome).expect("serialize outcome");
        let round: ValidationOutcome = serde_json::from_str(&json).expect("deserialize outcome");
        assert_eq!(round.row_number, 3);
    }
}
