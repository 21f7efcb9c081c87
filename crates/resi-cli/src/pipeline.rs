//! Read, map and validate stages.

use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use resi_ingest::IngestError;
use resi_map::{FieldMapper, GeminiClient, MappingResult};
use resi_model::{FieldMapping, SpreadsheetTable, TargetField};
use resi_validate::{RowValidator, ValidationOptions, ValidationReport};
use thiserror::Error;
use tracing::{debug, info, info_span, warn};

use crate::logging::redact_value;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// Required fields have no column; nothing is validated or written.
    #[error("required fields are not mapped: {}", field_list(.missing))]
    MappingIncomplete { missing: Vec<TargetField> },

    /// A `--map` override names a header that is not in the sheet.
    #[error("no column named {header:?} in the spreadsheet")]
    UnknownHeader { header: String },
}

fn field_list(fields: &[TargetField]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Manual `header=field` mapping; an empty or `none` field unmaps the column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnOverride {
    pub header: String,
    pub field: Option<TargetField>,
}

impl FromStr for ColumnOverride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (header, field) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("expected HEADER=FIELD, got {s:?}"))?;
        let header = header.trim();
        if header.is_empty() {
            return Err(format!("missing header in {s:?}"));
        }
        let field = match field.trim() {
            "" | "none" | "null" => None,
            value => Some(TargetField::from_str(value).map_err(|error| error.to_string())?),
        };
        Ok(Self {
            header: header.to_string(),
            field,
        })
    }
}

/// Read and decode the spreadsheet at `path`.
pub fn read_table(path: &Path) -> Result<SpreadsheetTable, IngestError> {
    let span = info_span!("read", path = %path.display());
    let _guard = span.enter();
    let start = Instant::now();
    let table = resi_ingest::read_path(path)?;
    info!(
        rows = table.row_count(),
        columns = table.column_count(),
        duration_ms = start.elapsed().as_millis() as u64,
        "spreadsheet read"
    );
    Ok(table)
}

/// Mapper using the assist service when a key is configured.
pub fn build_mapper(gemini_key: Option<&str>, model: Option<&str>) -> FieldMapper {
    let Some(key) = gemini_key.filter(|key| !key.trim().is_empty()) else {
        debug!("no assist key configured, using rules only");
        return FieldMapper::rules_only();
    };
    match GeminiClient::new(key) {
        Ok(client) => {
            let client = match model {
                Some(model) => client.with_model(model),
                None => client,
            };
            FieldMapper::with_assist(Box::new(client))
        }
        Err(error) => {
            warn!("assist service unavailable, using rules only: {error}");
            FieldMapper::rules_only()
        }
    }
}

/// Map the table's columns, then apply manual overrides.
pub fn map_columns(
    mapper: &FieldMapper,
    table: &SpreadsheetTable,
    overrides: &[ColumnOverride],
) -> Result<MappingResult, PipelineError> {
    let span = info_span!("map", columns = table.column_count());
    let _guard = span.enter();

    let sample = table.sample_rows(resi_map::PROMPT_SAMPLE_ROWS);
    for (index, header) in table.headers().iter().enumerate() {
        if let Some(row) = sample.first()
            && let Some(cell) = row.get(index)
        {
            tracing::trace!(header, sample = redact_value(&cell.to_text()), "column sample");
        }
    }

    let mut result = mapper.map(table.headers(), sample);
    apply_overrides(&mut result, overrides)?;

    for (field, headers) in result.mapping.duplicate_targets() {
        warn!(
            field = field.as_str(),
            columns = headers.join(", "),
            "several columns map to one field, the rightmost column wins"
        );
    }
    info!(
        strategy = ?result.strategy,
        mapped = result.mapping.mapped_count(),
        unmapped = result.unmapped_columns().len(),
        "columns mapped"
    );
    Ok(result)
}

/// Apply `--map` overrides to both the mapping and the per-column report.
pub fn apply_overrides(
    result: &mut MappingResult,
    overrides: &[ColumnOverride],
) -> Result<(), PipelineError> {
    for entry in overrides {
        let column = result
            .columns
            .iter_mut()
            .find(|column| column.header == entry.header)
            .ok_or_else(|| PipelineError::UnknownHeader {
                header: entry.header.clone(),
            })?;
        column.field = entry.field;
        column.score = if entry.field.is_some() { 1.0 } else { 0.0 };
        column.signal = None;
        result.mapping.set(&entry.header, entry.field);
        debug!(header = %entry.header, field = ?entry.field, "mapping overridden");
    }
    Ok(())
}

/// Block progression when a required field has no column.
pub fn ensure_complete(mapping: &FieldMapping) -> Result<(), PipelineError> {
    let missing = resi_map::missing_required(mapping);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::MappingIncomplete { missing })
    }
}

/// Validate every row of `table` under `mapping`.
pub fn validate_rows(
    table: &SpreadsheetTable,
    mapping: &FieldMapping,
    options: ValidationOptions,
) -> ValidationReport {
    let span = info_span!("validate", rows = table.row_count());
    let _guard = span.enter();
    let start = Instant::now();

    let report = RowValidator::new(options).validate_table(table, mapping);
    for outcome in report.invalid_outcomes() {
        for issue in &outcome.errors {
            debug!(
                row = outcome.row_number,
                field = issue.field.as_str(),
                value = redact_value(&issue.raw_value),
                "{}",
                issue.message
            );
        }
    }
    info!(
        valid = report.valid_count(),
        invalid = report.invalid_count(),
        duration_ms = start.elapsed().as_millis() as u64,
        "rows validated"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let parsed: ColumnOverride = "Số ĐT=phoneNumber".parse().unwrap();
        assert_eq!(parsed.header, "Số ĐT");
        assert_eq!(parsed.field, Some(TargetField::PhoneNumber));

        let unmapped: ColumnOverride = "Ghi chú=".parse().unwrap();
        assert_eq!(unmapped.field, None);

        assert!("Ghi chú".parse::<ColumnOverride>().is_err());
        assert!("A=nickname".parse::<ColumnOverride>().is_err());
    }

    #[test]
    fn incomplete_mapping_lists_fields() {
        let error = ensure_complete(&FieldMapping::new()).unwrap_err();
        assert_eq!(
            error.to_string(),
            "required fields are not mapped: fullName, phoneNumber, address, dob, gender"
        );
    }
}
