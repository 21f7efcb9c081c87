//! External-assist mapping: prompt construction and strict response parsing.

use std::collections::BTreeMap;

use resi_model::{CellValue, SCHEMA, TargetField};
use serde_json::Value;

use crate::error::{AssistError, Result};

/// Sample rows included in the prompt.
pub const PROMPT_SAMPLE_ROWS: usize = 3;

/// A text-generation service answering a single prompt.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt)
    }
}

/// Parsed answer: header to field, `None` where the service declined to map.
pub type AssistAnswer = BTreeMap<String, Option<TargetField>>;

/// Asks a [`TextGenerator`] for a mapping and validates its answer.
pub struct AssistMapper<G> {
    generator: G,
}

impl<G: TextGenerator> AssistMapper<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn suggest(&self, headers: &[String], sample_rows: &[Vec<CellValue>]) -> Result<AssistAnswer> {
        let prompt = build_prompt(headers, sample_rows);
        tracing::debug!(
            headers = headers.len(),
            prompt_chars = prompt.len(),
            "requesting assisted mapping"
        );
        let response = self.generator.generate(&prompt)?;
        parse_mapping_response(&response, headers)
    }
}

/// Task description listing the schema, the headers and a few sample rows.
pub fn build_prompt(headers: &[String], sample_rows: &[Vec<CellValue>]) -> String {
    let mut prompt = String::from(
        "You map spreadsheet columns to resident record fields for a community registry.\n\n\
         Target fields:\n",
    );
    for spec in &SCHEMA {
        let required = if spec.required { " (required)" } else { "" };
        prompt.push_str(&format!("- {}{}: {}\n", spec.id, required, spec.description));
    }

    prompt.push_str("\nSpreadsheet headers:\n");
    for (index, header) in headers.iter().enumerate() {
        prompt.push_str(&format!("{}. \"{}\"\n", index + 1, header));
    }

    let samples = &sample_rows[..sample_rows.len().min(PROMPT_SAMPLE_ROWS)];
    if !samples.is_empty() {
        prompt.push_str("\nSample rows:\n");
        for (index, row) in samples.iter().enumerate() {
            let cells = headers
                .iter()
                .enumerate()
                .map(|(column, header)| {
                    let value = row.get(column).map(CellValue::to_text).unwrap_or_default();
                    format!("\"{header}\"=\"{value}\"")
                })
                .collect::<Vec<_>>()
                .join(", ");
            prompt.push_str(&format!("Row {}: {}\n", index + 1, cells));
        }
    }

    prompt.push_str(
        "\nAnswer with a single JSON object and nothing else. Each key is a header \
         exactly as listed above; each value is one field identifier from the list, \
         or null when no field fits. Only map a header when you are confident.\n",
    );
    prompt
}

/// First balanced `{...}` substring, skipping braces inside string literals.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Strictly parse a service answer against the known headers.
///
/// Every key must be a header and every value a field identifier or null;
/// any deviation rejects the whole answer.
pub fn parse_mapping_response(text: &str, headers: &[String]) -> Result<AssistAnswer> {
    if text.trim().is_empty() {
        return Err(AssistError::EmptyResponse);
    }
    let object = extract_json_object(text).ok_or(AssistError::NoJsonObject)?;
    let parsed: serde_json::Map<String, Value> =
        serde_json::from_str(object).map_err(|source| AssistError::InvalidJson { source })?;

    let mut answer = AssistAnswer::new();
    for (key, value) in parsed {
        let header = headers
            .iter()
            .find(|header| header.as_str() == key || header.trim() == key.trim())
            .ok_or_else(|| AssistError::UnknownHeader(key.clone()))?;
        let field = match &value {
            Value::Null => None,
            Value::String(id) if id.trim().is_empty() => None,
            Value::String(id) => Some(id.parse::<TargetField>().map_err(|_| {
                AssistError::UnknownField {
                    header: header.clone(),
                    value: value.to_string(),
                }
            })?),
            other => {
                return Err(AssistError::UnknownField {
                    header: header.clone(),
                    value: other.to_string(),
                });
            }
        };
        answer.insert(header.clone(), field);
    }
    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        vec!["HỌ TÊN".into(), "SĐT".into(), "STT".into()]
    }

    #[test]
    fn extracts_object_from_fenced_reply() {
        let reply = "Here you go:\n```json\n{\"a\": \"}\", \"b\": {\"c\": 1}}\n```\nDone {x}";
        assert_eq!(
            extract_json_object(reply),
            Some("{\"a\": \"}\", \"b\": {\"c\": 1}}")
        );
    }

    #[test]
    fn unbalanced_object_is_not_extracted() {
        assert_eq!(extract_json_object("{\"a\": 1"), None);
        assert_eq!(extract_json_object("no braces"), None);
    }

    #[test]
    fn parses_valid_answer() {
        let reply = r#"{"HỌ TÊN": "fullName", "SĐT": "phoneNumber", "STT": null}"#;
        let answer = parse_mapping_response(reply, &headers()).unwrap();
        assert_eq!(answer["HỌ TÊN"], Some(TargetField::FullName));
        assert_eq!(answer["SĐT"], Some(TargetField::PhoneNumber));
        assert_eq!(answer["STT"], None);
    }

    #[test]
    fn rejects_unknown_field_and_header() {
        let unknown_field = r#"{"HỌ TÊN": "name"}"#;
        assert!(matches!(
            parse_mapping_response(unknown_field, &headers()),
            Err(AssistError::UnknownField { .. })
        ));
        let unknown_header = r#"{"Tuổi": "dob"}"#;
        assert!(matches!(
            parse_mapping_response(unknown_header, &headers()),
            Err(AssistError::UnknownHeader(_))
        ));
        assert!(matches!(
            parse_mapping_response(r#"{"SĐT": 3}"#, &headers()),
            Err(AssistError::UnknownField { .. })
        ));
    }

    #[test]
    fn prompt_lists_fields_headers_and_three_samples() {
        let rows: Vec<Vec<CellValue>> = (0..5)
            .map(|index| vec![CellValue::from(format!("Người {index}"))])
            .collect();
        let prompt = build_prompt(&["HỌ TÊN".to_string()], &rows);
        assert!(prompt.contains("- fullName (required): Họ và tên đầy đủ"));
        assert!(prompt.contains("1. \"HỌ TÊN\""));
        assert!(prompt.contains("Row 3: \"HỌ TÊN\"=\"Người 2\""));
        assert!(!prompt.contains("Row 4"));
    }
}
