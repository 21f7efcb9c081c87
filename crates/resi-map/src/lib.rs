//! Column-to-field mapping for resident imports.
//!
//! [`FieldMapper`] never fails: with an assist service configured it asks
//! the service first and falls back to the [`RuleMapper`] on any error;
//! without one it uses the rules directly.

use resi_model::{CellValue, FieldMapping, TargetField};

mod assist;
mod engine;
mod error;
mod gemini;
mod normalize;
mod score;

pub use assist::{
    AssistAnswer, AssistMapper, PROMPT_SAMPLE_ROWS, TextGenerator, build_prompt,
    extract_json_object, parse_mapping_response,
};
pub use engine::{ACCEPT_THRESHOLD, ColumnMatch, MappingResult, MappingStrategy, RuleMapper};
pub use error::{AssistError, Result};
pub use gemini::{DEFAULT_GEMINI_MODEL, GeminiClient};
pub use normalize::{compact, normalize_header};
pub use score::{FieldPatterns, FieldScore, MatchSignal, similarity};

/// Primary/fallback composition of the assist service and the rule engine.
pub struct FieldMapper {
    rules: RuleMapper,
    assist: Option<AssistMapper<Box<dyn TextGenerator>>>,
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::rules_only()
    }
}

impl FieldMapper {
    pub fn rules_only() -> Self {
        Self {
            rules: RuleMapper::new(),
            assist: None,
        }
    }

    pub fn with_assist(generator: Box<dyn TextGenerator>) -> Self {
        Self {
            rules: RuleMapper::new(),
            assist: Some(AssistMapper::new(generator)),
        }
    }

    pub fn rules(&self) -> &RuleMapper {
        &self.rules
    }

    /// Best-effort mapping of `headers`; never fails.
    pub fn map(&self, headers: &[String], sample_rows: &[Vec<CellValue>]) -> MappingResult {
        let Some(assist) = &self.assist else {
            return self.rules.map(headers);
        };
        match assist.suggest(headers, sample_rows) {
            Ok(answer) => {
                let columns = headers
                    .iter()
                    .map(|header| match answer.get(header) {
                        Some(field) => ColumnMatch {
                            header: header.clone(),
                            normalized: normalize_header(header),
                            field: *field,
                            score: if field.is_some() { 1.0 } else { 0.0 },
                            signal: field.map(|_| MatchSignal::Assist),
                        },
                        None => self.rules.match_column(header),
                    })
                    .collect();
                tracing::info!(headers = headers.len(), "assisted mapping accepted");
                MappingResult::from_columns(columns, MappingStrategy::Assisted)
            }
            Err(error) => {
                tracing::warn!(%error, "assisted mapping failed, using rule-based mapping");
                let mut result = self.rules.map(headers);
                result.strategy = MappingStrategy::RulesFallback;
                result
            }
        }
    }
}

/// Required fields with no column mapped to them.
pub fn missing_required(mapping: &FieldMapping) -> Vec<TargetField> {
    mapping.missing_required()
}
