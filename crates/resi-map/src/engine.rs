//! Rule-based mapping engine.

use resi_model::{FieldMapping, TargetField};
use serde::Serialize;

use crate::normalize::normalize_header;
use crate::score::{FieldPatterns, FieldScore, MatchSignal, schema_patterns};

/// Scores must exceed this to be accepted.
pub const ACCEPT_THRESHOLD: f64 = 0.5;

/// How the final mapping was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingStrategy {
    /// Rule engine only; no assist service configured.
    Rules,
    /// Assist service answer, rules filling headers it omitted.
    Assisted,
    /// Assist service failed; rule engine result used instead.
    RulesFallback,
}

/// Mapping decision for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMatch {
    pub header: String,
    pub normalized: String,
    pub field: Option<TargetField>,
    pub score: f64,
    pub signal: Option<MatchSignal>,
}

impl ColumnMatch {
    fn unmapped(header: &str, normalized: String) -> Self {
        Self {
            header: header.to_string(),
            normalized,
            field: None,
            score: 0.0,
            signal: None,
        }
    }

    fn from_score(header: &str, normalized: String, score: FieldScore) -> Self {
        Self {
            header: header.to_string(),
            normalized,
            field: Some(score.field),
            score: score.score,
            signal: Some(score.signal),
        }
    }
}

/// Result of a mapping operation.
#[derive(Debug, Clone, Serialize)]
pub struct MappingResult {
    pub mapping: FieldMapping,
    pub columns: Vec<ColumnMatch>,
    pub strategy: MappingStrategy,
}

impl MappingResult {
    pub(crate) fn from_columns(columns: Vec<ColumnMatch>, strategy: MappingStrategy) -> Self {
        let mut mapping = FieldMapping::new();
        for column in &columns {
            mapping.set(&column.header, column.field);
        }
        Self {
            mapping,
            columns,
            strategy,
        }
    }

    /// Headers left without a field.
    pub fn unmapped_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|column| column.field.is_none())
            .map(|column| column.header.as_str())
            .collect()
    }

    pub fn missing_required(&self) -> Vec<TargetField> {
        self.mapping.missing_required()
    }
}

/// Deterministic header-to-field matcher over the resident schema.
///
/// Each header is scored against every field in schema order; the highest
/// score above [`ACCEPT_THRESHOLD`] wins and the earliest field wins ties.
///
/// # Example
///
/// ```ignore
/// use resi_map::RuleMapper;
///
/// let engine = RuleMapper::new();
/// let result = engine.map(&["HỌ TÊN".to_string(), "SĐT".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct RuleMapper {
    patterns: Vec<FieldPatterns>,
    threshold: f64,
}

impl Default for RuleMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleMapper {
    pub fn new() -> Self {
        Self {
            patterns: schema_patterns(),
            threshold: ACCEPT_THRESHOLD,
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Every field's score for a raw header, best first; ties keep schema order.
    pub fn score_all(&self, header: &str) -> Vec<FieldScore> {
        let normalized = normalize_header(header);
        let mut scores: Vec<FieldScore> = self
            .patterns
            .iter()
            .filter_map(|patterns| patterns.score(&normalized))
            .collect();
        scores.sort_by(|a, b| b.score.total_cmp(&a.score));
        scores
    }

    /// Winning field for a normalized header, if any clears the threshold.
    pub fn best_match(&self, normalized: &str) -> Option<FieldScore> {
        let mut best: Option<FieldScore> = None;
        for patterns in &self.patterns {
            let Some(candidate) = patterns.score(normalized) else {
                continue;
            };
            if candidate.score <= self.threshold {
                continue;
            }
            if best
                .as_ref()
                .is_none_or(|current| candidate.score > current.score)
            {
                best = Some(candidate);
            }
        }
        best
    }

    pub fn match_column(&self, header: &str) -> ColumnMatch {
        let normalized = normalize_header(header);
        match self.best_match(&normalized) {
            Some(score) => ColumnMatch::from_score(header, normalized, score),
            None => ColumnMatch::unmapped(header, normalized),
        }
    }

    /// Map every header independently.
    pub fn map(&self, headers: &[String]) -> MappingResult {
        let columns: Vec<ColumnMatch> = headers
            .iter()
            .map(|header| self.match_column(header))
            .collect();
        tracing::debug!(
            columns = columns.len(),
            mapped = columns.iter().filter(|column| column.field.is_some()).count(),
            "rule-based mapping complete"
        );
        MappingResult::from_columns(columns, MappingStrategy::Rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_go_to_the_earlier_field() {
        let engine = RuleMapper::new();
        // Both "phone" and "email" are substrings here, scoring 0.9 each.
        let best = engine.best_match("phone email").unwrap();
        assert_eq!(best.score, 0.9);
        assert_eq!(best.field, TargetField::PhoneNumber);
    }

    #[test]
    fn score_all_puts_best_first() {
        let scores = RuleMapper::new().score_all("Email");
        assert_eq!(scores[0].field, TargetField::Email);
        assert_eq!(scores[0].score, 1.0);
    }

    #[test]
    fn typo_headers_keep_their_raw_similarity() {
        assert_eq!(ACCEPT_THRESHOLD, 0.5);
        let best = RuleMapper::new().best_match("gioi tjnh").unwrap();
        assert_eq!(best.field, TargetField::Gender);
        assert_eq!(best.signal, MatchSignal::Similarity);
        assert!((best.score - (1.0 - 1.0 / 9.0)).abs() < 1e-9);
    }

    #[test]
    fn threshold_is_exclusive() {
        let engine = RuleMapper::new().with_threshold(1.0);
        assert!(engine.best_match("ho ten").is_none());
    }
}
