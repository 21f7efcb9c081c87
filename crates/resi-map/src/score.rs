//! Per-field scoring of a normalized header.
//!
//! Three signals are computed and combined by taking the maximum:
//! example match (exact 1.0, substring 0.9), edit-distance similarity
//! against each example, and keyword containment (0.8).

use std::fmt;

use rapidfuzz::distance::levenshtein;
use resi_model::{FieldSpec, SCHEMA, TargetField};
use serde::Serialize;

use crate::normalize::{compact, normalize_header};

pub const EXACT_SCORE: f64 = 1.0;
pub const SUBSTRING_SCORE: f64 = 0.9;
pub const KEYWORD_SCORE: f64 = 0.8;

/// Keywords this short must equal a whole header token.
const TOKEN_KEYWORD_MAX_LEN: usize = 4;
/// Shortest string allowed to count as a substring hit.
const SUBSTRING_MIN_LEN: usize = 2;

/// Which signal produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSignal {
    Exact,
    Substring,
    Similarity,
    Keyword,
    /// Chosen by the external-assist service.
    Assist,
}

impl fmt::Display for MatchSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchSignal::Exact => "exact",
            MatchSignal::Substring => "substring",
            MatchSignal::Similarity => "similarity",
            MatchSignal::Keyword => "keyword",
            MatchSignal::Assist => "assist",
        })
    }
}

/// Score of one header against one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldScore {
    pub field: TargetField,
    pub score: f64,
    pub signal: MatchSignal,
    /// Example or keyword that produced the score.
    pub matched: String,
}

impl FieldScore {
    /// Human-readable explanation of the score.
    pub fn explain(&self) -> String {
        format!(
            "{}: {:.0}% ({} on '{}')",
            self.field,
            self.score * 100.0,
            self.signal,
            self.matched
        )
    }
}

/// Pre-normalized match material for one field.
#[derive(Debug, Clone)]
pub struct FieldPatterns {
    pub field: TargetField,
    examples: Vec<String>,
    keywords: &'static [&'static str],
}

impl FieldPatterns {
    pub fn from_spec(spec: &FieldSpec) -> Self {
        let mut examples: Vec<String> = Vec::with_capacity(spec.examples.len());
        for example in spec.examples {
            let normalized = normalize_header(example);
            if !normalized.is_empty() && !examples.contains(&normalized) {
                examples.push(normalized);
            }
        }
        Self {
            field: spec.field,
            examples,
            keywords: spec.keywords,
        }
    }

    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    /// Best score of a normalized header against this field.
    pub fn score(&self, header: &str) -> Option<FieldScore> {
        if header.is_empty() {
            return None;
        }
        let mut best: Option<FieldScore> = None;
        let mut offer = |score: f64, signal: MatchSignal, matched: &str| {
            if best.as_ref().is_none_or(|current| score > current.score) {
                best = Some(FieldScore {
                    field: self.field,
                    score,
                    signal,
                    matched: matched.to_string(),
                });
            }
        };

        for example in &self.examples {
            if header == example {
                offer(EXACT_SCORE, MatchSignal::Exact, example);
                continue;
            }
            if is_substring_either_way(header, example) {
                offer(SUBSTRING_SCORE, MatchSignal::Substring, example);
            }
            offer(similarity(header, example), MatchSignal::Similarity, example);
        }

        let tokens: Vec<&str> = header.split(' ').collect();
        let compacted = compact(header);
        for keyword in self.keywords {
            let hit = if keyword.len() <= TOKEN_KEYWORD_MAX_LEN {
                tokens.contains(keyword)
            } else {
                compacted.contains(keyword)
            };
            if hit {
                offer(KEYWORD_SCORE, MatchSignal::Keyword, keyword);
            }
        }
        best
    }
}

/// `1 - levenshtein / max(len)`, in characters.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let distance = levenshtein::distance(a.chars(), b.chars());
    let longest = a.chars().count().max(b.chars().count());
    1.0 - distance as f64 / longest as f64
}

fn is_substring_either_way(a: &str, b: &str) -> bool {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    short.chars().count() >= SUBSTRING_MIN_LEN && long.contains(short)
}

/// Patterns for every schema field, in schema order.
pub fn schema_patterns() -> Vec<FieldPatterns> {
    SCHEMA.iter().map(FieldPatterns::from_spec).collect()
}
