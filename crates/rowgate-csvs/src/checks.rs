/*!
# Declarative Checks

Column validators and batch rules that can be written in a schema file.
Each compiles into the closure-based types the validator consumes.
*/

use crate::{
    errors::{CsvError, CsvResult},
    schemas::{Row, Validator},
    validation::BatchCheck,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ================================================================================================
// Value Checks
// ================================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueCheck {
    /// ASCII digits only
    Integer,

    /// Any finite floating point number
    Decimal,

    /// The whole value must match `pattern`
    Pattern { pattern: String },

    /// Value must be one of `values`
    OneOf {
        values: Vec<String>,
        #[serde(default)]
        case_insensitive: bool,
    },

    /// Character count bounds, inclusive
    Length {
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
    },
}

impl ValueCheck {
    pub fn compile(&self) -> CsvResult<Validator> {
        let validator = match self {
            Self::Integer => Validator::new(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit())),
            Self::Decimal => Validator::new(|v| v.parse::<f64>().map(f64::is_finite).unwrap_or(false)),
            Self::Pattern { pattern } => {
                // Anchor so partial matches don't pass
                let re = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
                    CsvError::InvalidFormat(format!("invalid pattern '{}': {}", pattern, e))
                })?;
                Validator::new(move |v| re.is_match(v))
            }
            Self::OneOf {
                values,
                case_insensitive,
            } => {
                if *case_insensitive {
                    let allowed: HashSet<String> = values.iter().map(|v| v.to_lowercase()).collect();
                    Validator::new(move |v| allowed.contains(&v.to_lowercase()))
                } else {
                    let allowed: HashSet<String> = values.iter().cloned().collect();
                    Validator::new(move |v| allowed.contains(v))
                }
            }
            Self::Length { min, max } => {
                if let (Some(min), Some(max)) = (min, max) {
                    if min > max {
                        return Err(CsvError::InvalidFormat(format!(
                            "length check has min {} greater than max {}",
                            min, max
                        )));
                    }
                }
                let (min, max) = (*min, *max);
                Validator::new(move |v| {
                    let len = v.chars().count();
                    min.map_or(true, |m| len >= m) && max.map_or(true, |m| len <= m)
                })
            }
        };
        Ok(validator)
    }
}

// ================================================================================================
// Batch Rules
// ================================================================================================

/// Checks over the full set of rows that passed every column rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchRules {
    /// Columns whose trimmed, non-empty values must not repeat
    #[serde(default)]
    pub unique: Vec<String>,

    #[serde(default)]
    pub min_rows: Option<usize>,

    #[serde(default)]
    pub max_rows: Option<usize>,
}

impl BatchRules {
    pub fn is_empty(&self) -> bool {
        self.unique.is_empty() && self.min_rows.is_none() && self.max_rows.is_none()
    }
}

impl BatchCheck for BatchRules {
    fn check(&self, rows: &[Row]) -> Option<String> {
        if let Some(min) = self.min_rows {
            if rows.len() < min {
                return Some(format!("At least {} row(s) required.", min));
            }
        }
        if let Some(max) = self.max_rows {
            if rows.len() > max {
                return Some(format!("At most {} rows allowed.", max));
            }
        }

        for column in &self.unique {
            let mut seen = HashSet::new();
            for row in rows {
                let value = row.get(column).map(str::trim).unwrap_or("");
                if !value.is_empty() && !seen.insert(value) {
                    return Some(format!(
                        "Duplicate value \"{}\" in column \"{}\".",
                        value, column
                    ));
                }
            }
        }

        None
    }
}

// ================================================================================================
// Tests
// ================================================================================================
