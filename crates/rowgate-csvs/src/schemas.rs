/*!
# Column Schemas

This module defines the types every upload is checked against:

- [`Row`]: one parsed CSV record, keyed by column name
- [`ColumnRule`]: a required flag plus an optional per-value [`Validator`]

Rules are built once per upload session and never mutated afterwards.
*/

use crate::errors::{CsvError, CsvResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

// ================================================================================================
// Row
// ================================================================================================

/// One parsed CSV record as a field-name-to-string mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, String>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw (untrimmed) value for `column`, if the record had that field
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.0.insert(column.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ================================================================================================
// Column Rules
// ================================================================================================

/// Per-value check; receives the raw value whenever it is non-empty
#[derive(Clone)]
pub struct Validator(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl Validator {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(check))
    }

    pub fn check(&self, value: &str) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// Schema entry for a single column
#[derive(Debug, Clone)]
pub struct ColumnRule {
    /// Column name, used as the key into each [`Row`]
    pub name: String,

    /// Whether a blank or absent value is an error
    pub required: bool,

    /// Optional check applied to present values
    pub validator: Option<Validator>,
}

impl ColumnRule {
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            validator: None,
        }
    }

    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            validator: None,
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_check<F>(self, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.with_validator(Validator::new(check))
    }
}

/// Ensure rule names are non-empty and unique
pub fn validate_rules(rules: &[ColumnRule]) -> CsvResult<()> {
    let mut seen = HashSet::new();
    for (i, rule) in rules.iter().enumerate() {
        if rule.name.trim().is_empty() {
            return Err(CsvError::SchemaValidation(format!(
                "column {} has an empty name",
                i + 1
            )));
        }
        if !seen.insert(rule.name.as_str()) {
            return Err(CsvError::SchemaValidation(format!(
                "duplicate column name '{}'",
                rule.name
            )));
        }
    }
    Ok(())
}

/// Header line for the downloadable template: names joined by commas, unquoted
pub fn template_header(rules: &[ColumnRule]) -> String {
    rules
        .iter()
        .map(|rule| rule.name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_header_joins_names_in_order() {
        let rules = vec![ColumnRule::required("id"), ColumnRule::optional("age")];
        assert_eq!(template_header(&rules), "id,age");
    }

    #[test]
    fn test_template_header_does_not_quote() {
        let rules = vec![
            ColumnRule::optional("full name"),
            ColumnRule::optional("a\"b"),
        ];
        assert_eq!(template_header(&rules), "full name,a\"b");
        assert_eq!(template_header(&[]), "");
    }

    #[test]
    fn test_validator_capability() {
        let rule = ColumnRule::optional("age").with_check(|v| v.chars().all(|c| c.is_ascii_digit()));
        let validator = rule.validator.as_ref().unwrap();
        assert!(validator.check("42"));
        assert!(!validator.check("abc"));
        assert!(ColumnRule::optional("x").validator.is_none());
    }

    #[test]
    fn test_validate_rules_rejects_duplicates_and_blanks() {
        let ok = vec![ColumnRule::required("id"), ColumnRule::optional("age")];
        validate_rules(&ok).unwrap();

        let dup = vec![ColumnRule::required("id"), ColumnRule::optional("id")];
        let err = validate_rules(&dup).unwrap_err();
        assert!(err.to_string().contains("duplicate column name 'id'"));

        let blank = vec![ColumnRule::optional("  ")];
        assert!(validate_rules(&blank).is_err());
    }

    #[test]
    fn test_row_serializes_as_plain_map() {
        let row: Row = [("id", "1"), ("age", "30")].into_iter().collect();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"age":"30","id":"1"}"#);
        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
        assert_eq!(back.get("id"), Some("1"));
        assert_eq!(back.get("missing"), None);
    }
}
