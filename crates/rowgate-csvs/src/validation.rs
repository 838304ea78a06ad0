/*!
# Row Validation

Applies column rules to parsed rows. Any per-row failure rejects the whole
batch; only a clean batch reaches the caller's [`BatchCheck`].
*/

use crate::schemas::{ColumnRule, Row};
use tracing::debug;

// ================================================================================================
// Outcome
// ================================================================================================

/// Result of validating one parsed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Every row passed; these are the accepted rows
    Accepted(Vec<Row>),

    /// Non-empty, ordered list of user-facing messages; no rows accepted
    Rejected(Vec<String>),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn rows(&self) -> &[Row] {
        match self {
            Self::Accepted(rows) => rows,
            Self::Rejected(_) => &[],
        }
    }

    pub fn errors(&self) -> &[String] {
        match self {
            Self::Accepted(_) => &[],
            Self::Rejected(errors) => errors,
        }
    }
}

// ================================================================================================
// Batch Check
// ================================================================================================

/// Caller-supplied check run once over the rows that passed every column rule
///
/// Returning `None` or an empty string accepts the batch.
pub trait BatchCheck {
    fn check(&self, rows: &[Row]) -> Option<String>;
}

impl<F> BatchCheck for F
where
    F: Fn(&[Row]) -> Option<String>,
{
    fn check(&self, rows: &[Row]) -> Option<String> {
        self(rows)
    }
}

/// Batch check that accepts everything
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl BatchCheck for AcceptAll {
    fn check(&self, _rows: &[Row]) -> Option<String> {
        None
    }
}

// ================================================================================================
// Validation
// ================================================================================================

/// Display number for the zero-based data row `index`: 1-based, plus the header line
pub fn display_row_number(index: usize) -> usize {
    index + 2
}

/// Validate `rows` against `rules`, then against `batch_check`
pub fn validate_rows(
    rows: &[Row],
    rules: &[ColumnRule],
    batch_check: &dyn BatchCheck,
) -> ValidationOutcome {
    let mut errors = Vec::new();
    let mut retained = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let row_errors = check_row(index, row, rules);
        if row_errors.is_empty() {
            retained.push(row.clone());
        } else {
            errors.extend(row_errors);
        }
    }

    if !errors.is_empty() {
        debug!(
            errors = errors.len(),
            passed = retained.len(),
            "rejecting batch on row errors"
        );
        return ValidationOutcome::Rejected(errors);
    }

    match batch_check.check(&retained) {
        Some(message) if !message.is_empty() => {
            debug!(%message, "batch check rejected rows");
            ValidationOutcome::Rejected(vec![message])
        }
        _ => ValidationOutcome::Accepted(retained),
    }
}

fn check_row(index: usize, row: &Row, rules: &[ColumnRule]) -> Vec<String> {
    let row_number = display_row_number(index);
    let mut errors = Vec::new();

    for rule in rules {
        let raw = row.get(&rule.name).unwrap_or("");

        if rule.required && raw.trim().is_empty() {
            errors.push(format!(
                "Row {}: Missing required field \"{}\".",
                row_number, rule.name
            ));
        } else if !raw.is_empty() {
            if let Some(validator) = &rule.validator {
                if !validator.check(raw) {
                    errors.push(format!(
                        "Row {}: Invalid value in \"{}\".",
                        row_number, rule.name
                    ));
                }
            }
        }
    }

    errors
}

// ================================================================================================
// Tests
// ================================================================================================
