/*!
# Rowgate CSV Intake

This crate turns a user-selected CSV file into a set of validated rows.

## Pipeline

1. **Intake** (`intake`): the file must be a `.csv` within the size limit
2. **Parsing** (`intake`): the `csv` crate reads a header line plus records into [`Row`]s
3. **Row validation** (`validation`): every [`ColumnRule`] is applied to every row
4. **Batch check** (`validation`): one caller-supplied [`BatchCheck`] over the surviving rows
5. **Display** (`table`): accepted rows are paged 5 or 10 at a time

Any row error rejects the whole file; nothing is partially accepted.

## Error Messages

Validation produces user-facing strings rather than errors:

- `Row <n>: Missing required field "<column>".`
- `Row <n>: Invalid value in "<column>".`

`<n>` counts the header as line 1, so the first data row is `Row 2`.

## Usage

```rust
use rowgate_csvs::{validate_rows, AcceptAll, ColumnRule, Row, ValidationOutcome};

let rules = vec![
    ColumnRule::required("id"),
    ColumnRule::optional("age").with_check(|v| v.chars().all(|c| c.is_ascii_digit())),
];
let rows: Vec<Row> = vec![[("id", "1"), ("age", "abc")].into_iter().collect()];

match validate_rows(&rows, &rules, &AcceptAll) {
    ValidationOutcome::Accepted(rows) => println!("{} rows accepted", rows.len()),
    ValidationOutcome::Rejected(errors) => assert_eq!(errors, ["Row 2: Invalid value in \"age\"."]),
}
```
*/

pub mod checks;
pub mod errors;
pub mod intake;
pub mod schemas;
pub mod session;
pub mod table;
pub mod validation;

// Re-export main types for convenience
pub use checks::{BatchRules, ValueCheck};
pub use errors::{CsvError, CsvResult};
pub use intake::{
    parse_csv, screen_file, write_template, FileInput, IntakeSettings, ParseFailure, ParsedCsv,
    Rejection, DEFAULT_MAX_FILE_SIZE_BYTES, TEMPLATE_FILE_NAME,
};
pub use schemas::{template_header, validate_rules, ColumnRule, Row, Validator};
pub use session::{JsonRowsFile, PreviousUploadSource, UploadSession, UploadState};
pub use table::{Pagination, PAGE_SIZE_OPTIONS};
pub use validation::{display_row_number, validate_rows, AcceptAll, BatchCheck, ValidationOutcome};
