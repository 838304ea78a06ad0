/*!
# Upload Session

Owns the schema for one upload surface and the transient state of the most
recent attempt. Every upload, clear or previous-upload load replaces
[`UploadState`] wholesale.

```rust
use rowgate_csvs::{ColumnRule, FileInput, UploadSession};

let rules = vec![ColumnRule::required("id")];
let mut session = UploadSession::new(rules).unwrap();

let state = session.upload(FileInput::new("ids.csv", "id\n1\n2\n"));
assert_eq!(state.rows.len(), 2);
assert!(state.errors.is_empty());
```
*/

use crate::{
    errors::{CsvError, CsvResult},
    intake::{parse_csv, screen_file, FileInput, IntakeSettings},
    schemas::{validate_rules, ColumnRule, Row},
    table::Pagination,
    validation::{validate_rows, AcceptAll, BatchCheck, ValidationOutcome},
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Receives the accepted rows after a successful upload
pub type AcceptCallback = Box<dyn FnMut(&[Row])>;

// ================================================================================================
// Previous Uploads
// ================================================================================================

/// Supplies rows that were uploaded and accepted elsewhere
pub trait PreviousUploadSource {
    fn fetch(&self) -> CsvResult<Vec<Row>>;
}

/// Previously accepted rows stored as a JSON array of objects
#[derive(Debug, Clone)]
pub struct JsonRowsFile {
    path: PathBuf,
}

impl JsonRowsFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, rows: &[Row]) -> CsvResult<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, rows)?;
        writer.flush()?;
        Ok(())
    }
}

impl PreviousUploadSource for JsonRowsFile {
    fn fetch(&self) -> CsvResult<Vec<Row>> {
        let file = File::open(&self.path).map_err(|e| {
            CsvError::PreviousUpload(format!("{}: {}", self.path.display(), e))
        })?;
        let rows = serde_json::from_reader(BufReader::new(file))?;
        Ok(rows)
    }
}

// ================================================================================================
// State
// ================================================================================================

/// Transient state of the latest upload attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadState {
    pub file_name: Option<String>,

    /// Accepted rows; empty whenever `errors` or `rejection` is set
    pub rows: Vec<Row>,

    /// Parse or validation messages
    pub errors: Vec<String>,

    /// Size or extension refusal, shown separately from `errors`
    pub rejection: Option<String>,

    pub pagination: Pagination,
}

impl UploadState {
    pub fn is_accepted(&self) -> bool {
        self.rejection.is_none() && self.errors.is_empty() && self.file_name.is_some()
    }

    pub fn visible_rows(&self) -> &[Row] {
        self.pagination.visible(&self.rows)
    }
}

// ================================================================================================
// Session
// ================================================================================================

pub struct UploadSession {
    rules: Vec<ColumnRule>,
    batch_check: Box<dyn BatchCheck>,
    on_accept: Option<AcceptCallback>,
    settings: IntakeSettings,
    state: UploadState,
}

impl UploadSession {
    /// Create a session with default intake settings and no batch check
    pub fn new(rules: Vec<ColumnRule>) -> CsvResult<Self> {
        validate_rules(&rules)?;
        Ok(Self {
            rules,
            batch_check: Box::new(AcceptAll),
            on_accept: None,
            settings: IntakeSettings::default(),
            state: UploadState::default(),
        })
    }

    pub fn with_batch_check(mut self, check: impl BatchCheck + 'static) -> Self {
        self.batch_check = Box::new(check);
        self
    }

    pub fn with_settings(mut self, settings: IntakeSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn on_accept(mut self, callback: impl FnMut(&[Row]) + 'static) -> Self {
        self.on_accept = Some(Box::new(callback));
        self
    }

    pub fn rules(&self) -> &[ColumnRule] {
        &self.rules
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// Screen, parse and validate `file`, replacing the current state
    pub fn upload(&mut self, file: FileInput) -> &UploadState {
        let mut next = UploadState {
            file_name: Some(file.name.clone()),
            ..UploadState::default()
        };

        if let Err(rejection) = screen_file(&file, &self.settings) {
            next.rejection = Some(rejection.to_string());
            self.state = next;
            return &self.state;
        }

        let parsed = match parse_csv(&file.bytes) {
            Ok(parsed) => parsed,
            Err(failure) => {
                warn!(file = %file.name, %failure, "csv parse failed");
                next.errors = vec![failure.to_string()];
                self.state = next;
                return &self.state;
            }
        };

        match validate_rows(&parsed.rows, &self.rules, self.batch_check.as_ref()) {
            ValidationOutcome::Accepted(rows) => {
                info!(file = %file.name, rows = rows.len(), "upload accepted");
                if let Some(callback) = self.on_accept.as_mut() {
                    callback(&rows);
                }
                next.rows = rows;
            }
            ValidationOutcome::Rejected(errors) => {
                info!(file = %file.name, errors = errors.len(), "upload rejected");
                next.errors = errors;
            }
        }

        self.state = next;
        &self.state
    }

    /// Show rows accepted in an earlier session, without re-validating them
    pub fn load_previous(&mut self, source: &dyn PreviousUploadSource) -> &UploadState {
        self.state = match source.fetch() {
            Ok(rows) => {
                info!(rows = rows.len(), "loaded previous upload");
                UploadState {
                    rows,
                    ..UploadState::default()
                }
            }
            Err(e) => {
                warn!(error = %e, "previous upload fetch failed");
                UploadState {
                    errors: vec![e.to_string()],
                    ..UploadState::default()
                }
            }
        };
        &self.state
    }

    pub fn clear(&mut self) {
        self.state = UploadState::default();
    }

    pub fn set_page(&mut self, page: usize) {
        let total = self.state.rows.len();
        self.state.pagination.set_page(page, total);
    }

    pub fn set_rows_per_page(&mut self, rows_per_page: usize) -> bool {
        self.state.pagination.set_rows_per_page(rows_per_page)
    }
}

// ================================================================================================
// Tests
// ================================================================================================
