/*!
# File Intake

Gating and parsing for a single uploaded file:

1. the file name must end in `.csv`
2. the file must not exceed the configured size limit
3. the bytes are parsed with the `csv` crate into [`Row`]s keyed by header

Steps 1 and 2 produce a [`Rejection`]; step 3 produces a [`ParseFailure`].
Both are single user-facing messages, kept apart from row validation errors.
*/

use crate::{
    errors::CsvResult,
    schemas::{template_header, ColumnRule, Row},
};
use csv::{ReaderBuilder, Trim};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Accepted file extension, without the dot
pub const CSV_EXTENSION: &str = "csv";

/// File name used for the downloadable template
pub const TEMPLATE_FILE_NAME: &str = "template.csv";

/// Default upload limit: 5 MiB
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 5 * BYTES_PER_MB;

const BYTES_PER_MB: u64 = 1024 * 1024;

// ================================================================================================
// Types
// ================================================================================================

/// A selected file: its name and full contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileInput {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its file name
    pub fn from_path<P: AsRef<Path>>(path: P) -> CsvResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Limits applied before parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeSettings {
    pub max_file_size_bytes: u64,
}

impl Default for IntakeSettings {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
        }
    }
}

impl IntakeSettings {
    pub fn with_max_file_size_mb(mb: u64) -> Self {
        Self {
            max_file_size_bytes: mb.saturating_mul(BYTES_PER_MB),
        }
    }
}

/// File refused before parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NotCsv,
    TooLarge { size: u64, limit: u64 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotCsv => write!(f, "Only .{} files are accepted.", CSV_EXTENSION),
            Self::TooLarge { limit, .. } => write!(
                f,
                "File size exceeds the maximum limit of {}.",
                format_limit(*limit)
            ),
        }
    }
}

/// Parser failure; the message is shown as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure(pub String);

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parsed file: headers in file order plus one [`Row`] per record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

// ================================================================================================
// Gating
// ================================================================================================

/// Check extension and size; `Ok` means the file may be parsed
pub fn screen_file(file: &FileInput, settings: &IntakeSettings) -> Result<(), Rejection> {
    let is_csv = Path::new(&file.name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case(CSV_EXTENSION))
        .unwrap_or(false);
    if !is_csv {
        warn!(file = %file.name, "rejected file without .csv extension");
        return Err(Rejection::NotCsv);
    }

    if file.size() > settings.max_file_size_bytes {
        warn!(
            file = %file.name,
            size = file.size(),
            limit = settings.max_file_size_bytes,
            "rejected oversized file"
        );
        return Err(Rejection::TooLarge {
            size: file.size(),
            limit: settings.max_file_size_bytes,
        });
    }

    Ok(())
}

fn format_limit(bytes: u64) -> String {
    if bytes > 0 && bytes % BYTES_PER_MB == 0 {
        format!("{} MB", bytes / BYTES_PER_MB)
    } else {
        format!("{} bytes", bytes)
    }
}

// ================================================================================================
// Parsing
// ================================================================================================

/// Parse CSV bytes with a header line into rows
///
/// Records shorter than the header leave the trailing columns absent;
/// extra fields without a header are dropped. Header names must be unique.
pub fn parse_csv(bytes: &[u8]) -> Result<ParsedCsv, ParseFailure> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(bytes);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(parse_failure)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut seen = HashSet::new();
    if let Some(dup) = headers.iter().find(|h| !seen.insert(h.as_str())) {
        warn!(header = %dup, "duplicate csv header");
        return Err(ParseFailure(format!(
            "Failed to parse CSV: duplicate header \"{}\"",
            dup
        )));
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(parse_failure)?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.as_str(), value))
            .collect();
        rows.push(row);
    }

    debug!(headers = headers.len(), rows = rows.len(), "parsed csv");
    Ok(ParsedCsv { headers, rows })
}

fn parse_failure(err: csv::Error) -> ParseFailure {
    ParseFailure(format!("Failed to parse CSV: {}", err))
}

// ================================================================================================
// Template Export
// ================================================================================================

/// Write `template.csv` (header line only) into `dir`, returning its path
pub fn write_template<P: AsRef<Path>>(dir: P, rules: &[ColumnRule]) -> CsvResult<PathBuf> {
    let path = dir.as_ref().join(TEMPLATE_FILE_NAME);
    fs::write(&path, template_header(rules))?;
    Ok(path)
}

// ================================================================================================
// Tests
// ================================================================================================
