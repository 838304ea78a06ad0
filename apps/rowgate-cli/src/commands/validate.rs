use crate::commands::display::{check_page_size, print_page, print_problems};
use crate::config::SchemaConfig;
use crate::error::{CliError, CliResult};
use rowgate_csvs::{FileInput, JsonRowsFile, UploadSession};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;

pub fn execute(
    file: PathBuf,
    schema: PathBuf,
    page: usize,
    page_size: usize,
    output: Option<PathBuf>,
) -> CliResult<()> {
    // Must fail before upload: the accept callback writes `output`
    check_page_size(page_size)?;

    println!("📋 Loading schema: {}", schema.display());
    let config = SchemaConfig::load(&schema)?;
    let rules = config.column_rules()?;
    let columns: Vec<String> = rules.iter().map(|r| r.name.clone()).collect();

    // Failures inside the accept callback are reported after upload returns
    let save_error = Rc::new(RefCell::new(None));
    let mut session = UploadSession::new(rules)?
        .with_batch_check(config.batch.clone())
        .with_settings(config.intake_settings());

    if let Some(path) = &output {
        let store = JsonRowsFile::new(path);
        let save_error = Rc::clone(&save_error);
        session = session.on_accept(move |rows| {
            if let Err(e) = store.save(rows) {
                *save_error.borrow_mut() = Some(e);
            }
        });
    }

    println!("📂 Uploading: {}", file.display());
    let input = FileInput::from_path(&file)?;
    let state = session.upload(input);

    if print_problems(state) {
        return Err(match &state.rejection {
            Some(rejection) => CliError::Upload(rejection.clone()),
            None => CliError::Rows {
                count: state.errors.len(),
            },
        });
    }

    if let Some(e) = save_error.borrow_mut().take() {
        return Err(e.into());
    }

    println!("✅ {} row(s) accepted", state.rows.len());
    if let Some(path) = &output {
        info!(path = %path.display(), "accepted rows written");
        println!("💾 Saved accepted rows to {}", path.display());
    }

    session.set_rows_per_page(page_size);
    session.set_page(page);
    println!();
    print_page(&columns, session.state());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowgate_csvs::{PreviousUploadSource, Row};
    use std::fs;
    use tempfile::TempDir;

    const SCHEMA_YAML: &str = r#"
columns:
  - name: id
    required: true
    check: { kind: integer }
  - name: name
batch:
  unique: [id]
max_file_size_mb: 1
"#;

    fn setup(csv_name: &str, csv: &str) -> (TempDir, PathBuf, PathBuf, PathBuf) {
        let dir = TempDir::new().unwrap();
        let schema = dir.path().join("schema.yaml");
        fs::write(&schema, SCHEMA_YAML).unwrap();
        let file = dir.path().join(csv_name);
        fs::write(&file, csv).unwrap();
        let output = dir.path().join("rows.json");
        (dir, schema, file, output)
    }

    #[test]
    fn test_accepted_rows_written_to_output() {
        let (_dir, schema, file, output) = setup("people.csv", "id,name\n1,Ann\n2,Bo\n");

        execute(file, schema, 0, 5, Some(output.clone())).unwrap();

        let rows: Vec<Row> = JsonRowsFile::new(&output).fetch().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("name"), Some("Bo"));
    }

    #[test]
    fn test_row_errors_fail_without_output() {
        let (_dir, schema, file, output) = setup("people.csv", "id,name\n1,Ann\nx,Bo\n");

        let result = execute(file, schema, 0, 5, Some(output.clone()));
        assert!(matches!(result, Err(CliError::Rows { count: 1 })));
        assert!(!output.exists());
    }

    #[test]
    fn test_batch_rejection_fails_without_output() {
        let (_dir, schema, file, output) = setup("people.csv", "id,name\n1,Ann\n1,Bo\n");

        let result = execute(file, schema, 0, 5, Some(output.clone()));
        assert!(matches!(result, Err(CliError::Rows { count: 1 })));
        assert!(!output.exists());
    }

    #[test]
    fn test_rejected_file_is_upload_error() {
        let (_dir, schema, file, output) = setup("people.txt", "id,name\n1,Ann\n");

        match execute(file, schema, 0, 5, Some(output.clone())) {
            Err(CliError::Upload(message)) => {
                assert_eq!(message, "Only .csv files are accepted.")
            }
            other => panic!("expected upload error, got {:?}", other),
        }
        assert!(!output.exists());
    }

    #[test]
    fn test_bad_page_size_has_no_side_effects() {
        let (_dir, schema, file, output) = setup("people.csv", "id,name\n1,Ann\n");

        let result = execute(file, schema, 0, 7, Some(output.clone()));
        assert!(matches!(result, Err(CliError::InvalidConfig(_))));
        assert!(!output.exists());
    }
}
