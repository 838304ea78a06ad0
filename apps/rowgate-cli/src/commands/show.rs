use crate::commands::display::{check_page_size, print_page, print_problems};
use crate::config::SchemaConfig;
use crate::error::{CliError, CliResult};
use rowgate_csvs::{JsonRowsFile, UploadSession};
use std::path::PathBuf;

pub fn execute(schema: PathBuf, previous: PathBuf, page: usize, page_size: usize) -> CliResult<()> {
    check_page_size(page_size)?;

    let config = SchemaConfig::load(&schema)?;
    let rules = config.column_rules()?;
    let columns: Vec<String> = rules.iter().map(|r| r.name.clone()).collect();

    let mut session = UploadSession::new(rules)?;

    println!("📂 Loading previous upload: {}", previous.display());
    let state = session.load_previous(&JsonRowsFile::new(&previous));
    if print_problems(state) {
        return Err(CliError::Upload(state.errors.join("; ")));
    }

    session.set_rows_per_page(page_size);
    session.set_page(page);
    print_page(&columns, session.state());

    Ok(())
}
