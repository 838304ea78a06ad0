use crate::config::SchemaConfig;
use crate::error::CliResult;
use rowgate_csvs::write_template;
use std::fs;
use std::path::PathBuf;

/// Write `template.csv` with the schema's column names as its only line
pub fn execute(schema: PathBuf, output_dir: PathBuf) -> CliResult<()> {
    let config = SchemaConfig::load(&schema)?;
    let rules = config.column_rules()?;

    fs::create_dir_all(&output_dir)?;
    let path = write_template(&output_dir, &rules)?;

    println!("✅ Template written: {}", path.display());
    Ok(())
}
