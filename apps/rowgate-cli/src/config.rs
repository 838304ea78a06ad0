use crate::error::{CliError, CliResult};
use rowgate_csvs::{BatchRules, ColumnRule, IntakeSettings, ValueCheck};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Schema file structure (YAML or JSON)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Columns in template order
    pub columns: Vec<ColumnConfig>,

    /// Checks over the whole accepted file
    #[serde(default)]
    pub batch: BatchRules,

    /// Upload size limit in MiB
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
}

/// Configuration for a single column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub name: String,

    #[serde(default)]
    pub required: bool,

    /// Optional value check for present values
    #[serde(default)]
    pub check: Option<ValueCheck>,
}

impl SchemaConfig {
    /// Load from `.yaml`, `.yml` or `.json`
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let config: SchemaConfig = match ext.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)?,
            Some("json") => serde_json::from_str(&text)?,
            _ => {
                return Err(CliError::InvalidConfig(format!(
                    "Unsupported schema file '{}': expected .yaml, .yml or .json",
                    path.display()
                )))
            }
        };

        debug!(columns = config.columns.len(), "loaded schema config");
        Ok(config)
    }

    /// Compile column configs into rules; names must be unique and non-empty
    pub fn column_rules(&self) -> CliResult<Vec<ColumnRule>> {
        if self.columns.is_empty() {
            return Err(CliError::InvalidConfig(
                "Schema must define at least one column".to_string(),
            ));
        }

        let rules = self
            .columns
            .iter()
            .map(|column| -> CliResult<ColumnRule> {
                let rule = ColumnRule {
                    name: column.name.clone(),
                    required: column.required,
                    validator: None,
                };
                match &column.check {
                    Some(check) => Ok(rule.with_validator(check.compile()?)),
                    None => Ok(rule),
                }
            })
            .collect::<CliResult<Vec<_>>>()?;

        rowgate_csvs::validate_rules(&rules)
            .map_err(|e| CliError::InvalidConfig(e.to_string()))?;

        for column in &self.batch.unique {
            if !rules.iter().any(|rule| &rule.name == column) {
                return Err(CliError::InvalidConfig(format!(
                    "Unique column '{}' is not defined in columns",
                    column
                )));
            }
        }

        Ok(rules)
    }

    pub fn intake_settings(&self) -> IntakeSettings {
        IntakeSettings::with_max_file_size_mb(self.max_file_size_mb)
    }
}

fn default_max_file_size_mb() -> u64 {
    5
}
