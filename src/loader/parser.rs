//! YAML parser for report definitions

use crate::error::{Error, Result};
use crate::loader::types::ReportDefinition;
use std::fs;
use std::path::Path;

/// Maximum per-page row limit the API accepts
const MAX_LIMIT: u32 = 50_000;

/// Load a report definition from a YAML file
pub fn load_definition(path: impl AsRef<Path>) -> Result<ReportDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read definition file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_definition_from_str(&content)
}

/// Load a report definition from a YAML string
pub fn load_definition_from_str(yaml: &str) -> Result<ReportDefinition> {
    let def: ReportDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse report definition YAML: {e}")))?;

    validate_definition(&def)?;
    Ok(def)
}

/// Validate a report definition
fn validate_definition(def: &ReportDefinition) -> Result<()> {
    if def.report_suite_id.is_empty() {
        return Err(Error::config("report_suite_id cannot be empty"));
    }

    if def.metrics.is_empty() {
        return Err(Error::config("definition must request at least one metric"));
    }

    if def.dimensions.is_empty() {
        return Err(Error::config(
            "definition must request at least one dimension",
        ));
    }

    let unique: std::collections::HashSet<_> = def.dimensions.iter().collect();
    if unique.len() != def.dimensions.len() {
        return Err(Error::config("duplicate dimensions found"));
    }

    if def.date_range.start > def.date_range.end {
        return Err(Error::InvalidConfigValue {
            field: "date_range".to_string(),
            message: format!(
                "start {} is after end {}",
                def.date_range.start, def.date_range.end
            ),
        });
    }

    if let Some(limit) = def.limit {
        if limit == 0 || limit > MAX_LIMIT {
            return Err(Error::InvalidConfigValue {
                field: "limit".to_string(),
                message: format!("must be between 1 and {MAX_LIMIT}, got {limit}"),
            });
        }
    }

    Ok(())
}
