//! Schema file loading.

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::types::ProjectSchema;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema file not found at {0}")]
    NotFound(String),

    #[error("failed to read schema file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse YAML in {0}: {1}")]
    ParseError(String, #[source] serde_yaml::Error),
}

/// Load a project schema from a YAML file.
pub fn load_schema(path: &Path) -> Result<ProjectSchema, SchemaError> {
    if !path.exists() {
        return Err(SchemaError::NotFound(path.display().to_string()));
    }

    let s = fs::read_to_string(path)
        .map_err(|e| SchemaError::ReadError(path.display().to_string(), e))?;

    serde_yaml::from_str(&s)
        .map_err(|e| SchemaError::ParseError(path.display().to_string(), e))
}

/// Parse a project schema from a YAML string.
pub fn parse_schema(s: &str) -> Result<ProjectSchema, serde_yaml::Error> {
    serde_yaml::from_str(s)
}
