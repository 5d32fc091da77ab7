//! Document corpus walker and parser.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

use crate::document::Document;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("documents directory does not exist: {0}")]
    MissingDir(String),

    #[error("failed to walk documents directory {0}: {1}")]
    WalkError(String, #[source] walkdir::Error),

    #[error("failed to read document file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse document file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load every document from the `*.json` files under a directory.
///
/// Each file holds either a single document object or an array of them.
/// Files are visited in path order so replays are deterministic.
pub fn load_documents(dir: &Path) -> Result<Vec<Document>, CorpusError> {
    if !dir.is_dir() {
        return Err(CorpusError::MissingDir(dir.display().to_string()));
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry
            .map_err(|e| CorpusError::WalkError(dir.display().to_string(), e))?;
        if entry.file_type().is_file()
            && entry.path().extension().map_or(false, |ext| ext == "json")
        {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();

    let mut documents = Vec::new();
    for path in files {
        let content = fs::read_to_string(&path)
            .map_err(|e| CorpusError::Io { path: path.clone(), source: e })?;
        match parse_file(&content) {
            Ok(mut parsed) => documents.append(&mut parsed),
            Err(e) => {
                warn!("skipping unparseable document file {}: {}", path.display(), e);
            }
        }
    }

    Ok(documents)
}

fn parse_file(content: &str) -> Result<Vec<Document>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    if value.is_array() {
        serde_json::from_value(value)
    } else {
        serde_json::from_value(value).map(|doc| vec![doc])
    }
}
