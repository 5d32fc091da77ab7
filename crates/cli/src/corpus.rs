//! Shared corpus bootstrap for the query commands.
//!
//! Every command works against a freshly built in-memory index: load the
//! config, parse the schema, read the document corpus, replay it through
//! the facade.

use std::collections::HashMap;
use std::path::Path;

use fieldindex_core::config::{ConfigLoader, ResolvedConfig};
use fieldindex_core::corpus::load_documents;
use fieldindex_core::document::Document;
use fieldindex_core::index::{IndexFacade, IndexStats, ProgressCallback};
use fieldindex_core::schema::load_schema;

/// A fully loaded corpus: resolved config, built index, load statistics and
/// the documents themselves (for display).
pub struct LoadedCorpus {
    pub config: ResolvedConfig,
    pub facade: IndexFacade,
    pub stats: IndexStats,
    pub documents: HashMap<String, Document>,
}

/// Load configuration or exit with a message.
pub fn load_config_or_exit(
    config: Option<&Path>,
    profile: Option<&str>,
) -> ResolvedConfig {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            crate::logging::init(&rc);
            rc
        }
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    }
}

/// Build the index from the configured schema and corpus, or exit.
pub fn build_or_exit(
    config: Option<&Path>,
    profile: Option<&str>,
    progress: Option<ProgressCallback>,
) -> LoadedCorpus {
    let rc = load_config_or_exit(config, profile);

    let schema = match load_schema(&rc.schema_file) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("Error loading schema: {}", e);
            std::process::exit(1);
        }
    };

    let documents = match load_documents(&rc.documents_dir) {
        Ok(documents) => documents,
        Err(e) => {
            eprintln!("Error loading documents: {}", e);
            std::process::exit(1);
        }
    };

    let mut facade = match IndexFacade::new(schema) {
        Ok(facade) => facade,
        Err(e) => {
            eprintln!("Error in index configuration: {}", e);
            std::process::exit(1);
        }
    };

    let stats = facade.put_multiple(&documents, progress);

    let documents: HashMap<String, Document> =
        documents.into_iter().map(|doc| (doc.id.clone(), doc)).collect();

    LoadedCorpus { config: rc, facade, stats, documents }
}
