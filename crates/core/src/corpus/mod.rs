//! Corpus loading: documents from JSON files on disk.
//!
//! The index itself never touches the filesystem; this module exists for
//! front ends that feed it from a directory of exported documents.

pub mod loader;

pub use loader::{load_documents, CorpusError};
