//! In-memory index and query engine for document corpora.
//!
//! This module provides the secondary indices in front of the document
//! store:
//! - Constraint lookups (exact match, array membership, existence)
//! - Category-scoped full-text search
//! - Hierarchical descendant queries along a parent relation
//!
//! # Example
//!
//! ```no_run
//! use fieldindex_core::index::{IndexFacade, Query};
//! use fieldindex_core::schema::ProjectSchema;
//!
//! let mut facade = IndexFacade::new(ProjectSchema::default()).unwrap();
//!
//! // Query all operations matching "trench"
//! let query = Query {
//!     q: Some("trench".to_string()),
//!     categories: Some(vec!["Operation".to_string()]),
//!     ..Default::default()
//! };
//! let result = facade.find(&query).unwrap();
//! ```

pub mod constraint;
pub mod facade;
pub mod fulltext;
pub mod search;
pub mod types;

pub use constraint::{ConstraintError, ConstraintIndex, MatchType, Presence};
pub use facade::{
    IndexFacade, IndexStats, ProgressCallback, INSTANCE_OF, TYPE_CATEGORY,
};
pub use fulltext::FulltextIndex;
pub use search::QueryExecutor;
pub use types::{
    Constraint, IndexChange, IndexItem, ItemSet, Query, QueryResult, Sort, SortMode,
};
