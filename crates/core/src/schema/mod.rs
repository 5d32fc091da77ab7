//! Category schema and index declarations.
//!
//! The surrounding store supplies, per category, which fields are
//! constraint-indexed and/or fulltext-indexed, plus explicit extra
//! constraint declarations (typically `contain` indices over hierarchy
//! relations, marked recursively searchable). Both arrive in one YAML file.

pub mod loader;
pub mod types;

pub use loader::{load_schema, parse_schema, SchemaError};
pub use types::{CategorySchema, ConstraintDeclaration, FieldDescriptor, ProjectSchema};
