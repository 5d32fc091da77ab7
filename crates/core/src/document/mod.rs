//! Document model for field documentation resources.
//!
//! Documents are owned by the surrounding store; this crate only ever holds
//! derived projections of them. The model carries the parts the index cares
//! about: identity, category, named field values, named relation target
//! lists, and edit metadata.

pub mod path;
pub mod types;

pub use path::{FieldPath, ResolvedValue};
pub use types::{Action, Document};
