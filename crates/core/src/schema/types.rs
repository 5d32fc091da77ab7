//! Schema data types.

use std::collections::HashMap;

use serde::Deserialize;

/// Indexing flags for a single category field.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    #[serde(default)]
    pub constraint_indexed: bool,
    #[serde(default)]
    pub fulltext_indexed: bool,
}

/// Field descriptors for one category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategorySchema {
    #[serde(default)]
    pub fields: HashMap<String, FieldDescriptor>,
}

/// An explicit constraint declaration.
///
/// The match type stays a raw string here; it is validated when the
/// constraint index is built, so a typo in a schema file surfaces as a
/// configuration error rather than a parse failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintDeclaration {
    pub path: String,
    #[serde(rename = "type")]
    pub match_type: String,
    #[serde(default)]
    pub recursively_searchable: bool,
}

/// Complete schema: categories plus extra constraint declarations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectSchema {
    #[serde(default)]
    pub categories: HashMap<String, CategorySchema>,
    #[serde(default)]
    pub constraints: HashMap<String, ConstraintDeclaration>,
}

impl ProjectSchema {
    /// Names of the fulltext-flagged fields of a category.
    pub fn fulltext_fields(&self, category: &str) -> Vec<&str> {
        let Some(schema) = self.categories.get(category) else {
            return Vec::new();
        };
        let mut fields: Vec<&str> = schema
            .fields
            .iter()
            .filter(|(_, descriptor)| descriptor.fulltext_indexed)
            .map(|(name, _)| name.as_str())
            .collect();
        fields.sort_unstable();
        fields
    }

    /// Names of the constraint-flagged fields across all categories, deduplicated.
    pub fn constraint_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self
            .categories
            .values()
            .flat_map(|schema| {
                schema
                    .fields
                    .iter()
                    .filter(|(_, descriptor)| descriptor.constraint_indexed)
                    .map(|(name, _)| name.as_str())
            })
            .collect();
        fields.sort_unstable();
        fields.dedup();
        fields
    }
}
