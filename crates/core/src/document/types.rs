//! Core document types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who changed a document, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub user: String,
    pub date: DateTime<Utc>,
}

/// A field documentation resource (context, find, type, image record, ...).
///
/// `id` is unique among indexed documents and `category` is always present;
/// everything else is optional. Well-known fields like `identifier` and
/// `shortDescription` live inside `fields` alongside category-specific ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
    #[serde(default)]
    pub relations: HashMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Action>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modified: Vec<Action>,
}

impl Document {
    /// Create a bare document with just an id, category and identifier.
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        let mut fields = HashMap::new();
        fields.insert("identifier".to_string(), Value::String(identifier.into()));
        Self {
            id: id.into(),
            category: category.into(),
            fields,
            relations: HashMap::new(),
            created: None,
            modified: Vec::new(),
        }
    }

    /// The user-visible identifier, if set.
    pub fn identifier(&self) -> Option<&str> {
        self.fields.get("identifier").and_then(Value::as_str)
    }

    /// The short description field, if set.
    pub fn short_description(&self) -> Option<&str> {
        self.fields.get("shortDescription").and_then(Value::as_str)
    }

    /// Latest modification date, falling back to the creation date.
    pub fn last_changed(&self) -> Option<DateTime<Utc>> {
        self.modified
            .iter()
            .map(|action| action.date)
            .max()
            .or_else(|| self.created.as_ref().map(|action| action.date))
    }

    /// Whether any creation or modification timestamp is present.
    pub fn has_edit_metadata(&self) -> bool {
        self.created.is_some() || !self.modified.is_empty()
    }
}
