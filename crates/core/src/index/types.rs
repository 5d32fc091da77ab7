//! Index data types: items, ordered sets, queries, change notifications.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::document::Document;

/// Cached sortable projection of a document.
///
/// Used only for sorting and display, never authoritative; the full set of
/// items is rebuildable by replaying every document through the facade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexItem {
    pub id: String,
    pub identifier: String,
    pub category: String,
    pub date: Option<DateTime<Utc>>,
    /// Instance id to instance category. Only present on `Type` items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instances: Option<HashMap<String, String>>,
}

impl IndexItem {
    /// Project a document into an item. `None` when the identifier is absent.
    pub fn from_document(doc: &Document) -> Option<Self> {
        let identifier = doc.identifier()?;
        Some(Self {
            id: doc.id.clone(),
            identifier: identifier.to_string(),
            category: doc.category.clone(),
            date: doc.last_changed(),
            instances: None,
        })
    }
}

/// Insertion-ordered set of index items, deduplicated by id.
#[derive(Debug, Clone, Default)]
pub struct ItemSet {
    order: Vec<IndexItem>,
    ids: HashSet<String>,
}

impl ItemSet {
    pub fn from_items(items: Vec<IndexItem>) -> Self {
        let mut set = Self::default();
        for item in items {
            set.insert(item);
        }
        set
    }

    /// Insert at the end unless the id is already present.
    pub fn insert(&mut self, item: IndexItem) -> bool {
        if self.ids.insert(item.id.clone()) {
            self.order.push(item);
            true
        } else {
            false
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            self.order.retain(|item| item.id != id);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Keep only the items present in `other`, preserving this set's order.
    pub fn intersect(mut self, other: &Self) -> Self {
        self.order.retain(|item| other.contains(&item.id));
        self.ids.retain(|id| other.contains(id));
        self
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexItem> {
        self.order.iter()
    }

    pub fn into_items(self) -> Vec<IndexItem> {
        self.order
    }
}

/// Sort behaviour for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Lexicographic by identifier.
    #[default]
    Identifier,
    /// Exact identifier matches promoted ahead of the rest.
    ExactMatchFirst,
    /// Keep the candidate order produced by the executor.
    None,
}

/// Sort specification of a query.
#[derive(Debug, Clone, Default)]
pub struct Sort {
    pub mode: SortMode,
    /// Restricts `ExactMatchFirst` promotion to items of this category.
    pub match_category: Option<String>,
}

/// A single named constraint: one or more values plus modifier flags.
#[derive(Debug, Clone, Default)]
pub struct Constraint {
    pub values: Vec<String>,
    /// Remove matches from the result instead of intersecting with it.
    pub subtract: bool,
    /// Expand matches to transitive descendants.
    pub search_recursively: bool,
}

impl Constraint {
    pub fn value(value: impl Into<String>) -> Self {
        Self { values: vec![value.into()], ..Self::default() }
    }

    pub fn values(values: Vec<String>) -> Self {
        Self { values, ..Self::default() }
    }

    pub fn subtracted(mut self) -> Self {
        self.subtract = true;
        self
    }

    pub fn recursive(mut self) -> Self {
        self.search_recursively = true;
        self
    }
}

/// A structured query against the index.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Full-text term; `*` matches everything in the selected categories.
    pub q: Option<String>,
    pub categories: Option<Vec<String>>,
    /// Constraint name (`<fieldPath>:<matchType>`) to constraint.
    pub constraints: HashMap<String, Constraint>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub sort: Sort,
}

impl Query {
    pub fn fulltext(q: impl Into<String>) -> Self {
        Self { q: Some(q.into()), ..Self::default() }
    }

    pub fn trimmed_q(&self) -> Option<&str> {
        match self.q.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(q) => Some(q),
        }
    }
}

/// Ordered, paginated result of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub ids: Vec<String>,
    /// Cardinality before offset/limit were applied.
    pub total_count: usize,
}

/// Change notification emitted after a mutation.
#[derive(Debug, Clone)]
pub enum IndexChange {
    /// Document was indexed or re-indexed.
    Indexed(Document),
    /// Document was removed from the index.
    Removed(Document),
}
