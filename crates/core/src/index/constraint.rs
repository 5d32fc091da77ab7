//! Named, typed secondary indices over document fields and relations.
//!
//! Every index is keyed `<fieldPath>:<matchType>`:
//! - `match` buckets scalar values,
//! - `contain` buckets each element of an array value,
//! - `exist` buckets the presence sentinel (KNOWN / UNKNOWN).
//!
//! Indices declared recursively searchable additionally answer descendant
//! queries: their value buckets double as the parent-id to children
//! adjacency, walked breadth-first with a visited guard.

use std::collections::{HashMap, HashSet, VecDeque};

use thiserror::Error;

use crate::document::{Document, FieldPath, ResolvedValue};
use crate::schema::ProjectSchema;

use super::types::{IndexItem, ItemSet};

/// How a constraint matches a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    Match,
    Contain,
    Exist,
}

impl MatchType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "match" => Some(Self::Match),
            "contain" => Some(Self::Contain),
            "exist" => Some(Self::Exist),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Contain => "contain",
            Self::Exist => "exist",
        }
    }
}

/// Presence sentinel for `exist` buckets.
///
/// Stored as a proper variant internally; the KNOWN/UNKNOWN strings only
/// appear at the query boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Known,
    Unknown,
}

impl Presence {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "KNOWN" => Some(Self::Known),
            "UNKNOWN" => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Known => "KNOWN",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Configuration errors. Raised during setup, never at query time.
#[derive(Debug, Error)]
pub enum ConstraintError {
    #[error("unknown match type '{match_type}' in constraint '{name}'")]
    UnknownMatchType { name: String, match_type: String },

    #[error("index '{0}' is not recursively searchable")]
    NotRecursivelySearchable(String),
}

#[derive(Debug, Clone)]
struct IndexSpec {
    path: FieldPath,
    match_type: MatchType,
    recursively_searchable: bool,
}

/// Exact, membership and existence lookups over document fields.
#[derive(Debug, Default)]
pub struct ConstraintIndex {
    specs: HashMap<String, IndexSpec>,
    /// Index name to value to items, insertion-ordered per bucket.
    buckets: HashMap<String, HashMap<String, ItemSet>>,
    /// Document id to the (index, value) buckets it currently occupies.
    occupancy: HashMap<String, Vec<(String, String)>>,
}

impl ConstraintIndex {
    /// Build the index structure from a schema.
    ///
    /// Explicit constraint declarations are taken as-is; every
    /// constraint-flagged schema field additionally gets auto-generated
    /// `match`, `contain` and `exist` indices. An unknown match type in a
    /// declaration is a configuration error.
    pub fn from_schema(schema: &ProjectSchema) -> Result<Self, ConstraintError> {
        let mut specs = HashMap::new();

        for (name, decl) in &schema.constraints {
            let match_type = MatchType::from_str(&decl.match_type).ok_or_else(|| {
                ConstraintError::UnknownMatchType {
                    name: name.clone(),
                    match_type: decl.match_type.clone(),
                }
            })?;
            specs.insert(
                name.clone(),
                IndexSpec {
                    path: FieldPath::parse(&decl.path),
                    match_type,
                    recursively_searchable: decl.recursively_searchable,
                },
            );
        }

        for field in schema.constraint_fields() {
            for match_type in [MatchType::Match, MatchType::Contain, MatchType::Exist] {
                let name = format!("{field}:{}", match_type.as_str());
                specs.entry(name).or_insert_with(|| IndexSpec {
                    path: FieldPath::Field(field.to_string()),
                    match_type,
                    recursively_searchable: false,
                });
            }
        }

        let buckets = specs.keys().map(|name| (name.clone(), HashMap::new())).collect();
        Ok(Self { specs, buckets, occupancy: HashMap::new() })
    }

    /// Index a document's item under every configured bucket it belongs to.
    ///
    /// With `skip_removal` false, stale entries for this id are purged
    /// first. Documents without an identifier are ignored.
    pub fn put(&mut self, doc: &Document, item: &IndexItem, skip_removal: bool) {
        if doc.identifier().is_none() {
            return;
        }
        if !skip_removal {
            self.remove_id(&doc.id);
        }

        let mut occupied: Vec<(String, String)> = Vec::new();
        for (name, spec) in &self.specs {
            let resolved = spec.path.resolve(doc);
            let keys: Vec<String> = match spec.match_type {
                MatchType::Match => match &resolved {
                    Some(ResolvedValue::One(value)) if !value.is_empty() => {
                        vec![value.clone()]
                    }
                    _ => Vec::new(),
                },
                MatchType::Contain => match &resolved {
                    Some(ResolvedValue::Many(values)) => values.clone(),
                    _ => Vec::new(),
                },
                MatchType::Exist => {
                    let presence = match &resolved {
                        Some(value) if value.is_present() => Presence::Known,
                        _ => Presence::Unknown,
                    };
                    vec![presence.as_str().to_string()]
                }
            };

            let values = self.buckets.entry(name.clone()).or_default();
            for key in keys {
                if values.entry(key.clone()).or_default().insert(item.clone()) {
                    occupied.push((name.clone(), key));
                }
            }
        }

        if !occupied.is_empty() {
            self.occupancy.entry(doc.id.clone()).or_default().extend(occupied);
        }
    }

    /// Remove a document's item from every bucket it occupies.
    pub fn remove(&mut self, doc: &Document) {
        self.remove_id(&doc.id);
    }

    fn remove_id(&mut self, id: &str) {
        let Some(entries) = self.occupancy.remove(id) else {
            return;
        };
        for (name, key) in entries {
            if let Some(values) = self.buckets.get_mut(&name) {
                let emptied = match values.get_mut(&key) {
                    Some(set) => {
                        set.remove(id);
                        set.is_empty()
                    }
                    None => false,
                };
                if emptied {
                    values.remove(&key);
                }
            }
        }
    }

    /// Union of items for the given values, in bucket insertion order.
    ///
    /// Unknown index names or values yield an empty result.
    pub fn get(&self, name: &str, values: &[String]) -> Vec<IndexItem> {
        let Some(buckets) = self.buckets.get(name) else {
            return Vec::new();
        };
        let mut out = ItemSet::default();
        for value in values {
            if let Some(set) = buckets.get(value) {
                for item in set.iter() {
                    out.insert(item.clone());
                }
            }
        }
        out.into_items()
    }

    /// Cardinality of a single value bucket.
    pub fn get_count(&self, name: &str, value: &str) -> usize {
        self.buckets
            .get(name)
            .and_then(|values| values.get(value))
            .map_or(0, ItemSet::len)
    }

    /// Items for the given values plus all their transitive descendants,
    /// excluding the seed values themselves.
    ///
    /// Fails unless the index was declared recursively searchable.
    pub fn get_with_descendants(
        &self,
        name: &str,
        values: &[String],
    ) -> Result<Vec<IndexItem>, ConstraintError> {
        match self.specs.get(name) {
            Some(spec) if spec.recursively_searchable => {}
            _ => return Err(ConstraintError::NotRecursivelySearchable(name.to_string())),
        }

        let buckets = self.buckets.get(name);
        let seeds: HashSet<&str> = values.iter().map(String::as_str).collect();
        let mut visited: HashSet<String> = values.iter().cloned().collect();
        let mut queue: VecDeque<String> = values.iter().cloned().collect();
        let mut out = ItemSet::default();

        while let Some(value) = queue.pop_front() {
            let Some(set) = buckets.and_then(|b| b.get(&value)) else {
                continue;
            };
            for item in set.iter() {
                if visited.insert(item.id.clone()) {
                    queue.push_back(item.id.clone());
                }
                if !seeds.contains(item.id.as_str()) {
                    out.insert(item.clone());
                }
            }
        }

        Ok(out.into_items())
    }

    /// Whether a name is a configured index.
    pub fn has_index(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// Drop all indexed data, keeping the configuration.
    pub fn clear(&mut self) {
        for values in self.buckets.values_mut() {
            values.clear();
        }
        self.occupancy.clear();
    }
}
