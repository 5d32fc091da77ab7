//! Query evaluation over the constraint and full-text indices.
//!
//! The executor resolves a query into an ordered candidate item list:
//! full-text matches are intersected with every non-subtract constraint,
//! then subtract constraints cut their matches away. A query with neither a
//! search term nor constraints is empty by convention; nothing here ever
//! performs a full scan.

use super::constraint::{ConstraintError, ConstraintIndex};
use super::fulltext::FulltextIndex;
use super::types::{Constraint, IndexItem, ItemSet, Query};

/// Evaluates queries against borrowed index structures.
pub struct QueryExecutor<'a> {
    constraint_index: &'a ConstraintIndex,
    fulltext_index: &'a FulltextIndex,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(
        constraint_index: &'a ConstraintIndex,
        fulltext_index: &'a FulltextIndex,
    ) -> Self {
        Self { constraint_index, fulltext_index }
    }

    /// Resolve the unsorted candidate set of a query.
    ///
    /// The only error case is a configuration error: a recursive lookup
    /// against an index that was not declared recursively searchable.
    pub fn perform(&self, query: &Query) -> Result<Vec<IndexItem>, ConstraintError> {
        let q = query.trimmed_q();
        if q.is_none() && query.constraints.is_empty() {
            return Ok(Vec::new());
        }

        let mut result: Option<ItemSet> = match q {
            Some(term) => Some(ItemSet::from_items(
                self.fulltext_index.get(term, query.categories.as_deref()),
            )),
            // Constraints with a category filter but no term: the filter is
            // applied as a match-everything full-text pass.
            None if query.categories.is_some() => Some(ItemSet::from_items(
                self.fulltext_index.get("*", query.categories.as_deref()),
            )),
            None => None,
        };

        // Stable evaluation order regardless of map iteration.
        let mut names: Vec<&String> = query.constraints.keys().collect();
        names.sort_unstable();

        for name in &names {
            let constraint = &query.constraints[*name];
            if constraint.subtract {
                continue;
            }
            let hits = self.resolve(name.as_str(), constraint)?;
            result = Some(match result {
                None => hits,
                Some(current) => current.intersect(&hits),
            });
        }

        let mut set = result.unwrap_or_default();
        for name in &names {
            let constraint = &query.constraints[*name];
            if !constraint.subtract {
                continue;
            }
            for item in self.resolve(name.as_str(), constraint)?.into_items() {
                set.remove(&item.id);
            }
        }

        Ok(set.into_items())
    }

    fn resolve(
        &self,
        name: &str,
        constraint: &Constraint,
    ) -> Result<ItemSet, ConstraintError> {
        let items = if constraint.search_recursively {
            self.constraint_index.get_with_descendants(name, &constraint.values)?
        } else {
            self.constraint_index.get(name, &constraint.values)
        };
        Ok(ItemSet::from_items(items))
    }
}
