//! Facade owning every index structure.
//!
//! All mutation and querying goes through [`IndexFacade`]: it keeps the
//! constraint index, the full-text index, the item cache and the derived
//! type-instance bookkeeping consistent, and emits change notifications
//! after each mutation. Everything is synchronous and in-memory; recovery
//! after a crash or project switch is `clear` plus a full replay via
//! `put_multiple`.

use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Instant;

use tracing::debug;

use crate::document::Document;
use crate::schema::ProjectSchema;

use super::constraint::{ConstraintError, ConstraintIndex};
use super::fulltext::FulltextIndex;
use super::search::QueryExecutor;
use super::types::{IndexChange, IndexItem, Query, QueryResult, SortMode};

/// Category whose documents act as types for the instance index.
pub const TYPE_CATEGORY: &str = "Type";

/// Relation linking an instance document to its type document(s).
pub const INSTANCE_OF: &str = "isInstanceOf";

/// Progress callback for bulk indexing: (documents processed, total).
pub type ProgressCallback = Box<dyn Fn(usize, usize)>;

/// Documents processed between two progress reports.
const PROGRESS_INTERVAL: usize = 250;

/// Statistics from a bulk indexing run.
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    /// Number of documents handed to the facade.
    pub documents_total: usize,
    /// Number of documents actually indexed.
    pub documents_indexed: usize,
    /// Number of documents skipped (no identifier).
    pub documents_skipped: usize,
    /// Indexing duration in milliseconds.
    pub duration_ms: u64,
}

/// Owner of all index structures for one project.
pub struct IndexFacade {
    constraint_index: ConstraintIndex,
    fulltext_index: FulltextIndex,
    schema: ProjectSchema,
    items: HashMap<String, IndexItem>,
    observers: Vec<Sender<IndexChange>>,
}

impl IndexFacade {
    /// Build an empty facade for a schema.
    ///
    /// Fails on configuration errors in the schema's constraint
    /// declarations.
    pub fn new(schema: ProjectSchema) -> Result<Self, ConstraintError> {
        Ok(Self {
            constraint_index: ConstraintIndex::from_schema(&schema)?,
            fulltext_index: FulltextIndex::new(),
            schema,
            items: HashMap::new(),
            observers: Vec::new(),
        })
    }

    /// Index or re-index a single document and notify observers.
    pub fn put(&mut self, doc: &Document) {
        if self.index_document(doc, false) {
            self.notify(IndexChange::Indexed(doc.clone()));
        }
    }

    /// Bulk-load documents, type documents first.
    ///
    /// Instance attachment requires the type item to exist, so all `Type`
    /// documents are indexed before everything else. Progress is reported
    /// every 250 documents and once at the end.
    pub fn put_multiple(
        &mut self,
        documents: &[Document],
        progress: Option<ProgressCallback>,
    ) -> IndexStats {
        let start = Instant::now();
        let mut stats =
            IndexStats { documents_total: documents.len(), ..IndexStats::default() };

        let (types, others): (Vec<&Document>, Vec<&Document>) =
            documents.iter().partition(|doc| doc.category == TYPE_CATEGORY);

        let mut processed = 0;
        for doc in types.into_iter().chain(others) {
            if self.index_document(doc, true) {
                stats.documents_indexed += 1;
                self.notify(IndexChange::Indexed(doc.clone()));
            } else {
                stats.documents_skipped += 1;
            }
            processed += 1;
            if processed % PROGRESS_INTERVAL == 0 {
                if let Some(ref callback) = progress {
                    callback(processed, documents.len());
                }
            }
        }
        if let Some(ref callback) = progress {
            callback(processed, documents.len());
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        debug!(
            indexed = stats.documents_indexed,
            skipped = stats.documents_skipped,
            duration_ms = stats.duration_ms,
            "bulk indexing finished"
        );
        stats
    }

    /// Remove a document from every structure and notify observers.
    pub fn remove(&mut self, doc: &Document) {
        self.constraint_index.remove(doc);
        self.fulltext_index.remove(doc);
        let was_indexed = self.items.remove(&doc.id).is_some();
        self.detach_instance(&doc.id);
        if was_indexed {
            self.notify(IndexChange::Removed(doc.clone()));
        }
    }

    /// Reset all structures, keeping the configuration. Used on project
    /// switch; a full rebuild is `clear` followed by `put_multiple`.
    pub fn clear(&mut self) {
        self.constraint_index.clear();
        self.fulltext_index.clear();
        self.items.clear();
    }

    /// Evaluate a query into an ordered, paginated id list.
    pub fn find(&self, query: &Query) -> Result<QueryResult, ConstraintError> {
        let executor = QueryExecutor::new(&self.constraint_index, &self.fulltext_index);
        let mut items = executor.perform(query)?;

        // Bucket copies may predate later instance attachments; sort and
        // report from the authoritative cache.
        for item in &mut items {
            if let Some(cached) = self.items.get(&item.id) {
                *item = cached.clone();
            }
        }

        if query.sort.mode != SortMode::None {
            Self::sort_items(&mut items, query);
        }

        let total_count = items.len();
        let offset = query.offset.unwrap_or(0);
        let ids = items
            .into_iter()
            .skip(offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|item| item.id)
            .collect();

        Ok(QueryResult { ids, total_count })
    }

    /// Cardinality of a single constraint value.
    pub fn get_count(&self, name: &str, value: &str) -> usize {
        self.constraint_index.get_count(name, value)
    }

    /// Transitive descendant ids along a recursively searchable index.
    pub fn get_descendant_ids(
        &self,
        name: &str,
        values: &[String],
    ) -> Result<Vec<String>, ConstraintError> {
        Ok(self
            .constraint_index
            .get_with_descendants(name, values)?
            .into_iter()
            .map(|item| item.id)
            .collect())
    }

    /// The cached item for a document id, if indexed.
    pub fn get_item(&self, id: &str) -> Option<&IndexItem> {
        self.items.get(id)
    }

    /// Number of currently indexed documents.
    pub fn indexed_count(&self) -> usize {
        self.items.len()
    }

    /// Subscribe to change notifications.
    ///
    /// Every mutation sends one [`IndexChange`] to each live subscriber;
    /// dropped receivers are pruned on the next notification.
    pub fn changes_notifications(&mut self) -> Receiver<IndexChange> {
        let (tx, rx) = channel();
        self.observers.push(tx);
        rx
    }

    fn index_document(&mut self, doc: &Document, skip_removal: bool) -> bool {
        let Some(mut item) = IndexItem::from_document(doc) else {
            debug!(id = %doc.id, "excluded from index: no identifier");
            return false;
        };

        if doc.category == TYPE_CATEGORY {
            // Keep instances already attached by earlier puts of instance
            // documents.
            let existing = self.items.get(&doc.id).and_then(|i| i.instances.clone());
            item.instances = Some(existing.unwrap_or_default());
        } else {
            self.detach_instance(&doc.id);
            if let Some(targets) = doc.relations.get(INSTANCE_OF) {
                for target in targets {
                    if let Some(instances) =
                        self.items.get_mut(target).and_then(|i| i.instances.as_mut())
                    {
                        instances.insert(doc.id.clone(), doc.category.clone());
                    }
                }
            }
        }

        self.items.insert(doc.id.clone(), item.clone());
        let fulltext_fields = self.schema.fulltext_fields(&doc.category);
        self.constraint_index.put(doc, &item, skip_removal);
        self.fulltext_index.put(doc, &item, &fulltext_fields, skip_removal);
        true
    }

    fn detach_instance(&mut self, id: &str) {
        for item in self.items.values_mut() {
            if let Some(instances) = item.instances.as_mut() {
                instances.remove(id);
            }
        }
    }

    fn sort_items(items: &mut [IndexItem], query: &Query) {
        items.sort_by(|a, b| a.identifier.cmp(&b.identifier));

        if query.sort.mode == SortMode::ExactMatchFirst {
            if let Some(target) = query.trimmed_q() {
                let match_category = query.sort.match_category.as_deref();
                items.sort_by_key(|item| {
                    let category_ok = match_category
                        .map_or(true, |category| item.category == category);
                    !(category_ok && item.identifier == target)
                });
            }
        }
    }

    fn notify(&mut self, change: IndexChange) {
        self.observers.retain(|tx| tx.send(change.clone()).is_ok());
    }
}
