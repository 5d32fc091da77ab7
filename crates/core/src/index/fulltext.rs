//! Tokenized, category-partitioned full-text index.
//!
//! Tokens are lowercased words split on whitespace and hyphens, drawn from
//! the identifier, the short description and every fulltext-flagged field of
//! the document's category. Query terms match indexed tokens by prefix; a
//! bracketed character class (`00[23]` matches `002...` and `003...`) is
//! supported via a compiled regex.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use tracing::debug;

use crate::document::Document;

use super::types::{IndexItem, ItemSet};

/// Category to token to items, with occupancy bookkeeping for removal.
#[derive(Debug, Default)]
pub struct FulltextIndex {
    buckets: HashMap<String, HashMap<String, ItemSet>>,
    /// Every indexed item per category; serves `*` queries.
    all: HashMap<String, ItemSet>,
    /// Document id to (category, tokens) it is indexed under.
    occupancy: HashMap<String, (String, Vec<String>)>,
}

impl FulltextIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a document's item under its category bucket.
    ///
    /// Documents are only indexed when the identifier is set and at least
    /// one creation/modification timestamp is present; anything else is
    /// excluded from full-text search.
    pub fn put(
        &mut self,
        doc: &Document,
        item: &IndexItem,
        fulltext_fields: &[&str],
        skip_removal: bool,
    ) {
        let Some(identifier) = doc.identifier() else {
            return;
        };
        if !doc.has_edit_metadata() {
            debug!(id = %doc.id, "excluded from fulltext index: no edit metadata");
            return;
        }
        if !skip_removal {
            self.remove_id(&doc.id);
        }

        let mut tokens = tokenize(identifier);
        if let Some(short_description) = doc.short_description() {
            tokens.extend(tokenize(short_description));
        }
        for field in fulltext_fields {
            if let Some(text) = doc.fields.get(*field).and_then(field_text) {
                tokens.extend(tokenize(&text));
            }
        }
        tokens.sort_unstable();
        tokens.dedup();

        let bucket = self.buckets.entry(doc.category.clone()).or_default();
        for token in &tokens {
            bucket.entry(token.clone()).or_default().insert(item.clone());
        }
        self.all.entry(doc.category.clone()).or_default().insert(item.clone());
        self.occupancy.insert(doc.id.clone(), (doc.category.clone(), tokens));
    }

    /// Remove a document's item from every token bucket it occupies.
    pub fn remove(&mut self, doc: &Document) {
        self.remove_id(&doc.id);
    }

    fn remove_id(&mut self, id: &str) {
        let Some((category, tokens)) = self.occupancy.remove(id) else {
            return;
        };
        if let Some(bucket) = self.buckets.get_mut(&category) {
            for token in &tokens {
                let emptied = match bucket.get_mut(token) {
                    Some(set) => {
                        set.remove(id);
                        set.is_empty()
                    }
                    None => false,
                };
                if emptied {
                    bucket.remove(token);
                }
            }
            if bucket.is_empty() {
                self.buckets.remove(&category);
            }
        }
        if let Some(set) = self.all.get_mut(&category) {
            set.remove(id);
            if set.is_empty() {
                self.all.remove(&category);
            }
        }
    }

    /// Deduplicated union of matches across the selected categories.
    ///
    /// `*` matches every indexed item. Otherwise each token of the query
    /// term must prefix-match one of the item's indexed tokens.
    pub fn get(&self, term: &str, categories: Option<&[String]>) -> Vec<IndexItem> {
        let selected = self.selected_categories(categories);
        let mut out = ItemSet::default();

        if term.trim() == "*" {
            for category in selected {
                if let Some(set) = self.all.get(category) {
                    for item in set.iter() {
                        out.insert(item.clone());
                    }
                }
            }
            return out.into_items();
        }

        let matchers: Vec<TokenMatcher> =
            tokenize(term).iter().map(|token| TokenMatcher::new(token)).collect();
        if matchers.is_empty() {
            return Vec::new();
        }

        for category in selected {
            let Some(bucket) = self.buckets.get(category) else {
                continue;
            };
            let mut tokens: Vec<&String> = bucket.keys().collect();
            tokens.sort_unstable();

            // Candidates matching the first query token, deterministic order.
            let mut candidates = ItemSet::default();
            for token in &tokens {
                if matchers[0].matches(token.as_str()) {
                    for item in bucket[*token].iter() {
                        candidates.insert(item.clone());
                    }
                }
            }

            // Every further query token must also hit the item.
            for matcher in &matchers[1..] {
                let matched: HashSet<&str> = tokens
                    .iter()
                    .filter(|token| matcher.matches(token.as_str()))
                    .flat_map(|token| bucket[*token].iter().map(|item| item.id.as_str()))
                    .collect();
                let survivors: Vec<IndexItem> = candidates
                    .into_items()
                    .into_iter()
                    .filter(|item| matched.contains(item.id.as_str()))
                    .collect();
                candidates = ItemSet::from_items(survivors);
            }

            for item in candidates.into_items() {
                out.insert(item);
            }
        }

        out.into_items()
    }

    fn selected_categories<'a>(&'a self, categories: Option<&'a [String]>) -> Vec<&'a String> {
        match categories {
            Some(wanted) => {
                wanted.iter().filter(|category| self.all.contains_key(*category)).collect()
            }
            None => {
                let mut keys: Vec<&String> = self.all.keys().collect();
                keys.sort_unstable();
                keys
            }
        }
    }

    /// Drop all indexed data.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.all.clear();
        self.occupancy.clear();
    }
}

/// Normalize text into lowercased tokens, split on whitespace and hyphens.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn field_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Prefix matcher for a single query token.
enum TokenMatcher {
    Prefix(String),
    Pattern(Regex),
}

impl TokenMatcher {
    fn new(token: &str) -> Self {
        if token.contains('[') {
            if let Some(pattern) = Self::compile(token) {
                return Self::Pattern(pattern);
            }
        }
        Self::Prefix(token.to_string())
    }

    /// Turn a token with `[...]` character classes into an anchored prefix
    /// regex. Malformed classes fall back to literal matching.
    fn compile(token: &str) -> Option<Regex> {
        let mut pattern = String::from("^");
        let mut rest = token;
        loop {
            match rest.find('[') {
                None => {
                    pattern.push_str(&regex::escape(rest));
                    break;
                }
                Some(open) => {
                    pattern.push_str(&regex::escape(&rest[..open]));
                    let close = rest[open..].find(']')? + open;
                    let class = &rest[open + 1..close];
                    if class.is_empty() || !class.chars().all(char::is_alphanumeric) {
                        return None;
                    }
                    pattern.push('[');
                    pattern.push_str(class);
                    pattern.push(']');
                    rest = &rest[close + 1..];
                }
            }
        }
        Regex::new(&pattern).ok()
    }

    fn matches(&self, token: &str) -> bool {
        match self {
            Self::Prefix(prefix) => token.starts_with(prefix.as_str()),
            Self::Pattern(pattern) => pattern.is_match(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::json;

    use crate::document::Action;

    use super::*;

    fn doc(id: &str, category: &str, identifier: &str) -> Document {
        let mut doc = Document::new(id, category, identifier);
        doc.created =
            Some(Action { user: "anna".to_string(), date: Utc::now() });
        doc
    }

    fn put(index: &mut FulltextIndex, doc: &Document, fulltext_fields: &[&str]) {
        let item = IndexItem::from_document(doc).unwrap();
        index.put(doc, &item, fulltext_fields, false);
    }

    fn ids(items: Vec<IndexItem>) -> Vec<String> {
        items.into_iter().map(|item| item.id).collect()
    }

    #[rstest]
    #[case("Hello-A-0033", vec!["hello", "a", "0033"])]
    #[case("  North  Wall ", vec!["north", "wall"])]
    #[case("", vec![])]
    fn tokenizes_on_whitespace_and_hyphens(
        #[case] text: &str,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(tokenize(text), expected);
    }

    #[test]
    fn star_matches_everything_in_selected_categories() {
        let mut index = FulltextIndex::new();
        put(&mut index, &doc("1", "Operation", "T-01"), &[]);
        put(&mut index, &doc("2", "Find", "F-01"), &[]);
        put(&mut index, &doc("3", "Find", "F-02"), &[]);

        let finds = ids(index.get("*", Some(&["Find".to_string()])));
        assert_eq!(finds, vec!["2", "3"]);

        let everything = ids(index.get("*", None));
        assert_eq!(everything.len(), 3);
    }

    #[test]
    fn matches_tokens_by_prefix() {
        let mut index = FulltextIndex::new();
        let mut d = doc("1", "Find", "F-01");
        d.fields.insert("shortDescription".to_string(), json!("Bronze fibula"));
        put(&mut index, &d, &[]);
        put(&mut index, &doc("2", "Find", "F-02"), &[]);

        assert_eq!(ids(index.get("fib", None)), vec!["1"]);
        assert_eq!(ids(index.get("bronze fibula", None)), vec!["1"]);
        assert!(index.get("fibulae", None).is_empty());
    }

    #[test]
    fn fulltext_flagged_fields_are_searchable() {
        let mut index = FulltextIndex::new();
        let mut d = doc("1", "Find", "F-01");
        d.fields.insert("material".to_string(), json!("burnished clay"));
        put(&mut index, &d, &["material"]);
        put(&mut index, &doc("2", "Find", "F-02"), &["material"]);

        assert_eq!(ids(index.get("burnished", None)), vec!["1"]);
    }

    #[rstest]
    #[case("Hello-A-0033", true)]
    #[case("Hello-A-0021", true)]
    #[case("Hello-A-0059", false)]
    fn placeholder_class_matches_prefixes(#[case] identifier: &str, #[case] hit: bool) {
        let mut index = FulltextIndex::new();
        let d = doc("1", "Find", identifier);
        put(&mut index, &d, &[]);

        let results = index.get("Hello-A-00[23]", None);
        assert_eq!(!results.is_empty(), hit);
    }

    #[test]
    fn skips_documents_without_edit_metadata() {
        let mut index = FulltextIndex::new();
        let mut d = doc("1", "Find", "F-01");
        d.created = None;
        d.modified.clear();
        put(&mut index, &d, &[]);

        assert!(index.get("*", None).is_empty());
    }

    #[test]
    fn remove_purges_all_token_buckets() {
        let mut index = FulltextIndex::new();
        let mut d = doc("1", "Find", "F-01");
        d.fields.insert("shortDescription".to_string(), json!("Bronze fibula"));
        put(&mut index, &d, &[]);

        index.remove(&d);

        assert!(index.get("*", None).is_empty());
        assert!(index.get("bronze", None).is_empty());
        assert!(index.get("f", None).is_empty());
    }

    #[test]
    fn reindex_replaces_old_tokens() {
        let mut index = FulltextIndex::new();
        let mut d = doc("1", "Find", "F-01");
        put(&mut index, &d, &[]);

        d.fields.insert("identifier".to_string(), json!("G-77"));
        put(&mut index, &d, &[]);

        assert!(index.get("f", None).is_empty());
        assert_eq!(ids(index.get("g", None)), vec!["1"]);
        assert_eq!(index.get("*", None).len(), 1);
    }
}
