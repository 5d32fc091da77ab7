//! Compiled field-path accessors.
//!
//! Index configuration refers to document values by string paths like
//! `fields.type` or `relations.isChildOf`. Paths are parsed once when the
//! index is constructed, never per document.

use serde_json::Value;

use super::types::Document;

/// Where a configured path points within a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldPath {
    /// A named entry in `fields`. Bare paths default to this.
    Field(String),
    /// A named relation target list.
    Relation(String),
}

/// Value a path resolved to, normalized to strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedValue {
    One(String),
    Many(Vec<String>),
}

impl ResolvedValue {
    /// Whether the resolved value counts as present for existence checks.
    pub fn is_present(&self) -> bool {
        match self {
            Self::One(value) => !value.is_empty(),
            Self::Many(values) => !values.is_empty(),
        }
    }
}

impl FieldPath {
    /// Parse a configured path string.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('.') {
            Some(("fields", rest)) => Self::Field(rest.to_string()),
            Some(("relations", rest)) => Self::Relation(rest.to_string()),
            _ => Self::Field(raw.to_string()),
        }
    }

    /// Resolve this path against a document.
    ///
    /// Scalars (strings, numbers, booleans) become [`ResolvedValue::One`],
    /// arrays and relation target lists become [`ResolvedValue::Many`].
    /// Missing values, nulls and objects resolve to `None`.
    pub fn resolve(&self, doc: &Document) -> Option<ResolvedValue> {
        match self {
            Self::Field(name) => doc.fields.get(name).and_then(resolve_value),
            Self::Relation(name) => {
                doc.relations.get(name).map(|targets| ResolvedValue::Many(targets.clone()))
            }
        }
    }
}

fn resolve_value(value: &Value) -> Option<ResolvedValue> {
    match value {
        Value::String(s) => Some(ResolvedValue::One(s.clone())),
        Value::Number(n) => Some(ResolvedValue::One(n.to_string())),
        Value::Bool(b) => Some(ResolvedValue::One(b.to_string())),
        Value::Array(values) => Some(ResolvedValue::Many(
            values.iter().filter_map(scalar_text).collect(),
        )),
        Value::Null | Value::Object(_) => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn sample_document() -> Document {
        let mut doc = Document::new("c1", "Context", "C-01");
        doc.fields.insert("period".to_string(), json!("Iron Age"));
        doc.fields.insert("sampleCount".to_string(), json!(3));
        doc.fields.insert("materials".to_string(), json!(["clay", "bone"]));
        doc.fields.insert("geometry".to_string(), json!({ "type": "Point" }));
        doc.relations.insert("isChildOf".to_string(), vec!["t1".to_string()]);
        doc
    }

    #[rstest]
    #[case("period", FieldPath::Field("period".to_string()))]
    #[case("fields.period", FieldPath::Field("period".to_string()))]
    #[case("relations.isChildOf", FieldPath::Relation("isChildOf".to_string()))]
    fn parses_path_shapes(#[case] raw: &str, #[case] expected: FieldPath) {
        assert_eq!(FieldPath::parse(raw), expected);
    }

    #[test]
    fn resolves_scalars_and_arrays() {
        let doc = sample_document();
        assert_eq!(
            FieldPath::parse("period").resolve(&doc),
            Some(ResolvedValue::One("Iron Age".to_string()))
        );
        assert_eq!(
            FieldPath::parse("sampleCount").resolve(&doc),
            Some(ResolvedValue::One("3".to_string()))
        );
        assert_eq!(
            FieldPath::parse("materials").resolve(&doc),
            Some(ResolvedValue::Many(vec!["clay".to_string(), "bone".to_string()]))
        );
    }

    #[test]
    fn resolves_relations_and_rejects_objects() {
        let doc = sample_document();
        assert_eq!(
            FieldPath::parse("relations.isChildOf").resolve(&doc),
            Some(ResolvedValue::Many(vec!["t1".to_string()]))
        );
        assert_eq!(FieldPath::parse("geometry").resolve(&doc), None);
        assert_eq!(FieldPath::parse("missing").resolve(&doc), None);
    }

    #[test]
    fn presence_requires_nonempty_value() {
        assert!(ResolvedValue::One("x".to_string()).is_present());
        assert!(!ResolvedValue::One(String::new()).is_present());
        assert!(!ResolvedValue::Many(vec![]).is_present());
    }
}
