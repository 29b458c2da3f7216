use std::collections::{BTreeMap, BTreeSet};

use crate::{
	RecordId,
	geo::{BBox, TimeInterval},
	record::RecordKind,
};

pub const FIELD_ANY: &str = "any";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_ABSTRACT: &str = "abstract";
pub const FIELD_KEYWORD: &str = "keyword";
pub const FIELD_IDENTIFIER: &str = "identifier";
pub const FIELD_STATUS: &str = "status";
pub const FIELD_EXTENT: &str = "extent";
pub const FIELD_TEMPORAL: &str = "temporal";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldValue {
	/// Tokenized free text. `raw` keeps the original wording for exact quoted
	/// matches, `tokens` feed the posting lists.
	Text { raw: String, tokens: BTreeSet<String> },
	/// Exact-match values, stored in canonical token form.
	Keyword { values: BTreeSet<String> },
	Geometry { bbox: BBox },
	Interval { interval: TimeInterval },
}

/// Searchable projection of one metadata record. Exactly one document exists
/// per `(id, kind)` pair in the index.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IndexedDocument {
	pub id: RecordId,
	pub kind: RecordKind,
	pub fields: BTreeMap<String, FieldValue>,
}

impl IndexedDocument {
	pub fn new(id: RecordId, kind: RecordKind) -> Self {
		Self { id, kind, fields: BTreeMap::new() }
	}

	pub fn field(&self, name: &str) -> Option<&FieldValue> {
		self.fields.get(name)
	}

	/// All `(field, token)` pairs this document contributes to posting lists.
	pub fn posting_tokens(&self) -> Vec<(&str, &str)> {
		let mut pairs = Vec::new();

		for (name, value) in &self.fields {
			match value {
				FieldValue::Text { tokens, .. } =>
					pairs.extend(tokens.iter().map(|token| (name.as_str(), token.as_str()))),
				FieldValue::Keyword { values } =>
					pairs.extend(values.iter().map(|value| (name.as_str(), value.as_str()))),
				FieldValue::Geometry { .. } | FieldValue::Interval { .. } => {},
			}
		}

		pairs
	}
}
