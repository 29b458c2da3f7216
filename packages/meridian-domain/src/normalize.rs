use std::collections::BTreeSet;

use crate::{
	MalformedRecordError, RecordId,
	document::{
		FIELD_ABSTRACT, FIELD_ANY, FIELD_EXTENT, FIELD_IDENTIFIER, FIELD_KEYWORD, FIELD_STATUS,
		FIELD_TEMPORAL, FIELD_TITLE, FieldValue, IndexedDocument,
	},
	record::{MetadataRecord, RecordKind},
	text::{normalize_token, tokenize},
};

/// Projects a metadata record into its searchable document.
///
/// Pure and deterministic: the same record always yields the same document,
/// which is what makes re-indexing idempotent. Absent optional sections are
/// omitted from the document; only a structurally unreadable record fails.
pub fn normalize(
	id: RecordId,
	kind: RecordKind,
	record: &MetadataRecord,
) -> Result<IndexedDocument, MalformedRecordError> {
	let mut doc = IndexedDocument::new(id, kind);
	let mut any_raw = Vec::new();
	let mut any_tokens = BTreeSet::new();

	if let Some(title) = record.title()? {
		let tokens = tokenize(title);

		any_raw.push(title.to_string());
		any_tokens.extend(tokens.iter().cloned());
		doc.fields
			.insert(FIELD_TITLE.to_string(), FieldValue::Text { raw: title.to_string(), tokens });
	}
	if let Some(abstract_text) = record.abstract_text()? {
		let tokens = tokenize(abstract_text);

		any_raw.push(abstract_text.to_string());
		any_tokens.extend(tokens.iter().cloned());
		doc.fields.insert(
			FIELD_ABSTRACT.to_string(),
			FieldValue::Text { raw: abstract_text.to_string(), tokens },
		);
	}

	let keywords = record.keywords()?;

	if !keywords.is_empty() {
		let values = keywords
			.iter()
			.map(|keyword| normalize_token(keyword))
			.filter(|keyword| !keyword.is_empty())
			.collect::<BTreeSet<_>>();

		for keyword in &keywords {
			any_raw.push((*keyword).to_string());
			any_tokens.extend(tokenize(keyword));
		}

		doc.fields.insert(FIELD_KEYWORD.to_string(), FieldValue::Keyword { values });
	}
	if let Some(identifier) = record.identifier()? {
		let value = normalize_token(identifier);

		any_tokens.extend(tokenize(identifier));
		doc.fields.insert(
			FIELD_IDENTIFIER.to_string(),
			FieldValue::Keyword { values: BTreeSet::from([value]) },
		);
	}
	if let Some(status) = record.status()? {
		doc.fields.insert(
			FIELD_STATUS.to_string(),
			FieldValue::Keyword { values: BTreeSet::from([normalize_token(status)]) },
		);
	}
	if let Some(bbox) = record.extent()? {
		doc.fields.insert(FIELD_EXTENT.to_string(), FieldValue::Geometry { bbox });
	}
	if let Some(interval) = record.temporal_extent()? {
		doc.fields.insert(FIELD_TEMPORAL.to_string(), FieldValue::Interval { interval });
	}

	doc.fields.insert(
		FIELD_ANY.to_string(),
		FieldValue::Text { raw: any_raw.join(" "), tokens: any_tokens },
	);

	Ok(doc)
}
