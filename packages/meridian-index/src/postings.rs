use std::collections::BTreeMap;

use ahash::{AHashMap, AHashSet};

use meridian_domain::IndexedDocument;
use meridian_query::QueryExpr;

use crate::engine::DocKey;

/// field → token → posting list. Token maps are ordered so prefix lookups can
/// range-scan instead of walking the whole vocabulary.
#[derive(Debug, Default)]
pub(crate) struct Postings {
	fields: AHashMap<String, BTreeMap<String, AHashSet<DocKey>>>,
}

/// Superset of the documents that can match an expression. `All` means the
/// posting lists cannot narrow the expression (negations, ranges, geometry)
/// and every live document must be checked.
pub(crate) enum Candidates {
	All,
	Ids(AHashSet<DocKey>),
}

impl Postings {
	pub(crate) fn insert_doc(&mut self, key: DocKey, doc: &IndexedDocument) {
		for (field, token) in doc.posting_tokens() {
			self.fields
				.entry(field.to_string())
				.or_default()
				.entry(token.to_string())
				.or_default()
				.insert(key);
		}
	}

	pub(crate) fn remove_doc(&mut self, key: DocKey, doc: &IndexedDocument) {
		for (field, token) in doc.posting_tokens() {
			let Some(tokens) = self.fields.get_mut(field) else {
				continue;
			};
			let Some(list) = tokens.get_mut(token) else {
				continue;
			};

			list.remove(&key);

			if list.is_empty() {
				tokens.remove(token);
			}
		}
	}

	pub(crate) fn clear(&mut self) {
		self.fields.clear();
	}

	pub(crate) fn gather(&self, expr: &QueryExpr, default_field: &str) -> Candidates {
		match expr {
			QueryExpr::Term { field, value } =>
				Candidates::Ids(self.term(field.as_deref().unwrap_or(default_field), value)),
			QueryExpr::Prefix { field, value } =>
				Candidates::Ids(self.prefix(field.as_deref().unwrap_or(default_field), value)),
			// Exact text matches, ranges, geometry, intervals, and negations
			// are not narrowed by posting lists; the evaluator decides.
			QueryExpr::All
			| QueryExpr::Exact { .. }
			| QueryExpr::Range { .. }
			| QueryExpr::Within { .. }
			| QueryExpr::During { .. }
			| QueryExpr::Not(_) => Candidates::All,
			QueryExpr::And(nodes) => {
				let mut narrowed: Option<AHashSet<DocKey>> = None;

				for node in nodes {
					if let Candidates::Ids(ids) = self.gather(node, default_field) {
						narrowed = Some(match narrowed {
							None => ids,
							Some(current) =>
								current.intersection(&ids).copied().collect(),
						});
					}
				}

				match narrowed {
					Some(ids) => Candidates::Ids(ids),
					None => Candidates::All,
				}
			},
			QueryExpr::Or(nodes) => {
				let mut union = AHashSet::new();

				for node in nodes {
					match self.gather(node, default_field) {
						Candidates::All => return Candidates::All,
						Candidates::Ids(ids) => union.extend(ids),
					}
				}

				Candidates::Ids(union)
			},
		}
	}

	fn term(&self, field: &str, token: &str) -> AHashSet<DocKey> {
		self.fields
			.get(field)
			.and_then(|tokens| tokens.get(token))
			.cloned()
			.unwrap_or_default()
	}

	fn prefix(&self, field: &str, prefix: &str) -> AHashSet<DocKey> {
		let Some(tokens) = self.fields.get(field) else {
			return AHashSet::new();
		};
		let mut out = AHashSet::new();

		for (token, list) in tokens.range(prefix.to_string()..) {
			if !token.starts_with(prefix) {
				break;
			}

			out.extend(list.iter().copied());
		}

		out
	}
}
