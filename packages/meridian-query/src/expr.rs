use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use meridian_domain::{BBox, FieldValue, IndexedDocument, TimeInterval};

/// Immutable predicate tree over the index's field vocabulary.
///
/// Text leaves hold values in canonical token form; a `field` of `None` means
/// the query's default field. Structured spatial/temporal predicates are built
/// programmatically and never come out of the string parser.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryExpr {
	All,
	Term { field: Option<String>, value: String },
	Prefix { field: Option<String>, value: String },
	Exact { field: Option<String>, value: String },
	Range { field: String, low: Option<String>, high: Option<String> },
	Within { field: String, bbox: BBox },
	During { field: String, interval: TimeInterval },
	Not(Box<QueryExpr>),
	And(Vec<QueryExpr>),
	Or(Vec<QueryExpr>),
}

impl QueryExpr {
	/// Evaluates this predicate against one document. Pure; the document is
	/// the only input besides the tree itself.
	pub fn matches(&self, doc: &IndexedDocument, default_field: &str) -> bool {
		match self {
			Self::All => true,
			Self::Term { field, value } =>
				match lookup(doc, field.as_deref(), default_field) {
					Some(FieldValue::Text { tokens, .. }) => tokens.contains(value),
					Some(FieldValue::Keyword { values }) => values.contains(value),
					_ => false,
				},
			Self::Prefix { field, value } =>
				match lookup(doc, field.as_deref(), default_field) {
					Some(FieldValue::Text { tokens, .. }) =>
						tokens.iter().any(|token| token.starts_with(value)),
					Some(FieldValue::Keyword { values }) =>
						values.iter().any(|candidate| candidate.starts_with(value)),
					_ => false,
				},
			Self::Exact { field, value } =>
				match lookup(doc, field.as_deref(), default_field) {
					Some(FieldValue::Text { raw, .. }) =>
						meridian_domain::normalize_token(raw) == *value,
					Some(FieldValue::Keyword { values }) => values.contains(value),
					_ => false,
				},
			Self::Range { field, low, high } => match doc.field(field) {
				Some(FieldValue::Keyword { values }) => {
					let low = low.as_deref().map(meridian_domain::normalize_token);
					let high = high.as_deref().map(meridian_domain::normalize_token);

					values.iter().any(|candidate| {
						low.as_deref().is_none_or(|bound| candidate.as_str() >= bound)
							&& high.as_deref().is_none_or(|bound| candidate.as_str() <= bound)
					})
				},
				Some(FieldValue::Interval { interval }) => {
					let Some(low) = parse_bound(low.as_deref()) else {
						return false;
					};
					let Some(high) = parse_bound(high.as_deref()) else {
						return false;
					};

					low.is_none_or(|bound| interval.end >= bound)
						&& high.is_none_or(|bound| interval.begin <= bound)
				},
				_ => false,
			},
			Self::Within { field, bbox } => match doc.field(field) {
				Some(FieldValue::Geometry { bbox: doc_bbox }) => doc_bbox.intersects(bbox),
				_ => false,
			},
			Self::During { field, interval } => match doc.field(field) {
				Some(FieldValue::Interval { interval: doc_interval }) =>
					doc_interval.intersects(interval),
				_ => false,
			},
			Self::Not(inner) => !inner.matches(doc, default_field),
			Self::And(nodes) => nodes.iter().all(|node| node.matches(doc, default_field)),
			Self::Or(nodes) => nodes.iter().any(|node| node.matches(doc, default_field)),
		}
	}

	pub fn leaf_count(&self) -> usize {
		match self {
			Self::All => 0,
			Self::Term { .. }
			| Self::Prefix { .. }
			| Self::Exact { .. }
			| Self::Range { .. }
			| Self::Within { .. }
			| Self::During { .. } => 1,
			Self::Not(inner) => inner.leaf_count(),
			Self::And(nodes) | Self::Or(nodes) =>
				nodes.iter().map(Self::leaf_count).sum(),
		}
	}

	/// Retargets every text leaf (and range) to the given structured field,
	/// overriding field qualifiers written in the expression. Used by the
	/// attribute-scoped search mode.
	pub(crate) fn retarget(&mut self, attribute: &str) {
		match self {
			Self::Term { field, .. } | Self::Prefix { field, .. } | Self::Exact { field, .. } =>
				*field = Some(attribute.to_string()),
			Self::Range { field, .. } => *field = attribute.to_string(),
			Self::Not(inner) => inner.retarget(attribute),
			Self::And(nodes) | Self::Or(nodes) =>
				nodes.iter_mut().for_each(|node| node.retarget(attribute)),
			Self::All | Self::Within { .. } | Self::During { .. } => {},
		}
	}
}

fn lookup<'a>(
	doc: &'a IndexedDocument,
	field: Option<&str>,
	default_field: &str,
) -> Option<&'a FieldValue> {
	doc.field(field.unwrap_or(default_field))
}

// None = unbounded, Some(None) would be unrepresentable; the outer Option is
// the parse result: an unparseable bound makes the whole range unmatchable.
fn parse_bound(raw: Option<&str>) -> Option<Option<OffsetDateTime>> {
	match raw {
		None => Some(None),
		Some(raw) => OffsetDateTime::parse(raw, &Rfc3339).ok().map(Some),
	}
}
