mod error;
mod expr;
mod parse;

pub use error::{Error, Result};
pub use expr::QueryExpr;

use meridian_domain::{BBox, FIELD_ANY, IndexedDocument, TimeInterval};

/// A parsed, immutable query: the predicate tree plus the default field that
/// unqualified text leaves evaluate against.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
	expr: QueryExpr,
	default_field: String,
}

impl Query {
	/// Parses a raw query string. A supplied `attribute` id scopes the search
	/// to that single structured field: every text leaf of the expression is
	/// retargeted to it, overriding field qualifiers in the text.
	pub fn parse(raw: &str, attribute: Option<&str>) -> Result<Self> {
		let mut expr = parse::parse(raw)?;

		if let Some(attribute) = attribute.map(str::trim).filter(|value| !value.is_empty()) {
			expr.retarget(&attribute.to_ascii_lowercase());
		}

		Ok(Self { expr, default_field: FIELD_ANY.to_string() })
	}

	pub fn match_all() -> Self {
		Self { expr: QueryExpr::All, default_field: FIELD_ANY.to_string() }
	}

	pub fn with_default_field(mut self, field: impl Into<String>) -> Self {
		self.default_field = field.into();

		self
	}

	/// ANDs a bounding-box intersection predicate onto the query.
	pub fn and_within(self, field: impl Into<String>, bbox: BBox) -> Self {
		self.and_expr(QueryExpr::Within { field: field.into(), bbox })
	}

	/// ANDs a closed time-interval intersection predicate onto the query.
	pub fn and_during(self, field: impl Into<String>, interval: TimeInterval) -> Self {
		self.and_expr(QueryExpr::During { field: field.into(), interval })
	}

	pub fn expr(&self) -> &QueryExpr {
		&self.expr
	}

	pub fn default_field(&self) -> &str {
		&self.default_field
	}

	pub fn is_match_all(&self) -> bool {
		matches!(self.expr, QueryExpr::All)
	}

	pub fn leaf_count(&self) -> usize {
		self.expr.leaf_count()
	}

	pub fn matches(&self, doc: &IndexedDocument) -> bool {
		self.expr.matches(doc, &self.default_field)
	}

	fn and_expr(mut self, extra: QueryExpr) -> Self {
		self.expr = match self.expr {
			QueryExpr::All => extra,
			QueryExpr::And(mut nodes) => {
				nodes.push(extra);

				QueryExpr::And(nodes)
			},
			other => QueryExpr::And(vec![other, extra]),
		};

		self
	}
}
