use std::time::Duration;

use meridian_domain::{BBox, FIELD_EXTENT, FIELD_TEMPORAL, RecordId, TimeInterval};
use meridian_query::Query;
use meridian_security::{Identity, MetadataSecurityFilter};

use crate::{CatalogService, ServiceError, ServiceResult};

#[derive(Clone, Debug)]
pub struct SearchRequest {
	pub query: String,
	/// Scopes the search to one structured field, overriding field
	/// qualifiers inside the query string.
	pub attribute: Option<String>,
	pub bbox: Option<BBox>,
	pub time: Option<TimeInterval>,
	pub identity: Identity,
}

impl SearchRequest {
	pub fn new(query: impl Into<String>, identity: Identity) -> Self {
		Self { query: query.into(), attribute: None, bbox: None, time: None, identity }
	}
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct SearchResponse {
	pub ids: Vec<RecordId>,
}

impl CatalogService {
	/// Parse, evaluate, then pass the candidate set through the security
	/// filter. Every caller-visible result set goes through this chokepoint.
	pub fn search(&self, req: &SearchRequest) -> ServiceResult<SearchResponse> {
		let mut query = Query::parse(&req.query, req.attribute.as_deref())?
			.with_default_field(self.cfg.search.default_field.clone());

		if query.leaf_count() > self.cfg.search.max_query_terms as usize {
			return Err(ServiceError::InvalidRequest {
				message: format!(
					"query exceeds the term limit ({}).",
					self.cfg.search.max_query_terms,
				),
			});
		}
		if let Some(bbox) = req.bbox {
			if !bbox.is_valid() {
				return Err(ServiceError::InvalidRequest {
					message: "bbox must satisfy west <= east and south <= north.".to_string(),
				});
			}

			query = query.and_within(FIELD_EXTENT, bbox);
		}
		if let Some(time) = req.time {
			if !time.is_valid() {
				return Err(ServiceError::InvalidRequest {
					message: "time must satisfy begin <= end.".to_string(),
				});
			}

			query = query.and_during(FIELD_TEMPORAL, time);
		}

		let ids = self.index.search(&query).into_iter().collect::<Vec<_>>();
		let ids = self.security.filter_results(&req.identity, &ids);

		Ok(SearchResponse { ids })
	}

	/// [`CatalogService::search`] under the configured request timeout. On
	/// expiry the partial result is discarded entirely; a truncated set is
	/// never returned.
	pub async fn search_with_timeout(&self, req: &SearchRequest) -> ServiceResult<SearchResponse> {
		let budget_ms = self.cfg.search.request_timeout_ms;
		let service = self.clone();
		let req = req.clone();
		let task = tokio::task::spawn_blocking(move || service.search(&req));

		match tokio::time::timeout(Duration::from_millis(budget_ms), task).await {
			Ok(Ok(result)) => result,
			Ok(Err(err)) =>
				Err(ServiceError::Internal { message: format!("search task failed: {err}") }),
			Err(_) => {
				tracing::warn!(budget_ms, "Search timed out; discarding partial results.");

				Err(ServiceError::Timeout { elapsed_ms: budget_ms })
			},
		}
	}
}
