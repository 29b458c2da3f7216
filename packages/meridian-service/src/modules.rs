use std::{collections::BTreeSet, sync::Arc};

use serde_json::Value;

use meridian_config::Config;
use meridian_domain::{RecordId, RecordKind};
use meridian_index::Index;
use meridian_query::Query;
use meridian_registry::{
	BoxFuture, CatalogServiceConfigurer, DataServiceConfigurer, HandlerError,
	MapServiceConfigurer, OperationHandler, OperationOutcome, OperationRequest,
	ServiceConfiguration, ServiceConfigurer, ServiceModule, Specification,
};
use meridian_security::MetadataSecurityFilter;

use crate::ServiceResult;

pub const OP_GET_CAPABILITIES: &str = "get-capabilities";
pub const OP_GET_RECORDS: &str = "get-records";
pub const OP_GET_RECORD: &str = "get-record";
pub const OP_LIST_FEATURE_TYPES: &str = "list-feature-types";
pub const OP_LIST_LAYERS: &str = "list-layers";
pub const OP_LIST_OFFERINGS: &str = "list-observation-offerings";
pub const OP_LIST_PROCESSES: &str = "list-processes";

struct Blueprint {
	name: &'static str,
	family: &'static str,
	version: &'static str,
	operations: &'static [&'static str],
	/// Restricts record-returning operations to one record kind; the catalog
	/// searches both.
	kind_scope: Option<RecordKind>,
	enabled: bool,
}

/// Enumerates the protocol modules available in this deployment and seeds
/// each with its default configuration (all operations enabled, datasets
/// exposed). Runs once at startup before the registry is marked ready.
pub fn discover(
	cfg: &Config,
	index: Arc<Index>,
	security: Arc<dyn MetadataSecurityFilter>,
) -> ServiceResult<Vec<ServiceModule>> {
	let blueprints = [
		Blueprint {
			name: "catalog",
			family: "catalog",
			version: "3.0",
			operations: &[OP_GET_CAPABILITIES, OP_GET_RECORDS, OP_GET_RECORD],
			kind_scope: None,
			enabled: cfg.modules.catalog,
		},
		Blueprint {
			name: "feature",
			family: "feature",
			version: "2.0",
			operations: &[OP_GET_CAPABILITIES, OP_LIST_FEATURE_TYPES],
			kind_scope: Some(RecordKind::Dataset),
			enabled: cfg.modules.feature,
		},
		Blueprint {
			name: "map",
			family: "map",
			version: "1.3",
			operations: &[OP_GET_CAPABILITIES, OP_LIST_LAYERS],
			kind_scope: Some(RecordKind::Dataset),
			enabled: cfg.modules.map,
		},
		Blueprint {
			name: "sensor",
			family: "sensor",
			version: "2.0",
			operations: &[OP_GET_CAPABILITIES, OP_LIST_OFFERINGS],
			kind_scope: Some(RecordKind::Data),
			enabled: cfg.modules.sensor,
		},
		Blueprint {
			name: "processing",
			family: "processing",
			version: "2.0",
			operations: &[OP_GET_CAPABILITIES, OP_LIST_PROCESSES],
			kind_scope: Some(RecordKind::Dataset),
			enabled: cfg.modules.processing,
		},
	];
	let mut modules = Vec::new();

	for blueprint in blueprints.into_iter().filter(|blueprint| blueprint.enabled) {
		let operations =
			blueprint.operations.iter().map(|op| (*op).to_string()).collect::<Vec<_>>();
		let configurer: Arc<dyn ServiceConfigurer> = match blueprint.family {
			"catalog" => Arc::new(CatalogServiceConfigurer::new(operations.clone())),
			"map" => Arc::new(MapServiceConfigurer::new(operations.clone())),
			_ => Arc::new(DataServiceConfigurer::new(operations.clone())),
		};

		configurer.set_configuration(
			blueprint.name,
			ServiceConfiguration {
				enabled_operations: operations.iter().cloned().collect(),
				expose_datasets: true,
				..ServiceConfiguration::default()
			},
		)?;

		let specification = Specification::new(blueprint.family, blueprint.version);
		let handler = Arc::new(SearchBackedHandler {
			module: blueprint.name.to_string(),
			specification: specification.clone(),
			kind_scope: blueprint.kind_scope,
			default_field: cfg.search.default_field.clone(),
			index: index.clone(),
			security: security.clone(),
			configurer: configurer.clone(),
		});

		tracing::info!(module = blueprint.name, specification = %specification, "Discovered protocol module.");
		modules.push(ServiceModule::new(
			blueprint.name,
			specification,
			operations,
			handler,
			configurer,
		));
	}

	Ok(modules)
}

/// Shared handler for the data-serving protocols. Record-returning
/// operations evaluate a query against the index, restrict to the module's
/// record kind, and pass the result through the security filter.
struct SearchBackedHandler {
	module: String,
	specification: Specification,
	kind_scope: Option<RecordKind>,
	default_field: String,
	index: Arc<Index>,
	security: Arc<dyn MetadataSecurityFilter>,
	configurer: Arc<dyn ServiceConfigurer>,
}

impl OperationHandler for SearchBackedHandler {
	fn handle<'a>(
		&'a self,
		request: &'a OperationRequest,
	) -> BoxFuture<'a, Result<OperationOutcome, HandlerError>> {
		Box::pin(async move {
			match request.operation.as_str() {
				OP_GET_CAPABILITIES => self.capabilities(),
				OP_GET_RECORD => self.record(request),
				_ => self.records(request),
			}
		})
	}
}

impl SearchBackedHandler {
	fn configuration(&self) -> Result<ServiceConfiguration, HandlerError> {
		self.configurer
			.get_configuration(&self.module)
			.map_err(|err| HandlerError::Internal { message: err.to_string() })
	}

	fn capabilities(&self) -> Result<OperationOutcome, HandlerError> {
		let configuration = self.configuration()?;

		Ok(OperationOutcome::Document {
			body: serde_json::json!({
				"module": self.module,
				"specification": self.specification,
				"operations": configuration.enabled_operations,
			}),
		})
	}

	fn record(&self, request: &OperationRequest) -> Result<OperationOutcome, HandlerError> {
		let id = request.body.get("id").and_then(Value::as_i64).ok_or_else(|| {
			HandlerError::InvalidRequest { message: "body.id is required.".to_string() }
		})?;
		let kind = match request.body.get("kind").and_then(Value::as_str) {
			None | Some("data") => RecordKind::Data,
			Some("dataset") => RecordKind::Dataset,
			Some(other) => {
				return Err(HandlerError::InvalidRequest {
					message: format!("unknown record kind '{other}'."),
				});
			},
		};
		let candidates =
			if self.index.contains(id, kind) { vec![id] } else { Vec::new() };
		let ids = self.security.filter_results(&request.identity, &candidates);

		Ok(OperationOutcome::Records { ids })
	}

	fn records(&self, request: &OperationRequest) -> Result<OperationOutcome, HandlerError> {
		let configuration = self.configuration()?;

		if matches!(self.kind_scope, Some(RecordKind::Dataset))
			&& !configuration.expose_datasets
		{
			return Ok(OperationOutcome::Records { ids: Vec::new() });
		}

		let raw = request.body.get("query").and_then(Value::as_str).unwrap_or("");
		let attribute = request.body.get("attribute").and_then(Value::as_str);
		let query = Query::parse(raw, attribute)
			.map_err(|err| HandlerError::InvalidRequest { message: err.to_string() })?
			.with_default_field(self.default_field.clone());
		let ids = self
			.index
			.search_keys(&query)
			.into_iter()
			.filter(|key| self.kind_scope.is_none_or(|kind| key.kind == kind))
			.map(|key| key.id)
			.collect::<BTreeSet<RecordId>>()
			.into_iter()
			.collect::<Vec<_>>();
		let ids = self.security.filter_results(&request.identity, &ids);

		Ok(OperationOutcome::Records { ids })
	}
}
