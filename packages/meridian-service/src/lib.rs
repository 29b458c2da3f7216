pub mod admin;
pub mod dispatch;
pub mod ingest;
pub mod modules;
pub mod search;

use std::sync::Arc;

pub use admin::{ModuleSummary, RebuildReport};
pub use dispatch::DispatchRequest;
pub use ingest::{BatchEntry, BatchOutcome};
pub use search::{SearchRequest, SearchResponse};

use meridian_config::Config;
use meridian_domain::MalformedRecordError;
use meridian_index::Index;
use meridian_registry::{HandlerError, ModuleRegistry, Specification};
use meridian_security::{
	AclMetadataSecurityFilter, MemoryAclStore, MetadataSecurityFilter, NoMetadataSecurityFilter,
};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
	InvalidRequest { message: String },
	QuerySyntax(meridian_query::Error),
	Malformed(MalformedRecordError),
	Index(meridian_index::Error),
	Registry(meridian_registry::Error),
	Handler(HandlerError),
	UnsupportedProtocol { specification: Specification },
	UnsupportedOperation { module: String, operation: String },
	OperationDisabled { module: String, operation: String },
	Timeout { elapsed_ms: u64 },
	Internal { message: String },
}

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::QuerySyntax(err) => write!(f, "{err}"),
			Self::Malformed(err) => write!(f, "{err}"),
			Self::Index(err) => write!(f, "Index error: {err}"),
			Self::Registry(err) => write!(f, "{err}"),
			Self::Handler(err) => write!(f, "{err}"),
			Self::UnsupportedProtocol { specification } => {
				write!(f, "Unsupported protocol: {specification}.")
			},
			Self::UnsupportedOperation { module, operation } => {
				write!(f, "Module {module} does not provide operation '{operation}'.")
			},
			Self::OperationDisabled { module, operation } => {
				write!(f, "Operation '{operation}' is disabled for module {module}.")
			},
			Self::Timeout { elapsed_ms } => {
				write!(f, "Search timed out after {elapsed_ms} ms; partial results discarded.")
			},
			Self::Internal { message } => write!(f, "Internal error: {message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<meridian_query::Error> for ServiceError {
	fn from(err: meridian_query::Error) -> Self {
		Self::QuerySyntax(err)
	}
}

impl From<MalformedRecordError> for ServiceError {
	fn from(err: MalformedRecordError) -> Self {
		Self::Malformed(err)
	}
}

impl From<meridian_index::Error> for ServiceError {
	fn from(err: meridian_index::Error) -> Self {
		Self::Index(err)
	}
}

impl From<meridian_registry::Error> for ServiceError {
	fn from(err: meridian_registry::Error) -> Self {
		Self::Registry(err)
	}
}

impl From<HandlerError> for ServiceError {
	fn from(err: HandlerError) -> Self {
		Self::Handler(err)
	}
}

/// The catalog core shared by every worker: configuration, the index, the
/// security filter chokepoint, and the protocol module registry.
#[derive(Clone)]
pub struct CatalogService {
	pub cfg: Config,
	pub index: Arc<Index>,
	pub security: Arc<dyn MetadataSecurityFilter>,
	pub registry: Arc<ModuleRegistry>,
}

impl CatalogService {
	pub fn new(
		cfg: Config,
		index: Arc<Index>,
		security: Arc<dyn MetadataSecurityFilter>,
		registry: Arc<ModuleRegistry>,
	) -> Self {
		Self { cfg, index, security, registry }
	}

	/// Durably flushes buffered index writes. Corruption is the only fatal
	/// condition here: it halts all further writes and is never swallowed.
	pub fn commit(&self) -> ServiceResult<()> {
		self.index.commit().map_err(|err| {
			if err.is_fatal() {
				self.index.halt();
			}

			ServiceError::Index(err)
		})
	}
}

/// Selects the security filter implementation for this deployment. The no-op
/// filter is the default when access control is disabled.
pub fn select_security_filter(
	cfg: &Config,
	acl_store: Arc<MemoryAclStore>,
) -> Arc<dyn MetadataSecurityFilter> {
	match cfg.security.mode.as_str() {
		"acl" => Arc::new(AclMetadataSecurityFilter::new(acl_store)),
		_ => Arc::new(NoMetadataSecurityFilter),
	}
}
