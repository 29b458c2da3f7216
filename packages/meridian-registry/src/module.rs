use std::{collections::BTreeSet, fmt, future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use meridian_domain::RecordId;
use meridian_security::Identity;

use crate::configure::ServiceConfigurer;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Protocol family plus version tag, e.g. `catalog/3.0`. Module identity is
/// the pair `(name, specification)`; resolution is exact on both parts of the
/// specification.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Specification {
	pub family: String,
	pub version: String,
}

impl Specification {
	pub fn new(family: impl Into<String>, version: impl Into<String>) -> Self {
		Self { family: family.into(), version: version.into() }
	}
}

impl fmt::Display for Specification {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.family, self.version)
	}
}

/// One inbound protocol operation, already stripped of its wire encoding.
#[derive(Clone, Debug)]
pub struct OperationRequest {
	pub operation: String,
	pub identity: Identity,
	pub body: Value,
}

#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperationOutcome {
	/// Record ids that already passed the security filter.
	Records { ids: Vec<RecordId> },
	/// A protocol document (capabilities listing, single record, ...).
	Document { body: Value },
}

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Operation failed: {message}")]
	Internal { message: String },
}

/// Executes one operation of a protocol module. Implementations hold their
/// own handles to the index and security filter and must pass every record
/// result set through the filter before returning.
pub trait OperationHandler
where
	Self: Send + Sync,
{
	fn handle<'a>(
		&'a self,
		request: &'a OperationRequest,
	) -> BoxFuture<'a, Result<OperationOutcome, HandlerError>>;
}

/// A registered protocol capability: the descriptor, the operation handler,
/// and the module's configuration surface. Immutable after registration.
#[derive(Clone)]
pub struct ServiceModule {
	pub name: String,
	pub specification: Specification,
	pub operations: BTreeSet<String>,
	handler: Arc<dyn OperationHandler>,
	configurer: Arc<dyn ServiceConfigurer>,
}

impl ServiceModule {
	pub fn new(
		name: impl Into<String>,
		specification: Specification,
		operations: impl IntoIterator<Item = String>,
		handler: Arc<dyn OperationHandler>,
		configurer: Arc<dyn ServiceConfigurer>,
	) -> Self {
		Self {
			name: name.into(),
			specification,
			operations: operations.into_iter().collect(),
			handler,
			configurer,
		}
	}

	pub fn configurer(&self) -> &Arc<dyn ServiceConfigurer> {
		&self.configurer
	}

	pub fn supports(&self, operation: &str) -> bool {
		self.operations.contains(operation)
	}

	pub fn operation_count(&self) -> usize {
		self.operations.len()
	}

	pub async fn handle(
		&self,
		request: &OperationRequest,
	) -> Result<OperationOutcome, HandlerError> {
		self.handler.handle(request).await
	}
}

impl fmt::Debug for ServiceModule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ServiceModule")
			.field("name", &self.name)
			.field("specification", &self.specification)
			.field("operations", &self.operations)
			.finish_non_exhaustive()
	}
}
