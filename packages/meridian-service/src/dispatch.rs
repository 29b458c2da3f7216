use serde_json::Value;

use meridian_registry::{OperationOutcome, OperationRequest, ServiceConfigurer, Specification};
use meridian_security::Identity;

use crate::{CatalogService, ServiceError, ServiceResult};

/// One inbound protocol operation, tagged with the protocol it targets.
#[derive(Clone, Debug)]
pub struct DispatchRequest {
	pub specification: Specification,
	pub operation: String,
	pub identity: Identity,
	pub body: Value,
}

impl CatalogService {
	/// Routes an operation to the module registered for its protocol
	/// specification. An unsupported protocol or operation is a client
	/// error, never a crash; the module's current configuration is consulted
	/// on every call.
	pub async fn dispatch(&self, req: DispatchRequest) -> ServiceResult<OperationOutcome> {
		let Some(module) = self.registry.resolve(&req.specification) else {
			return Err(ServiceError::UnsupportedProtocol { specification: req.specification });
		};

		if !module.supports(&req.operation) {
			return Err(ServiceError::UnsupportedOperation {
				module: module.name.clone(),
				operation: req.operation,
			});
		}

		let configuration = module.configurer().get_configuration(&module.name)?;

		if !configuration.enabled_operations.contains(&req.operation) {
			return Err(ServiceError::OperationDisabled {
				module: module.name.clone(),
				operation: req.operation,
			});
		}

		tracing::debug!(
			module = %module.name,
			specification = %module.specification,
			operation = %req.operation,
			"Dispatching protocol operation.",
		);

		let request = OperationRequest {
			operation: req.operation,
			identity: req.identity,
			body: req.body,
		};

		Ok(module.handle(&request).await?)
	}
}
