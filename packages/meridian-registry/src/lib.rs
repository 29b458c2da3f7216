mod configure;
mod error;
mod module;
mod registry;

pub use configure::{
	CatalogServiceConfigurer, DataServiceConfigurer, LayerRule, MapServiceConfigurer,
	ServiceConfiguration, ServiceConfigurer,
};
pub use error::{Error, Result};
pub use module::{
	BoxFuture, HandlerError, OperationHandler, OperationOutcome, OperationRequest, ServiceModule,
	Specification,
};
pub use registry::ModuleRegistry;
