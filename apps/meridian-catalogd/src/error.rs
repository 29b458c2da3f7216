pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0}")]
	Message(String),
	#[error(transparent)]
	Config(#[from] meridian_config::Error),
	#[error(transparent)]
	Index(#[from] meridian_index::Error),
	#[error(transparent)]
	Registry(#[from] meridian_registry::Error),
	#[error(transparent)]
	Service(#[from] meridian_service::ServiceError),
}
