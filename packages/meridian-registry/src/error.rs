pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Module registry is already ready.")]
	AlreadyReady,
	/// Distinct from an empty configuration, which is a valid stored state.
	#[error("Module {module} has never been configured.")]
	NotConfigured { module: String },
	#[error("Invalid configuration for {module}: {message}")]
	InvalidConfiguration { module: String, message: String },
}
