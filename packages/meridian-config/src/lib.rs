mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, IndexStorage, Modules, Search, Security, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.storage.index.dir.as_os_str().is_empty() {
		return Err(Error::Validation {
			message: "storage.index.dir must be non-empty.".to_string(),
		});
	}
	if cfg.storage.index.commit_interval_ms == 0 {
		return Err(Error::Validation {
			message: "storage.index.commit_interval_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_field.trim().is_empty() {
		return Err(Error::Validation {
			message: "search.default_field must be non-empty.".to_string(),
		});
	}
	if cfg.search.max_query_terms == 0 {
		return Err(Error::Validation {
			message: "search.max_query_terms must be greater than zero.".to_string(),
		});
	}
	if cfg.search.request_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "search.request_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !matches!(cfg.security.mode.as_str(), "open" | "acl") {
		return Err(Error::Validation {
			message: "security.mode must be one of open or acl.".to_string(),
		});
	}

	let modules = &cfg.modules;

	if !(modules.catalog || modules.feature || modules.map || modules.sensor || modules.processing)
	{
		return Err(Error::Validation {
			message: "modules must enable at least one protocol.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.log_level = cfg.service.log_level.trim().to_string();
	cfg.search.default_field = cfg.search.default_field.trim().to_string();
	cfg.security.mode = cfg.security.mode.trim().to_ascii_lowercase();
}
