use std::{
	collections::{BTreeMap, BTreeSet},
	sync::RwLock,
};

use crate::error::{Error, Result};

/// Per-module runtime settings, owned by exactly one module and read by its
/// handler on every operation. An empty configuration is a valid state,
/// distinct from "never configured".
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ServiceConfiguration {
	pub enabled_operations: BTreeSet<String>,
	pub expose_datasets: bool,
	/// Map-protocol layer exposure rules; other protocols leave this empty.
	pub layer_rules: Vec<LayerRule>,
	pub settings: BTreeMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LayerRule {
	pub pattern: String,
	pub exposed: bool,
}

/// Configuration surface of one protocol module: read, validated write, and
/// the validation itself. A failed validation leaves the stored configuration
/// fully intact.
pub trait ServiceConfigurer
where
	Self: Send + Sync,
{
	fn get_configuration(&self, module: &str) -> Result<ServiceConfiguration>;

	fn set_configuration(&self, module: &str, configuration: ServiceConfiguration) -> Result<()>;

	fn validate(&self, module: &str, configuration: &ServiceConfiguration) -> Result<()>;
}

/// Shared base for data-serving protocols: an operation allowlist plus the
/// dataset exposure toggle. Protocol-specific configurers wrap it and add
/// their own validation on top.
pub struct DataServiceConfigurer {
	allowed_operations: BTreeSet<String>,
	store: RwLock<BTreeMap<String, ServiceConfiguration>>,
}

impl DataServiceConfigurer {
	pub fn new(allowed_operations: impl IntoIterator<Item = String>) -> Self {
		Self {
			allowed_operations: allowed_operations.into_iter().collect(),
			store: RwLock::new(BTreeMap::new()),
		}
	}
}

impl ServiceConfigurer for DataServiceConfigurer {
	fn get_configuration(&self, module: &str) -> Result<ServiceConfiguration> {
		self.store
			.read()
			.unwrap_or_else(|err| err.into_inner())
			.get(module)
			.cloned()
			.ok_or_else(|| Error::NotConfigured { module: module.to_string() })
	}

	fn set_configuration(&self, module: &str, configuration: ServiceConfiguration) -> Result<()> {
		self.validate(module, &configuration)?;
		self.store
			.write()
			.unwrap_or_else(|err| err.into_inner())
			.insert(module.to_string(), configuration);

		Ok(())
	}

	fn validate(&self, module: &str, configuration: &ServiceConfiguration) -> Result<()> {
		for operation in &configuration.enabled_operations {
			if !self.allowed_operations.contains(operation) {
				return Err(Error::InvalidConfiguration {
					module: module.to_string(),
					message: format!("operation '{operation}' is not provided by this module."),
				});
			}
		}

		Ok(())
	}
}

/// Catalog variant: capability discovery cannot be switched off while other
/// operations stay enabled.
pub struct CatalogServiceConfigurer {
	base: DataServiceConfigurer,
}

impl CatalogServiceConfigurer {
	pub fn new(allowed_operations: impl IntoIterator<Item = String>) -> Self {
		Self { base: DataServiceConfigurer::new(allowed_operations) }
	}
}

impl ServiceConfigurer for CatalogServiceConfigurer {
	fn get_configuration(&self, module: &str) -> Result<ServiceConfiguration> {
		self.base.get_configuration(module)
	}

	fn set_configuration(&self, module: &str, configuration: ServiceConfiguration) -> Result<()> {
		self.validate(module, &configuration)?;
		self.base.set_configuration(module, configuration)
	}

	fn validate(&self, module: &str, configuration: &ServiceConfiguration) -> Result<()> {
		self.base.validate(module, configuration)?;

		if !configuration.enabled_operations.is_empty()
			&& !configuration.enabled_operations.contains("get-capabilities")
		{
			return Err(Error::InvalidConfiguration {
				module: module.to_string(),
				message: "get-capabilities must stay enabled while other operations are."
					.to_string(),
			});
		}

		Ok(())
	}
}

/// Map variant: layer exposure rules must carry usable patterns.
pub struct MapServiceConfigurer {
	base: DataServiceConfigurer,
}

impl MapServiceConfigurer {
	pub fn new(allowed_operations: impl IntoIterator<Item = String>) -> Self {
		Self { base: DataServiceConfigurer::new(allowed_operations) }
	}
}

impl ServiceConfigurer for MapServiceConfigurer {
	fn get_configuration(&self, module: &str) -> Result<ServiceConfiguration> {
		self.base.get_configuration(module)
	}

	fn set_configuration(&self, module: &str, configuration: ServiceConfiguration) -> Result<()> {
		self.validate(module, &configuration)?;
		self.base.set_configuration(module, configuration)
	}

	fn validate(&self, module: &str, configuration: &ServiceConfiguration) -> Result<()> {
		self.base.validate(module, configuration)?;

		for rule in &configuration.layer_rules {
			if rule.pattern.trim().is_empty() {
				return Err(Error::InvalidConfiguration {
					module: module.to_string(),
					message: "layer rules must carry a non-empty pattern.".to_string(),
				});
			}
		}

		Ok(())
	}
}
