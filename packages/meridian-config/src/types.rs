use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub search: Search,
	pub security: Security,
	pub modules: Modules,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Storage {
	pub index: IndexStorage,
}

#[derive(Clone, Debug, Deserialize)]
pub struct IndexStorage {
	pub dir: std::path::PathBuf,
	/// Interval between durable flushes of buffered index writes.
	pub commit_interval_ms: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Search {
	pub default_field: String,
	pub max_query_terms: u32,
	pub request_timeout_ms: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Security {
	/// "open" disables access control; "acl" enables the per-record filter.
	pub mode: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Modules {
	pub catalog: bool,
	pub feature: bool,
	pub map: bool,
	pub sensor: bool,
	pub processing: bool,
}
