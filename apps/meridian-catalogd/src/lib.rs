pub mod error;
pub mod worker;

pub use error::{Error, Result};

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use meridian_index::Index;
use meridian_registry::ModuleRegistry;
use meridian_security::MemoryAclStore;
use meridian_service::{CatalogService, modules, select_security_filter};

#[derive(Debug, Parser)]
#[command(rename_all = "kebab")]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: std::path::PathBuf,
	/// Discard corrupted index storage and start empty. Every record must
	/// then be replayed from the external metadata store.
	#[arg(long)]
	pub rebuild: bool,
}

pub async fn run(args: Args) -> Result<()> {
	let cfg = meridian_config::load(&args.config)?;
	let filter = EnvFilter::new(cfg.service.log_level.clone());

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let index = if args.rebuild {
		Index::rebuild(&cfg.storage.index.dir)?
	} else {
		match Index::open(&cfg.storage.index.dir) {
			Ok(index) => index,
			Err(err) if err.is_fatal() => {
				tracing::error!(
					error = %err,
					"Index storage is corrupted. Restart with --rebuild, then replay all records from the metadata store.",
				);

				return Err(err.into());
			},
			Err(err) => return Err(err.into()),
		}
	};
	let index = Arc::new(index);
	let acl_store = Arc::new(MemoryAclStore::new());
	let security = select_security_filter(&cfg, acl_store);
	let registry = Arc::new(ModuleRegistry::new());

	for module in modules::discover(&cfg, index.clone(), security.clone())? {
		registry.register(module);
	}

	registry.mark_ready()?;

	let service = CatalogService::new(cfg, index, security, registry);

	worker::run_catalog(service).await
}
