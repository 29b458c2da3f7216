use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};

use meridian_service::CatalogService;

use crate::error::Result;

/// The runtime loop: flush buffered index writes on the configured interval
/// until shutdown, then finish with a final commit.
pub async fn run_catalog(service: CatalogService) -> Result<()> {
	let mut ticker =
		time::interval(Duration::from_millis(service.cfg.storage.index.commit_interval_ms));

	ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
	// The first tick fires immediately; consume it so the loop waits a full
	// interval before the first periodic commit.
	ticker.tick().await;

	tracing::info!(
		modules = service.registry.len(),
		docs = service.index.len(),
		"Catalog runtime started.",
	);

	loop {
		tokio::select! {
			_ = ticker.tick() => {
				if let Err(err) = service.commit() {
					tracing::error!(error = %err, "Periodic index commit failed.");
				}
			},
			result = tokio::signal::ctrl_c() => {
				if let Err(err) = result {
					tracing::error!(error = %err, "Failed to listen for the shutdown signal.");
				}

				break;
			},
		}
	}

	tracing::info!("Shutting down; committing the index.");
	service.commit()?;

	Ok(())
}
