use crate::{
	CatalogService, ServiceResult,
	ingest::{BatchEntry, BatchOutcome},
};

/// Read-only module listing for operational visibility; the only interface
/// exposed toward the administrative console.
#[derive(Clone, Debug, serde::Serialize)]
pub struct ModuleSummary {
	pub name: String,
	pub family: String,
	pub version: String,
	pub operation_count: usize,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct RebuildReport {
	pub indexed: usize,
	pub rejected: usize,
}

impl CatalogService {
	pub fn list_modules(&self) -> Vec<ModuleSummary> {
		self.registry
			.list()
			.into_iter()
			.map(|(name, module)| ModuleSummary {
				name,
				family: module.specification.family.clone(),
				version: module.specification.version.clone(),
				operation_count: module.operation_count(),
			})
			.collect()
	}

	/// Disaster recovery: drops the whole index and replays every record
	/// from the external metadata store, then commits the rebuilt state.
	pub fn rebuild(&self, entries: &[BatchEntry]) -> ServiceResult<RebuildReport> {
		self.index.clear()?;

		let outcomes = self.index_batch(entries)?;
		let rejected =
			outcomes.iter().filter(|outcome| matches!(outcome, BatchOutcome::Rejected { .. })).count();
		let report = RebuildReport { indexed: outcomes.len() - rejected, rejected };

		self.commit()?;

		tracing::info!(
			indexed = report.indexed,
			rejected = report.rejected,
			"Rebuilt metadata index from source records.",
		);

		Ok(report)
	}
}
