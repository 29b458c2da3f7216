use meridian_domain::{MetadataRecord, RecordId, RecordKind, normalize};

use crate::{CatalogService, ServiceError, ServiceResult};

#[derive(Clone, Debug)]
pub struct BatchEntry {
	pub id: RecordId,
	pub kind: RecordKind,
	pub record: MetadataRecord,
}

#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchOutcome {
	Indexed { id: RecordId, kind: RecordKind },
	Rejected { id: RecordId, kind: RecordKind, reason: String },
}

impl CatalogService {
	/// Normalizes and indexes a data-level metadata record.
	pub fn index_data(&self, id: RecordId, record: &MetadataRecord) -> ServiceResult<()> {
		self.apply(id, RecordKind::Data, record)
	}

	/// Normalizes and indexes a series-level (dataset) metadata record.
	pub fn index_dataset(&self, id: RecordId, record: &MetadataRecord) -> ServiceResult<()> {
		self.apply(id, RecordKind::Dataset, record)
	}

	pub fn remove_metadata(&self, id: RecordId, kind: RecordKind) -> ServiceResult<()> {
		self.index.remove(id, kind).map_err(ServiceError::Index)?;

		tracing::debug!(record = id, kind = kind.as_str(), "Removed metadata record.");

		Ok(())
	}

	/// Indexes a batch of records. A malformed record rejects that single
	/// item and the batch continues; storage failures abort, since nothing
	/// later in the batch could succeed either.
	pub fn index_batch(&self, entries: &[BatchEntry]) -> ServiceResult<Vec<BatchOutcome>> {
		let mut outcomes = Vec::with_capacity(entries.len());

		for entry in entries {
			match normalize(entry.id, entry.kind, &entry.record) {
				Ok(doc) => {
					self.index.add_or_update(doc).map_err(ServiceError::Index)?;
					outcomes.push(BatchOutcome::Indexed { id: entry.id, kind: entry.kind });
				},
				Err(err) => {
					tracing::warn!(
						record = entry.id,
						kind = entry.kind.as_str(),
						error = %err,
						"Rejected malformed record.",
					);
					outcomes.push(BatchOutcome::Rejected {
						id: entry.id,
						kind: entry.kind,
						reason: err.to_string(),
					});
				},
			}
		}

		Ok(outcomes)
	}

	fn apply(&self, id: RecordId, kind: RecordKind, record: &MetadataRecord) -> ServiceResult<()> {
		let doc = normalize(id, kind, record)?;

		self.index.add_or_update(doc).map_err(ServiceError::Index)?;

		tracing::debug!(record = id, kind = kind.as_str(), "Indexed metadata record.");

		Ok(())
	}
}
