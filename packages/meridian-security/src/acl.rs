use std::collections::BTreeSet;

use dashmap::DashMap;

use meridian_domain::RecordId;

#[derive(Debug, thiserror::Error)]
pub enum AclError {
	#[error("ACL store unavailable: {0}")]
	Unavailable(String),
}

/// Per-record view grants: an optional owning user plus the groups allowed to
/// see the record. Public visibility is an explicit grant to the `"all"`
/// group, never a default.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordAcl {
	pub owner: Option<String>,
	pub groups: BTreeSet<String>,
}

impl RecordAcl {
	pub fn owned_by(owner: impl Into<String>) -> Self {
		Self { owner: Some(owner.into()), groups: BTreeSet::new() }
	}

	pub fn with_group(mut self, group: impl Into<String>) -> Self {
		self.groups.insert(group.into());

		self
	}
}

/// Backing store consulted once per candidate record. Implementations must be
/// cheap per call; the filter sits on the hot path of every search.
pub trait AclStore
where
	Self: Send + Sync,
{
	fn view_grants(&self, id: RecordId) -> Result<Option<RecordAcl>, AclError>;
}

/// Internally synchronized in-process grant table.
#[derive(Default)]
pub struct MemoryAclStore {
	grants: DashMap<RecordId, RecordAcl>,
}

impl MemoryAclStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn put(&self, id: RecordId, acl: RecordAcl) {
		self.grants.insert(id, acl);
	}

	pub fn grant_group(&self, id: RecordId, group: impl Into<String>) {
		self.grants.entry(id).or_default().groups.insert(group.into());
	}

	pub fn revoke_group(&self, id: RecordId, group: &str) {
		if let Some(mut acl) = self.grants.get_mut(&id) {
			acl.groups.remove(group);
		}
	}

	pub fn remove_record(&self, id: RecordId) {
		self.grants.remove(&id);
	}
}

impl AclStore for MemoryAclStore {
	fn view_grants(&self, id: RecordId) -> Result<Option<RecordAcl>, AclError> {
		Ok(self.grants.get(&id).map(|entry| entry.value().clone()))
	}
}
