mod acl;

pub use acl::{AclError, AclStore, MemoryAclStore, RecordAcl};

use std::{collections::BTreeSet, sync::Arc};

use meridian_domain::RecordId;

/// Group every authenticated and anonymous principal belongs to. Granting a
/// record to it makes the record public.
pub const PUBLIC_GROUP: &str = "all";

/// The requesting principal, as established by the (external) authentication
/// layer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Identity {
	pub username: Option<String>,
	pub groups: BTreeSet<String>,
	pub administrator: bool,
}

impl Identity {
	pub fn anonymous() -> Self {
		Self { username: None, groups: BTreeSet::from([PUBLIC_GROUP.to_string()]), ..Self::default() }
	}

	pub fn named(username: impl Into<String>) -> Self {
		Self {
			username: Some(username.into()),
			groups: BTreeSet::from([PUBLIC_GROUP.to_string()]),
			administrator: false,
		}
	}

	pub fn administrator(username: impl Into<String>) -> Self {
		Self { administrator: true, ..Self::named(username) }
	}

	pub fn with_group(mut self, group: impl Into<String>) -> Self {
		self.groups.insert(group.into());

		self
	}
}

/// Access decisions over candidate record ids. Every protocol handler passes
/// its result sets through [`MetadataSecurityFilter::filter_results`]; no
/// handler returns unfiltered ids to a caller.
pub trait MetadataSecurityFilter
where
	Self: Send + Sync,
{
	/// Pure per-record decision, computed on demand and never cached here.
	/// Implementations that cannot evaluate the decision must deny.
	fn allowed(&self, identity: &Identity, id: RecordId) -> bool;

	/// Exactly the allowed subset of `ids`, in input order. The default body
	/// makes the subset property structural: nothing outside the input can
	/// ever be added.
	fn filter_results(&self, identity: &Identity, ids: &[RecordId]) -> Vec<RecordId> {
		ids.iter().copied().filter(|id| self.allowed(identity, *id)).collect()
	}
}

/// The default when access control is disabled: every identity sees every
/// record. Strictly more permissive than any other implementation.
pub struct NoMetadataSecurityFilter;

impl MetadataSecurityFilter for NoMetadataSecurityFilter {
	fn allowed(&self, _: &Identity, _: RecordId) -> bool {
		true
	}
}

/// ACL-backed filter. Administrators see everything; otherwise the record
/// must carry a grant for the identity's user or one of its groups. A store
/// failure or a missing grant entry is a deny.
pub struct AclMetadataSecurityFilter {
	store: Arc<dyn AclStore>,
}

impl AclMetadataSecurityFilter {
	pub fn new(store: Arc<dyn AclStore>) -> Self {
		Self { store }
	}
}

impl MetadataSecurityFilter for AclMetadataSecurityFilter {
	fn allowed(&self, identity: &Identity, id: RecordId) -> bool {
		if identity.administrator {
			return true;
		}

		let acl = match self.store.view_grants(id) {
			Ok(Some(acl)) => acl,
			Ok(None) => return false,
			Err(err) => {
				tracing::warn!(record = id, error = %err, "ACL lookup failed; denying access.");

				return false;
			},
		};

		if let Some(owner) = acl.owner.as_deref()
			&& identity.username.as_deref() == Some(owner)
		{
			return true;
		}

		identity.groups.iter().any(|group| acl.groups.contains(group))
	}
}
