use std::sync::Arc;

use meridian_domain::RecordId;
use meridian_security::{
	AclError, AclMetadataSecurityFilter, AclStore, Identity, MemoryAclStore,
	MetadataSecurityFilter, NoMetadataSecurityFilter, PUBLIC_GROUP, RecordAcl,
};

struct FailingStore;

impl AclStore for FailingStore {
	fn view_grants(&self, _: RecordId) -> Result<Option<RecordAcl>, AclError> {
		Err(AclError::Unavailable("backing store is down".to_string()))
	}
}

fn acl_filter() -> AclMetadataSecurityFilter {
	let store = Arc::new(MemoryAclStore::new());

	store.put(1, RecordAcl::default().with_group(PUBLIC_GROUP));
	store.put(2, RecordAcl::owned_by("carol").with_group("hydrology"));
	store.put(3, RecordAcl::owned_by("mallory"));

	AclMetadataSecurityFilter::new(store)
}

#[test]
fn filter_results_is_a_subset_preserving_order() {
	let filter = acl_filter();
	let identity = Identity::named("carol");
	let ids = [3, 1, 2, 9];
	let filtered = filter.filter_results(&identity, &ids);

	assert!(filtered.iter().all(|id| ids.contains(id)));
	assert_eq!(filtered, vec![1, 2]);
}

#[test]
fn noop_filter_returns_the_input_exactly() {
	let filter = NoMetadataSecurityFilter;
	let ids = [5, 3, 3, 8, 1];

	assert_eq!(filter.filter_results(&Identity::anonymous(), &ids), ids.to_vec());
}

#[test]
fn noop_filter_is_more_permissive_than_every_acl_filter() {
	let noop = NoMetadataSecurityFilter;
	let acl = acl_filter();
	let ids = [1, 2, 3, 4];

	for identity in
		[Identity::anonymous(), Identity::named("carol"), Identity::named("mallory")]
	{
		let open = noop.filter_results(&identity, &ids);
		let restricted = acl.filter_results(&identity, &ids);

		assert_eq!(open, ids.to_vec());
		assert!(restricted.iter().all(|id| open.contains(id)));
	}
}

#[test]
fn group_membership_grants_access() {
	let filter = acl_filter();
	let identity = Identity::named("dan").with_group("hydrology");

	assert!(filter.allowed(&identity, 2));
	assert!(!filter.allowed(&Identity::named("dan"), 2));
}

#[test]
fn store_failure_fails_closed() {
	let filter = AclMetadataSecurityFilter::new(Arc::new(FailingStore));
	let identity = Identity::named("carol").with_group("hydrology");

	assert!(!filter.allowed(&identity, 1));
	assert_eq!(filter.filter_results(&identity, &[1, 2, 3]), Vec::<RecordId>::new());

	// Administrators are decided before the store is consulted.
	assert!(filter.allowed(&Identity::administrator("root"), 1));
}

#[test]
fn revoked_group_loses_access() {
	let store = Arc::new(MemoryAclStore::new());

	store.put(4, RecordAcl::default().with_group("surveyors"));

	let filter = AclMetadataSecurityFilter::new(store.clone());
	let identity = Identity::named("erin").with_group("surveyors");

	assert!(filter.allowed(&identity, 4));

	store.revoke_group(4, "surveyors");

	assert!(!filter.allowed(&identity, 4));
}
