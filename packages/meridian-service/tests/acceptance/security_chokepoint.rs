use meridian_registry::{OperationOutcome, Specification};
use meridian_security::{Identity, PUBLIC_GROUP, RecordAcl};
use meridian_service::{DispatchRequest, SearchRequest};

use super::{open_service, seed_corpus};

fn seed_grants(harness: &super::TestService) {
	harness.acl.put(1, RecordAcl::default().with_group(PUBLIC_GROUP));
	harness.acl.put(2, RecordAcl::owned_by("carol"));
	harness.acl.put(3, RecordAcl::default().with_group("hydrology"));
}

#[test]
fn search_results_are_redacted_per_identity() {
	let harness = open_service("acl");

	seed_corpus(&harness.service);
	seed_grants(&harness);

	let anonymous = harness
		.service
		.search(&SearchRequest::new("", Identity::anonymous()))
		.expect("search failed");

	assert_eq!(anonymous.ids, vec![1]);

	let carol = harness
		.service
		.search(&SearchRequest::new("", Identity::named("carol")))
		.expect("search failed");

	assert_eq!(carol.ids, vec![1, 2]);

	let hydrologist = harness
		.service
		.search(&SearchRequest::new("", Identity::named("dan").with_group("hydrology")))
		.expect("search failed");

	assert_eq!(hydrologist.ids, vec![1, 3]);

	let admin = harness
		.service
		.search(&SearchRequest::new("", Identity::administrator("root")))
		.expect("search failed");

	assert_eq!(admin.ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn protocol_handlers_pass_results_through_the_same_filter() {
	let harness = open_service("acl");

	seed_corpus(&harness.service);
	seed_grants(&harness);

	let request = DispatchRequest {
		specification: Specification::new("catalog", "3.0"),
		operation: "get-records".to_string(),
		identity: Identity::anonymous(),
		body: serde_json::json!({ "query": "" }),
	};
	let outcome = harness.service.dispatch(request).await.expect("dispatch failed");
	let OperationOutcome::Records { ids } = outcome else {
		panic!("expected records outcome");
	};

	assert_eq!(ids, vec![1]);
}

#[tokio::test]
async fn get_record_denies_invisible_records() {
	let harness = open_service("acl");

	seed_corpus(&harness.service);
	seed_grants(&harness);

	let request = DispatchRequest {
		specification: Specification::new("catalog", "3.0"),
		operation: "get-record".to_string(),
		identity: Identity::anonymous(),
		body: serde_json::json!({ "id": 2 }),
	};
	let outcome = harness.service.dispatch(request).await.expect("dispatch failed");
	let OperationOutcome::Records { ids } = outcome else {
		panic!("expected records outcome");
	};

	assert!(ids.is_empty());
}

#[test]
fn ungranted_records_stay_hidden_in_acl_mode() {
	let harness = open_service("acl");

	seed_corpus(&harness.service);
	// No grants at all: everything is denied for non-administrators.

	let hits = harness
		.service
		.search(&SearchRequest::new("", Identity::named("carol")))
		.expect("search failed");

	assert!(hits.ids.is_empty());
}
