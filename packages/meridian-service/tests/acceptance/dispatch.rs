use std::collections::BTreeSet;

use meridian_registry::{
	OperationOutcome, ServiceConfiguration, ServiceConfigurer, Specification,
};
use meridian_security::Identity;
use meridian_service::{DispatchRequest, ServiceError};
use meridian_testkit::RecordFixture;

use super::{open_service, seed_corpus};

fn dispatch_request(family: &str, version: &str, operation: &str) -> DispatchRequest {
	DispatchRequest {
		specification: Specification::new(family, version),
		operation: operation.to_string(),
		identity: Identity::anonymous(),
		body: serde_json::json!({}),
	}
}

#[tokio::test]
async fn unsupported_protocol_is_a_client_error() {
	let harness = open_service("open");
	let err = harness
		.service
		.dispatch(dispatch_request("tiles", "1.0", "get-capabilities"))
		.await
		.expect_err("expected error");

	assert!(matches!(err, ServiceError::UnsupportedProtocol { .. }));

	// Same family, unsupported version: still a clean client error.
	let err = harness
		.service
		.dispatch(dispatch_request("catalog", "2.0", "get-capabilities"))
		.await
		.expect_err("expected error");

	assert!(matches!(err, ServiceError::UnsupportedProtocol { .. }));
}

#[tokio::test]
async fn catalog_get_records_routes_through_search() {
	let harness = open_service("open");

	seed_corpus(&harness.service);

	let mut request = dispatch_request("catalog", "3.0", "get-records");

	request.body = serde_json::json!({ "query": "title:lake AND status:published" });

	let outcome = harness.service.dispatch(request).await.expect("dispatch failed");
	let OperationOutcome::Records { ids } = outcome else {
		panic!("expected records outcome");
	};

	assert_eq!(ids, vec![1]);
}

#[tokio::test]
async fn get_capabilities_reports_enabled_operations() {
	let harness = open_service("open");
	let outcome = harness
		.service
		.dispatch(dispatch_request("catalog", "3.0", "get-capabilities"))
		.await
		.expect("dispatch failed");
	let OperationOutcome::Document { body } = outcome else {
		panic!("expected document outcome");
	};

	assert_eq!(body["module"], "catalog");

	let operations = body["operations"].as_array().expect("operations array");

	assert!(operations.iter().any(|op| op == "get-records"));
}

#[tokio::test]
async fn unknown_operation_is_rejected() {
	let harness = open_service("open");
	let err = harness
		.service
		.dispatch(dispatch_request("catalog", "3.0", "render-map"))
		.await
		.expect_err("expected error");

	assert!(matches!(err, ServiceError::UnsupportedOperation { .. }));
}

#[tokio::test]
async fn disabled_operation_is_rejected_without_reaching_the_handler() {
	let harness = open_service("open");
	let module = harness
		.service
		.registry
		.resolve(&Specification::new("catalog", "3.0"))
		.expect("catalog module");

	module
		.configurer()
		.set_configuration(
			"catalog",
			ServiceConfiguration {
				enabled_operations: BTreeSet::from([
					"get-capabilities".to_string(),
					"get-record".to_string(),
				]),
				expose_datasets: true,
				..ServiceConfiguration::default()
			},
		)
		.expect("set configuration failed");

	let err = harness
		.service
		.dispatch(dispatch_request("catalog", "3.0", "get-records"))
		.await
		.expect_err("expected error");

	assert!(matches!(err, ServiceError::OperationDisabled { .. }));
}

#[tokio::test]
async fn feature_listing_is_restricted_to_dataset_records() {
	let harness = open_service("open");
	let service = &harness.service;

	service
		.index_data(1, &RecordFixture::titled("Lake Survey").status("published").build())
		.expect("index failed");
	service
		.index_dataset(2, &RecordFixture::titled("Lake Series").status("published").build())
		.expect("index failed");

	let mut request = dispatch_request("feature", "2.0", "list-feature-types");

	request.body = serde_json::json!({ "query": "title:lake" });

	let outcome = service.dispatch(request).await.expect("dispatch failed");
	let OperationOutcome::Records { ids } = outcome else {
		panic!("expected records outcome");
	};

	assert_eq!(ids, vec![2]);
}

#[tokio::test]
async fn dataset_exposure_toggle_hides_listings() {
	let harness = open_service("open");
	let service = &harness.service;

	service
		.index_dataset(2, &RecordFixture::titled("Lake Series").status("published").build())
		.expect("index failed");

	let module = service
		.registry
		.resolve(&Specification::new("feature", "2.0"))
		.expect("feature module");

	module
		.configurer()
		.set_configuration(
			"feature",
			ServiceConfiguration {
				enabled_operations: BTreeSet::from([
					"get-capabilities".to_string(),
					"list-feature-types".to_string(),
				]),
				expose_datasets: false,
				..ServiceConfiguration::default()
			},
		)
		.expect("set configuration failed");

	let mut request = dispatch_request("feature", "2.0", "list-feature-types");

	request.body = serde_json::json!({ "query": "" });

	let outcome = service.dispatch(request).await.expect("dispatch failed");
	let OperationOutcome::Records { ids } = outcome else {
		panic!("expected records outcome");
	};

	assert!(ids.is_empty());
}

#[tokio::test]
async fn get_record_returns_the_single_visible_record() {
	let harness = open_service("open");

	seed_corpus(&harness.service);

	let mut request = dispatch_request("catalog", "3.0", "get-record");

	request.body = serde_json::json!({ "id": 1, "kind": "data" });

	let outcome = harness.service.dispatch(request).await.expect("dispatch failed");
	let OperationOutcome::Records { ids } = outcome else {
		panic!("expected records outcome");
	};

	assert_eq!(ids, vec![1]);

	let mut request = dispatch_request("catalog", "3.0", "get-record");

	request.body = serde_json::json!({ "id": 99 });

	let outcome = harness.service.dispatch(request).await.expect("dispatch failed");
	let OperationOutcome::Records { ids } = outcome else {
		panic!("expected records outcome");
	};

	assert!(ids.is_empty());
}

#[tokio::test]
async fn module_listing_is_ordered_and_counts_operations() {
	let harness = open_service("open");
	let summaries = harness.service.list_modules();
	let names = summaries.iter().map(|summary| summary.name.as_str()).collect::<Vec<_>>();

	assert_eq!(names, vec!["catalog", "feature", "map", "processing", "sensor"]);

	let catalog = &summaries[0];

	assert_eq!(catalog.family, "catalog");
	assert_eq!(catalog.version, "3.0");
	assert_eq!(catalog.operation_count, 3);
}
