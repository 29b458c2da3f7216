use meridian_domain::{BBox, RecordKind, TimeInterval};
use meridian_security::Identity;
use meridian_service::{SearchRequest, ServiceError};
use meridian_testkit::RecordFixture;
use time::OffsetDateTime;

use super::{open_service, seed_corpus};

fn request(query: &str) -> SearchRequest {
	SearchRequest::new(query, Identity::anonymous())
}

#[test]
fn three_document_reference_scenario() {
	let harness = open_service("open");
	let service = &harness.service;

	seed_corpus(service);

	let hits = service.search(&request("title:lake AND status:published")).expect("search failed");

	assert_eq!(hits.ids, vec![1]);

	let hits = service.search(&request("")).expect("search failed");

	assert_eq!(hits.ids, vec![1, 2, 3]);

	service.remove_metadata(2, RecordKind::Data).expect("remove failed");

	let hits = service.search(&request("")).expect("search failed");

	assert_eq!(hits.ids, vec![1, 3]);
}

#[test]
fn boolean_negation_over_corpus() {
	let harness = open_service("open");

	seed_corpus(&harness.service);

	let hits = harness
		.service
		.search(&request("title:lake AND NOT status:draft"))
		.expect("search failed");

	assert_eq!(hits.ids, vec![1]);
}

#[test]
fn syntax_error_surfaces_verbatim_with_position() {
	let harness = open_service("open");

	seed_corpus(&harness.service);

	let err = harness.service.search(&request("title:lake AND")).expect_err("expected error");

	let ServiceError::QuerySyntax(inner) = err else {
		panic!("expected a query syntax error, got {err}");
	};

	assert!(inner.to_string().contains("Query syntax error at"));
}

#[test]
fn spatial_and_temporal_constraints_narrow_results() {
	let harness = open_service("open");
	let service = &harness.service;
	let alpine = RecordFixture::titled("Alpine Lakes")
		.status("published")
		.extent(5.9, 45.8, 10.5, 47.8)
		.temporal("2021-04-01T00:00:00Z", "2021-10-31T00:00:00Z")
		.build();
	let coastal = RecordFixture::titled("Coastal Lagoons")
		.status("published")
		.extent(-9.5, 36.9, -6.2, 42.1)
		.temporal("2019-01-01T00:00:00Z", "2019-12-31T00:00:00Z")
		.build();

	service.index_data(10, &alpine).expect("index failed");
	service.index_data(11, &coastal).expect("index failed");

	let mut req = request("");

	req.bbox = Some(BBox::new(6.0, 46.0, 7.0, 47.0));

	let hits = service.search(&req).expect("search failed");

	assert_eq!(hits.ids, vec![10]);

	let mut req = request("");

	req.time = Some(TimeInterval::new(
		OffsetDateTime::from_unix_timestamp(1_546_300_800).expect("timestamp"),
		OffsetDateTime::from_unix_timestamp(1_561_939_200).expect("timestamp"),
	));

	let hits = service.search(&req).expect("search failed");

	assert_eq!(hits.ids, vec![11]);
}

#[test]
fn invalid_bbox_is_a_client_error() {
	let harness = open_service("open");
	let mut req = request("");

	req.bbox = Some(BBox::new(10.0, 0.0, 0.0, 10.0));

	let err = harness.service.search(&req).expect_err("expected error");

	assert!(matches!(err, ServiceError::InvalidRequest { .. }));
}

#[test]
fn malformed_record_rejects_the_item_not_the_batch() {
	use meridian_service::{BatchEntry, BatchOutcome};

	let harness = open_service("open");
	let service = &harness.service;
	let entries = vec![
		BatchEntry {
			id: 1,
			kind: RecordKind::Data,
			record: RecordFixture::titled("Lake Survey").status("published").build(),
		},
		BatchEntry {
			id: 2,
			kind: RecordKind::Data,
			record: meridian_domain::MetadataRecord::new(serde_json::json!("not an object")),
		},
		BatchEntry {
			id: 3,
			kind: RecordKind::Data,
			record: RecordFixture::titled("River Survey").status("published").build(),
		},
	];
	let outcomes = service.index_batch(&entries).expect("batch failed");

	assert_eq!(outcomes.len(), 3);
	assert!(matches!(outcomes[0], BatchOutcome::Indexed { id: 1, .. }));
	assert!(matches!(outcomes[1], BatchOutcome::Rejected { id: 2, .. }));
	assert!(matches!(outcomes[2], BatchOutcome::Indexed { id: 3, .. }));

	let hits = service.search(&request("")).expect("search failed");

	assert_eq!(hits.ids, vec![1, 3]);
}

#[test]
fn rebuild_replays_source_records() {
	use meridian_service::BatchEntry;

	let harness = open_service("open");
	let service = &harness.service;

	seed_corpus(service);

	let replacement = vec![BatchEntry {
		id: 7,
		kind: RecordKind::Dataset,
		record: RecordFixture::titled("Replayed Dataset").status("published").build(),
	}];
	let report = service.rebuild(&replacement).expect("rebuild failed");

	assert_eq!(report.indexed, 1);
	assert_eq!(report.rejected, 0);

	let hits = service.search(&request("")).expect("search failed");

	assert_eq!(hits.ids, vec![7]);
}
