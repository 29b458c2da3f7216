use meridian_security::Identity;
use meridian_service::SearchRequest;
use meridian_testkit::RecordFixture;

use super::open_service;

#[test]
fn indexing_the_same_record_twice_changes_nothing() {
	let harness = open_service("open");
	let service = &harness.service;
	let record = RecordFixture::titled("Lake Survey").status("published").build();

	service.index_data(1, &record).expect("first index failed");

	let once = service
		.search(&SearchRequest::new("title:lake", Identity::anonymous()))
		.expect("search failed");

	service.index_data(1, &record).expect("second index failed");

	let twice = service
		.search(&SearchRequest::new("title:lake", Identity::anonymous()))
		.expect("search failed");

	assert_eq!(once.ids, twice.ids);
	assert_eq!(service.index.len(), 1);
}

#[test]
fn reindexing_with_changed_content_replaces_the_document() {
	let harness = open_service("open");
	let service = &harness.service;

	service
		.index_data(1, &RecordFixture::titled("Lake Survey").status("draft").build())
		.expect("index failed");
	service
		.index_data(1, &RecordFixture::titled("Lake Survey").status("published").build())
		.expect("reindex failed");

	let drafts = service
		.search(&SearchRequest::new("status:draft", Identity::anonymous()))
		.expect("search failed");

	assert!(drafts.ids.is_empty());

	let published = service
		.search(&SearchRequest::new("status:published", Identity::anonymous()))
		.expect("search failed");

	assert_eq!(published.ids, vec![1]);
}
