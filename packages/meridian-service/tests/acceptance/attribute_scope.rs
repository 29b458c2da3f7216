use meridian_security::Identity;
use meridian_service::SearchRequest;
use meridian_testkit::RecordFixture;

use super::open_service;

#[test]
fn attribute_scoped_search_matches_the_structured_field_only() {
	let harness = open_service("open");
	let service = &harness.service;

	service
		.index_data(
			1,
			&RecordFixture::titled("Elevation grid").identifier("42").status("published").build(),
		)
		.expect("index failed");
	service
		.index_data(
			2,
			&RecordFixture::titled("Survey of route 42")
				.identifier("route-survey")
				.status("published")
				.build(),
		)
		.expect("index failed");

	let mut scoped = SearchRequest::new("42", Identity::anonymous());

	scoped.attribute = Some("identifier".to_string());

	let hits = service.search(&scoped).expect("search failed");

	assert_eq!(hits.ids, vec![1]);

	// The same string without the attribute reaches the free text of both.
	let hits = service
		.search(&SearchRequest::new("42", Identity::anonymous()))
		.expect("search failed");

	assert_eq!(hits.ids, vec![1, 2]);
}

#[test]
fn attribute_mode_overrides_field_qualifiers_in_the_expression() {
	let harness = open_service("open");
	let service = &harness.service;

	service
		.index_data(
			1,
			&RecordFixture::titled("42 degrees north").identifier("grid-cell").build(),
		)
		.expect("index failed");

	let mut scoped = SearchRequest::new("title:42", Identity::anonymous());

	scoped.attribute = Some("identifier".to_string());

	let hits = service.search(&scoped).expect("search failed");

	assert!(hits.ids.is_empty());
}
