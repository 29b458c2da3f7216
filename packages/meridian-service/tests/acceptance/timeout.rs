use meridian_security::Identity;
use meridian_service::SearchRequest;

use super::{open_service, seed_corpus};

#[tokio::test]
async fn timed_search_returns_the_same_results_as_plain_search() {
	let harness = open_service("open");

	seed_corpus(&harness.service);

	let request = SearchRequest::new("title:lake", Identity::anonymous());
	let plain = harness.service.search(&request).expect("search failed");
	let timed =
		harness.service.search_with_timeout(&request).await.expect("timed search failed");

	assert_eq!(plain.ids, timed.ids);
}

#[tokio::test]
async fn timed_search_surfaces_query_errors_unchanged() {
	let harness = open_service("open");
	let request = SearchRequest::new("title:", Identity::anonymous());
	let err = harness.service.search_with_timeout(&request).await.expect_err("expected error");

	assert!(err.to_string().contains("Query syntax error"));
}
