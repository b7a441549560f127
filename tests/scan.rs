mod common;

use std::time::Duration;

use common::{html, posting_page, selectors, test_config};
use jobscan::models::KeywordSet;
use jobscan::services::{KeywordScanner, ScanOutcome};
use jobscan::utils::http::create_async_client;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn scan_reports_found_keywords_and_title() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job/1"))
        .respond_with(html(posting_page(
            "Platform Engineer - Indeed.com",
            "Python services on AWS. Remote friendly.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let selectors = selectors(&config);
    let client = create_async_client(&config.crawler).unwrap();
    let scanner = KeywordScanner::new(&client, &selectors, Duration::ZERO);
    let keywords = KeywordSet::new(["remote", "Django", "python"]);
    let link = format!("{}/job/1", server.uri());

    let result = scanner.scan(&link, &keywords).await.into_match().unwrap();
    assert_eq!(result.title, "Platform Engineer");
    assert_eq!(result.link, link);
    assert_eq!(result.found_keywords, vec!["remote", "python"]);
}

#[tokio::test]
async fn scan_without_keywords_in_description_is_no_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job/2"))
        .respond_with(html(posting_page("Java Developer", "Spring and Kotlin.")))
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let selectors = selectors(&config);
    let client = create_async_client(&config.crawler).unwrap();
    let scanner = KeywordScanner::new(&client, &selectors, Duration::ZERO);

    let outcome = scanner
        .scan(&format!("{}/job/2", server.uri()), &KeywordSet::new(["python"]))
        .await;
    assert_eq!(outcome, ScanOutcome::NoMatch);
}

#[tokio::test]
async fn scan_swallows_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let selectors = selectors(&config);
    let client = create_async_client(&config.crawler).unwrap();
    let scanner = KeywordScanner::new(&client, &selectors, Duration::ZERO);

    let outcome = scanner
        .scan(&format!("{}/gone", server.uri()), &KeywordSet::new(["python"]))
        .await;
    assert!(matches!(outcome, ScanOutcome::Failed(_)));
}

#[tokio::test]
async fn scan_swallows_bad_urls_and_unreachable_hosts() {
    let config = test_config("https://example.com");
    let selectors = selectors(&config);
    let client = create_async_client(&config.crawler).unwrap();
    let scanner = KeywordScanner::new(&client, &selectors, Duration::ZERO);
    let keywords = KeywordSet::new(["python"]);

    for link in ["not a url", "http://127.0.0.1:9/job/1", ""] {
        let outcome = scanner.scan(link, &keywords).await;
        assert!(
            matches!(outcome, ScanOutcome::Failed(_)),
            "{link:?} gave {outcome:?}"
        );
    }
}

#[tokio::test]
async fn scan_waits_for_politeness_delay() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job/3"))
        .respond_with(html(posting_page("Job", "python")))
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let selectors = selectors(&config);
    let client = create_async_client(&config.crawler).unwrap();
    let scanner = KeywordScanner::new(&client, &selectors, Duration::from_millis(200));

    let start = std::time::Instant::now();
    let outcome = scanner
        .scan(&format!("{}/job/3", server.uri()), &KeywordSet::new(["python"]))
        .await;
    assert!(start.elapsed() >= Duration::from_millis(200));
    assert!(matches!(outcome, ScanOutcome::Match(_)));
}
