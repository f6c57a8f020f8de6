//! Integration tests for sitemap resolution and fetching
//!
//! These tests use wiremock to create mock HTTP servers and exercise
//! the full resolve-and-fetch cycle end-to-end.

use std::time::{Duration, Instant};

use sitefetch::config::{Options, SlowLimit};
use sitefetch::{FetchStatus, SitefetchError};
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates run options pointing at a sitemap path on the mock server
fn test_options(server: &MockServer, sitemap_path: &str) -> Options {
    Options {
        sitemap_url: format!("{}{}", server.uri(), sitemap_path),
        request_timeout: Duration::from_secs(5),
        ..Options::default()
    }
}

fn urlset(server: &MockServer, paths: &[&str]) -> String {
    let entries: String = paths
        .iter()
        .map(|p| format!("<url><loc>{}{}</loc></url>", server.uri(), p))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{entries}</urlset>"#
    )
}

fn sitemapindex(server: &MockServer, paths: &[&str]) -> String {
    let entries: String = paths
        .iter()
        .map(|p| format!("<sitemap><loc>{}{}</loc></sitemap>", server.uri(), p))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{entries}</sitemapindex>"#
    )
}

async fn mount_xml(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/xml"))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, at: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status).set_body_string(format!("<html>{at}</html>")))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_recursive_sitemap_index_fetches_all_pages() {
    let server = MockServer::start().await;

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemapindex(&server, &["/sitemap_foobar.xml", "/sitemap_baz.xml"]),
    )
    .await;
    mount_xml(
        &server,
        "/sitemap_foobar.xml",
        urlset(&server, &["/foo", "/bar"]),
    )
    .await;
    mount_xml(&server, "/sitemap_baz.xml", urlset(&server, &["/baz"])).await;
    for page in ["/foo", "/bar", "/baz"] {
        mount_page(&server, page, 200).await;
    }

    let options = test_options(&server, "/sitemap.xml");
    let report = sitefetch::run(&options).await.unwrap();

    assert_eq!(report.outcomes.len(), 3);
    assert!(report.outcomes.iter().all(|o| !o.is_error()));
    assert!(report.failed().is_empty());
}

#[tokio::test]
async fn test_non_recursive_run_on_index_is_fatal() {
    let server = MockServer::start().await;

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemapindex(&server, &["/sitemap_other.xml"]),
    )
    .await;
    mount_xml(&server, "/sitemap_other.xml", urlset(&server, &["/foo"])).await;

    let options = Options {
        recursive: false,
        ..test_options(&server, "/sitemap.xml")
    };

    let result = sitefetch::run(&options).await;
    assert!(matches!(result, Err(SitefetchError::NoUrls { .. })));

    // Only the root document was requested.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/sitemap.xml");
}

#[tokio::test]
async fn test_page_errors_do_not_fail_the_run() {
    let server = MockServer::start().await;

    mount_xml(
        &server,
        "/sitemap.xml",
        urlset(&server, &["/ok", "/missing", "/broken"]),
    )
    .await;
    mount_page(&server, "/ok", 200).await;
    mount_page(&server, "/missing", 404).await;
    mount_page(&server, "/broken", 500).await;

    let options = test_options(&server, "/sitemap.xml");
    let report = sitefetch::run(&options).await.unwrap();

    assert_eq!(report.outcomes.len(), 3);
    let failed = report.failed();
    assert_eq!(failed.len(), 2);
    assert!(failed.iter().all(|o| !o.is_timeout()));
}

#[tokio::test]
async fn test_unreachable_root_sitemap_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let options = test_options(&server, "/sitemap.xml");
    let result = sitefetch::run(&options).await;
    assert!(matches!(result, Err(SitefetchError::NoUrls { .. })));
}

#[tokio::test]
async fn test_unparsable_root_sitemap_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("this is not xml"))
        .mount(&server)
        .await;

    let options = test_options(&server, "/sitemap.xml");
    let result = sitefetch::run(&options).await;
    assert!(matches!(result, Err(SitefetchError::NoUrls { .. })));
}

#[tokio::test]
async fn test_failed_branch_does_not_abort_siblings() {
    let server = MockServer::start().await;

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemapindex(&server, &["/sitemap_dead.xml", "/sitemap_live.xml"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/sitemap_dead.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_xml(&server, "/sitemap_live.xml", urlset(&server, &["/foo"])).await;
    mount_page(&server, "/foo", 200).await;

    let options = test_options(&server, "/sitemap.xml");
    let report = sitefetch::run(&options).await.unwrap();
    assert_eq!(report.outcomes.len(), 1);
}

#[tokio::test]
async fn test_limit_truncates_in_document_order() {
    let server = MockServer::start().await;

    mount_xml(&server, "/sitemap.xml", urlset(&server, &["/a", "/b", "/c", "/d"])).await;
    for page in ["/a", "/b"] {
        mount_page(&server, page, 200).await;
    }

    let options = Options {
        limit: Some(2),
        ..test_options(&server, "/sitemap.xml")
    };
    let report = sitefetch::run(&options).await.unwrap();

    let mut fetched: Vec<String> = report.outcomes.iter().map(|o| o.url.clone()).collect();
    fetched.sort();
    assert_eq!(
        fetched,
        vec![
            format!("{}/a", server.uri()),
            format!("{}/b", server.uri())
        ]
    );
}

/// An index that references itself, plus the same child twice, must
/// still resolve: every document is fetched at most once. The outer
/// timeout turns a non-terminating walk into a test failure.
#[tokio::test]
async fn test_cyclic_sitemap_index_terminates() {
    let server = MockServer::start().await;

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemapindex(
            &server,
            &["/sitemap.xml", "/sitemap_child.xml", "/sitemap_child.xml"],
        ),
    )
    .await;
    mount_xml(&server, "/sitemap_child.xml", urlset(&server, &["/foo"])).await;
    mount_page(&server, "/foo", 200).await;

    let options = test_options(&server, "/sitemap.xml");
    let report = tokio::time::timeout(Duration::from_secs(5), sitefetch::run(&options))
        .await
        .expect("resolution did not terminate")
        .unwrap();

    assert_eq!(report.outcomes.len(), 1);

    let requests = server.received_requests().await.unwrap();
    let child_fetches = requests
        .iter()
        .filter(|r| r.url.path() == "/sitemap_child.xml")
        .count();
    assert_eq!(child_fetches, 1);
    let root_fetches = requests
        .iter()
        .filter(|r| r.url.path() == "/sitemap.xml")
        .count();
    assert_eq!(root_fetches, 1);
}

#[tokio::test]
async fn test_duplicate_urls_are_fetched_once() {
    let server = MockServer::start().await;

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemapindex(&server, &["/sitemap_a.xml", "/sitemap_b.xml"]),
    )
    .await;
    mount_xml(&server, "/sitemap_a.xml", urlset(&server, &["/foo", "/bar"])).await;
    mount_xml(&server, "/sitemap_b.xml", urlset(&server, &["/bar", "/baz"])).await;
    for page in ["/foo", "/bar", "/baz"] {
        mount_page(&server, page, 200).await;
    }

    let options = test_options(&server, "/sitemap.xml");
    let report = sitefetch::run(&options).await.unwrap();
    assert_eq!(report.outcomes.len(), 3);
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let server = MockServer::start().await;

    mount_xml(&server, "/sitemap.xml", urlset(&server, &["/stuck", "/ok"])).await;
    Mock::given(method("GET"))
        .and(path("/stuck"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;
    mount_page(&server, "/ok", 200).await;

    let options = Options {
        request_timeout: Duration::from_millis(250),
        ..test_options(&server, "/sitemap.xml")
    };
    let report = sitefetch::run(&options).await.unwrap();

    let failed = report.failed();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].status, FetchStatus::Timeout);
    assert_eq!(failed[0].status_code(), 408);
    assert!(failed[0].url.ends_with("/stuck"));
}

/// With 4 URLs each delayed 150ms and 2 permits, the fetch phase needs
/// at least two full rounds. Only the lower bound is asserted, so the
/// test is immune to scheduling jitter.
#[tokio::test]
async fn test_concurrency_limit_bounds_parallelism() {
    let server = MockServer::start().await;

    mount_xml(&server, "/sitemap.xml", urlset(&server, &["/a", "/b", "/c", "/d"])).await;
    for page in ["/a", "/b", "/c", "/d"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(
                ResponseTemplate::new(200).set_delay(Duration::from_millis(150)),
            )
            .mount(&server)
            .await;
    }

    let options = Options {
        concurrency_limit: 2,
        ..test_options(&server, "/sitemap.xml")
    };

    let start = Instant::now();
    let report = sitefetch::run(&options).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(report.outcomes.len(), 4);
    assert!(
        elapsed >= Duration::from_millis(300),
        "4 delayed fetches over 2 permits finished in {elapsed:?}"
    );
}

#[tokio::test]
async fn test_pages_are_persisted_to_output_dir() {
    let server = MockServer::start().await;

    mount_xml(
        &server,
        "/sitemap.xml",
        urlset(&server, &["/", "/a", "/a/b/c", "/missing"]),
    )
    .await;
    mount_page(&server, "/", 200).await;
    mount_page(&server, "/a", 200).await;
    mount_page(&server, "/a/b/c", 200).await;
    mount_page(&server, "/missing", 404).await;

    let dir = tempfile::tempdir().unwrap();
    let options = Options {
        output_dir: Some(dir.path().to_path_buf()),
        ..test_options(&server, "/sitemap.xml")
    };
    sitefetch::run(&options).await.unwrap();

    // Error responses are stored too.
    for file in ["index.html", "a.html", "a/b/c.html", "missing.html"] {
        assert!(dir.path().join(file).is_file(), "missing {file}");
    }
    let body = std::fs::read_to_string(dir.path().join("a.html")).unwrap();
    assert_eq!(body, "<html>/a</html>");
}

/// Both mocks only match when an Authorization header is present, so a
/// run that fetches the page proves credentials went out on the sitemap
/// request and the page request alike.
#[tokio::test]
async fn test_basic_auth_is_sent_with_every_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .and(header_exists("authorization"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(urlset(&server, &["/foo"]), "application/xml"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/foo"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let options = Options {
        basic_auth: Some("alice:s3cret".parse().unwrap()),
        ..test_options(&server, "/sitemap.xml")
    };
    let report = sitefetch::run(&options).await.unwrap();

    assert_eq!(report.outcomes.len(), 1);
    assert!(report.failed().is_empty());
}

#[tokio::test]
async fn test_random_suffix_is_appended_to_page_urls() {
    let server = MockServer::start().await;

    mount_xml(&server, "/sitemap.xml", urlset(&server, &["/foo"])).await;
    mount_page(&server, "/foo", 200).await;

    let options = Options {
        random: true,
        random_length: 12,
        ..test_options(&server, "/sitemap.xml")
    };
    let report = sitefetch::run(&options).await.unwrap();

    let (_, suffix) = report.outcomes[0].url.split_once('?').unwrap();
    assert_eq!(suffix.len(), 12);
    assert!(suffix.chars().all(|c| c.is_ascii_digit()));

    // The sitemap document itself is requested without a suffix.
    let requests = server.received_requests().await.unwrap();
    let sitemap_request = requests
        .iter()
        .find(|r| r.url.path() == "/sitemap.xml")
        .unwrap();
    assert!(sitemap_request.url.query().is_none());
}

#[tokio::test]
async fn test_report_views_respect_slow_limit() {
    let server = MockServer::start().await;

    mount_xml(&server, "/sitemap.xml", urlset(&server, &["/a", "/b", "/c"])).await;
    for page in ["/a", "/b", "/c"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(
                ResponseTemplate::new(200).set_delay(Duration::from_millis(120)),
            )
            .mount(&server)
            .await;
    }

    let options = test_options(&server, "/sitemap.xml");
    let report = sitefetch::run(&options).await.unwrap();

    let threshold = Duration::from_millis(50);
    assert_eq!(report.slow(threshold, SlowLimit::Unlimited).len(), 3);
    assert_eq!(report.slow(threshold, SlowLimit::Limited(2)).len(), 2);
    assert!(report.slow(threshold, SlowLimit::Limited(0)).is_empty());
}
