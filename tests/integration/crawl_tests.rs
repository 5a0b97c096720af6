//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the mapper
//! and the in-process engine against real HTTP responses.

use frontier_crawl::config::{AbsoluteLinkPolicy, Config, EngineConfig, FetcherConfig};
use frontier_crawl::crawler::{crawl, fetch_url, build_http_client, FetchResult, HttpFetcher};
use frontier_crawl::pipeline::{final_filter, reducer, Mapper};
use frontier_crawl::{CrawlError, Record};
use std::io::Cursor;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts
fn create_test_config(map_jobs: usize, max_iterations: u32) -> Config {
    Config {
        fetcher: FetcherConfig {
            timeout_secs: 2,
            connect_timeout_secs: 1,
            user_agent: "TestBot/1.0".to_string(),
        },
        engine: EngineConfig {
            map_jobs,
            max_iterations,
            absolute_links: AbsoluteLinkPolicy::EchoBase,
        },
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_mapper_over_http_reproduces_link_asymmetry() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/x">X</a><a href="http://b.com/y">Y</a>"#,
    )
    .await;

    let fetcher = HttpFetcher::new(&create_test_config(1, 1).fetcher).expect("client");
    let mapper = Mapper::new(fetcher);

    let input = format!("{}\t0\n", base_url);
    let mut output = Vec::new();
    mapper
        .run(input.as_bytes(), &mut output)
        .await
        .expect("map pass failed");

    let expected = format!(
        "{base}\t1\n{base}/x\t0\n{base}\t0\n",
        base = base_url
    );
    assert_eq!(String::from_utf8(output).unwrap(), expected);
}

#[tokio::test]
async fn test_mapper_fetch_error_is_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&create_test_config(1, 1).fetcher).expect("client");
    let mapper = Mapper::new(fetcher);

    let input = format!("{base}/done\t1\n{base}/broken\t0\n{base}/later\t1\n", base = base_url);
    let mut output = Vec::new();
    let result = mapper.run(input.as_bytes(), &mut output).await;

    assert!(matches!(result, Err(CrawlError::Fetch { .. })));
    // Lines before the failure stay written
    assert_eq!(
        String::from_utf8(output).unwrap(),
        format!("{}/done\t1\n", base_url)
    );
}

#[tokio::test]
async fn test_fetch_classification() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/ok", "hello").await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("late").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client = build_http_client(&create_test_config(1, 1).fetcher).expect("client");

    match fetch_url(&client, &format!("{}/ok", base_url)).await {
        FetchResult::Success {
            status_code, body, ..
        } => {
            assert_eq!(status_code, 200);
            assert!(body.contains("hello"));
        }
        other => panic!("expected success, got {:?}", other),
    }

    assert_eq!(
        fetch_url(&client, &format!("{}/missing", base_url)).await,
        FetchResult::HttpError { status_code: 404 }
    );

    assert_eq!(
        fetch_url(&client, &format!("{}/slow", base_url)).await,
        FetchResult::Timeout
    );
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/page1">Page 1</a><a href="page2/">Page 2</a><a href="https://elsewhere.com/">Out</a>"#,
    )
    .await;
    mount_page(&mock_server, "/page1", r#"<a href="/">Home</a><a href="deep">Deep</a>"#).await;
    mount_page(&mock_server, "/page2", "no links").await;
    mount_page(&mock_server, "/deep", r#"<a href="page1">Back</a>"#).await;

    let config = create_test_config(2, 10);
    let report = crawl(&config, vec![format!("{}/", base_url)])
        .await
        .expect("Crawl failed");

    assert!(report.converged);
    assert_eq!(report.iterations, 3);
    assert_eq!(
        report.records,
        vec![
            Record::visited(base_url.clone()),
            Record::visited(format!("{}/deep", base_url)),
            Record::visited(format!("{}/page1", base_url)),
            Record::visited(format!("{}/page2", base_url)),
        ]
    );
    assert_eq!(report.urls.len(), 4);
    assert_eq!(report.map_status.exit_code(), 0);
}

#[tokio::test]
async fn test_crawl_stops_at_hop_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/a">A</a>"#).await;
    mount_page(&mock_server, "/a", r#"<a href="/b">B</a>"#).await;

    let config = create_test_config(1, 1);
    let report = crawl(&config, vec![base_url.clone()]).await.expect("Crawl failed");

    assert_eq!(report.iterations, 1);
    assert!(!report.converged);
    assert!(report
        .records
        .contains(&Record::discovered(format!("{}/a", base_url))));
}

#[tokio::test]
async fn test_passes_chain_over_wire_format() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/x">X</a><a href="/x">X again</a>"#).await;

    let fetcher = HttpFetcher::new(&create_test_config(1, 1).fetcher).expect("client");
    let mapper = Mapper::new(fetcher);

    let mut mapped = Vec::new();
    mapper
        .run(format!("{}\t0\n", base_url).as_bytes(), &mut mapped)
        .await
        .expect("map pass failed");
    let mapped = String::from_utf8(mapped).unwrap();

    // Group by key the way an external shuffle would
    let mut lines: Vec<&str> = mapped.lines().collect();
    lines.sort();
    let mut reduced = Vec::new();
    for key in [base_url.clone(), format!("{}/x", base_url)] {
        let group: Vec<&str> = lines
            .iter()
            .copied()
            .filter(|l| l.split('\t').next() == Some(key.as_str()))
            .collect();
        reducer::run(Cursor::new(group.join("\n")), &mut reduced).expect("reduce pass failed");
    }

    let mut final_out = Vec::new();
    final_filter::run(Cursor::new(reduced), &mut final_out).expect("final pass failed");

    assert_eq!(
        String::from_utf8(final_out).unwrap(),
        format!("{base}\n{base}/x\n", base = base_url)
    );
}
