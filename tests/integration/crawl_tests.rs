//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use ideia_crawler::config::Config;
use ideia_crawler::crawler::{crawl, Coordinator, Seed};
use ideia_crawler::output::{load_links, read_result, FileSink, ResultSink};
use ideia_crawler::state::{Field, StopReason};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PATH: &str = "/plataforma/desafio/1885";

/// Creates a test configuration with no delay between requests
fn create_test_config(max_pages: Option<u32>) -> Config {
    let mut config = Config::default();
    config.crawler.max_pages = max_pages;
    config.crawler.delay = 0.0;
    config.crawler.timeout = 5;
    config
}

fn seed_url(server: &MockServer) -> Url {
    Url::parse(&format!("{}{}?page=1", server.uri(), LISTING_PATH)).unwrap()
}

/// Listing page with one heading per idea id and an optional "next" link
fn listing_page(ideas: &[u32], next: Option<u32>) -> String {
    let mut html = String::from("<html><body><main>");
    for id in ideas {
        html.push_str(&format!(
            r#"<h3 class="titulo-18"><a href="/plataforma/ideia/{id}">Ideia {id}</a></h3>"#
        ));
    }
    if let Some(next) = next {
        html.push_str(&format!(
            r#"<ul class="pagination"><li><a href="?page={next}">Próxima</a></li></ul>"#
        ));
    }
    html.push_str("</main></body></html>");
    html
}

fn detail_page(id: u32) -> String {
    format!(
        r#"<html><body>
            <div class="destaque"><h2>Ideia {id}</h2></div>
            <div id="detalhes">
                <p>Em avaliação</p>
                <p>Departamento {id}</p>
                <p>Demanda {id}</p>
            </div>
            <div id="equipe">Equipe {id}</div>
        </body></html>"#
    )
}

async fn mount_listing(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap().len()
}

#[tokio::test]
async fn test_budget_limits_pages() {
    let server = MockServer::start().await;
    for page in 1..=5 {
        mount_listing(&server, page, listing_page(&[page * 10, page * 10 + 1], Some(page + 1))).await;
    }

    let coordinator = Coordinator::new(&create_test_config(Some(3))).unwrap();
    let outcome = coordinator.crawl(Seed::Listing(seed_url(&server))).await;

    assert_eq!(outcome.stop_reason, StopReason::BudgetExhausted { max_pages: 3 });
    assert_eq!(outcome.result.pages_processed(), 3);
    assert_eq!(outcome.result.total_records(), 6);
    assert_eq!(outcome.result.records().len(), outcome.result.total_records());
    // No request is made for the page after the budget
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn test_follows_pagination_links_to_the_end() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, listing_page(&[1, 2], Some(2))).await;
    mount_listing(&server, 2, listing_page(&[3], None)).await;
    mount_listing(&server, 3, listing_page(&[], None)).await;

    let coordinator = Coordinator::new(&create_test_config(None)).unwrap();
    let outcome = coordinator.crawl(Seed::Listing(seed_url(&server))).await;

    // Page 2 has no link, the probe of page 3 finds nothing
    assert_eq!(outcome.stop_reason, StopReason::NoNextPage { page: 2 });
    assert_eq!(outcome.result.pages_processed(), 2);

    let titles: Vec<_> = outcome
        .result
        .records()
        .iter()
        .filter_map(|r| r.title())
        .collect();
    assert_eq!(titles, vec!["Ideia 1", "Ideia 2", "Ideia 3"]);

    let first_url = outcome.result.records()[0].url().unwrap();
    assert_eq!(first_url, format!("{}/plataforma/ideia/1", server.uri()));
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn test_guessed_page_is_downloaded_once() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, listing_page(&[1], None)).await;

    // Reached only through the guessed URL; must be downloaded exactly once
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[2], None)))
        .expect(1)
        .mount(&server)
        .await;

    mount_listing(&server, 3, listing_page(&[], None)).await;

    let coordinator = Coordinator::new(&create_test_config(None)).unwrap();
    let outcome = coordinator.crawl(Seed::Listing(seed_url(&server))).await;

    assert_eq!(outcome.stop_reason, StopReason::NoNextPage { page: 2 });
    assert_eq!(outcome.result.total_records(), 2);
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test]
async fn test_fetch_failure_stops_with_partial_result() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, listing_page(&[1, 2], Some(2))).await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(&create_test_config(None)).unwrap();
    let outcome = coordinator.crawl(Seed::Listing(seed_url(&server))).await;

    match &outcome.stop_reason {
        StopReason::FetchFailed { page, error, .. } => {
            assert_eq!(*page, 2);
            assert!(error.contains("500"));
        }
        other => panic!("Expected FetchFailed, got {:?}", other),
    }
    assert_eq!(outcome.result.pages_processed(), 1);
    assert_eq!(outcome.result.total_records(), 2);
}

#[tokio::test]
async fn test_first_page_without_ideas() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, "<html><body><p>Nenhuma ideia</p></body></html>".to_string()).await;

    let coordinator = Coordinator::new(&create_test_config(None)).unwrap();
    let outcome = coordinator.crawl(Seed::Listing(seed_url(&server))).await;

    assert_eq!(outcome.stop_reason, StopReason::NoRecords { page: 1 });
    assert_eq!(outcome.result.pages_processed(), 0);
    assert!(outcome.result.is_empty());
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_broken_headings_are_skipped() {
    let server = MockServer::start().await;
    let body = r#"<html><body>
        <h3 class="titulo-18"><a href="/plataforma/ideia/1">Ideia 1</a></h3>
        <h3 class="titulo-18">sem link</h3>
        <h3 class="titulo-18"><a href="/plataforma/ideia/3"></a></h3>
        <h3 class="titulo-18"><a href="/plataforma/ideia/4">Ideia 4</a></h3>
    </body></html>"#;
    mount_listing(&server, 1, body.to_string()).await;

    let coordinator = Coordinator::new(&create_test_config(Some(1))).unwrap();
    let outcome = coordinator.crawl(Seed::Listing(seed_url(&server))).await;

    let titles: Vec<_> = outcome
        .result
        .records()
        .iter()
        .filter_map(|r| r.title())
        .collect();
    assert_eq!(titles, vec!["Ideia 1", "Ideia 4"]);
}

#[tokio::test]
async fn test_repeated_ideas_are_collected_once() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, listing_page(&[1, 2], Some(2))).await;
    mount_listing(&server, 2, listing_page(&[2, 3], None)).await;
    mount_listing(&server, 3, listing_page(&[], None)).await;

    let coordinator = Coordinator::new(&create_test_config(None)).unwrap();
    let outcome = coordinator.crawl(Seed::Listing(seed_url(&server))).await;

    assert_eq!(outcome.result.pages_processed(), 2);
    assert_eq!(outcome.result.total_records(), 3);
}

#[tokio::test]
async fn test_linked_page_of_repeats_does_not_stop_the_crawl() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, listing_page(&[1, 2], Some(2))).await;
    mount_listing(&server, 2, listing_page(&[1, 2], Some(3))).await;
    mount_listing(&server, 3, listing_page(&[3], None)).await;
    mount_listing(&server, 4, listing_page(&[], None)).await;

    let coordinator = Coordinator::new(&create_test_config(None)).unwrap();
    let outcome = coordinator.crawl(Seed::Listing(seed_url(&server))).await;

    assert_eq!(outcome.stop_reason, StopReason::NoNextPage { page: 3 });
    assert_eq!(outcome.result.pages_processed(), 3);
    assert_eq!(outcome.result.total_records(), 3);
}

#[tokio::test]
async fn test_site_repeating_last_page_for_any_number() {
    let server = MockServer::start().await;
    // Every page number answers with the same single page of ideas
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[1, 2], None)))
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(&create_test_config(None)).unwrap();
    let outcome = coordinator.crawl(Seed::Listing(seed_url(&server))).await;

    assert_eq!(outcome.stop_reason, StopReason::NoNewRecords { page: 2 });
    assert_eq!(outcome.result.pages_processed(), 1);
    assert_eq!(outcome.result.total_records(), 2);
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_listing_in_latin1_is_decoded() {
    let server = MockServer::start().await;
    let mut body = b"<html><body><h3 class=\"titulo-18\"><a href=\"/plataforma/ideia/1\">".to_vec();
    body.extend_from_slice(b"Inova\xE7\xE3o");
    body.extend_from_slice(b"</a></h3></body></html>");

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body)
                .insert_header("content-type", "text/html; charset=ISO-8859-1"),
        )
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(&create_test_config(Some(1))).unwrap();
    let outcome = coordinator.crawl(Seed::Listing(seed_url(&server))).await;

    assert_eq!(outcome.result.total_records(), 1);
    assert_eq!(outcome.result.records()[0].title(), Some("Inovação"));
}

#[tokio::test]
async fn test_next_page_lookup_waits_for_delay() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, listing_page(&[1], None)).await;
    mount_listing(&server, 2, listing_page(&[], None)).await;

    let delay = Duration::from_millis(150);
    let mut config = create_test_config(None);
    config.crawler.delay = delay.as_secs_f64();

    let start = Instant::now();
    let coordinator = Coordinator::new(&config).unwrap();
    let outcome = coordinator.crawl(Seed::Listing(seed_url(&server))).await;

    // Page 1 is linked to nothing, so page 2 is requested by URL after one delay
    assert_eq!(outcome.stop_reason, StopReason::NoNextPage { page: 1 });
    assert_eq!(request_count(&server).await, 2);
    assert!(start.elapsed() >= delay);
}

#[tokio::test]
async fn test_link_list_skips_failed_pages() {
    let server = MockServer::start().await;
    for id in [1, 3] {
        Mock::given(method("GET"))
            .and(path(format!("/plataforma/ideia/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(id)))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/plataforma/ideia/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let links: Vec<Url> = [1, 2, 3, 1]
        .iter()
        .map(|id| Url::parse(&format!("{}/plataforma/ideia/{}", server.uri(), id)).unwrap())
        .collect();

    let coordinator = Coordinator::new(&create_test_config(None)).unwrap();
    let outcome = coordinator.crawl(Seed::Links(links)).await;

    assert_eq!(outcome.stop_reason, StopReason::LinksExhausted { visited: 3 });
    assert_eq!(outcome.result.pages_processed(), 2);
    assert_eq!(outcome.result.total_records(), 2);

    let first = &outcome.result.records()[0];
    assert_eq!(first.field(Field::Title), Some("Ideia 1"));
    assert_eq!(first.field(Field::State), Some("Em avaliação"));
    assert_eq!(first.field(Field::Department), Some("Departamento 1"));
    assert_eq!(first.field(Field::Demand), Some("Demanda 1"));
    assert_eq!(first.field(Field::Team), Some("Equipe 1"));
    assert_eq!(
        first.url(),
        Some(format!("{}/plataforma/ideia/1", server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_link_list_waits_between_requests() {
    let server = MockServer::start().await;
    for id in [1, 3] {
        Mock::given(method("GET"))
            .and(path(format!("/plataforma/ideia/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(id)))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/plataforma/ideia/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let link = |id: u32| Url::parse(&format!("{}/plataforma/ideia/{}", server.uri(), id)).unwrap();

    // A single link is fetched right away, whatever the delay
    let mut config = create_test_config(None);
    config.crawler.delay = 30.0;
    let start = Instant::now();
    let outcome = Coordinator::new(&config)
        .unwrap()
        .crawl(Seed::Links(vec![link(1)]))
        .await;
    assert_eq!(outcome.result.total_records(), 1);
    assert!(start.elapsed() < Duration::from_secs(5));

    // Failed pages still count against the delay
    let delay = Duration::from_millis(150);
    config.crawler.delay = delay.as_secs_f64();
    let start = Instant::now();
    let outcome = Coordinator::new(&config)
        .unwrap()
        .crawl(Seed::Links(vec![link(1), link(2), link(3)]))
        .await;

    assert_eq!(outcome.stop_reason, StopReason::LinksExhausted { visited: 3 });
    assert_eq!(outcome.result.total_records(), 2);
    assert!(start.elapsed() >= delay * 2);
}

#[tokio::test]
async fn test_saved_listing_feeds_link_mode() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, listing_page(&[7, 8], None)).await;
    mount_listing(&server, 2, listing_page(&[], None)).await;
    for id in [7, 8] {
        Mock::given(method("GET"))
            .and(path(format!("/plataforma/ideia/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(id)))
            .mount(&server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let sink = FileSink::in_dir(dir.path());
    let config = create_test_config(None);

    let listing = crawl(&config, Seed::Listing(seed_url(&server)))
        .await
        .unwrap()
        .result;
    let saved = sink.save(&listing, "senai_data").unwrap();
    assert!(saved.csv.is_some());

    let links = load_links(&saved.json);
    let loaded: Vec<_> = links.iter().map(Url::as_str).collect();
    assert_eq!(loaded, listing.urls().collect::<Vec<_>>());
    assert_eq!(links.len(), 2);

    let details = crawl(&config, Seed::Links(links)).await.unwrap().result;
    assert_eq!(details.total_records(), 2);
    assert_eq!(details.records()[1].field(Field::Demand), Some("Demanda 8"));

    let saved = sink.save(&details, "senai_data_detalhes").unwrap();
    let csv = std::fs::read_to_string(saved.csv.unwrap()).unwrap();
    let header = csv.lines().next().unwrap();
    assert_eq!(
        header,
        "idea_titulo,idea_url,idea_estado,idea_departamento,idea_demanda,idea_equipe"
    );
}

#[tokio::test]
async fn test_corrupt_input_yields_empty_link_crawl() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("senai_data.json");
    std::fs::write(&path, "not json").unwrap();

    let links = load_links(&path);
    assert!(links.is_empty());

    let coordinator = Coordinator::new(&create_test_config(None)).unwrap();
    let outcome = coordinator.crawl(Seed::Links(links)).await;
    assert!(outcome.result.is_empty());
    assert_eq!(outcome.stop_reason, StopReason::LinksExhausted { visited: 0 });
}

#[tokio::test]
async fn test_checkpoint_keeps_partial_result() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, listing_page(&[1, 2], Some(2))).await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let coordinator = Coordinator::new(&create_test_config(None))
        .unwrap()
        .with_checkpoint(Box::new(FileSink::in_dir(dir.path())), "checkpoint");

    let outcome = coordinator.crawl(Seed::Listing(seed_url(&server))).await;
    assert!(matches!(outcome.stop_reason, StopReason::FetchFailed { .. }));

    let snapshot = read_result(&dir.path().join("checkpoint.json")).unwrap();
    assert_eq!(snapshot.pages_processed(), 1);
    assert_eq!(snapshot.total_records(), 2);
    assert!(dir.path().join("checkpoint_ideias.csv").exists());
}
