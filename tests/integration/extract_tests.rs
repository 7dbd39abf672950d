//! Integration tests for the extraction pipeline
//!
//! These tests use wiremock to stand in for the gazette homepage and its
//! detail pages and run the full fetch, parse, classify and dereference
//! cycle end-to-end.

use gazette_scraper::config::{Config, DetailRetryPolicy, SourceFailurePolicy};
use gazette_scraper::crawler::Coordinator;
use gazette_scraper::publish::{PublishOutcome, Publisher};
use gazette_scraper::storage::DirectoryStore;
use gazette_scraper::{Attachment, Category, GazetteError, Record, Subtype};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DATE: &str = "18.10.2026";

const HOMEPAGE: &str = r##"<html><head><title>T.C. Resmî Gazete</title></head><body>
    <nav>
        <a href="/">Ana Sayfa</a>
        <a href="/arsiv">Önceki Günler</a>
    </nav>
    <h2><a href="#">18 Ekim 2026 tarihli ve 32695 sayılı Resmî Gazete</a></h2>
    <div class="fihrist">
        <a href="/eskiler/yeni.htm">  Organik Tarımın Esasları ve
            Uygulanmasına İlişkin <b>Yönetmelik</b> </a>
        <a href="/eskiler/degisiklik.htm">Gümrük Yönetmeliğinde Değişiklik Yapılmasına Dair Yönetmelik</a>
        <a href="/eskiler/teblig.htm">Katma Değer Vergisi Genel Uygulama Tebliği</a>
        <table><tr><td>2026/1234 sayılı Cumhurbaşkanı Kararı</td></tr></table>
        <a href="/ilanlar/yargi.htm">Yargı İlanları</a>
        <a href="javascript:window.print()">Sayfayı yazdır</a>
        <a href="/eskiler/x.pdf">PDF</a>
    </div>
    <footer><a href="/iletisim">İletişim</a></footer>
</body></html>"##;

const DETAIL_PAGE: &str = r#"<html><head><title>Değişiklik</title><script>var x = 1;</script></head>
    <body><h1>YÖNETMELİK</h1>
    <p>MADDE 1 –   Gümrük Yönetmeliğinin 5 inci maddesi değiştirilmiştir.</p></body></html>"#;

/// Creates a test configuration pointed at the mock server
fn create_test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.source.url = format!("{}/", server.uri());
    config.http.max_retries = 2;
    config.http.backoff_base_ms = 1; // Very short for testing
    config
}

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_extraction() {
    let server = MockServer::start().await;
    mount_html(&server, "/", HOMEPAGE).await;
    mount_html(&server, "/eskiler/degisiklik.htm", DETAIL_PAGE).await;

    let config = create_test_config(&server);
    let records = Coordinator::new(&config)
        .expect("Failed to create coordinator")
        .run(DATE)
        .await
        .expect("Extraction failed");

    let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Organik Tarımın Esasları ve Uygulanmasına İlişkin Yönetmelik",
            "Gümrük Yönetmeliğinde Değişiklik Yapılmasına Dair Yönetmelik",
            "Katma Değer Vergisi Genel Uygulama Tebliği",
            "Yargı İlanları",
        ]
    );

    assert_eq!(
        records[0],
        Record {
            date: DATE.to_string(),
            category: Category::Regulation,
            subtype: Some(Subtype::New),
            title: "Organik Tarımın Esasları ve Uygulanmasına İlişkin Yönetmelik".to_string(),
            attachment: Attachment::Link(format!("{}/eskiler/yeni.htm", server.uri())),
        }
    );

    assert_eq!(records[1].subtype, Some(Subtype::Amendment));
    assert_eq!(records[1].link(), None);
    assert_eq!(
        records[1].full_text(),
        Some("YÖNETMELİK MADDE 1 – Gümrük Yönetmeliğinin 5 inci maddesi değiştirilmiştir.")
    );

    assert_eq!(records[2].category, Category::Communique);
    assert_eq!(records[2].subtype, None);
    assert_eq!(records[3].category, Category::Notice);

    for record in &records {
        assert_eq!(record.date, DATE);
        if let Some(link) = record.link() {
            assert!(link.starts_with("http://"), "relative link leaked: {}", link);
        }
    }
}

#[tokio::test]
async fn test_full_text_is_truncated() {
    let server = MockServer::start().await;
    mount_html(&server, "/", HOMEPAGE).await;
    mount_html(&server, "/eskiler/degisiklik.htm", DETAIL_PAGE).await;

    let mut config = create_test_config(&server);
    config.extract.full_text_max_chars = 10;

    let records = Coordinator::new(&config).unwrap().run(DATE).await.unwrap();

    let text = records[1].full_text().unwrap();
    assert_eq!(text.chars().count(), 10);
    assert_eq!(text, "YÖNETMELİK");
}

#[tokio::test]
async fn test_detail_failure_keeps_record_with_marker() {
    let server = MockServer::start().await;
    mount_html(&server, "/", HOMEPAGE).await;

    // Single attempt only with fail-fast
    Mock::given(method("GET"))
        .and(path("/eskiler/degisiklik.htm"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server);
    config.http.detail_retry = DetailRetryPolicy::FailFast;

    let records = Coordinator::new(&config).unwrap().run(DATE).await.unwrap();

    assert_eq!(records.len(), 4);
    let text = records[1].full_text().unwrap();
    assert!(text.starts_with("[HATA: "), "unexpected text: {}", text);
    assert!(text.contains("500"));
    assert_eq!(records[2].category, Category::Communique);
}

#[tokio::test]
async fn test_detail_marker_is_truncated_like_text() {
    let server = MockServer::start().await;
    mount_html(&server, "/", HOMEPAGE).await;
    Mock::given(method("GET"))
        .and(path("/eskiler/degisiklik.htm"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut config = create_test_config(&server);
    config.extract.full_text_max_chars = 6;

    let records = Coordinator::new(&config).unwrap().run(DATE).await.unwrap();
    assert_eq!(records[1].full_text(), Some("[HATA:"));
}

#[tokio::test]
async fn test_detail_retries_transient_errors() {
    let server = MockServer::start().await;
    mount_html(&server, "/", HOMEPAGE).await;

    Mock::given(method("GET"))
        .and(path("/eskiler/degisiklik.htm"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_html(&server, "/eskiler/degisiklik.htm", DETAIL_PAGE).await;

    let config = create_test_config(&server);
    let records = Coordinator::new(&config).unwrap().run(DATE).await.unwrap();

    assert!(records[1]
        .full_text()
        .unwrap()
        .starts_with("YÖNETMELİK MADDE 1"));
}

#[tokio::test]
async fn test_source_failure_aborts_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3) // first attempt plus two retries
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let result = Coordinator::new(&config).unwrap().run(DATE).await;

    match result {
        Err(GazetteError::SourceFetch { url, .. }) => {
            assert_eq!(url, format!("{}/", server.uri()));
        }
        other => panic!("expected SourceFetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_source_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let result = Coordinator::new(&config).unwrap().run(DATE).await;
    assert!(matches!(result, Err(GazetteError::SourceFetch { .. })));
}

#[tokio::test]
async fn test_source_failure_with_empty_policy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut config = create_test_config(&server);
    config.source.on_source_failure = SourceFailurePolicy::Empty;

    let records = Coordinator::new(&config).unwrap().run(DATE).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_concurrent_details_keep_document_order() {
    let server = MockServer::start().await;
    let homepage = r#"<html><body>
        <a href="/a.htm">Birinci Yönetmelikte Değişiklik Yapılmasına Dair Yönetmelik</a>
        <a href="/b.htm">İkinci Yönetmelikte Değişiklik Yapılmasına Dair Yönetmelik</a>
        <a href="/c.htm">Üçüncü Yönetmelikte Değişiklik Yapılmasına Dair Yönetmelik</a>
    </body></html>"#;
    mount_html(&server, "/", homepage).await;

    // The first page is the slowest to answer
    Mock::given(method("GET"))
        .and(path("/a.htm"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>birinci</p>")
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_html(&server, "/b.htm", "<p>ikinci</p>").await;
    mount_html(&server, "/c.htm", "<p>üçüncü</p>").await;

    let mut config = create_test_config(&server);
    config.http.detail_concurrency = 3;

    let records = Coordinator::new(&config).unwrap().run(DATE).await.unwrap();
    let texts: Vec<&str> = records.iter().filter_map(|r| r.full_text()).collect();
    assert_eq!(texts, vec!["birinci", "ikinci", "üçüncü"]);
}

#[tokio::test]
async fn test_extract_then_publish() {
    let server = MockServer::start().await;
    mount_html(&server, "/", HOMEPAGE).await;
    mount_html(&server, "/eskiler/degisiklik.htm", DETAIL_PAGE).await;

    let config = create_test_config(&server);
    let records = Coordinator::new(&config).unwrap().run(DATE).await.unwrap();

    let dir = TempDir::new().unwrap();
    let store = DirectoryStore::open(dir.path().join("snapshots")).unwrap();
    let publisher = Publisher::new(Arc::new(store), &config.storage);

    let outcome = publisher.publish(DATE, &records).unwrap();
    assert!(matches!(
        outcome,
        PublishOutcome::Written { ref key, records: 4, .. } if key == "resmi_gazete_18.10.2026.json"
    ));
    assert!(dir
        .path()
        .join("snapshots/resmi_gazete_18.10.2026.json")
        .is_file());

    let payload = publisher.get_latest().unwrap().expect("snapshot missing");
    let text = String::from_utf8(payload).unwrap();
    assert!(text.contains("\"Kategori\": \"Yönetmelik\""));
    assert!(text.contains("\"Değişiklik Kapsamı\""));

    let stored: Vec<Record> = serde_json::from_str(&text).unwrap();
    assert_eq!(stored, records);
}

#[tokio::test]
async fn test_requests_go_through_configured_proxy() {
    let proxy = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/k.htm">2026/1234 sayılı Cumhurbaşkanı Kararı</a>"#),
        )
        .expect(1)
        .mount(&proxy)
        .await;

    let mut config = create_test_config(&proxy);
    // Only reachable through the proxy
    config.source.url = "http://gazette.invalid/".to_string();
    config.http.proxy_url = Some(proxy.uri());

    let records = Coordinator::new(&config).unwrap().run(DATE).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].link(), Some("http://gazette.invalid/k.htm"));
}

#[tokio::test]
async fn test_no_proxy_hosts_bypass_proxy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/k.htm">2026/1234 sayılı Cumhurbaşkanı Kararı</a>"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server);
    config.http.max_retries = 0;
    config.http.proxy_url = Some("http://127.0.0.1:9".to_string());
    config.http.no_proxy = Some("127.0.0.1".to_string());

    let records = Coordinator::new(&config).unwrap().run(DATE).await.unwrap();
    assert_eq!(records.len(), 1);
}
