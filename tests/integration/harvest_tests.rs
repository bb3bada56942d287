use article_harvester::config::{FailurePolicy, HarvestSettings};
use article_harvester::harvester::Harvester;
use article_harvester::storage::{ArticleStore, SqliteStore, StorageError, StorageResult};
use article_harvester::{ArticleRecord, HarvestError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates settings whose base origin points at the mock server
fn create_test_settings(base_origin: &str, policy: FailurePolicy) -> HarvestSettings {
    let mut settings = HarvestSettings::default();
    settings.harvest.base_origin = base_origin.to_string();
    settings.harvest.failure_policy = policy;
    settings.user_agent.name = "TestHarvester".to_string();
    settings
}

/// Seed page with a related-articles block linking to `hrefs`
fn seed_page(hrefs: &[&str]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<a class="NOtherTitle" href="{}">Related</a>"#, href))
        .collect();
    format!(
        r#"<html><body>
        <h1>Seed</h1>
        <div id="ctl00_cphContent_Article_LienQuan">{}</div>
        </body></html>"#,
        links
    )
}

fn article_page(title: &str, author: &str, date: &str) -> String {
    format!(
        r#"<html><body>
        <span id="ctl00_cphContent_lblTitleHtml">{}</span>
        <span id="ctl00_cphContent_Lbl_Author">{}</span>
        <span id="ctl00_cphContent_lblCreateDate">{}</span>
        </body></html>"#,
        title, author, date
    )
}

async fn mount_page(server: &MockServer, page_path: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Store that rejects every write
struct FailingStore;

impl ArticleStore for FailingStore {
    fn save(&self, _record: &ArticleRecord) -> StorageResult<i64> {
        Err(StorageError::LockPoisoned)
    }
}

#[tokio::test]
async fn test_full_harvest() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/seed",
        200,
        seed_page(&["/Story/a/1.html", "/Story/b/2.html"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/Story/a/1.html",
        200,
        article_page("Title A", "Author A", "01/02/2020"),
    )
    .await;
    mount_page(
        &mock_server,
        "/Story/b/2.html",
        200,
        article_page("Title B", "Author B", "03/04/2020"),
    )
    .await;

    let store = Arc::new(SqliteStore::open_in_memory().expect("Failed to open store"));
    let settings = create_test_settings(&base_url, FailurePolicy::Abort);
    let harvester =
        Harvester::from_settings(store.clone(), &settings).expect("Failed to create harvester");

    let report = harvester
        .run(&format!("{}/seed", base_url))
        .await
        .expect("Harvest failed");

    assert_eq!(report.discovered, 2);
    assert_eq!(report.saved.len(), 2);
    assert!(report.is_success());

    let mut articles = store.load_articles().expect("Failed to load articles");
    articles.sort_by(|a, b| a.url.cmp(&b.url));

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].url, format!("{}/Story/a/1.html", base_url));
    assert_eq!(articles[0].title, "Title A");
    assert_eq!(articles[0].author, "Author A");
    assert_eq!(articles[0].created_date, "01/02/2020");
    assert_eq!(articles[1].url, format!("{}/Story/b/2.html", base_url));
    assert_eq!(articles[1].title, "Title B");
}

#[tokio::test]
async fn test_duplicate_links_are_harvested_twice() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/seed",
        200,
        seed_page(&["/Story/a/1.html", "/Story/a/1.html"]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/Story/a/1.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_page("T", "A", "D")))
        .expect(2)
        .mount(&mock_server)
        .await;

    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let settings = create_test_settings(&base_url, FailurePolicy::Abort);
    let harvester = Harvester::from_settings(store.clone(), &settings).unwrap();

    let report = harvester.run(&format!("{}/seed", base_url)).await.unwrap();

    assert_eq!(report.saved.len(), 2);
    assert_ne!(report.saved[0].id, report.saved[1].id);
    assert_eq!(store.count_articles().unwrap(), 2);
}

#[tokio::test]
async fn test_seed_without_related_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/seed"))
        .respond_with(ResponseTemplate::new(200).set_body_string(seed_page(&[])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let settings = create_test_settings(&base_url, FailurePolicy::Abort);
    let harvester = Harvester::from_settings(store.clone(), &settings).unwrap();

    let report = harvester.run(&format!("{}/seed", base_url)).await.unwrap();

    assert_eq!(report.discovered, 0);
    assert!(report.saved.is_empty());
    assert!(report.is_success());
    assert_eq!(store.count_articles().unwrap(), 0);
}

#[tokio::test]
async fn test_seed_error_aborts_before_any_task() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/seed", 500, seed_page(&["/Story/a/1.html"])).await;

    // Never reached: the seed body is not even parsed
    Mock::given(method("GET"))
        .and(path("/Story/a/1.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_page("T", "A", "D")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let settings = create_test_settings(&base_url, FailurePolicy::Abort);
    let harvester = Harvester::from_settings(store.clone(), &settings).unwrap();

    let err = harvester
        .run(&format!("{}/seed", base_url))
        .await
        .unwrap_err();

    assert!(matches!(err, HarvestError::Status { status: 500, .. }));
    assert_eq!(store.count_articles().unwrap(), 0);
}

#[tokio::test]
async fn test_target_error_aborts_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/seed",
        200,
        seed_page(&["/Story/ok/1.html", "/Story/missing/2.html"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/Story/ok/1.html",
        200,
        article_page("T", "A", "D"),
    )
    .await;
    mount_page(&mock_server, "/Story/missing/2.html", 404, String::new()).await;

    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let settings = create_test_settings(&base_url, FailurePolicy::Abort);
    let harvester = Harvester::from_settings(store.clone(), &settings).unwrap();

    let err = harvester
        .run(&format!("{}/seed", base_url))
        .await
        .unwrap_err();

    // The healthy sibling may or may not have committed before the abort
    match err {
        HarvestError::TaskFailed { url, source } => {
            assert_eq!(url, format!("{}/Story/missing/2.html", base_url));
            assert!(matches!(*source, HarvestError::Status { status: 404, .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(store.count_articles().unwrap() <= 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_abort_cancels_in_flight_siblings() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/seed",
        200,
        seed_page(&["/Story/slow/1.html", "/Story/missing/2.html"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/Story/slow/1.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(article_page("T", "A", "D"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/Story/missing/2.html", 404, String::new()).await;

    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let settings = create_test_settings(&base_url, FailurePolicy::Abort);
    let harvester = Harvester::from_settings(store.clone(), &settings).unwrap();

    let started = Instant::now();
    let err = harvester
        .run(&format!("{}/seed", base_url))
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(
        err,
        HarvestError::TaskFailed { ref source, .. }
            if matches!(**source, HarvestError::Status { status: 404, .. })
    ));
    assert!(
        elapsed < Duration::from_secs(2),
        "run waited on the slow sibling: {:?}",
        elapsed
    );

    // Outlive the delayed response; the cancelled sibling must never save
    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(store.count_articles().unwrap(), 0);
}

#[tokio::test]
async fn test_target_error_collected() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/seed",
        200,
        seed_page(&["/Story/a/1.html", "/Story/missing/2.html", "/Story/c/3.html"]),
    )
    .await;
    mount_page(&mock_server, "/Story/a/1.html", 200, article_page("A", "", "")).await;
    mount_page(&mock_server, "/Story/missing/2.html", 404, String::new()).await;
    mount_page(&mock_server, "/Story/c/3.html", 200, article_page("C", "", "")).await;

    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let settings = create_test_settings(&base_url, FailurePolicy::Collect);
    let harvester = Harvester::from_settings(store.clone(), &settings).unwrap();

    let report = harvester.run(&format!("{}/seed", base_url)).await.unwrap();

    assert_eq!(report.discovered, 3);
    assert_eq!(report.saved.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(
        report.failures[0].url,
        format!("{}/Story/missing/2.html", base_url)
    );
    assert!(!report.is_success());
    assert_eq!(store.count_articles().unwrap(), 2);
}

#[tokio::test]
async fn test_store_error_aborts_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/seed", 200, seed_page(&["/Story/a/1.html"])).await;
    mount_page(&mock_server, "/Story/a/1.html", 200, article_page("T", "A", "D")).await;

    let settings = create_test_settings(&base_url, FailurePolicy::Abort);
    let harvester = Harvester::from_settings(Arc::new(FailingStore), &settings).unwrap();

    let err = harvester
        .run(&format!("{}/seed", base_url))
        .await
        .unwrap_err();

    match err {
        HarvestError::TaskFailed { source, .. } => {
            assert!(matches!(*source, HarvestError::Persist { .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_bounded_concurrency_completes_all_tasks() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let hrefs: Vec<String> = (1..=5).map(|i| format!("/Story/n/{}.html", i)).collect();
    let href_refs: Vec<&str> = hrefs.iter().map(String::as_str).collect();
    mount_page(&mock_server, "/seed", 200, seed_page(&href_refs)).await;

    for (i, href) in hrefs.iter().enumerate() {
        mount_page(
            &mock_server,
            href,
            200,
            article_page(&format!("Story {}", i + 1), "", ""),
        )
        .await;
    }

    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let mut settings = create_test_settings(&base_url, FailurePolicy::Abort);
    settings.harvest.max_concurrent_tasks = 2;
    let harvester = Harvester::from_settings(store.clone(), &settings).unwrap();

    let report = harvester.run(&format!("{}/seed", base_url)).await.unwrap();

    assert_eq!(report.saved.len(), 5);
    let mut titles: Vec<String> = store
        .load_articles()
        .unwrap()
        .into_iter()
        .map(|a| a.title)
        .collect();
    titles.sort();
    assert_eq!(
        titles,
        vec!["Story 1", "Story 2", "Story 3", "Story 4", "Story 5"]
    );
}

#[tokio::test]
async fn test_missing_fields_are_saved_empty() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/seed", 200, seed_page(&["/Story/bare.html"])).await;
    mount_page(
        &mock_server,
        "/Story/bare.html",
        200,
        "<html><body><p>Nothing to see</p></body></html>".to_string(),
    )
    .await;

    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let settings = create_test_settings(&base_url, FailurePolicy::Abort);
    let harvester = Harvester::from_settings(store.clone(), &settings).unwrap();

    harvester.run(&format!("{}/seed", base_url)).await.unwrap();

    let articles = store.load_articles().unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].url, format!("{}/Story/bare.html", base_url));
    assert_eq!(articles[0].title, "");
    assert_eq!(articles[0].author, "");
    assert_eq!(articles[0].created_date, "");
}

#[tokio::test]
async fn test_field_text_is_stored_verbatim() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/seed", 200, seed_page(&["/Story/spaced.html"])).await;
    mount_page(
        &mock_server,
        "/Story/spaced.html",
        200,
        article_page(" Spaced title", "Author ", " 01/02/2020 "),
    )
    .await;

    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let settings = create_test_settings(&base_url, FailurePolicy::Abort);
    let harvester = Harvester::from_settings(store.clone(), &settings).unwrap();

    harvester.run(&format!("{}/seed", base_url)).await.unwrap();

    let articles = store.load_articles().unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0].title, " Spaced title");
    assert_eq!(articles[0].author, "Author ");
    assert_eq!(articles[0].created_date, " 01/02/2020 ");
}

#[test]
fn test_invalid_selector_rejected_at_construction() {
    let mut settings = create_test_settings("https://example.com", FailurePolicy::Abort);
    settings.selectors.title = "span[".to_string();
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());

    match Harvester::from_settings(store, &settings) {
        Err(HarvestError::Config(article_harvester::ConfigError::InvalidSelector(_))) => {}
        Err(other) => panic!("unexpected error: {:?}", other),
        Ok(_) => panic!("invalid selector was accepted"),
    }
}
