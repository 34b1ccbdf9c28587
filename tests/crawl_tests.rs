//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small course hierarchy and test
//! the full crawl cycle end-to-end against a real SQLite file.

use rusqlite::Connection;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coursecomb::config::{
    Config, CrawlerConfig, FetchStrategy, LevelEntry, OutputConfig, SiteConfig,
};
use coursecomb::crawler::Coordinator;
use coursecomb::fetch::Fetcher;
use coursecomb::storage::SqliteStore;
use coursecomb::StepState;

fn test_config(base_url: &str, db_path: &str, audio_root: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            min_delay_secs: 0.0,
            max_delay_secs: 0.0,
            max_retries: 3,
            backoff_base_ms: 10,
            fetch_strategy: FetchStrategy::Http,
        },
        site: SiteConfig {
            base_url: base_url.to_string(),
            user_agent: "TestAgent/1.0".to_string(),
        },
        output: OutputConfig {
            database_path: db_path.to_string(),
            audio_root: audio_root.to_string(),
        },
        levels: vec![LevelEntry {
            slug: "intermediate".to_string(),
            title: "Intermediate".to_string(),
            total_units: 2,
        }],
        session_types: vec![],
    }
}

async fn build_coordinator(config: &Config, download_audio: bool) -> Coordinator<SqliteStore> {
    let store = SqliteStore::new(Path::new(&config.output.database_path)).unwrap();
    let fetcher = Fetcher::from_config(&config.crawler, &config.site)
        .await
        .unwrap();
    Coordinator::new(config.clone(), store, fetcher, download_audio).unwrap()
}

async fn mount_page(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

/// Serves one complete unit: three sessions, one activity, a downloads
/// page with three pooled audio files
async fn mount_unit_one(server: &MockServer) {
    let base = server.uri();

    mount_page(
        server,
        "/intermediate/unit-1",
        r#"<html><body>
            <span class="bbcle-unit-title">Pop-ups</span>
            <div class="widget-richtext"><p>This unit looks at pop-up culture and the words around it.</p></div>
            <h3>6 Minute Vocabulary</h3>
            <h3>6 Minute Grammar</h3>
            <a href="/intermediate/unit-1/session-1">Session 1</a>
            <a href="/intermediate/unit-1/session-2">Session 2</a>
            <a href="/intermediate/unit-1/session-4">Session 4</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    mount_page(
        server,
        "/intermediate/unit-1/downloads",
        format!(
            r#"<html><body>
            <div class="download-item"><h3>Unit 1 Vocabulary</h3><p>Session 1</p>
                <a href="{base}/audio/unit1-vocab.mp3">Audio (2.1 MB)</a></div>
            <div class="download-item"><h3>Unit 1 Grammar</h3><p>Session 2</p>
                <a href="{base}/audio/unit1-gram.mp3">Audio (2.3 MB)</a></div>
            <div class="download-item"><h3>Unit 1 Drama</h3><p>Session 4</p>
                <a href="{base}/audio/unit1-session4.mp3">Audio (5.0 MB)</a></div>
        </body></html>"#
        ),
    )
    .await;

    mount_page(
        server,
        "/intermediate/unit-1/session-1",
        r#"<html><body>
            <h1>6 Minute Vocabulary</h1>
            <div class="widget-richtext-hideable">
                <div class="widget-richtext"><p>Welcome to the programme, this transcript is long enough to keep.</p></div>
            </div>
            <div class="vocabulary"><ul>
                <li>resilient — able to recover quickly</li>
                <li>keen — very interested in something</li>
            </ul></div>
            <a href="/intermediate/unit-1/session-1/activity-1">Activity 1</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    mount_page(
        server,
        "/intermediate/unit-1/session-1/activity-1",
        r#"<html><body>
            <h1>Vocabulary practice</h1>
            <p>Listen to the audio and complete the exercise below.</p>
            <div class="widget-richtext"><p>Being <strong>resilient</strong> helps when things go badly wrong for you.</p></div>
        </body></html>"#
            .to_string(),
    )
    .await;

    mount_page(
        server,
        "/intermediate/unit-1/session-2",
        r#"<html><body>
            <h1>6 Minute Grammar</h1>
            <div class="widget-richtext"><p>This session practises the present perfect with just and already.</p></div>
        </body></html>"#
            .to_string(),
    )
    .await;

    mount_page(
        server,
        "/intermediate/unit-1/session-4",
        r#"<html><body>
            <h1>Drama</h1>
            <div class="widget-richtext"><p>Listen to the next episode of our drama and follow the story.</p></div>
        </body></html>"#
            .to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/audio/unit1-vocab.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"vocab-audio".to_vec()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/audio/unit1-gram.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"gram-audio".to_vec()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/audio/unit1-session4.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"drama-audio".to_vec()))
        .mount(server)
        .await;
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[tokio::test]
async fn test_full_unit_crawl() {
    let server = MockServer::start().await;
    mount_unit_one(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let config = test_config(
        &server.uri(),
        db_path.to_str().unwrap(),
        dir.path().join("audio").to_str().unwrap(),
    );

    let mut coordinator = build_coordinator(&config, false).await;
    let state = coordinator.crawl_unit("intermediate", 1).await.unwrap();
    assert_eq!(state, StepState::Persisted);

    let report = coordinator.into_report();
    assert_eq!(report.units.processed, 1);
    assert_eq!(report.sessions.processed, 3);
    assert_eq!(report.activities.processed, 1);
    assert_eq!(report.vocabulary_items, 2);
    assert_eq!(report.bold_words, 1);
    assert_eq!(report.downloads, 3);

    let conn = Connection::open(&db_path).unwrap();
    assert_eq!(count(&conn, "units"), 1);
    assert_eq!(count(&conn, "sessions"), 3);
    assert_eq!(count(&conn, "activities"), 1);
    assert_eq!(count(&conn, "session_vocabulary"), 2);
    assert_eq!(count(&conn, "bold_words"), 1);
    assert_eq!(count(&conn, "downloads"), 3);

    let unit_title: String = conn
        .query_row("SELECT title FROM units", [], |row| row.get(0))
        .unwrap();
    assert_eq!(unit_title, "Pop-ups");

    let transcript: Option<String> = conn
        .query_row(
            "SELECT transcript_text FROM sessions WHERE session_number = 1",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(transcript.unwrap().contains("Welcome to the programme"));
}

#[tokio::test]
async fn test_pool_audio_matched_to_session_types() {
    let server = MockServer::start().await;
    mount_unit_one(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let config = test_config(
        &server.uri(),
        db_path.to_str().unwrap(),
        dir.path().join("audio").to_str().unwrap(),
    );

    let mut coordinator = build_coordinator(&config, false).await;
    coordinator.crawl_unit("intermediate", 1).await.unwrap();

    let conn = Connection::open(&db_path).unwrap();
    let audio_for = |n: u32| -> Option<String> {
        conn.query_row(
            "SELECT audio_url FROM sessions WHERE session_number = ?1",
            [n],
            |row| row.get(0),
        )
        .unwrap()
    };

    assert!(audio_for(1).unwrap().ends_with("unit1-vocab.mp3"));
    assert!(audio_for(2).unwrap().ends_with("unit1-gram.mp3"));
    assert!(audio_for(4).unwrap().ends_with("unit1-session4.mp3"));

    let types: Vec<String> = conn
        .prepare("SELECT session_type FROM sessions ORDER BY session_number")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(types, vec!["vocabulary", "grammar", "listening"]);
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let server = MockServer::start().await;
    mount_unit_one(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let config = test_config(
        &server.uri(),
        db_path.to_str().unwrap(),
        dir.path().join("audio").to_str().unwrap(),
    );

    let mut first = build_coordinator(&config, false).await;
    first.crawl_unit("intermediate", 1).await.unwrap();

    let conn = Connection::open(&db_path).unwrap();
    let before: Vec<i64> = ["units", "sessions", "activities", "session_vocabulary", "bold_words"]
        .iter()
        .map(|t| count(&conn, t))
        .collect();

    let mut second = build_coordinator(&config, false).await;
    let state = second.crawl_unit("intermediate", 1).await.unwrap();
    assert_eq!(state, StepState::AlreadyPresent);

    let report = second.into_report();
    assert!(report.all_already_present());
    assert_eq!(report.units.skipped, 1);

    let after: Vec<i64> = ["units", "sessions", "activities", "session_vocabulary", "bold_words"]
        .iter()
        .map(|t| count(&conn, t))
        .collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_failed_unit_does_not_abort_level() {
    let server = MockServer::start().await;
    mount_unit_one(&server).await;

    // unit-2 is missing: every page under it 404s
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let config = test_config(
        &server.uri(),
        db_path.to_str().unwrap(),
        dir.path().join("audio").to_str().unwrap(),
    );

    let mut coordinator = build_coordinator(&config, false).await;
    coordinator
        .crawl_level("intermediate", Some(2), None)
        .await
        .unwrap();

    // unit 2 failed but the level run itself succeeded; unit 1 (crawled
    // after unit 2 in the range 2..=2 is done) is untouched here
    let report = coordinator.into_report();
    assert_eq!(report.units.failed, 1);
    assert_eq!(report.units.processed, 0);
}

#[tokio::test]
async fn test_retry_recovers_from_transient_errors() {
    let server = MockServer::start().await;

    // Two failures, then success
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>recovered</html>"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(
        &server.uri(),
        dir.path().join("test.db").to_str().unwrap(),
        dir.path().join("audio").to_str().unwrap(),
    );

    let fetcher = Fetcher::from_config(&config.crawler, &config.site)
        .await
        .unwrap();

    let start = std::time::Instant::now();
    let html = fetcher
        .fetch_page(&format!("{}/flaky", server.uri()))
        .await
        .unwrap();
    assert!(html.contains("recovered"));

    // backoff-base-ms is 10, so the two retries slept ≈ 10 + 20 ms
    assert!(start.elapsed() >= std::time::Duration::from_millis(30));
}

#[tokio::test]
async fn test_audio_files_downloaded_and_cached() {
    let server = MockServer::start().await;
    mount_unit_one(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let audio_root = dir.path().join("audio");
    let config = test_config(
        &server.uri(),
        dir.path().join("test.db").to_str().unwrap(),
        audio_root.to_str().unwrap(),
    );

    let mut coordinator = build_coordinator(&config, true).await;
    coordinator.crawl_unit("intermediate", 1).await.unwrap();

    let report = coordinator.into_report();
    assert_eq!(report.audio_files, 3);
    assert_eq!(report.audio_skipped, 0);

    // Download blocks carry a session number but no activity number
    let unit_dir = audio_root.join("intermediate").join("unit-1");
    assert!(unit_dir.join("session-1_activity-0.mp3").exists());
    assert!(unit_dir.join("session-2_activity-0.mp3").exists());
    assert!(unit_dir.join("session-4_activity-0.mp3").exists());

    assert_eq!(
        std::fs::read(unit_dir.join("session-1_activity-0.mp3")).unwrap(),
        b"vocab-audio"
    );
}
