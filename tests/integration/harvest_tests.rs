//! End-to-end harvest tests

use crate::common::{article_files, fetch_client, host_slug, html_page, mount_page};
use linkmind::catalog::SourceSpec;
use linkmind::config::Config;
use linkmind::crawler::{discover_links, harvest, Harvester};
use linkmind::output::JobOutcome;
use linkmind::storage::{RepositoryIndex, INDEX_FILE_NAME};
use std::collections::BTreeMap;
use std::io::Write;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn seed(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), route)).expect("Failed to build seed URL")
}

#[tokio::test]
async fn test_single_article_source() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page("Front page", r#"<a href="/story">Story</a>"#),
    )
    .await;
    mount_page(
        &server,
        "/story",
        html_page(
            "A Story",
            "<article><p>First paragraph.</p><p>Second paragraph.</p></article>",
        ),
    )
    .await;

    let root = TempDir::new().unwrap();
    let harvester = Harvester::with_client(fetch_client(), root.path(), 2);
    let source = SourceSpec::new("tech", seed(&server, "/"), "article");

    let reports = harvester.run(vec![source]).await;

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].outcome, JobOutcome::Completed);
    assert_eq!(reports[0].links_found, 1);
    assert_eq!(reports[0].stored, 1);

    let repo_dir = root.path().join("tech").join(host_slug(&server));
    let files = article_files(&repo_dir);
    assert_eq!(files, vec!["a_story".to_string()]);
    assert_eq!(
        std::fs::read_to_string(repo_dir.join("a_story")).unwrap(),
        "First paragraph. Second paragraph."
    );
    assert!(repo_dir.join(INDEX_FILE_NAME).exists());
}

#[tokio::test]
async fn test_self_link_stores_seed_page() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(
            "Front Page",
            r##"<article><p>Front text.</p></article><a href="#">Top</a>"##,
        ),
    )
    .await;

    let root = TempDir::new().unwrap();
    let harvester = Harvester::with_client(fetch_client(), root.path(), 1);
    let source = SourceSpec::new("tech", seed(&server, "/"), "article");

    let reports = harvester.run(vec![source]).await;

    assert_eq!(reports[0].links_found, 1);
    assert_eq!(reports[0].stored, 1);

    let repo_dir = root.path().join("tech").join(host_slug(&server));
    assert_eq!(article_files(&repo_dir), vec!["front_page".to_string()]);
}

#[tokio::test]
async fn test_two_distinct_titles_two_files() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(
            "Front page",
            r#"<a class="item" href="/one">One</a><a class="item" href="/two">Two</a><a href="/about">About</a>"#,
        ),
    )
    .await;
    mount_page(
        &server,
        "/one",
        html_page("First Title", "<div class=\"text\"><p>one</p></div>"),
    )
    .await;
    mount_page(
        &server,
        "/two",
        html_page("Second Title", "<div class=\"text\"><p>two</p></div>"),
    )
    .await;
    // Filtered out by the link class, must never be fetched
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let harvester = Harvester::with_client(fetch_client(), root.path(), 2);
    let source = SourceSpec {
        link_class: Some("item".to_string()),
        article_class: Some("text".to_string()),
        ..SourceSpec::new("news", seed(&server, "/"), "div")
    };

    let reports = harvester.run(vec![source]).await;
    assert_eq!(reports[0].stored, 2);

    let repo_dir = root.path().join("news").join(host_slug(&server));
    assert_eq!(
        article_files(&repo_dir),
        vec!["first_title".to_string(), "second_title".to_string()]
    );

    let index = RepositoryIndex::load(&repo_dir.join(INDEX_FILE_NAME));
    assert_eq!(index.len(), 2);
}

#[tokio::test]
async fn test_same_title_stored_once() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page("Front", r#"<a href="/a">A</a><a href="/b">B</a>"#),
    )
    .await;
    mount_page(&server, "/a", html_page("Same", "<article>text a</article>")).await;
    mount_page(&server, "/b", html_page("Same", "<article>text b</article>")).await;

    let root = TempDir::new().unwrap();
    let harvester = Harvester::with_client(fetch_client(), root.path(), 1);
    let reports = harvester
        .run(vec![SourceSpec::new("tech", seed(&server, "/"), "article")])
        .await;

    assert_eq!(reports[0].stored, 1);
    assert_eq!(reports[0].duplicates, 1);

    let repo_dir = root.path().join("tech").join(host_slug(&server));
    assert_eq!(article_files(&repo_dir), vec!["same".to_string()]);
    let index = RepositoryIndex::load(&repo_dir.join(INDEX_FILE_NAME));
    assert_eq!(index.len(), 1);
}

#[tokio::test]
async fn test_second_run_skips_stored_titles() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page("Front", r#"<a href="/a">A</a>"#)).await;
    mount_page(&server, "/a", html_page("Kept", "<article>original</article>")).await;

    let root = TempDir::new().unwrap();
    let harvester = Harvester::with_client(fetch_client(), root.path(), 1);
    let source = SourceSpec::new("tech", seed(&server, "/"), "article");

    let first = harvester.run(vec![source.clone()]).await;
    let second = harvester.run(vec![source]).await;

    assert_eq!(first[0].stored, 1);
    assert_eq!(second[0].stored, 0);
    assert_eq!(second[0].duplicates, 1);
}

#[tokio::test]
async fn test_extraction_misses_are_counted() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(
            "Front",
            r#"<a href="/no-article">x</a><a href="/no-title">y</a><a href="/gone">z</a>"#,
        ),
    )
    .await;
    mount_page(&server, "/no-article", html_page("Title", "<div>text</div>")).await;
    mount_page(
        &server,
        "/no-title",
        "<html><body><article>text</article></body></html>".to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let root = TempDir::new().unwrap();
    let harvester = Harvester::with_client(fetch_client(), root.path(), 1);
    let reports = harvester
        .run(vec![SourceSpec::new("tech", seed(&server, "/"), "article")])
        .await;

    let report = &reports[0];
    assert_eq!(report.outcome, JobOutcome::Completed);
    assert_eq!(report.links_found, 3);
    assert_eq!(report.misses, 2);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.stored, 0);
}

#[tokio::test]
async fn test_discovery_fetches_seed_once_per_depth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("Front", r#"<a href="/a">A</a><a href="/b">B</a>"#)),
        )
        .expect(3)
        .mount(&server)
        .await;

    let links = discover_links(&fetch_client(), &seed(&server, "/"), 3, None, None).await;

    assert_eq!(links.len(), 2);
    assert!(links.contains(&seed(&server, "/a")));
    assert!(links.contains(&seed(&server, "/b")));
}

#[tokio::test]
async fn test_discovery_depth_one_fetches_seed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html_page("Front", "")))
        .expect(1)
        .mount(&server)
        .await;

    let links = discover_links(&fetch_client(), &seed(&server, "/"), 1, None, None).await;
    assert!(links.is_empty());
}

#[tokio::test]
async fn test_unreachable_seed_is_soft_failure() {
    // Nothing listens on port 9 of localhost in the test environment
    let url = Url::parse("http://127.0.0.1:9/").unwrap();
    let links = discover_links(&fetch_client(), &url, 2, None, None).await;
    assert!(links.is_empty());

    let root = TempDir::new().unwrap();
    let harvester = Harvester::with_client(fetch_client(), root.path(), 1);
    let reports = harvester
        .run(vec![SourceSpec::new("tech", url, "article")])
        .await;

    assert_eq!(reports[0].outcome, JobOutcome::Completed);
    assert_eq!(reports[0].links_found, 0);
}

#[tokio::test]
async fn test_source_headers_replace_defaults() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("x-source", "custom"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("Front", r#"<a href="/a">A</a>"#)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .and(header("x-source", "custom"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html_page("Custom", "<article>text</article>")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = BTreeMap::new();
    headers.insert("X-Source".to_string(), "custom".to_string());

    let root = TempDir::new().unwrap();
    let harvester = Harvester::with_client(fetch_client(), root.path(), 1);
    let source = SourceSpec {
        headers: Some(headers),
        ..SourceSpec::new("tech", seed(&server, "/"), "article")
    };

    let reports = harvester.run(vec![source]).await;
    assert_eq!(reports[0].stored, 1);
}

#[tokio::test]
async fn test_failing_job_does_not_affect_siblings() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page("Front", r#"<a href="/a">A</a>"#)).await;
    mount_page(&server, "/a", html_page("Healthy", "<article>text</article>")).await;

    let root = TempDir::new().unwrap();
    // A plain file where the category directory should be makes that job fail
    std::fs::write(root.path().join("broken"), "not a directory").unwrap();

    let harvester = Harvester::with_client(fetch_client(), root.path(), 2);
    let reports = harvester
        .run(vec![
            SourceSpec::new("broken", seed(&server, "/"), "article"),
            SourceSpec::new("tech", seed(&server, "/"), "article"),
        ])
        .await;

    assert_eq!(reports.len(), 2);

    let broken = reports.iter().find(|r| r.category == "broken").unwrap();
    assert!(broken.is_failed());
    assert_eq!(broken.stored, 0);

    let healthy = reports.iter().find(|r| r.category == "tech").unwrap();
    assert_eq!(healthy.outcome, JobOutcome::Completed);
    assert_eq!(healthy.stored, 1);
}

#[tokio::test]
async fn test_many_sources_over_small_pool() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page("Front", r#"<a href="/a">A</a>"#)).await;
    mount_page(&server, "/a", html_page("Shared", "<article>text</article>")).await;

    let root = TempDir::new().unwrap();
    let harvester = Harvester::with_client(fetch_client(), root.path(), 2);
    let sources: Vec<SourceSpec> = (0..6)
        .map(|i| SourceSpec::new(format!("cat{}", i), seed(&server, "/"), "article"))
        .collect();

    let reports = harvester.run(sources).await;

    assert_eq!(reports.len(), 6);
    assert!(reports.iter().all(|r| r.stored == 1));
}

#[tokio::test]
async fn test_catalog_rows_rejected_before_scheduling() {
    let server = MockServer::start().await;

    mount_page(&server, "/", html_page("Front", r#"<a href="/a">A</a>"#)).await;
    mount_page(&server, "/a", html_page("Story", "<article>text</article>")).await;

    let root = TempDir::new().unwrap();
    let mut catalog = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        catalog,
        "category,url,linkClass,articleTag,articleClass,maxDepth\n\
         tech,{uri}/,,article,,1\n\
         sport,{uri}/,,article,,0\n\
         news,{uri}/,,article,,2",
        uri = server.uri()
    )
    .unwrap();
    catalog.flush().unwrap();

    let mut config = Config::default();
    config.harvest.root = root.path().to_path_buf();
    config.harvest.sources = catalog.path().to_path_buf();
    config.harvest.workers = Some(2);

    let summary = harvest(&config).await.unwrap();

    assert_eq!(summary.rejected.len(), 1);
    assert_eq!(summary.jobs.len(), 2);
    assert_eq!(summary.completed_jobs(), 2);
    assert_eq!(summary.total_stored(), 2);
    assert!(!root.path().join("sport").exists());
}
