//! Single-URL retrieval tests

use crate::common::{fetch_client, html_page, mount_page};
use linkmind::crawler::{retrieve_content, ExtractError, ExtractionRule, FetchError};
use url::Url;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_retrieve_body_text() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/page",
        html_page("Classify Me", "<p>Alpha</p><div><p>Beta</p></div>"),
    )
    .await;

    let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
    let article = retrieve_content(&fetch_client(), &url, &ExtractionRule::new("body"), None)
        .await
        .unwrap();

    assert_eq!(article.title, "Classify Me");
    assert_eq!(article.content, "Alpha Beta");
}

#[tokio::test]
async fn test_retrieve_http_error_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
    let err = retrieve_content(&fetch_client(), &url, &ExtractionRule::new("body"), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ExtractError::Fetch(FetchError::Status {
            status_code: 500,
            ..
        })
    ));
    assert!(!err.is_miss());
}

#[tokio::test]
async fn test_retrieve_rule_miss() {
    let server = MockServer::start().await;
    mount_page(&server, "/page", html_page("Title", "<p>text</p>")).await;

    let url = Url::parse(&format!("{}/page", server.uri())).unwrap();
    let rule = ExtractionRule::new("article").with_class("story");
    let err = retrieve_content(&fetch_client(), &url, &rule, None)
        .await
        .unwrap_err();

    assert!(err.is_miss());
}
