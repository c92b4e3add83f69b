use shelf_http::{HttpClient, HttpError, RequestOpts};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UA: &str = "Mozilla/5.0 (shelf-tests)";

#[tokio::test]
async fn sends_user_agent_and_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/post"))
        .and(header("user-agent", UA))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string("<html><title>Hi</title></html>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(UA).unwrap();
    let doc = client
        .get_document(&format!("{}/post", server.uri()), RequestOpts::default())
        .await
        .expect("document");

    assert!(doc.status.is_success());
    assert_eq!(doc.text(), "<html><title>Hi</title></html>");
    assert_eq!(doc.content_type.as_deref(), Some("text/html; charset=utf-8"));
    assert_eq!(doc.url.path(), "/post");
}

#[tokio::test]
async fn follows_redirects_and_reports_final_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .mount(&server)
        .await;

    let client = HttpClient::new(UA).unwrap();
    let doc = client
        .get_document(&format!("{}/old", server.uri()), RequestOpts::default())
        .await
        .expect("redirect followed");

    assert_eq!(doc.url.path(), "/new");
    assert_eq!(doc.text(), "moved");
}

#[tokio::test]
async fn non_success_status_is_an_error_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(UA).unwrap();
    let err = client
        .get_document(&format!("{}/gone", server.uri()), RequestOpts::default())
        .await
        .unwrap_err();

    match err {
        HttpError::Status { status, snippet } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(snippet, "down");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let client = HttpClient::new(UA)
        .unwrap()
        .with_timeout(Duration::from_millis(200));
    let err = client
        .get_document(&format!("{}/slow", server.uri()), RequestOpts::default())
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/big"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(2048)))
        .mount(&server)
        .await;

    let client = HttpClient::new(UA).unwrap().with_max_body_bytes(1024);
    let err = client
        .get_document(&format!("{}/big", server.uri()), RequestOpts::default())
        .await
        .unwrap_err();

    assert!(matches!(err, HttpError::TooLarge { limit: 1024 }), "got {err:?}");
}

#[tokio::test]
async fn rejects_non_http_schemes() {
    let client = HttpClient::new(UA).unwrap();
    let err = client
        .get_document("file:///etc/passwd", RequestOpts::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Url(_)));
}
