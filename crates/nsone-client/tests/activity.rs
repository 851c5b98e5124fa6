use chrono::{TimeZone, Utc};
use nsone_client::{Ns1Client, Ns1Error};
use nsone_core::{ExportFormat, TimeUnit, TimeWindow};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn window() -> TimeWindow {
    let end = Utc.with_ymd_and_hms(2024, 5, 17, 12, 30, 0).unwrap();
    TimeWindow::ending_at(end, TimeUnit::Hours, 1).unwrap()
}

fn client(server: &MockServer, key: &str) -> Ns1Client {
    Ns1Client::builder(key).base_url(server.uri()).build().unwrap()
}

#[tokio::test]
async fn test_fetch_records_sends_key_and_window() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/account/activity"))
        .and(header("X-NSONE-Key", "good-key"))
        .and(query_param("start", "1715945400"))
        .and(query_param("end", "1715949000"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a1", "action": "create", "user_id": "jdoe", "timestamp": 1_715_946_000},
            {"id": "a2", "action": "delete", "user_id": "jdoe", "timestamp": 1_715_947_000}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server, "good-key")
        .activity()
        .in_window(&window(), 2)
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id().as_deref(), Some("a1"));
    assert_eq!(records[1].action().as_deref(), Some("delete"));
}

#[tokio::test]
async fn test_export_returns_raw_bytes() {
    let server = MockServer::start().await;
    let pdf = b"%PDF-1.4 fake report".to_vec();

    Mock::given(method("GET"))
        .and(path("/account/activity"))
        .and(query_param("export", "pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(pdf.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let artifact = client(&server, "good-key")
        .activity()
        .export_window(&window(), 20, ExportFormat::Pdf)
        .await
        .unwrap();

    assert_eq!(artifact.format, ExportFormat::Pdf);
    assert_eq!(artifact.bytes, pdf);
}

#[tokio::test]
async fn test_invalid_key_is_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthorized"})),
        )
        .mount(&server)
        .await;

    let err = client(&server, "bad-key")
        .activity()
        .in_window(&window(), 20)
        .await
        .unwrap_err();

    assert!(err.is_auth_error());
    assert!(matches!(err, Ns1Error::Unauthorized { ref message } if message == "Unauthorized"));
}

#[tokio::test]
async fn test_server_error_carries_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "internal failure"})),
        )
        .mount(&server)
        .await;

    let err = client(&server, "good-key")
        .activity()
        .in_window(&window(), 20)
        .await
        .unwrap_err();

    match err {
        Ns1Error::Api { code, message } => {
            assert_eq!(code, 500);
            assert_eq!(message, "internal failure");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let err = client(&server, "good-key")
        .activity()
        .in_window(&window(), 20)
        .await
        .unwrap_err();

    assert!(matches!(err, Ns1Error::RateLimited { retry_after: Some(7) }));
}

#[tokio::test]
async fn test_malformed_body_is_json_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server, "good-key")
        .activity()
        .in_window(&window(), 20)
        .await
        .unwrap_err();

    assert!(matches!(err, Ns1Error::Json(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Nothing listens on port 9 (discard) on the loopback interface
    let client = Ns1Client::builder("good-key")
        .base_url("http://127.0.0.1:9/v1")
        .build()
        .unwrap();

    let err = client.activity().in_window(&window(), 20).await.unwrap_err();
    assert!(err.is_transport_error(), "{err:?}");
}

#[tokio::test]
async fn test_custom_user_agent_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("user-agent", "nsone-reports/9.9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Ns1Client::builder("good-key")
        .base_url(server.uri())
        .user_agent("nsone-reports/9.9")
        .build()
        .unwrap();
    assert_eq!(client.base_url(), server.uri());

    let records = client.activity().in_window(&window(), 20).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_odd_record_does_not_fail_the_batch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/account/activity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 42, "action": "create", "timestamp": 1_715_946_000.5},
            {"id": "a2", "action": "delete", "timestamp": 1_715_947_000}
        ])))
        .mount(&server)
        .await;

    let records = client(&server, "good-key")
        .activity()
        .in_window(&window(), 20)
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id().as_deref(), Some("42"));
    assert_eq!(records[0].timestamp(), Some(1_715_946_000));
}
