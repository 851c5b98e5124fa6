use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(dir: &TempDir, extra: &str) -> std::path::PathBuf {
    let path = dir.path().join("nsone.toml");
    let content = format!("[nsone]\napi_key = \"test-key\"\n\n{extra}");
    std::fs::write(&path, content).unwrap();
    path
}

fn command(server: &MockServer, config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("nsone-reports").unwrap();
    cmd.env_remove("NSONE_API_KEY")
        .env_remove("RUST_LOG")
        .env("NSONE_API_URL", server.uri())
        .arg("--config")
        .arg(config);
    cmd
}

fn records(count: usize) -> Value {
    (0..count)
        .map(|i| {
            json!({
                "id": format!("a{i}"),
                "action": "update",
                "resource_type": "record",
                "user_id": "jdoe",
                "user_name": "Jane Doe",
                "timestamp": 1_715_946_000 + i,
                "resource": {"zone": "example.com", "domain": "www.example.com", "type": "A"}
            })
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_json_report_printed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/activity"))
        .and(header("X-NSONE-Key", "test-key"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(5)))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "");

    let output = command(&server, &config)
        .args(["--limit", "5", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let printed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed.as_array().map(Vec::len), Some(5));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_table_report_printed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/activity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(2)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "[defaults]\nformat = \"table\"\n");

    command(&server, &config)
        .assert()
        .success()
        .stdout(predicate::str::contains("www.example.com"))
        .stdout(predicate::str::contains("Jane Doe"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/activity"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthorized"})))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "");

    command(&server, &config)
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Unauthorized"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_silent_export_to_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/activity"))
        .and(query_param("export", "csv"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"id,action\na0,update\n".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "");
    let target = dir.path().join("out/report.csv");

    command(&server, &config)
        .args(["--silent", "--export", "--format", "csv", "-o"])
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(std::fs::read(&target).unwrap(), b"id,action\na0,update\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_export_defaults_to_export_dir() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/account/activity"))
        .and(query_param("export", "pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let reports = dir.path().join("reports");
    let config = write_config(
        &dir,
        &format!("[export]\ndir = \"{}\"\n", reports.display()),
    );

    command(&server, &config)
        .args(["--export", "--format", "pdf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved:"));

    let saved: Vec<_> = std::fs::read_dir(&reports)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(saved.len(), 1);
    assert!(saved[0].starts_with("nsone-activity-"));
    assert!(saved[0].ends_with(".pdf"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_unit_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(1)))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "");

    command(&server, &config)
        .args(["--unit", "fortnights"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("fortnights"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_format_without_export_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records(1)))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "");

    command(&server, &config)
        .args(["--format", "xlsx"])
        .assert()
        .code(6);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_api_key_is_config_error() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("empty.toml");
    std::fs::write(&config, "").unwrap();

    command(&server, &config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("API key"));
}
