//! CLI tests against a mock backend.
//!
//! Each test runs the built `crm` binary with its own temporary HOME, so
//! saved sessions never leak between tests or into the real data directory.

mod common;

use common::{run_cli, run_cli_failure, run_cli_success};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_url(server: &MockServer) -> String {
    format!("http://127.0.0.1:{}", server.address().port())
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "admin", "password": "admin123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "cli-token",
            "token_type": "bearer"
        })))
        .mount(server)
        .await;
}

fn login(server: &MockServer, home: &TempDir) {
    let url = api_url(server);
    run_cli_success(
        &[
            "login",
            "--username",
            "admin",
            "--password",
            "admin123",
            "--api-url",
            &url,
        ],
        home.path(),
    );
}

// ============================================================================
// Offline Commands
// ============================================================================

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    let stdout = run_cli_success(&["--help"], home.path());
    assert!(stdout.contains("list"));
    assert!(stdout.contains("convert-lead"));
}

#[test]
fn test_fields_json() {
    let home = TempDir::new().unwrap();
    let stdout = run_cli_success(&["fields", "lead", "--json"], home.path());

    let fields: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let status = fields
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["key"] == "status")
        .unwrap();
    assert_eq!(status["value_type"], "select");
    assert_eq!(
        status["options"],
        json!(["New", "Contacted", "Qualified", "Unqualified", "Converted"])
    );
}

#[test]
fn test_columns_marks_derived_columns() {
    let home = TempDir::new().unwrap();
    let stdout = run_cli_success(&["columns", "leads"], home.path());
    assert!(stdout.contains("owner_alias"));
    assert!(stdout.contains("(not sortable)"));
    assert!(stdout.contains("Date Created"));
}

#[test]
fn test_unknown_record_type() {
    let home = TempDir::new().unwrap();
    let stderr = run_cli_failure(&["fields", "products"], home.path());
    assert!(stderr.contains("unknown record type"));
}

#[test]
fn test_list_without_session() {
    let home = TempDir::new().unwrap();
    let stderr = run_cli_failure(&["list", "leads"], home.path());
    assert!(stderr.contains("No active session"));
}

#[test]
fn test_logout_without_session() {
    let home = TempDir::new().unwrap();
    let output = run_cli(&["logout"], home.path());
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No active session"));
}

// ============================================================================
// Against A Mock Backend
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_login_saves_session() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let home = TempDir::new().unwrap();

    login(&server, &home);

    let session_file = home.path().join("data").join("crm").join("session.json");
    if cfg!(target_os = "linux") {
        let contents = std::fs::read_to_string(&session_file).unwrap();
        let session: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(session["username"], "admin");
        assert_eq!(session["access_token"], "cli-token");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&session_file).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    run_cli_success(&["logout"], home.path());
    let stderr = run_cli_failure(&["list", "leads"], home.path());
    assert!(stderr.contains("No active session"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_login_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Incorrect username or password"
        })))
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();

    let url = api_url(&server);
    let stderr = run_cli_failure(
        &["login", "-u", "admin", "--password", "nope", "--api-url", &url],
        home.path(),
    );
    assert!(stderr.contains("invalid credentials"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_with_filter_as_json() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/leads"))
        .and(header("authorization", "Bearer cli-token"))
        .and(query_param("page", "1"))
        .and(query_param("page_size", "10"))
        .and(query_param("sort_by", "company"))
        .and(query_param("sort_order", "asc"))
        .and(query_param("filter_0_field", "status"))
        .and(query_param("filter_0_op", "equals"))
        .and(query_param("filter_0_value", "New"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": 1, "full_name": "Ada Lovelace", "company": "Analytical", "status": "New"},
                {"id": 2, "full_name": "Grace Hopper", "company": "Navy", "status": "New"}
            ],
            "total": 2,
            "page": 1,
            "page_size": 10,
            "pages": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    login(&server, &home);

    let stdout = run_cli_success(
        &[
            "list",
            "leads",
            "--sort-by",
            "company",
            "--page-size",
            "10",
            "-f",
            "status:equals:New",
            "-f",
            "nonexistent:contains:x",
            "--json",
        ],
        home.path(),
    );

    let page: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(page["total"], 2);
    assert_eq!(page["pages"], 1);
    assert_eq!(page["items"][1]["company"], "Navy");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_renders_table() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": 3, "full_name": "Jo Smith", "email": "jo@example.com"}],
            "total": 26,
            "page": 1,
            "page_size": 25,
            "pages": 2
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    login(&server, &home);

    let output = run_cli(
        &["list", "contacts", "--columns", "full_name,email"],
        home.path(),
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("Name"));
    assert!(stdout.contains("jo@example.com"));
    assert!(stderr.contains("Page 1 of 2"));
    assert!(stderr.contains("next: --page 2"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_expired_session_hint() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Could not validate credentials"
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    login(&server, &home);

    let session_file = home.path().join("data").join("crm").join("session.json");
    if cfg!(target_os = "linux") {
        assert!(session_file.exists());
    }

    let stderr = run_cli_failure(&["whoami"], home.path());
    assert!(stderr.contains("crm login"));

    // The rejected token is forgotten, so the next command asks for a login
    assert!(!session_file.exists());
    let stderr = run_cli_failure(&["list", "leads"], home.path());
    assert!(stderr.contains("No active session"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_list_failure_reported_once() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/leads"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "detail": "Database unavailable"
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    login(&server, &home);

    let stderr = run_cli_failure(&["list", "leads"], home.path());
    assert_eq!(stderr.matches("Database unavailable").count(), 1, "{stderr}");
    assert_eq!(stderr.matches("Failed to list leads").count(), 1, "{stderr}");
    assert!(!stderr.contains("Failed to load records"), "{stderr}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_delete_records() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/api/cases/4"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/cases/5"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": "Case not found"
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    login(&server, &home);

    let output = run_cli(&["delete", "cases", "4", "5"], home.path());
    assert!(!output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("Deleted case 4"));
    assert!(stderr.contains("Case not found"));
    assert!(stderr.contains("1 of 2 deletions failed"));
}
