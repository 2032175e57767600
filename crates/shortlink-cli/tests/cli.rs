//! CLI tests against a mock backend.

mod common;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{run, run_failure, run_success};

fn envelope(data: serde_json::Value) -> serde_json::Value {
    json!({"status": "success", "message": "ok", "data": data})
}

fn short_url(id: u64, code: &str) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": 1,
        "title": "Docs",
        "long_url": "https://docs.rs/",
        "short_code": code,
        "clicks": 4,
        "createdAt": "2025-03-01T10:00:00.000Z",
        "updatedAt": "2025-03-01T10:00:00.000Z"
    })
}

async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"username": "ada", "password": "secret123"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(json!({"access_token": token}))),
        )
        .mount(server)
        .await;
}

async fn login(home: &std::path::Path, backend: &str) {
    run_success(
        &["auth", "login", "--username", "ada", "--password", "secret123"],
        home,
        backend,
    )
    .await;
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_login_status_logout() {
    let server = MockServer::start().await;
    mount_login(&server, "T1").await;
    let home = TempDir::new().unwrap();

    let stdout = run_success(&["auth", "status"], home.path(), &server.uri()).await;
    assert!(stdout.contains("Logged in: no"));

    let stdout = run_success(
        &["auth", "login", "--username", "ada", "--password", "secret123"],
        home.path(),
        &server.uri(),
    )
    .await;
    assert!(stdout.contains("Logged in successfully"));

    let stdout = run_success(&["auth", "status"], home.path(), &server.uri()).await;
    assert!(stdout.contains("Logged in: yes"));

    let stdout = run_success(&["auth", "logout"], home.path(), &server.uri()).await;
    assert!(stdout.contains("Logged out"));

    let stdout = run_success(&["auth", "status"], home.path(), &server.uri()).await;
    assert!(stdout.contains("Logged in: no"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();

    let stderr = run_failure(
        &["auth", "login", "--username", "ada", "--password", "nope"],
        home.path(),
        &server.uri(),
    )
    .await;
    assert!(stderr.contains("Invalid credentials"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_register_validates_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();

    let stderr = run_failure(
        &[
            "auth",
            "register",
            "--username",
            "ada",
            "--email",
            "ada@example.com",
            "--password",
            "secret123",
            "--confirm-password",
            "secret124",
        ],
        home.path(),
        &server.uri(),
    )
    .await;
    assert!(stderr.contains("Passwords do not match"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_register() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "username": "ada",
            "email": "ada@example.com",
            "password": "secret123"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!({"id": 1}))))
        .expect(1)
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();

    let stdout = run_success(
        &[
            "auth",
            "register",
            "--username",
            "ada",
            "--email",
            "ada@example.com",
            "--password",
            "secret123",
        ],
        home.path(),
        &server.uri(),
    )
    .await;
    assert!(stdout.contains("Account created"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_with_handed_over_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dashboard"))
        .and(header("authorization", "Bearer T-handoff"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "username": "ada",
            "totalLinks": 3,
            "totalClicks": 9
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let stdout = run_success(
        &["auth", "login", "--token", "T-handoff"],
        home.path(),
        &server.uri(),
    )
    .await;
    assert!(stdout.contains("Logged in successfully"));
    assert!(!stdout.contains("Username"));

    run_success(&["links", "dashboard"], home.path(), &server.uri()).await;

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/auth/login"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_needs_password_or_token() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();

    let stderr = run_failure(
        &["auth", "login", "--username", "ada"],
        home.path(),
        &server.uri(),
    )
    .await;
    assert!(stderr.contains("--password"));

    let stderr = run_failure(
        &["auth", "login", "--token", "T1", "--username", "ada"],
        home.path(),
        &server.uri(),
    )
    .await;
    assert!(stderr.contains("cannot be used with"));

    assert!(server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Token refresh
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_token_is_refreshed_and_persisted() {
    let server = MockServer::start().await;
    mount_login(&server, "T1").await;

    Mock::given(method("GET"))
        .and(path("/urls"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "T2"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/urls"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([short_url(1, "abc")]))))
        .expect(2)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    login(home.path(), &server.uri()).await;

    let stdout = run_success(&["links", "list"], home.path(), &server.uri()).await;
    assert!(stdout.contains("/l/abc"));

    // The refreshed token was persisted, so no second refresh happens.
    let stdout = run_success(&["links", "list"], home.path(), &server.uri()).await;
    assert!(stdout.contains("/l/abc"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_session_cookie_survives_invocations() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "sid=abc; Path=/; HttpOnly")
                .set_body_json(envelope(json!({"access_token": "T1"}))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/urls"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .and(header("cookie", "sid=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "T2"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/urls"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([short_url(1, "abc")]))))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    login(home.path(), &server.uri()).await;

    let stdout = run_success(&["links", "list"], home.path(), &server.uri()).await;
    assert!(stdout.contains("/l/abc"));

    let stdout = run_success(&["auth", "status"], home.path(), &server.uri()).await;
    assert!(stdout.contains("Logged in: yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_refresh_logs_out() {
    let server = MockServer::start().await;
    mount_login(&server, "T1").await;

    Mock::given(method("GET"))
        .and(path("/dashboard"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    login(home.path(), &server.uri()).await;

    let stderr = run_failure(&["links", "dashboard"], home.path(), &server.uri()).await;
    assert!(stderr.contains("Authentication failed. Please log in again."));
    assert!(stderr.contains("shortlink auth login"));

    let stdout = run_success(&["auth", "status"], home.path(), &server.uri()).await;
    assert!(stdout.contains("Logged in: no"));
}

// ============================================================================
// Links
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_shorten() {
    let server = MockServer::start().await;
    mount_login(&server, "T1").await;

    Mock::given(method("POST"))
        .and(path("/shorten"))
        .and(header("authorization", "Bearer T1"))
        .and(body_json(json!({
            "url": "https://docs.rs/",
            "title": "Docs",
            "customAlias": "docs"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(short_url(9, "docs"))))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    login(home.path(), &server.uri()).await;

    let stdout = run_success(
        &[
            "links",
            "shorten",
            "https://docs.rs/",
            "--title",
            "Docs",
            "--alias",
            "docs",
        ],
        home.path(),
        &server.uri(),
    )
    .await;
    assert!(stdout.contains("Short link created"));
    assert!(stdout.contains(&format!("{}/l/docs", server.uri())));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_shorten_rejects_bad_url_locally() {
    let server = MockServer::start().await;
    let home = TempDir::new().unwrap();

    let output = run(&["links", "shorten", "not a url"], home.path(), &server.uri()).await;
    assert!(!output.status.success());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_json() {
    let server = MockServer::start().await;
    mount_login(&server, "T1").await;

    Mock::given(method("GET"))
        .and(path("/urls"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "2"))
        .and(query_param("sort", "clicks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            short_url(1, "a"),
            short_url(2, "b"),
            short_url(3, "c")
        ]))))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    login(home.path(), &server.uri()).await;

    let stdout = run_success(
        &["links", "list", "--limit", "2", "--sort", "clicks", "--json"],
        home.path(),
        &server.uri(),
    )
    .await;
    let page: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(page["total_items"], 3);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["urls"][2]["short_code"], "c");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dashboard_and_analytics() {
    let server = MockServer::start().await;
    mount_login(&server, "T1").await;

    Mock::given(method("GET"))
        .and(path("/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "username": "ada",
            "totalLinks": 1,
            "totalClicks": 4,
            "averageClicksPerLink": 4,
            "latestURLs": [short_url(1, "abc")]
        }))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/analytics/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(short_url(1, "abc"))))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    login(home.path(), &server.uri()).await;

    let stdout = run_success(&["links", "dashboard"], home.path(), &server.uri()).await;
    assert!(stdout.contains("Welcome back, ada"));
    assert!(stdout.contains("Clicks per link: 4.0"));

    let stdout = run_success(&["links", "analytics", "1"], home.path(), &server.uri()).await;
    assert!(stdout.contains("Clicks: 4"));
    assert!(stdout.contains("Destination: https://docs.rs/"));
}
