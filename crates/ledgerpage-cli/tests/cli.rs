//! CLI tests against a mock ledger service.
//!
//! Every test gets its own HOME so stored sessions never leak between tests
//! or into the developer's real data directory.

mod common;

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::*;

/// Serves two overlapping listing pages and metadata for token 5.
async fn mock_listings(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rpc/getListings"))
        .and(query_param("cursor", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"tokenId": 2, "price": 200000000},
                {"tokenId": 5, "price": 1}
            ],
            "total": 3,
            "hasMore": false
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rpc/getListings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"tokenId": 1, "price": 100000000},
                {"tokenId": 2, "price": 200000000}
            ],
            "nextCursor": 2,
            "total": 3,
            "hasMore": true
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rpc/getAssetMetadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "assets": [{
                "tokenId": 5,
                "attributes": [
                    ["name", {"Text": "Station 5"}],
                    ["location", {"Text": "Seoul"}],
                    ["chargerCount", {"Nat": 4}]
                ]
            }]
        })))
        .mount(server)
        .await;
}

#[test]
fn test_login_whoami_logout() {
    let home = TempDir::new().unwrap();
    let service = "http://127.0.0.1:4943";

    login(home.path(), service);

    let stdout = run_cli_with_env_success(&["whoami"], home.path(), service);
    assert!(stdout.contains(ACCOUNT));
    assert!(stdout.contains("127.0.0.1:4943"));
    assert!(stdout.contains("Page size: 20"));

    let stdout = run_cli_with_env_success(&["logout"], home.path(), service);
    assert!(stdout.contains("Logged out"));

    let stderr = run_cli_with_env_failure(&["whoami"], home.path(), service);
    assert!(stderr.contains("No active session"));
}

#[cfg(unix)]
#[test]
fn test_session_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let home = TempDir::new().unwrap();
    login(home.path(), "http://127.0.0.1:4943");

    let file = home.path().join("data/ledgerpage/session.json");
    let mode = std::fs::metadata(&file).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_login_rejects_invalid_input() {
    let home = TempDir::new().unwrap();

    let stderr = run_cli_with_env_failure(
        &["login", "--account", "not valid"],
        home.path(),
        "http://127.0.0.1:4943",
    );
    assert!(stderr.contains("Invalid account"));

    let stderr = run_cli_with_env_failure(
        &["login", "--account", ACCOUNT],
        home.path(),
        "http://ledger.example.com",
    );
    assert!(stderr.contains("Invalid service URL"));

    let stderr = run_cli_with_env_failure(
        &["login", "--account", ACCOUNT, "--page-size", "0"],
        home.path(),
        "http://127.0.0.1:4943",
    );
    assert!(stderr.contains("Invalid page size"));
}

#[test]
fn test_listings_requires_login() {
    let home = TempDir::new().unwrap();
    let stderr = run_cli_with_env_failure(&["listings"], home.path(), "http://127.0.0.1:4943");
    assert!(stderr.contains("No active session"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_listings_json_merges_pages_and_metadata() {
    let server = MockServer::start().await;
    mock_listings(&server).await;
    let home = TempDir::new().unwrap();
    let service = server.uri();

    login(home.path(), &service);
    let stdout = run_cli_with_env_success(
        &["listings", "--pages", "5", "--json"],
        home.path(),
        &service,
    );

    let output: Value = serde_json::from_str(stdout.trim()).unwrap();
    let items = output["items"].as_array().unwrap();
    let ids: Vec<u64> = items
        .iter()
        .map(|item| item["record"]["tokenId"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 5]);

    assert_eq!(items[0]["metadata"]["location"], "loading");
    assert_eq!(items[0]["metadata"]["resolved"], false);
    assert_eq!(items[2]["metadata"]["resolved"], true);
    assert_eq!(items[2]["metadata"]["location"], "Seoul");
    assert_eq!(output["hasMore"], false);
    assert_eq!(output["summary"]["listings"], 3);
    assert_eq!(output["summary"]["chargers"], 4);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_listings_stops_after_requested_pages() {
    let server = MockServer::start().await;
    mock_listings(&server).await;
    let home = TempDir::new().unwrap();
    let service = server.uri();

    login(home.path(), &service);
    let output = run_cli_with_env(&["listings"], home.path(), &service);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("#1"));
    assert!(stdout.contains("#2"));
    assert!(!stdout.contains("#5"));
    assert!(stdout.contains("Listings: 2 of 3"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("More listings available"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_revenue_table() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rpc/getUserRevenueTransactions"))
        .and(query_param("account", ACCOUNT))
        .and(query_param("cursor", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"recordId": 1, "tokenId": 5, "amount": 150000000, "distributedAt": 1700000000000000000u64},
                {"recordId": 2, "tokenId": 5, "amount": 1, "distributedAt": 1700000060000000000u64}
            ],
            "hasMore": false
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rpc/getAssetMetadata"))
        .and(query_param("ids", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "assets": [{"tokenId": 5, "attributes": [["location", {"Text": "Seoul"}]]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let service = server.uri();

    login(home.path(), &service);
    let stdout = run_cli_with_env_success(&["revenue"], home.path(), &service);

    assert!(stdout.contains("Seoul"));
    assert!(stdout.contains("2023-11-14"));
    assert!(stdout.contains("Total: 1.50000001"));
    assert!(stdout.contains("Records: 2 of 2"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_revenue_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rpc/getUserRevenueTransactions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "InternalError",
            "message": "ledger unavailable"
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let service = server.uri();

    login(home.path(), &service);
    let stderr = run_cli_with_env_failure(&["revenue"], home.path(), &service);

    assert!(stderr.contains("Failed to fetch page"));
}
