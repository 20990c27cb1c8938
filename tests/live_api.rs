//! Tests against a running server (default config, memory storage)

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8000";

fn url(path: &str) -> String {
    format!("{}{}", BASE_URL, path)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(url("/health"))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(url("/livros"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("www-authenticate"));
}

#[tokio::test]
#[ignore]
async fn test_invalid_credentials() {
    let client = Client::new();

    let response = client
        .get(url("/livros"))
        .basic_auth("admin", Some("wrong"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_book_lifecycle() {
    let client = Client::new();
    // High id to stay clear of anything created by hand
    let id = 987_001;

    let response = client
        .post(url("/addlivros"))
        .basic_auth("admin", Some("admin123"))
        .json(&json!({"id": id, "titulo": "Dune", "autor": "Herbert", "ano": 1965}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(url("/addlivros"))
        .basic_auth("admin", Some("admin123"))
        .json(&json!({"id": id, "titulo": "Dune", "autor": "Herbert", "ano": 1965}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .put(url(&format!("/atualizarlivros/{}", id)))
        .basic_auth("admin", Some("admin123"))
        .json(&json!({"titulo": "Dune Messiah", "autor": "Herbert", "ano": 1969}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(url("/livros?limit=100&sort_by=ano&sort_desc=true"))
        .basic_auth("admin", Some("admin123"))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["livros"].is_array());
    assert!(body["total"].as_i64().unwrap_or(0) >= 1);

    let response = client
        .delete(url(&format!("/deletarlivros/{}", id)))
        .basic_auth("admin", Some("admin123"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
}
