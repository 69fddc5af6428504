//! API integration tests against a running server

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3001/api";
const HEALTH_URL: &str = "http://localhost:3001/health";

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

/// Helper to register a fresh user and get a token
async fn get_auth_token(client: &Client) -> String {
    let suffix = unique_suffix();
    let username = format!("tester{}", suffix);

    let response = client
        .post(format!("{}/register", BASE_URL))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "secret123"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "secret123"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to create a book with the given quantity
async fn create_book(client: &Client, token: &str, quantity: i32) -> i64 {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "title": "Integration Book",
            "author": "Integration Author",
            "isbn": format!("IT{}", unique_suffix() % 1_000_000_000_000),
            "quantity": quantity,
            "category": "Testing"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No id in response")
}

async fn book_quantity(client: &Client, token: &str, book_id: i64) -> i64 {
    let body: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    body["quantity"].as_i64().expect("No quantity in response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(HEALTH_URL)
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    assert!(!token.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({
            "username": "nobody-at-all",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/lending", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_lend_return_cycle() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let book_id = create_book(&client, &token, 2).await;

    let response = client
        .post(format!("{}/lending/lend", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "book_id": book_id, "borrower": "bob" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let record: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(record["borrower"], "bob");
    assert!(record["return_date"].is_null());
    assert_eq!(book_quantity(&client, &token, book_id).await, 1);

    let record_id = record["id"].as_i64().unwrap();
    let response = client
        .post(format!("{}/lending/return/{}", BASE_URL, record_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    assert_eq!(book_quantity(&client, &token, book_id).await, 2);

    let response = client
        .post(format!("{}/lending/return/{}", BASE_URL, record_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book already returned");
    assert_eq!(book_quantity(&client, &token, book_id).await, 2);
}

#[tokio::test]
#[ignore]
async fn test_lend_out_of_stock() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let book_id = create_book(&client, &token, 0).await;

    let response = client
        .post(format!("{}/lending/lend", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "book_id": book_id, "borrower": "alice" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book is currently out of stock");
}

#[tokio::test]
#[ignore]
async fn test_delete_open_record_restores_quantity() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let book_id = create_book(&client, &token, 5).await;

    let record: Value = client
        .post(format!("{}/lending/lend", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "book_id": book_id, "borrower": "carol" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(book_quantity(&client, &token, book_id).await, 4);

    let response = client
        .delete(format!("{}/lending/{}", BASE_URL, record["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    assert_eq!(book_quantity(&client, &token, book_id).await, 5);

    let response = client
        .delete(format!("{}/lending/{}", BASE_URL, record["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_analytics_endpoints() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    for path in [
        "analytics/most-borrowed?limit=5",
        "analytics/monthly-trends",
        "analytics/category-distribution",
    ] {
        let response = client
            .get(format!("{}/{}", BASE_URL, path))
            .bearer_auth(&token)
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success(), "{} failed", path);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert!(body.is_array());
    }
}
