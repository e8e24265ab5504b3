//! Integration tests for user endpoints.

mod common;

use axum::http::StatusCode;
use common::{TestServer, json_request};
use serde_json::json;
use warden_metadata::UserRepo;

const TEST_KEY: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA alice@host";

async fn create_user(server: &TestServer, token: &str, username: &str) -> serde_json::Value {
    let (status, body) = json_request(
        &server.router,
        "POST",
        "/v1/users",
        Some(json!({ "username": username, "public_key": TEST_KEY })),
        Some(token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn create_and_get_user() {
    let server = TestServer::new().await;
    let token = server.issue_token("admin");

    let created = create_user(&server, &token, "alice").await;
    let id = created.get("id").unwrap().as_str().unwrap();
    assert_eq!(created.get("username").unwrap().as_str(), Some("alice"));
    // The stored public key is not echoed back.
    assert!(created.get("public_key").is_none());

    let (status, body) = json_request(
        &server.router,
        "GET",
        &format!("/v1/users/{id}"),
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("username").unwrap().as_str(), Some("alice"));
}

#[tokio::test]
async fn get_user_by_username() {
    let server = TestServer::new().await;
    let token = server.issue_token("admin");

    let created = create_user(&server, &token, "alice").await;

    let (status, body) = json_request(
        &server.router,
        "GET",
        "/v1/users/by-username/alice",
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("id"), created.get("id"));
}

#[tokio::test]
async fn list_users_is_ordered_by_username() {
    let server = TestServer::new().await;
    let token = server.issue_token("admin");

    create_user(&server, &token, "carol").await;
    create_user(&server, &token, "alice").await;

    let (status, body) = json_request(&server.router, "GET", "/v1/users", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .get("users")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u.get("username").unwrap().as_str().unwrap())
        .collect();
    assert_eq!(names, ["alice", "carol"]);
}

#[tokio::test]
async fn update_user_changes_username_and_key() {
    let server = TestServer::new().await;
    let token = server.issue_token("admin");

    let created = create_user(&server, &token, "alice").await;
    let id = created.get("id").unwrap().as_str().unwrap();

    let (status, body) = json_request(
        &server.router,
        "PUT",
        &format!("/v1/users/{id}"),
        Some(json!({ "username": "alice2", "public_key": "ssh-ed25519 BBBB alice2@host" })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("username").unwrap().as_str(), Some("alice2"));

    let key = server
        .metadata()
        .get_public_key_by_username("alice2")
        .await
        .unwrap();
    assert_eq!(key.as_deref(), Some("ssh-ed25519 BBBB alice2@host"));
}

#[tokio::test]
async fn delete_user_removes_record() {
    let server = TestServer::new().await;
    let token = server.issue_token("admin");

    let created = create_user(&server, &token, "alice").await;
    let id = created.get("id").unwrap().as_str().unwrap();

    let (status, _) = json_request(
        &server.router,
        "DELETE",
        &format!("/v1/users/{id}"),
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = json_request(
        &server.router,
        "GET",
        &format!("/v1/users/{id}"),
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let server = TestServer::new().await;
    let token = server.issue_token("admin");

    create_user(&server, &token, "alice").await;
    let (status, _) = json_request(
        &server.router,
        "POST",
        "/v1/users",
        Some(json!({ "username": "alice", "public_key": TEST_KEY })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn missing_fields_are_validation_errors() {
    let server = TestServer::new().await;
    let token = server.issue_token("admin");

    let (status, body) = json_request(
        &server.router,
        "POST",
        "/v1/users",
        Some(json!({ "username": "", "public_key": TEST_KEY })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.get("code").and_then(|c| c.as_str()), Some("validation"));

    let (status, _) = json_request(
        &server.router,
        "POST",
        "/v1/users",
        Some(json!({ "username": "alice", "public_key": "  " })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_routes_are_gated() {
    let server = TestServer::new().await;

    let (status, _) = json_request(&server.router, "GET", "/v1/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = json_request(
        &server.router,
        "POST",
        "/v1/users",
        Some(json!({ "username": "alice", "public_key": TEST_KEY })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
