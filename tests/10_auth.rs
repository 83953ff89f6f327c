mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{TestServer, PASSWORD};
use complaints_api::config::Environment;
use complaints_api::database::models::Role;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server.anonymous().get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["database"], "memory");
    Ok(())
}

#[tokio::test]
async fn register_login_and_whoami() -> Result<()> {
    let server = TestServer::start().await?;

    let (status, body) = server.register("Jane@Example.com").await?;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["email"], "jane@example.com");
    assert_eq!(body["data"]["role"], "citizen");
    assert!(body["data"].get("password_hash").is_none(), "hash leaked: {}", body);

    let token = server.login("jane@example.com", PASSWORD).await?;
    let res = server.get("/api/users/me", &token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let me: Value = res.json().await?;
    assert_eq!(me["data"]["email"], "jane@example.com");
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() -> Result<()> {
    let server = TestServer::start().await?;

    server.register("dup@example.com").await?;
    let (status, body) = server.register("DUP@example.com").await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
    Ok(())
}

#[tokio::test]
async fn invalid_registration_reports_every_field() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .anonymous()
        .post(server.url("/auth/register"))
        .json(&json!({
            "email": "not-an-email",
            "full_name": "  ",
            "phone_number": "0612345678",
            "national_id": "12345",
            "password": "weakpass",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    for field in ["email", "full_name", "phone_number", "national_id", "password"] {
        assert!(body["field_errors"].get(field).is_some(), "missing {} in {}", field, body);
    }
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() -> Result<()> {
    let server = TestServer::start().await?;
    server.register("citizen@example.com").await?;

    for (email, password) in [("citizen@example.com", "Wr0ng!Pass"), ("nobody@example.com", PASSWORD)] {
        let res = server
            .anonymous()
            .post(server.url("/auth/token"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() -> Result<()> {
    let server = TestServer::start().await?;
    server.register("citizen@example.com").await?;
    let token = server.login("citizen@example.com", PASSWORD).await?;

    let res = server.anonymous().get(server.url("/api/complaints")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let tampered = format!("{}x", token);
    let res = server.get("/api/complaints", &tampered).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], true);
    Ok(())
}

#[tokio::test]
async fn deactivated_account_is_locked_out() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, admin) = server.seed(Role::SystemAdmin, "root@example.com").await?;
    let (citizen_id, citizen) = server.seed(Role::Citizen, "citizen@example.com").await?;

    let res = server
        .put(&format!("/api/admin/users/{}/toggle-status", citizen_id), &admin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["is_active"], false);

    // The token is still well-formed but the account behind it is not active.
    let res = server.get("/api/users/me", &citizen).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .anonymous()
        .post(server.url("/auth/token"))
        .json(&json!({ "email": "citizen@example.com", "password": PASSWORD }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn cross_origin_open_in_development_only() -> Result<()> {
    let origin = "https://elsewhere.example";

    let server = TestServer::start().await?;
    let res = server
        .anonymous()
        .get(server.url("/health"))
        .header("Origin", origin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("access-control-allow-origin"));

    let mut config = common::test_config();
    config.environment = Environment::Production;
    let server = TestServer::start_with(config).await?;
    let res = server
        .anonymous()
        .get(server.url("/health"))
        .header("Origin", origin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(
        !res.headers().contains_key("access-control-allow-origin"),
        "production without origins allowed {}",
        origin
    );
    Ok(())
}
