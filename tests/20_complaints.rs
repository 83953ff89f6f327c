mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{data_id, TestServer};
use complaints_api::database::models::Role;

#[tokio::test]
async fn filing_forces_owner_and_workflow_fields() -> Result<()> {
    let server = TestServer::start().await?;
    let (citizen_id, citizen) = server.seed(Role::Citizen, "citizen@example.com").await?;

    let res = server
        .post("/api/complaints", &citizen)
        .json(&json!({
            "title": "Streetlight out",
            "description": "Dark corner at night",
            "category": "lighting",
            "owner_id": Uuid::new_v4(),
            "agency_id": Uuid::new_v4(),
            "status": "resolved",
            "resolved_at": "2024-01-01T00:00:00Z",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await?;
    let complaint = &body["data"];
    assert_eq!(complaint["owner_id"], citizen_id.to_string());
    assert_eq!(complaint["status"], "pending");
    assert_eq!(complaint["priority"], 1);
    assert!(complaint["agency_id"].is_null());
    assert!(complaint["resolved_at"].is_null());
    Ok(())
}

#[tokio::test]
async fn invalid_complaint_is_rejected() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, citizen) = server.seed(Role::Citizen, "citizen@example.com").await?;

    let res = server
        .post("/api/complaints", &citizen)
        .json(&json!({ "title": "", "description": "x", "category": "roads", "priority": 9 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["field_errors"].get("title").is_some());
    assert!(body["field_errors"].get("priority").is_some());
    Ok(())
}

#[tokio::test]
async fn citizens_only_see_their_own_complaints() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, alice) = server.seed(Role::Citizen, "alice@example.com").await?;
    let (_, bob) = server.seed(Role::Citizen, "bob@example.com").await?;
    let (_, admin) = server.seed(Role::SystemAdmin, "root@example.com").await?;

    let alices = server.file_complaint(&alice, "Alice's pothole").await?;
    server.file_complaint(&bob, "Bob's pothole").await?;

    let body: Value = server.get("/api/complaints", &alice).send().await?.json().await?;
    let listed = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], alices.to_string());

    let body: Value = server.get("/api/complaints", &admin).send().await?.json().await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let res = server.get(&format!("/api/complaints/{}", alices), &bob).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .put(&format!("/api/complaints/{}", alices), &bob)
        .json(&json!({ "title": "hijacked" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .post(&format!("/api/complaints/{}/responses", alices), &bob)
        .json(&json!({ "message": "me too" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn concealed_foreign_complaints_look_missing() -> Result<()> {
    let mut config = common::test_config();
    config.security.conceal_foreign_complaints = true;
    let server = TestServer::start_with(config).await?;
    let (_, alice) = server.seed(Role::Citizen, "alice@example.com").await?;
    let (_, bob) = server.seed(Role::Citizen, "bob@example.com").await?;

    let id = server.file_complaint(&alice, "Private").await?;
    let res = server.get(&format!("/api/complaints/{}", id), &bob).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn list_filters_and_pagination() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, citizen) = server.seed(Role::Citizen, "citizen@example.com").await?;

    for title in ["one", "two", "three"] {
        server.file_complaint(&citizen, title).await?;
    }
    let id = server.file_complaint(&citizen, "four").await?;
    server
        .put(&format!("/api/complaints/{}/status", id), &citizen)
        .json(&json!({ "status": "closed" }))
        .send()
        .await?;

    let body: Value = server
        .get("/api/complaints?status=closed", &citizen)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let body: Value = server
        .get("/api/complaints?skip=1&limit=2", &citizen)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let body: Value = server
        .get("/api/complaints?category=lighting", &citizen)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn resolving_stamps_resolved_at() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, citizen) = server.seed(Role::Citizen, "citizen@example.com").await?;
    let id = server.file_complaint(&citizen, "Leaking pipe").await?;

    let res = server
        .put(&format!("/api/complaints/{}/status", id), &citizen)
        .json(&json!({ "status": "resolved" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["status"], "resolved");
    let resolved_at = body["data"]["resolved_at"].clone();
    assert!(!resolved_at.is_null());

    // Reopening keeps the earlier timestamp.
    let body: Value = server
        .put(&format!("/api/complaints/{}", id), &citizen)
        .json(&json!({ "status": "pending", "priority": 4 }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["priority"], 4);
    assert_eq!(body["data"]["resolved_at"], resolved_at);
    Ok(())
}

#[tokio::test]
async fn responses_are_attributed_to_the_caller() -> Result<()> {
    let server = TestServer::start().await?;
    let (citizen_id, citizen) = server.seed(Role::Citizen, "citizen@example.com").await?;
    let (admin_id, admin) = server.seed(Role::SystemAdmin, "root@example.com").await?;
    let id = server.file_complaint(&citizen, "Noise").await?;

    let res = server
        .post(&format!("/api/complaints/{}/responses", id), &admin)
        .json(&json!({ "message": "We are on it" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["responder_id"], admin_id.to_string());
    data_id(&body)?;

    server
        .post(&format!("/api/complaints/{}/responses", id), &citizen)
        .json(&json!({ "message": "Thanks" }))
        .send()
        .await?;

    let body: Value = server
        .get(&format!("/api/complaints/{}/responses", id), &citizen)
        .send()
        .await?
        .json()
        .await?;
    let responses = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["message"], "We are on it");
    assert_eq!(responses[1]["responder_id"], citizen_id.to_string());

    let res = server
        .get(&format!("/api/complaints/{}/responses", Uuid::new_v4()), &citizen)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
