mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{national_id, TestServer, PASSWORD};
use complaints_api::database::models::Role;

#[tokio::test]
async fn assignment_checks_role_before_existence() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, admin) = server.seed(Role::SystemAdmin, "root@example.com").await?;
    let (roads_admin, roads) = server.seed(Role::AgencyAdmin, "roads@example.com").await?;
    let (_, citizen) = server.seed(Role::Citizen, "citizen@example.com").await?;
    let agency = server.create_agency(&admin, "Roads", roads_admin).await?;
    let complaint = server.file_complaint(&citizen, "Pothole").await?;

    // Non-admins are refused even for ids that do not exist.
    for token in [&citizen, &roads] {
        let res = server
            .put(&format!("/api/complaints/{}/assign", Uuid::new_v4()), token)
            .json(&json!({ "agency_id": Uuid::new_v4() }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    let res = server
        .put(&format!("/api/complaints/{}/assign", Uuid::new_v4()), &admin)
        .json(&json!({ "agency_id": agency }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server
        .put(&format!("/api/complaints/{}/assign", complaint), &admin)
        .json(&json!({ "agency_id": Uuid::new_v4() }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn account_listing_is_admin_only() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, admin) = server.seed(Role::SystemAdmin, "root@example.com").await?;
    server.seed(Role::AgencyAdmin, "roads@example.com").await?;
    let (_, citizen) = server.seed(Role::Citizen, "citizen@example.com").await?;

    let res = server.get("/api/admin/users", &citizen).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let body: Value = server.get("/api/admin/users", &admin).send().await?.json().await?;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(3));

    let body: Value = server
        .get("/api/admin/users?role=agency_admin", &admin)
        .send()
        .await?
        .json()
        .await?;
    let listed = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["email"], "roads@example.com");
    Ok(())
}

#[tokio::test]
async fn admins_create_accounts_of_any_role() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, admin) = server.seed(Role::SystemAdmin, "root@example.com").await?;
    let (_, citizen) = server.seed(Role::Citizen, "citizen@example.com").await?;

    let payload = json!({
        "email": "health@example.com",
        "full_name": "Health Admin",
        "phone_number": "0788333333",
        "national_id": national_id(),
        "password": PASSWORD,
        "role": "agency_admin",
    });

    let res = server.post("/api/admin/users", &citizen).json(&payload).send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server.post("/api/admin/users", &admin).json(&payload).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["role"], "agency_admin");

    let token = server.login("health@example.com", PASSWORD).await?;
    let res = server.get("/api/users/me", &token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Self-registration can never pick a role.
    let res = server
        .anonymous()
        .post(server.url("/auth/register"))
        .json(&json!({
            "email": "sneaky@example.com",
            "full_name": "Sneaky",
            "phone_number": "0788444444",
            "national_id": national_id(),
            "password": PASSWORD,
            "role": "system_admin",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["role"], "citizen");
    Ok(())
}

#[tokio::test]
async fn toggling_twice_reactivates() -> Result<()> {
    let server = TestServer::start().await?;
    let (_, admin) = server.seed(Role::SystemAdmin, "root@example.com").await?;
    let (citizen_id, _) = server.seed(Role::Citizen, "citizen@example.com").await?;
    let path = format!("/api/admin/users/{}/toggle-status", citizen_id);

    server.put(&path, &admin).send().await?;
    let body: Value = server.put(&path, &admin).send().await?.json().await?;
    assert_eq!(body["data"]["is_active"], true);

    server.login("citizen@example.com", PASSWORD).await?;

    let res = server
        .put(&format!("/api/admin/users/{}/toggle-status", Uuid::new_v4()), &admin)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
