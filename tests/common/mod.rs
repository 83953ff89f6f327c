#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use complaints_api::config::AppConfig;
use complaints_api::database::models::Role;
use complaints_api::database::Store;
use complaints_api::services::Registration;
use complaints_api::{app, AppState};

pub const PASSWORD: &str = "Str0ng!Pass";

static NATIONAL_IDS: AtomicU64 = AtomicU64::new(1_000_000_000_000_000);

/// Unique 16-digit national id for fixtures.
pub fn national_id() -> String {
    NATIONAL_IDS.fetch_add(1, Ordering::Relaxed).to_string()
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.server.host = "127.0.0.1".into();
    config.security.jwt_secret = "integration-test-secret".into();
    config.security.cors_origins = Vec::new();
    config
}

/// The real router over the memory store, served on a free local port.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
    client: reqwest::Client,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with(test_config()).await
    }

    pub async fn start_with(mut config: AppConfig) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        config.server.port = port;
        let base_url = format!("http://127.0.0.1:{}", port);

        let state = AppState::new(config, Store::memory(), None);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let router = app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            port,
            base_url,
            state,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(token)
    }

    pub fn post(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(token)
    }

    pub fn put(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.put(self.url(path)).bearer_auth(token)
    }

    pub fn delete(&self, path: &str, token: &str) -> RequestBuilder {
        self.client.delete(self.url(path)).bearer_auth(token)
    }

    pub fn anonymous(&self) -> &reqwest::Client {
        &self.client
    }

    /// Registers through the public endpoint and returns the response body.
    pub async fn register(&self, email: &str) -> Result<(StatusCode, Value)> {
        let res = self
            .client
            .post(self.url("/auth/register"))
            .json(&json!({
                "email": email,
                "full_name": "Test Citizen",
                "phone_number": "0788123456",
                "national_id": national_id(),
                "password": PASSWORD,
            }))
            .send()
            .await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/auth/token"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login for {} failed: {}", email, res.status());
        let body: Value = res.json().await?;
        body["data"]["access_token"]
            .as_str()
            .map(str::to_string)
            .context("token response without access_token")
    }

    /// Creates an account of any role directly through the service and signs it in.
    pub async fn seed(&self, role: Role, email: &str) -> Result<(Uuid, String)> {
        let account = self
            .state
            .accounts
            .register(
                Registration {
                    email: email.into(),
                    full_name: format!("Seeded {}", role),
                    phone_number: "0788000000".into(),
                    national_id: national_id(),
                    password: PASSWORD.into(),
                },
                role,
            )
            .await?;
        let token = self.login(email, PASSWORD).await?;
        Ok((account.id, token))
    }

    pub async fn create_agency(&self, admin_token: &str, name: &str, agency_admin: Uuid) -> Result<Uuid> {
        let res = self
            .post("/api/agencies", admin_token)
            .json(&json!({
                "name": name,
                "description": format!("{} agency", name),
                "contact_email": "agency@example.gov",
                "contact_phone": "0788111111",
                "admin_id": agency_admin,
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create agency failed: {}", res.status());
        let body: Value = res.json().await?;
        data_id(&body)
    }

    pub async fn file_complaint(&self, token: &str, title: &str) -> Result<Uuid> {
        let res = self
            .post("/api/complaints", token)
            .json(&json!({
                "title": title,
                "description": "Something is broken",
                "category": "roads",
                "priority": 2,
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "file complaint failed: {}", res.status());
        let body: Value = res.json().await?;
        data_id(&body)
    }
}

pub fn data_id(body: &Value) -> Result<Uuid> {
    let id = body["data"]["id"].as_str().context("response without data.id")?;
    Ok(id.parse()?)
}
