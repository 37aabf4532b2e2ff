#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;

use sokol_admin::auth::{generate_jwt, Claims};
use sokol_admin::database::{MemoryStore, SeedData};
use sokol_admin::{router, AppState};

pub const JWT_SECRET: &str = "integration-test-secret";

const SEED: &str = r#"
programs:
  - { id: p1, name: Gimnastika }
  - { id: p2, name: Atletika }
locations:
  - { id: l1, name: Dvorana Sokol }
  - { id: l2, name: Gradski stadion }
members:
  - { id: m1, name: Ana Horvat }
  - { id: m2, name: Boris Babić }
  - { id: m3, name: Ivana Anić }
"#;

/// An API server on a free port, backed by a freshly seeded in-memory store.
/// Each test gets its own so group ids and counts never leak between tests.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let seed = SeedData::from_yaml(SEED)?;
        let state = AppState::new(Arc::new(MemoryStore::with_seed(seed)), JWT_SECRET);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        tokio::spawn(async move {
            let _ = axum::serve(listener, router(state)).await;
        });

        let server = Self {
            port,
            base_url,
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

    /// Bearer token for a staff user, signed with the server's secret
    pub fn token(&self) -> String {
        generate_jwt(&Claims::new("staff-1", 1), JWT_SECRET).expect("token")
    }

    /// Create a group through the API and return its id
    pub async fn create_group(&self, body: Value) -> Result<String> {
        let res = self
            .client
            .post(self.url("/groups"))
            .bearer_auth(self.token())
            .json(&body)
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "create failed: {}", res.status());

        let body = res.json::<Value>().await?;
        body["data"]["id"]
            .as_str()
            .map(str::to_string)
            .context("created group has no id")
    }

    pub async fn get_group(&self, id: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.get(self.url(&format!("/groups/{}", id))).send().await?;
        let status = res.status();
        Ok((status, res.json::<Value>().await?))
    }
}

pub fn member_ids(group: &Value) -> Vec<String> {
    group["members"]
        .as_array()
        .map(|members| {
            members
                .iter()
                .filter_map(|m| m["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
