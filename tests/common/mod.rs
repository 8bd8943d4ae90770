#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use persona_api::auth::{issue_access_token, Claims};
use persona_api::config::AppConfig;
use reqwest::StatusCode;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-test-secret";
pub const ADMIN_ROLE: &str = "service_role";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // No database: data routes must degrade, public routes must keep answering.
        // Explicit empty values win over anything a local .env would supply.
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_persona-api"));
        cmd.env("PERSONA_API_PORT", port.to_string())
            .env("APP_ENV", "development")
            .env("DATABASE_URL", "")
            .env("AUTH_JWT_SECRET", JWT_SECRET)
            .env("AUTH_JWT_AUDIENCE", "")
            .env("AUTH_ADMIN_ROLE", ADMIN_ROLE)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Sign a token the spawned server will accept.
pub fn token(role: Option<&str>) -> String {
    let mut config = AppConfig::development();
    config.auth.jwt_secret = JWT_SECRET.to_string();
    config.auth.jwt_audience = None;
    let claims = Claims::new(Uuid::new_v4(), Some("ops@persona.test".to_string()), role.map(str::to_string), &config.auth);
    issue_access_token(&claims, &config.auth).expect("sign token")
}

pub fn session_cookie(token: &str) -> String {
    format!("sb-access-token={}", token)
}
