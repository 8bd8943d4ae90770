mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_reports_degraded_without_database() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = reqwest::get(server.url("/health")).await?;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "degraded");
    Ok(())
}

#[tokio::test]
async fn root_describes_service() -> Result<()> {
    let server = common::ensure_server().await?;
    let body = reqwest::get(server.url("/")).await?.json::<Value>().await?;
    assert_eq!(body["name"], "persona-api");
    Ok(())
}

#[tokio::test]
async fn auth_status_accepts_refresh_cookie_only() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(server.url("/auth/status"))
        .header("cookie", "sb-refresh-token=opaque-refresh")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "authenticated": true }));

    let res = client.get(server.url("/auth/status")).send().await?;
    assert_eq!(res.json::<Value>().await?, json!({ "authenticated": false }));
    Ok(())
}

#[tokio::test]
async fn settings_fail_open_without_database() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::get(server.url("/settings/subscriptions_enabled")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "value": true }));

    let res = reqwest::get(server.url("/settings/maintenance_banner")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "value": false }));
    Ok(())
}
