use serde_json::json;

use crate::cli::client::GatewayClient;
use crate::cli::utils::output_value;
use crate::cli::OutputFormat;

pub async fn handle(client: &GatewayClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let (health_status, health) = client.get_with_status("/health").await?;
    let auth = client.get("/auth/status").await?;

    let identity = if client.has_token() {
        match client.get_with_status("/api/me").await? {
            (status, body) if status.is_success() => body,
            (status, _) => json!({ "error": format!("token rejected ({})", status.as_u16()) }),
        }
    } else {
        serde_json::Value::Null
    };

    let summary = json!({
        "server": client.base().as_str(),
        "health": health.get("status").cloned().unwrap_or_else(|| json!(health_status.as_u16())),
        "database": health.get("database").cloned().unwrap_or(serde_json::Value::Null),
        "authenticated": auth.get("authenticated").cloned().unwrap_or(json!(false)),
        "user": identity,
    });

    output_value(&output_format, &summary)
}
