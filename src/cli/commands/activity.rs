use serde_json::Value;

use crate::cli::client::GatewayClient;
use crate::cli::utils::{display_scalar, output_empty_collection, output_value};
use crate::cli::OutputFormat;

pub async fn handle(limit: Option<u32>, client: &GatewayClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let path = match limit {
        Some(limit) => format!("/api/admin/activity/recent?limit={}", limit),
        None => "/api/admin/activity/recent".to_string(),
    };
    let body = client.get(&path).await?;

    let events = body.get("activity").and_then(Value::as_array).cloned().unwrap_or_default();
    if events.is_empty() {
        return output_empty_collection(&output_format, "activity", "No recent activity");
    }

    match output_format {
        OutputFormat::Json => output_value(&output_format, &body),
        OutputFormat::Text => {
            for event in &events {
                let at = event.get("created_at").map(display_scalar).unwrap_or_default();
                let actor = event.get("actorName").map(display_scalar).unwrap_or_default();
                let kind = event
                    .get("event_type")
                    .or_else(|| event.get("kind"))
                    .map(display_scalar)
                    .unwrap_or_default();
                println!("{}  {:<24} {}", at, actor, kind);
            }
            Ok(())
        }
    }
}
