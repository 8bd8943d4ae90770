use clap::Subcommand;
use serde_json::json;

use crate::cli::client::GatewayClient;
use crate::cli::utils::{output_success, output_value, parse_scalar};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum SettingsCommands {
    #[command(about = "Read a setting (falls back to its default)")]
    Get {
        #[arg(help = "Setting key, e.g. subscriptions_enabled")]
        key: String,
    },

    #[command(about = "Write a setting (admin)")]
    Set {
        #[arg(help = "Setting key")]
        key: String,
        #[arg(help = "Scalar value: true, false, a number, null or text")]
        value: String,
    },
}

pub async fn handle(cmd: SettingsCommands, client: &GatewayClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SettingsCommands::Get { key } => {
            let body = client.get(&format!("/settings/{}", key)).await?;
            let value = body.get("value").cloned().unwrap_or_default();
            output_value(&output_format, &json!({ "key": key, "value": value }))
        }
        SettingsCommands::Set { key, value } => {
            let saved = client
                .put(&format!("/api/admin/settings/{}", key), json!({ "value": parse_scalar(&value) }))
                .await?;
            output_success(
                &output_format,
                &format!("Setting '{}' updated", key),
                Some(saved),
            )
        }
    }
}
