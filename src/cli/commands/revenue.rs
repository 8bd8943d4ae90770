use crate::cli::client::GatewayClient;
use crate::cli::utils::output_value;
use crate::cli::OutputFormat;

pub async fn handle(lifetime: bool, client: &GatewayClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let path = if lifetime {
        "/api/admin/revenue-summary/lifetime"
    } else {
        "/api/admin/revenue-summary"
    };
    let summary = client.get(path).await?;
    output_value(&output_format, &summary)
}
