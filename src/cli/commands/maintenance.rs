use clap::Subcommand;

use crate::cli::client::GatewayClient;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum MaintenanceCommands {
    #[command(about = "Apply a maintenance script by name (e.g. fix_rls_policies)")]
    Run {
        #[arg(help = "Script name without the .sql extension")]
        script: String,
    },
}

pub async fn handle(cmd: MaintenanceCommands, client: &GatewayClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        MaintenanceCommands::Run { script } => {
            let run = client.post(&format!("/api/admin/maintenance/{}", script)).await?;
            let previous = run.get("previousRuns").and_then(|v| v.as_i64()).unwrap_or(0);
            let message = if previous > 0 {
                format!("Re-applied '{}' ({} earlier runs)", script, previous)
            } else {
                format!("Applied '{}'", script)
            };
            output_success(&output_format, &message, Some(run))
        }
    }
}
