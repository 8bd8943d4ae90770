pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::cli::client::GatewayClient;

#[derive(Parser)]
#[command(name = "persona")]
#[command(about = "Persona CLI - operator interface for the Persona API gateway")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, env = "PERSONA_URL", default_value = "http://localhost:3000", help = "Gateway base URL")]
    pub url: String,

    #[arg(long, global = true, env = "PERSONA_TOKEN", hide_env_values = true, help = "Access token sent as the session cookie")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Gateway health and session status")]
    Status,

    #[command(about = "Read and write feature settings")]
    Settings {
        #[command(subcommand)]
        cmd: commands::settings::SettingsCommands,
    },

    #[command(about = "Revenue summary (admin)")]
    Revenue {
        #[arg(long, help = "All-time revenue and order count instead of the current month")]
        lifetime: bool,
    },

    #[command(about = "Recent activity feed (admin)")]
    Activity {
        #[arg(long, help = "Number of events to show")]
        limit: Option<u32>,
    },

    #[command(about = "Database maintenance scripts (admin)")]
    Maintenance {
        #[command(subcommand)]
        cmd: commands::maintenance::MaintenanceCommands,
    },

    #[command(about = "Local development tokens")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = GatewayClient::new(&cli.url, cli.token.clone())?;

    match cli.command {
        Commands::Status => commands::status::handle(&client, output_format).await,
        Commands::Settings { cmd } => commands::settings::handle(cmd, &client, output_format).await,
        Commands::Revenue { lifetime } => commands::revenue::handle(lifetime, &client, output_format).await,
        Commands::Activity { limit } => commands::activity::handle(limit, &client, output_format).await,
        Commands::Maintenance { cmd } => commands::maintenance::handle(cmd, &client, output_format).await,
        Commands::Token { cmd } => commands::token::handle(cmd, output_format),
    }
}
