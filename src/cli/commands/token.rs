use anyhow::Context;
use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{issue_access_token, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Sign an access token with the local AUTH_JWT_SECRET")]
    Mint {
        #[arg(help = "Subject (user id); a random one when omitted")]
        subject: Option<Uuid>,
        #[arg(long, help = "Email claim")]
        email: Option<String>,
        #[arg(long, help = "Role claim (defaults to authenticated)")]
        role: Option<String>,
    },
}

pub fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Mint { subject, email, role } => {
            let auth = &config().auth;
            let subject = subject.unwrap_or_else(Uuid::new_v4);
            let claims = Claims::new(subject, email, role, auth);
            let token = issue_access_token(&claims, auth).context("failed to sign token")?;

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    "Token minted",
                    Some(json!({ "token": token, "subject": subject, "expires_at": claims.exp })),
                ),
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
    }
}
