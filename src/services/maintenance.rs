use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::store::{DataStore, ScriptRun, StoreError};

/// A pre-authored SQL fix script, loaded from the scripts directory.
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceScript {
    pub name: String,
    pub sql: String,
    /// Hex SHA-256 of `sql`.
    pub checksum: String,
}

#[derive(Debug, Error)]
pub enum MaintenanceError {
    #[error("Invalid script name: {0}")]
    InvalidName(String),

    #[error("Script not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Script is empty: {0}")]
    Empty(String),

    #[error("Failed to apply script: {0}")]
    Apply(#[from] StoreError),
}

impl MaintenanceScript {
    pub fn new(name: impl Into<String>, sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let checksum = format!("{:x}", Sha256::digest(sql.as_bytes()));
        Self { name: name.into(), sql, checksum }
    }

    /// Load `<dir>/<name>.sql`. Names are restricted so a caller can never
    /// reach outside `dir`.
    pub async fn locate(dir: &Path, name: &str) -> Result<Self, MaintenanceError> {
        if !is_valid_script_name(name) {
            return Err(MaintenanceError::InvalidName(name.to_string()));
        }

        let path = dir.join(format!("{}.sql", name));
        let sql = match tokio::fs::read_to_string(&path).await {
            Ok(sql) => sql,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(MaintenanceError::NotFound(path)),
            Err(source) => return Err(MaintenanceError::Read { path, source }),
        };

        if sql.trim().is_empty() {
            return Err(MaintenanceError::Empty(name.to_string()));
        }

        Ok(Self::new(name, sql))
    }
}

/// Locate and apply a script. Every call re-applies; scripts are expected to
/// be idempotent and each run is recorded with its checksum.
pub async fn run_script(store: &dyn DataStore, dir: &Path, name: &str) -> Result<ScriptRun, MaintenanceError> {
    let script = MaintenanceScript::locate(dir, name).await?;
    tracing::info!(script = %script.name, checksum = %script.checksum, "applying maintenance script");

    let run = store.apply_script(&script).await?;
    if run.previous_runs > 0 {
        tracing::info!(script = %script.name, previous_runs = run.previous_runs, "maintenance script re-applied");
    }
    Ok(run)
}

fn is_valid_script_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
