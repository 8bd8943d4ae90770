use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{PgPool, Postgres, Row as _, Transaction};
use uuid::Uuid;

use crate::database::query_builder::{bind_all, SelectSql};
use crate::services::maintenance::MaintenanceScript;
use crate::store::{DataStore, RowQuery, RowSet, ScriptRun, SettingRow, StoreError};

const CREATE_RUNS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS maintenance_runs (
        id BIGSERIAL PRIMARY KEY,
        script TEXT NOT NULL,
        checksum TEXT NOT NULL,
        applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

/// Trust level a [`PgStore`] runs its statements under.
#[derive(Debug, Clone)]
pub enum Scope {
    /// The pool's own role; row-level security is bypassed.
    Service,
    /// `authenticated` role with the caller's claims visible to RLS policies
    /// through `request.jwt.claims`.
    User { claims: String },
}

/// Postgres-backed [`DataStore`]. Every call runs in its own transaction so
/// role, claims and statement timeout are local to that call.
pub struct PgStore {
    pool: PgPool,
    scope: Scope,
    statement_timeout_ms: u64,
}

impl PgStore {
    pub fn new(pool: PgPool, scope: Scope, statement_timeout_ms: u64) -> Self {
        Self { pool, scope, statement_timeout_ms }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT set_config('statement_timeout', $1, true)")
            .bind(self.statement_timeout_ms.to_string())
            .execute(&mut *tx)
            .await?;

        if let Scope::User { claims } = &self.scope {
            sqlx::query("SELECT set_config('request.jwt.claims', $1, true)")
                .bind(claims)
                .execute(&mut *tx)
                .await?;
            sqlx::query("SET LOCAL ROLE authenticated").execute(&mut *tx).await?;
        }

        Ok(tx)
    }
}

#[async_trait]
impl DataStore for PgStore {
    async fn select(&self, query: &RowQuery) -> Result<RowSet, StoreError> {
        let sql = SelectSql::build(query);
        let collection = query.collection.name();
        let mut tx = self.begin().await?;

        let rows = match &sql.rows {
            Some(rows_sql) => bind_all(sqlx::query(rows_sql), &sql.binds)
                .fetch_all(&mut *tx)
                .await?
                .into_iter()
                .map(|row| match row.try_get::<Value, _>("row")? {
                    Value::Object(map) => Ok(map),
                    other => Err(StoreError::MalformedRow {
                        collection,
                        reason: format!("expected a JSON object, got {}", other),
                    }),
                })
                .collect::<Result<Vec<_>, StoreError>>()?,
            None => Vec::new(),
        };

        let exact_count = match &sql.count {
            Some(count_sql) => {
                let row = bind_all(sqlx::query(count_sql), &sql.binds).fetch_one(&mut *tx).await?;
                Some(row.try_get::<i64, _>("count")?)
            }
            None => None,
        };

        let total = match &sql.sum {
            Some(sum_sql) => {
                let row = bind_all(sqlx::query(sum_sql), &sql.binds).fetch_one(&mut *tx).await?;
                Some(row.try_get::<Decimal, _>("total")?)
            }
            None => None,
        };

        tx.commit().await?;
        Ok(RowSet { rows, exact_count, total })
    }

    async fn fetch_setting(&self, key: &str) -> Result<Option<SettingRow>, StoreError> {
        let mut tx = self.begin().await?;
        let row = sqlx::query("SELECT key, value FROM app_settings WHERE key = $1")
            .bind(key)
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;

        row.map(|r| -> Result<SettingRow, StoreError> {
            let value: Option<Value> = r.try_get("value")?;
            Ok(SettingRow {
                key: r.try_get("key")?,
                value: value.unwrap_or(Value::Null),
            })
        })
        .transpose()
    }

    async fn upsert_setting(&self, key: &str, value: &Value) -> Result<SettingRow, StoreError> {
        let mut tx = self.begin().await?;
        let row = sqlx::query(
            r#"
            INSERT INTO app_settings (key, value, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            RETURNING key, value
            "#,
        )
        .bind(key)
        .bind(value)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        let stored: Option<Value> = row.try_get("value")?;
        Ok(SettingRow {
            key: row.try_get("key")?,
            value: stored.unwrap_or(Value::Null),
        })
    }

    async fn is_admin(&self, subject: Uuid) -> Result<bool, StoreError> {
        let mut tx = self.begin().await?;
        let found: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM admin_users WHERE user_id = $1)")
            .bind(subject)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(found)
    }

    async fn apply_script(&self, script: &MaintenanceScript) -> Result<ScriptRun, StoreError> {
        let mut tx = self.begin().await?;

        sqlx::query(CREATE_RUNS_TABLE).execute(&mut *tx).await?;
        let previous_runs: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM maintenance_runs WHERE script = $1 AND checksum = $2")
                .bind(&script.name)
                .bind(&script.checksum)
                .fetch_one(&mut *tx)
                .await?;

        // Unparameterized, so Postgres accepts several statements at once.
        sqlx::Executor::execute(&mut *tx, script.sql.as_str()).await?;

        let applied_at: DateTime<Utc> =
            sqlx::query_scalar("INSERT INTO maintenance_runs (script, checksum) VALUES ($1, $2) RETURNING applied_at")
                .bind(&script.name)
                .bind(&script.checksum)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(ScriptRun {
            script: script.name.clone(),
            checksum: script.checksum.clone(),
            previous_runs,
            applied_at,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
