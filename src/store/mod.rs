//! Data-store seam.
//!
//! Handlers never talk to Postgres directly. They ask a [`ClientProvider`]
//! for either the process-wide service client or a client scoped to the
//! caller's verified claims, then issue [`RowQuery`]s against it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Claims;
use crate::services::maintenance::MaintenanceScript;

pub type Row = Map<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    NotConfigured(&'static str),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Malformed {collection} row: {reason}")]
    MalformedRow { collection: &'static str, reason: String },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Source collections the gateway reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Payments,
    Activity,
    Prompts,
    Favorites,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Payments => "payments",
            Collection::Activity => "activity_events",
            Collection::Prompts => "saved_prompts",
            Collection::Favorites => "favorites",
        }
    }

    /// Column every time filter and default ordering applies to.
    pub fn timestamp_column(&self) -> &'static str {
        "created_at"
    }

    /// Column naming the owning user, used for owner-scoped reads.
    pub fn owner_column(&self) -> &'static str {
        "user_id"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub descending: bool,
}

impl OrderBy {
    pub fn desc(column: &'static str) -> Self {
        Self { column, descending: true }
    }
}

/// A single read against one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct RowQuery {
    pub collection: Collection,
    /// Projection; empty means every column.
    pub columns: Vec<&'static str>,
    /// Inclusive lower bound on the collection's timestamp column.
    pub since: Option<DateTime<Utc>>,
    pub owner: Option<Uuid>,
    pub order: Option<OrderBy>,
    pub limit: Option<u32>,
    /// Ask the store for an exact `COUNT(*)` that ignores `limit`.
    pub exact_count: bool,
    /// Ask the store for the total of this column over every matching row.
    /// Like the count, it ignores `limit` and any page cap.
    pub sum_of: Option<&'static str>,
    /// `false` when only the count and/or total are wanted.
    pub fetch_rows: bool,
}

impl RowQuery {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            columns: Vec::new(),
            since: None,
            owner: None,
            order: None,
            limit: None,
            exact_count: false,
            sum_of: None,
            fetch_rows: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RowSet {
    pub rows: Vec<Row>,
    /// Present whenever the query asked for `exact_count`.
    pub exact_count: Option<i64>,
    /// Present whenever the query asked for `sum_of`; zero over no rows.
    pub total: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingRow {
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRun {
    pub script: String,
    pub checksum: String,
    /// Earlier successful runs of the same script body.
    pub previous_runs: i64,
    pub applied_at: DateTime<Utc>,
}

/// Operations the gateway needs from the backing store.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn select(&self, query: &RowQuery) -> Result<RowSet, StoreError>;

    /// `Ok(None)` when no row exists for `key`. A row whose value is SQL
    /// `NULL` comes back as `Some` with `Value::Null`.
    async fn fetch_setting(&self, key: &str) -> Result<Option<SettingRow>, StoreError>;

    async fn upsert_setting(&self, key: &str, value: &Value) -> Result<SettingRow, StoreError>;

    async fn is_admin(&self, subject: Uuid) -> Result<bool, StoreError>;

    async fn apply_script(&self, script: &MaintenanceScript) -> Result<ScriptRun, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// Hands out store clients at the two trust levels.
pub trait ClientProvider: Send + Sync {
    /// Unrestricted client, built once at startup. Only admin-tier routes,
    /// the admin registry check and public setting reads may use it.
    fn service(&self) -> Result<Arc<dyn DataStore>, StoreError>;

    /// Row-restricted client for one request, carrying the caller's claims.
    fn for_user(&self, claims: &Claims) -> Result<Arc<dyn DataStore>, StoreError>;
}
