//! In-memory store and router helpers for unit tests.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::auth::{issue_access_token, Claims};
use crate::config::AppConfig;
use crate::services::maintenance::MaintenanceScript;
use crate::state::AppState;
use crate::store::{ClientProvider, Collection, DataStore, Row, RowQuery, RowSet, ScriptRun, SettingRow, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    tables: HashMap<Collection, Vec<Row>>,
    settings: Mutex<HashMap<String, Value>>,
    admins: HashSet<Uuid>,
    script_runs: Mutex<Vec<String>>,
    /// Rows returned per query, like a provider-side max-rows setting.
    page_cap: Option<usize>,
    /// Answer every query without its exact count.
    drop_counts: bool,
    fail_selects: bool,
    fail_settings: bool,
    fail_scripts: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(mut self, collection: Collection, rows: Vec<Row>) -> Self {
        self.tables.entry(collection).or_default().extend(rows);
        self
    }

    pub fn with_setting(self, key: &str, value: Value) -> Self {
        self.settings.lock().unwrap().insert(key.to_string(), value);
        self
    }

    pub fn with_admin(mut self, subject: Uuid) -> Self {
        self.admins.insert(subject);
        self
    }

    pub fn with_page_cap(mut self, cap: usize) -> Self {
        self.page_cap = Some(cap);
        self
    }

    pub fn dropping_counts(mut self) -> Self {
        self.drop_counts = true;
        self
    }

    pub fn failing_selects(mut self) -> Self {
        self.fail_selects = true;
        self
    }

    pub fn failing_settings(mut self) -> Self {
        self.fail_settings = true;
        self
    }

    pub fn failing_scripts(mut self) -> Self {
        self.fail_scripts = true;
        self
    }

    pub fn setting(&self, key: &str) -> Option<Value> {
        self.settings.lock().unwrap().get(key).cloned()
    }
}

/// Mirrors `SUM(numeric)`: JSON numbers and numeric strings add up, anything
/// else is a malformed row.
fn sum_field(collection: &'static str, field: &str, rows: &[Row]) -> Result<Decimal, StoreError> {
    rows.iter().try_fold(Decimal::ZERO, |acc, row| {
        let value = row.get(field).unwrap_or(&Value::Null);
        let amount = coerce_decimal(value).ok_or_else(|| StoreError::MalformedRow {
            collection,
            reason: format!("field '{}' is not numeric: {}", field, value),
        })?;
        acc.checked_add(amount).ok_or_else(|| StoreError::MalformedRow {
            collection,
            reason: format!("sum of '{}' overflowed", field),
        })
    })
}

fn coerce_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)).ok()
}

fn row_time(row: &Row, column: &str) -> Option<DateTime<Utc>> {
    row.get(column)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn select(&self, query: &RowQuery) -> Result<RowSet, StoreError> {
        if self.fail_selects {
            return Err(StoreError::Query("connection reset by peer".to_string()));
        }

        let ts = query.collection.timestamp_column();
        let owner_column = query.collection.owner_column();
        let mut rows: Vec<Row> = self
            .tables
            .get(&query.collection)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|row| match query.since {
                Some(since) => row_time(row, ts).is_some_and(|t| t >= since),
                None => true,
            })
            .filter(|row| match query.owner {
                Some(owner) => row.get(owner_column).and_then(Value::as_str) == Some(owner.to_string().as_str()),
                None => true,
            })
            .collect();

        if let Some(order) = query.order {
            rows.sort_by_key(|row| row_time(row, order.column));
            if order.descending {
                rows.reverse();
            }
        }

        let exact_count = (query.exact_count && !self.drop_counts).then_some(rows.len() as i64);
        let total = match query.sum_of {
            Some(field) => Some(sum_field(query.collection.name(), field, &rows)?),
            None => None,
        };
        if !query.fetch_rows {
            rows.clear();
        }

        let mut take = query.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        if let Some(cap) = self.page_cap {
            take = take.min(cap);
        }
        rows.truncate(take);

        if !query.columns.is_empty() {
            for row in rows.iter_mut() {
                row.retain(|k, _| query.columns.iter().any(|c| k.as_str() == *c));
            }
        }

        Ok(RowSet { rows, exact_count, total })
    }

    async fn fetch_setting(&self, key: &str) -> Result<Option<SettingRow>, StoreError> {
        if self.fail_settings {
            return Err(StoreError::Query("permission denied for table app_settings".to_string()));
        }
        Ok(self.setting(key).map(|value| SettingRow { key: key.to_string(), value }))
    }

    async fn upsert_setting(&self, key: &str, value: &Value) -> Result<SettingRow, StoreError> {
        if self.fail_settings {
            return Err(StoreError::Query("permission denied for table app_settings".to_string()));
        }
        self.settings.lock().unwrap().insert(key.to_string(), value.clone());
        Ok(SettingRow { key: key.to_string(), value: value.clone() })
    }

    async fn is_admin(&self, subject: Uuid) -> Result<bool, StoreError> {
        Ok(self.admins.contains(&subject))
    }

    async fn apply_script(&self, script: &MaintenanceScript) -> Result<ScriptRun, StoreError> {
        if self.fail_scripts {
            return Err(StoreError::Query("syntax error at or near \"POLICY\"".to_string()));
        }
        let mut runs = self.script_runs.lock().unwrap();
        let previous_runs = runs.iter().filter(|c| **c == script.checksum).count() as i64;
        runs.push(script.checksum.clone());
        Ok(ScriptRun {
            script: script.name.clone(),
            checksum: script.checksum.clone(),
            previous_runs,
            applied_at: Utc::now(),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Hands the same store out at both trust levels, or nothing at all.
pub struct MemoryProvider {
    store: Option<Arc<MemoryStore>>,
}

impl MemoryProvider {
    pub fn new(store: MemoryStore) -> Self {
        Self { store: Some(Arc::new(store)) }
    }

    pub fn unconfigured() -> Self {
        Self { store: None }
    }
}

impl ClientProvider for MemoryProvider {
    fn service(&self) -> Result<Arc<dyn DataStore>, StoreError> {
        match &self.store {
            Some(store) => Ok(store.clone() as Arc<dyn DataStore>),
            None => Err(StoreError::NotConfigured("DATABASE_URL")),
        }
    }

    fn for_user(&self, _claims: &Claims) -> Result<Arc<dyn DataStore>, StoreError> {
        self.service()
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.auth.admin_role = None;
    config
}

pub fn test_state(store: MemoryStore) -> AppState {
    AppState::new(test_config(), Arc::new(MemoryProvider::new(store)))
}

pub fn token_for(subject: Uuid) -> String {
    let auth = test_config().auth;
    issue_access_token(&Claims::new(subject, Some(format!("{}@persona.test", subject.simple())), None, &auth), &auth)
        .expect("sign test token")
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("cookie", format!("sb-access-token={}", token));
    }
    builder.body(Body::empty()).expect("request")
}
