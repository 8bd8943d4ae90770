//! Singleton setting rows with documented defaults.

use serde_json::Value;

use crate::store::{DataStore, StoreError};

/// What to do when the store cannot answer.
#[derive(Debug, Clone, PartialEq)]
pub enum FailurePolicy {
    /// Serve the value and log; the request still succeeds.
    Default(Value),
    Propagate,
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Stored,
    Absent,
    NullValue,
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub value: Value,
    pub source: ValueSource,
}

/// Documented default for a key.
pub fn documented_default(key: &str) -> Value {
    match key {
        "subscriptions_enabled" => Value::Bool(true),
        "character_creation_enabled" => Value::Bool(true),
        "maintenance_banner" => Value::Bool(false),
        k if k.ends_with("_enabled") => Value::Bool(true),
        _ => Value::Null,
    }
}

/// Setting keys are short snake_case identifiers.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 64
        && key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// JSON scalars only; settings never hold arrays or objects.
pub fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

/// Read `key`, falling back to `default` when it is absent or null.
///
/// Store failures follow `policy` and are logged under `operation`.
pub async fn resolve(
    store: &dyn DataStore,
    operation: &str,
    key: &str,
    default: Value,
    policy: &FailurePolicy,
) -> Result<Resolved, StoreError> {
    match store.fetch_setting(key).await {
        Ok(Some(row)) if !row.value.is_null() => Ok(Resolved {
            value: row.value,
            source: ValueSource::Stored,
        }),
        Ok(Some(_)) => {
            tracing::debug!(key, "setting value is null, serving default");
            Ok(Resolved { value: default, source: ValueSource::NullValue })
        }
        Ok(None) => {
            tracing::debug!(key, "setting not found, serving default");
            Ok(Resolved { value: default, source: ValueSource::Absent })
        }
        Err(e) => match policy {
            FailurePolicy::Default(fallback) => {
                tracing::error!(operation, key, error = %e, "setting lookup failed, serving default");
                Ok(Resolved { value: fallback.clone(), source: ValueSource::Fallback })
            }
            FailurePolicy::Propagate => Err(e),
        },
    }
}
