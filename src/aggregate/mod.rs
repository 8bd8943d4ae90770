//! Declarative aggregation over store rows.
//!
//! An [`AggregationRequest`] lowers to a single [`RowQuery`]. Sums and
//! counts are computed by the store over the full filter, never over the
//! page of rows it happens to return. A store that answers without the
//! total or count it was asked for fails the request.

pub mod records;
pub mod window;

use rust_decimal::Decimal;

use crate::store::{Collection, DataStore, OrderBy, Row, RowQuery, StoreError};

pub use records::{ActivityRecord, SavedItem};
pub use window::{month_start, TimeWindow};

#[derive(Debug, Clone, PartialEq)]
pub enum AggregateOp {
    Sum { field: &'static str },
    Count,
    List { order: OrderBy },
}

/// Immutable once built; every builder method consumes `self`.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationRequest {
    query: RowQuery,
    op: AggregateOp,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AggregateValue {
    Number(Decimal),
    Count(i64),
    Rows(Vec<Row>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    pub value: AggregateValue,
    /// Authoritative row count when the request asked for one.
    pub count: Option<i64>,
}

impl AggregationRequest {
    pub fn sum(collection: Collection, field: &'static str) -> Self {
        let mut query = RowQuery::new(collection);
        query.sum_of = Some(field);
        query.fetch_rows = false;
        Self { query, op: AggregateOp::Sum { field } }
    }

    pub fn count(collection: Collection) -> Self {
        let mut query = RowQuery::new(collection);
        query.exact_count = true;
        query.fetch_rows = false;
        Self { query, op: AggregateOp::Count }
    }

    /// Newest-first listing on the collection's timestamp column.
    pub fn list(collection: Collection) -> Self {
        let order = OrderBy::desc(collection.timestamp_column());
        let mut query = RowQuery::new(collection);
        query.order = Some(order);
        Self { query, op: AggregateOp::List { order } }
    }

    pub fn window(mut self, window: TimeWindow) -> Self {
        self.query.since = window.lower_bound();
        self
    }

    pub fn owned_by(mut self, owner: uuid::Uuid) -> Self {
        self.query.owner = Some(owner);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.query.limit = Some(limit);
        self
    }

    pub fn with_count(mut self) -> Self {
        self.query.exact_count = true;
        self
    }

    pub fn row_query(&self) -> &RowQuery {
        &self.query
    }

    pub async fn execute(&self, store: &dyn DataStore) -> Result<AggregationResult, StoreError> {
        let set = store.select(&self.query).await?;
        let collection = self.query.collection.name();

        let count = match (self.query.exact_count, set.exact_count) {
            (true, None) => return Err(missing_count(collection)),
            (true, Some(n)) => Some(n),
            (false, _) => None,
        };

        let value = match &self.op {
            AggregateOp::Sum { field } => {
                let total = set.total.ok_or_else(|| {
                    StoreError::Query(format!("store returned no total of '{}' for {}", field, collection))
                })?;
                AggregateValue::Number(total)
            }
            AggregateOp::Count => AggregateValue::Count(count.ok_or_else(|| missing_count(collection))?),
            AggregateOp::List { .. } => AggregateValue::Rows(set.rows),
        };

        Ok(AggregationResult { value, count })
    }
}

fn missing_count(collection: &str) -> StoreError {
    StoreError::Query(format!("store returned no exact count for {}", collection))
}

impl AggregationResult {
    /// The numeric value of a sum, `0` for anything that is not a sum.
    pub fn total(&self) -> Decimal {
        match &self.value {
            AggregateValue::Number(n) => *n,
            _ => Decimal::ZERO,
        }
    }

    /// The authoritative count. Errors when the request never asked for one.
    pub fn exact_count(&self) -> Result<i64, StoreError> {
        self.count
            .ok_or_else(|| StoreError::Query("aggregation ran without an exact count".to_string()))
    }

    pub fn into_rows(self) -> Vec<Row> {
        match self.value {
            AggregateValue::Rows(rows) => rows,
            _ => Vec::new(),
        }
    }
}
