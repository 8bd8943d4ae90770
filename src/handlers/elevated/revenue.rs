// handlers/elevated/revenue.rs - GET /api/admin/revenue-summary handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregationRequest, TimeWindow};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::store::Collection;

const AMOUNT: &str = "amount";
const FAILED: &str = "Failed to load revenue";

#[derive(Debug, Default, Deserialize)]
pub struct RevenueQuery {
    #[serde(default)]
    pub window: TimeWindow,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifetimeRevenue {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub total_orders: i64,
}

/**
 * GET /api/admin/revenue-summary?window=monthly|lifetime
 *
 * Sum of payment amounts. `monthly` (the default) starts at local midnight
 * on the first of the current month, inclusive.
 *
 * ```json
 * { "totalRevenue": 60.0 }
 * ```
 */
pub async fn revenue_summary(
    State(state): State<AppState>,
    params: Result<Query<RevenueQuery>, QueryRejection>,
) -> ApiResult<Json<RevenueSummary>> {
    let Query(params) = params
        .map_err(|rejection| ApiError::invalid_input("revenue_summary", rejection, "Invalid query parameters"))?;
    let store = state
        .provider
        .service()
        .map_err(|e| ApiError::upstream("revenue_summary", FAILED, e))?;

    let result = AggregationRequest::sum(Collection::Payments, AMOUNT)
        .window(params.window)
        .execute(store.as_ref())
        .await
        .map_err(|e| ApiError::upstream("revenue_summary", FAILED, e))?;

    Ok(Json(RevenueSummary { total_revenue: result.total() }))
}

/**
 * GET /api/admin/revenue-summary/lifetime
 *
 * `totalOrders` is the store's exact row count, not the number of rows that
 * happened to come back.
 *
 * ```json
 * { "totalRevenue": 1060.0, "totalOrders": 4 }
 * ```
 */
pub async fn revenue_lifetime(State(state): State<AppState>) -> ApiResult<Json<LifetimeRevenue>> {
    let store = state
        .provider
        .service()
        .map_err(|e| ApiError::upstream("revenue_lifetime", FAILED, e))?;

    let result = AggregationRequest::sum(Collection::Payments, AMOUNT)
        .window(TimeWindow::Lifetime)
        .with_count()
        .execute(store.as_ref())
        .await
        .map_err(|e| ApiError::upstream("revenue_lifetime", FAILED, e))?;

    let total_orders = result
        .exact_count()
        .map_err(|e| ApiError::upstream("revenue_lifetime", FAILED, e))?;
    Ok(Json(LifetimeRevenue {
        total_revenue: result.total(),
        total_orders,
    }))
}
