//! Dashboard API route handlers.
//!
//! All endpoints return JSON. Stateless endpoints take every input in the
//! request body; only the loaded session lives in `DashboardState`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::analytics::PalletAnalytics;
use crate::storage::Session;
use crate::types::{validate_items, CostConfiguration, Intake, Item, SensitivityPoint, ValuationError};
use crate::valuation::costs::{cost_breakdown, CostBreakdown};
use crate::valuation::scenario::{Scenario, ScenarioSet};
use crate::valuation::sell_through::{default_sell_through, suggested_sell_through};
use crate::valuation::sensitivity::{build_sensitivity_from_revenue, SensitivitySummary};
use crate::valuation::{compute_scenarios, estimated_revenue, ValuationReport, ValuationSettings};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub settings: ValuationSettings,
    pub session: RwLock<Session>,
}

impl DashboardState {
    pub fn new(settings: ValuationSettings, session: Session) -> Self {
        Self {
            settings,
            session: RwLock::new(session),
        }
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Request failure rendered as `{"error": ...}`.
///
/// Validation failures are `422`. Body and query rejections keep axum's
/// status (`422` for a body of the wrong shape, `400` for broken JSON,
/// `415` for a missing content type).
#[derive(Debug)]
pub enum ApiError {
    Invalid(ValuationError),
    Rejected { status: StatusCode, message: String },
}

impl From<ValuationError> for ApiError {
    fn from(err: ValuationError) -> Self {
        Self::Invalid(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::Invalid(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            ApiError::Rejected { status, message } => (status, message),
        };
        warn!(status = status.as_u16(), error = %error, "Rejected request");
        (status, Json(ErrorBody { error })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ScenarioRequest {
    pub base_revenue: Decimal,
    #[serde(default)]
    pub target_margin_pct: Option<Decimal>,
    #[serde(default)]
    pub costs: Option<CostConfiguration>,
    #[serde(default)]
    pub shipping_cost: Decimal,
    #[serde(default)]
    pub item_count: u32,
}

#[derive(Debug, Serialize)]
pub struct ScenarioResponse {
    pub scenarios: ScenarioSet,
    pub likely_costs: CostBreakdown,
}

#[derive(Debug, Deserialize)]
pub struct ItemsRequest {
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize)]
pub struct SellThroughResponse {
    pub suggested_sell_through_pct: u8,
    pub default_sell_through_pct: u8,
}

#[derive(Debug, Deserialize)]
pub struct RevenueRequest {
    pub items: Vec<Item>,
    pub sell_through_pct: Decimal,
}

#[derive(Debug, Serialize)]
pub struct RevenueResponse {
    pub estimated_revenue: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct SensitivityRequest {
    pub items: Vec<Item>,
    #[serde(default)]
    pub intake: Intake,
    pub sell_through_pct: Decimal,
}

#[derive(Debug, Serialize)]
pub struct SensitivityResponse {
    pub points: Vec<SensitivityPoint>,
    pub summary: SensitivitySummary,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsRequest {
    pub items: Vec<Item>,
    #[serde(default)]
    pub bid_price: Decimal,
    #[serde(default)]
    pub shipping_cost: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub sell_through_pct: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /api/session
pub async fn get_session(State(state): State<AppState>) -> Json<Session> {
    let session = state.session.read().await;
    Json(session.clone())
}

/// PUT /api/session
pub async fn put_session(
    State(state): State<AppState>,
    payload: Result<Json<Session>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(session) = payload?;
    session.validate()?;
    info!(name = %session.name, items = session.items.len(), "Session replaced");
    *state.session.write().await = session;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/report
pub async fn get_report(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Json<ValuationReport>, ApiError> {
    let Query(query) = query?;
    let session = state.session.read().await;
    Ok(Json(ValuationReport::build(
        &session.items,
        &session.intake,
        &state.settings,
        query.sell_through_pct,
    )))
}

/// POST /api/scenarios
pub async fn post_scenarios(
    State(state): State<AppState>,
    payload: Result<Json<ScenarioRequest>, JsonRejection>,
) -> Result<Json<ScenarioResponse>, ApiError> {
    let Json(req) = payload?;
    if req.base_revenue < Decimal::ZERO {
        return Err(ValuationError::InvalidRequest("base_revenue must be non-negative".to_string()).into());
    }
    let margin = req.target_margin_pct.unwrap_or(state.settings.target_margin_pct);
    let costs = req.costs.unwrap_or(state.settings.costs);

    let scenarios = compute_scenarios(req.base_revenue, margin, &costs, req.shipping_cost, req.item_count);
    let likely_costs = cost_breakdown(
        req.base_revenue * Scenario::Likely.factor(),
        &costs,
        req.shipping_cost,
        req.item_count,
    );
    Ok(Json(ScenarioResponse {
        scenarios,
        likely_costs,
    }))
}

/// POST /api/sell-through
pub async fn post_sell_through(
    State(state): State<AppState>,
    payload: Result<Json<ItemsRequest>, JsonRejection>,
) -> Result<Json<SellThroughResponse>, ApiError> {
    let Json(req) = payload?;
    validate_items(&req.items)?;
    Ok(Json(SellThroughResponse {
        suggested_sell_through_pct: suggested_sell_through(&req.items),
        default_sell_through_pct: default_sell_through(&req.items, state.settings.fallback_sell_through_pct),
    }))
}

/// POST /api/revenue
pub async fn post_revenue(
    payload: Result<Json<RevenueRequest>, JsonRejection>,
) -> Result<Json<RevenueResponse>, ApiError> {
    let Json(req) = payload?;
    validate_items(&req.items)?;
    Ok(Json(RevenueResponse {
        estimated_revenue: estimated_revenue(&req.items, req.sell_through_pct),
    }))
}

/// POST /api/sensitivity
pub async fn post_sensitivity(
    payload: Result<Json<SensitivityRequest>, JsonRejection>,
) -> Result<Json<SensitivityResponse>, ApiError> {
    let Json(req) = payload?;
    validate_items(&req.items)?;
    let est_revenue = estimated_revenue(&req.items, req.sell_through_pct);
    let points = build_sensitivity_from_revenue(est_revenue, &req.intake);
    let summary = SensitivitySummary::from_curve(est_revenue, &points);
    Ok(Json(SensitivityResponse { points, summary }))
}

/// POST /api/analytics
pub async fn post_analytics(
    payload: Result<Json<AnalyticsRequest>, JsonRejection>,
) -> Result<Json<PalletAnalytics>, ApiError> {
    let Json(req) = payload?;
    validate_items(&req.items)?;
    Ok(Json(PalletAnalytics::compute(&req.items, req.bid_price, req.shipping_cost)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
