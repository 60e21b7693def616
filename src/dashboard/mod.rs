//! Dashboard — Axum JSON API over the valuation engine.
//!
//! Lets a presentation layer drive the engine over HTTP.
//! CORS enabled for local development.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub use routes::{AppState, DashboardState};

/// Serve the API until Ctrl-C.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind dashboard port {port}"))?;
    info!(port, "Dashboard server starting on http://localhost:{port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Dashboard server error")?;

    info!("Dashboard server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
    }
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/session", get(routes::get_session).put(routes::put_session))
        .route("/api/report", get(routes::get_report))
        .route("/api/scenarios", post(routes::post_scenarios))
        .route("/api/sell-through", post(routes::post_sell_through))
        .route("/api/revenue", post(routes::post_revenue))
        .route("/api/sensitivity", post(routes::post_sensitivity))
        .route("/api/analytics", post(routes::post_analytics))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Session;
    use crate::types::{Intake, Item};
    use crate::valuation::ValuationSettings;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let session = Session::new(
            "Router pallet",
            Intake::new(dec!(50), dec!(10)),
            vec![Item::new("Lamp", 20, dec!(50))],
        );
        Arc::new(DashboardState::new(ValuationSettings::default(), session))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_report_endpoint() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(Request::builder().uri("/api/report").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["sell_through_pct"], 100);
        assert_eq!(json["sensitivity"].as_array().unwrap().len(), 51);
    }

    #[tokio::test]
    async fn test_report_with_sell_through_override() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/report?sell_through_pct=50")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["sell_through_pct"], 50);
        assert_eq!(json["estimated_revenue"].as_f64().unwrap(), 500.0);
    }

    #[tokio::test]
    async fn test_sensitivity_endpoint_worked_example() {
        let app = build_router(test_state());
        let body = serde_json::json!({
            "items": [{"qty": 20, "est_price_each": 50}],
            "intake": {"shipping_cost": 50, "buyer_premium_pct": 10},
            "sell_through_pct": 100
        });
        let resp = app.oneshot(post_json("/api/sensitivity", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        let points = json["points"].as_array().unwrap();
        assert_eq!(points.len(), 51);
        assert_eq!(points[0]["profit"].as_f64().unwrap(), 950.0);
        assert_eq!(points[50]["roi"].as_f64().unwrap(), -55.6);
        assert_eq!(json["summary"]["break_even_bid"].as_f64().unwrap(), 880.0);
    }

    #[tokio::test]
    async fn test_scenarios_endpoint() {
        let app = build_router(test_state());
        let body = serde_json::json!({
            "base_revenue": 10000,
            "target_margin_pct": 30,
            "shipping_cost": 200,
            "item_count": 10
        });
        let resp = app.oneshot(post_json("/api/scenarios", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["scenarios"]["likely"]["max_bid"].as_f64().unwrap(), 5300.0);
    }

    #[tokio::test]
    async fn test_sell_through_endpoint_empty() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(post_json("/api/sell-through", serde_json::json!({ "items": [] })))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["suggested_sell_through_pct"], 100);
    }

    #[tokio::test]
    async fn test_invalid_item_is_unprocessable() {
        let app = build_router(test_state());
        let body = serde_json::json!({
            "items": [{"qty": 0, "est_price_each": 10}],
            "sell_through_pct": 100
        });
        let resp = app.oneshot(post_json("/api/revenue", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("qty"));
    }

    #[tokio::test]
    async fn test_wrong_body_shape_returns_json_error() {
        let app = build_router(test_state());
        let body = serde_json::json!({
            "items": [{"qty": -1, "est_price_each": 10}],
            "sell_through_pct": 100
        });
        let resp = app.oneshot(post_json("/api/revenue", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("qty"));
    }

    #[tokio::test]
    async fn test_missing_field_returns_json_error() {
        let app = build_router(test_state());
        let body = serde_json::json!({ "items": [{"qty": 1, "est_price_each": 10}] });
        let resp = app.oneshot(post_json("/api/sensitivity", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("sell_through_pct"));
    }

    #[tokio::test]
    async fn test_broken_json_returns_json_error() {
        let app = build_router(test_state());
        let req = Request::builder()
            .method("POST")
            .uri("/api/scenarios")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"base_revenue\": "))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_bad_report_query_returns_json_error() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/report?sell_through_pct=lots")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_oversized_line_is_unprocessable() {
        let app = build_router(test_state());
        let body = serde_json::json!({
            "items": [{"qty": 4000000000u32, "est_price_each": 1000000}],
            "sell_through_pct": 100
        });
        let resp = app.oneshot(post_json("/api/revenue", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("line total"));
    }

    #[tokio::test]
    async fn test_analytics_endpoint() {
        let app = build_router(test_state());
        let body = serde_json::json!({
            "items": [
                {"qty": 1, "est_price_each": 100, "fbm_est_high": 300, "confidence_score": 0.9},
                {"qty": 1, "est_price_each": 50, "fbm_est_high": 100, "confidence_score": 0.1}
            ],
            "bid_price": 150,
            "shipping_cost": 50
        });
        let resp = app.oneshot(post_json("/api/analytics", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["matched_items"], 1);
        assert_eq!(json["roi_pct"].as_f64().unwrap(), 100.0);
    }

    #[tokio::test]
    async fn test_put_then_get_session() {
        let state = test_state();
        let replacement = Session::new("Replaced", Intake::default(), vec![Item::new("Fan", 1, Decimal::ONE)]);
        let req = Request::builder()
            .method("PUT")
            .uri("/api/session")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&replacement).unwrap()))
            .unwrap();
        let resp = build_router(state.clone()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = build_router(state)
            .oneshot(Request::builder().uri("/api/session").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["name"], "Replaced");
    }
}
