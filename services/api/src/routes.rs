use crate::infra::{AppState, Services};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use cfa_admin::analytics::analytics_router;
use cfa_admin::contracts::contract_router;
use cfa_admin::finance::finance_router;
use cfa_admin::planning::planning_router;
use cfa_admin::registry::registry_router;
use serde_json::json;

/// Domain endpoints plus the operational probes.
pub(crate) fn app_router(services: &Services) -> Router {
    registry_router(services.registry.clone())
        .merge(planning_router(services.planning.clone()))
        .merge(contract_router(services.contracts.clone()))
        .merge(finance_router(services.finance.clone()))
        .merge(analytics_router(services.analytics.clone()))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
