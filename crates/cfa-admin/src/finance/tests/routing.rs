use super::common::*;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::finance::finance_router;
use crate::tenancy::{TENANT_HEADER, USER_HEADER};

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

fn authed(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(TENANT_HEADER, "1")
        .header(USER_HEADER, "100");
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("serializable")))
            .expect("request builds"),
        None => builder.body(Body::empty()).expect("request builds"),
    }
}

#[tokio::test]
async fn attendance_then_invoice_over_http() {
    let fixture = Fixture::new();
    let finance = crate::finance::FinanceService::new(
        fixture.store.clone(),
        &crate::config::BillingConfig::default(),
    );
    let router = finance_router(Arc::new(finance));
    let version_id = fixture.version().id;

    for day in [date(2024, 1, 8), date(2024, 1, 10)] {
        let response = router
            .clone()
            .oneshot(authed(
                "POST",
                "/api/v1/attendance",
                Some(json!({
                    "version_id": version_id,
                    "day_id": fixture.day_on(day),
                    "status": "UNEXCUSED_ABSENT"
                })),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let breakdown = router
        .clone()
        .oneshot(authed(
            "GET",
            &format!(
                "/api/v1/contracts/{}/billing?period_start=2024-01-01&period_end=2024-01-31",
                fixture.dossier_id
            ),
            None,
        ))
        .await
        .expect("route executes");
    assert_eq!(breakdown.status(), StatusCode::OK);
    assert_eq!(read_json(breakdown).await["amount"], "392.00");

    let created = router
        .clone()
        .oneshot(authed(
            "POST",
            "/api/v1/invoices",
            Some(json!({
                "dossier_id": fixture.dossier_id,
                "period_start": "2024-01-01",
                "period_end": "2024-01-31",
                "issued_on": "2024-02-01"
            })),
        ))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);
    let invoice = read_json(created).await;
    assert_eq!(invoice["status"], "DRAFT");
    assert_eq!(invoice["amount"], "392.00");
    let invoice_id = invoice["id"].as_u64().expect("invoice id");

    let skipped = router
        .oneshot(authed(
            "PATCH",
            &format!("/api/v1/invoices/{invoice_id}/status"),
            Some(json!({ "status": "PAID" })),
        ))
        .await
        .expect("route executes");
    assert_eq!(skipped.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_attendance_status_is_rejected() {
    let fixture = Fixture::new();
    let router = finance_router(Arc::new(crate::finance::FinanceService::new(
        fixture.store.clone(),
        &crate::config::BillingConfig::default(),
    )));

    let response = router
        .oneshot(authed(
            "POST",
            "/api/v1/attendance",
            Some(json!({
                "version_id": fixture.version().id,
                "day_id": fixture.day_on(date(2024, 1, 8)),
                "status": "LATE"
            })),
        ))
        .await
        .expect("route executes");
    assert!(response.status().is_client_error());
}
