use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use super::billing::DayHours;
use super::domain::{
    Attendance, AttendanceRequest, BillingBreakdown, Invoice, InvoiceId, InvoiceRequest,
    InvoiceStatus,
};
use super::invoices::InvoiceNumbering;
use super::service::FinanceService;
use crate::contracts::domain::DossierId;
use crate::error::AppError;
use crate::store::{Page, Repository};
use crate::tenancy::Principal;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct InvoiceQuery {
    #[serde(default)]
    pub(crate) dossier_id: Option<DossierId>,
    #[serde(default)]
    pub(crate) page: Option<u32>,
    #[serde(default)]
    pub(crate) size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BillingQuery {
    pub(crate) period_start: NaiveDate,
    pub(crate) period_end: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusChange {
    pub(crate) status: InvoiceStatus,
}

/// Endpoints for attendance, billing previews and invoices.
pub fn finance_router<R, H, N>(service: Arc<FinanceService<R, H, N>>) -> Router
where
    R: Repository + 'static,
    H: DayHours + 'static,
    N: InvoiceNumbering + 'static,
{
    Router::new()
        .route("/api/v1/attendance", post(attendance_handler::<R, H, N>))
        .route(
            "/api/v1/invoices",
            post(generate_invoice_handler::<R, H, N>).get(list_invoices_handler::<R, H, N>),
        )
        .route(
            "/api/v1/invoices/:invoice_id",
            get(invoice_handler::<R, H, N>),
        )
        .route(
            "/api/v1/invoices/:invoice_id/status",
            patch(invoice_status_handler::<R, H, N>),
        )
        .route(
            "/api/v1/contracts/:dossier_id/billing",
            get(billing_handler::<R, H, N>),
        )
        .with_state(service)
}

pub(crate) async fn attendance_handler<R, H, N>(
    State(service): State<Arc<FinanceService<R, H, N>>>,
    principal: Principal,
    Json(request): Json<AttendanceRequest>,
) -> Result<Json<Attendance>, AppError>
where
    R: Repository + 'static,
    H: DayHours + 'static,
    N: InvoiceNumbering + 'static,
{
    Ok(Json(service.record_attendance(&principal, request)?))
}

pub(crate) async fn generate_invoice_handler<R, H, N>(
    State(service): State<Arc<FinanceService<R, H, N>>>,
    principal: Principal,
    Json(request): Json<InvoiceRequest>,
) -> Result<(StatusCode, Json<Invoice>), AppError>
where
    R: Repository + 'static,
    H: DayHours + 'static,
    N: InvoiceNumbering + 'static,
{
    let issued_on = request
        .issued_on
        .unwrap_or_else(|| Local::now().date_naive());
    let invoice = service.generate_invoice(
        &principal,
        request.dossier_id,
        request.period_start,
        request.period_end,
        issued_on,
    )?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

pub(crate) async fn list_invoices_handler<R, H, N>(
    State(service): State<Arc<FinanceService<R, H, N>>>,
    principal: Principal,
    Query(query): Query<InvoiceQuery>,
) -> Json<Vec<Invoice>>
where
    R: Repository + 'static,
    H: DayHours + 'static,
    N: InvoiceNumbering + 'static,
{
    let page = Page::new(query.page, query.size);
    Json(service.invoices(&principal, query.dossier_id, page))
}

pub(crate) async fn invoice_handler<R, H, N>(
    State(service): State<Arc<FinanceService<R, H, N>>>,
    principal: Principal,
    Path(invoice_id): Path<u64>,
) -> Result<Json<Invoice>, AppError>
where
    R: Repository + 'static,
    H: DayHours + 'static,
    N: InvoiceNumbering + 'static,
{
    Ok(Json(service.invoice(&principal, InvoiceId(invoice_id))?))
}

pub(crate) async fn invoice_status_handler<R, H, N>(
    State(service): State<Arc<FinanceService<R, H, N>>>,
    principal: Principal,
    Path(invoice_id): Path<u64>,
    Json(change): Json<StatusChange>,
) -> Result<Json<Invoice>, AppError>
where
    R: Repository + 'static,
    H: DayHours + 'static,
    N: InvoiceNumbering + 'static,
{
    let invoice = service.update_invoice_status(&principal, InvoiceId(invoice_id), change.status)?;
    Ok(Json(invoice))
}

pub(crate) async fn billing_handler<R, H, N>(
    State(service): State<Arc<FinanceService<R, H, N>>>,
    principal: Principal,
    Path(dossier_id): Path<u64>,
    Query(query): Query<BillingQuery>,
) -> Result<Json<BillingBreakdown>, AppError>
where
    R: Repository + 'static,
    H: DayHours + 'static,
    N: InvoiceNumbering + 'static,
{
    let breakdown = service.billing(
        &principal,
        DossierId(dossier_id),
        query.period_start,
        query.period_end,
    )?;
    Ok(Json(breakdown))
}
