use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;

use super::domain::{
    Candidate, CandidateDraft, CandidateId, CandidateStatus, Company, CompanyDraft, CompanyId,
    CvUpload, Tenant,
};
use super::service::RegistryService;
use crate::error::AppError;
use crate::store::{Page, PageQuery, Repository};
use crate::tenancy::Principal;

#[derive(Debug, Deserialize)]
pub(crate) struct TenantRequest {
    pub(crate) name: String,
    pub(crate) slug: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CandidateQuery {
    #[serde(default)]
    pub(crate) status: Option<CandidateStatus>,
    #[serde(default)]
    pub(crate) page: Option<u32>,
    #[serde(default)]
    pub(crate) size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusRequest {
    pub(crate) status: CandidateStatus,
}

/// Endpoints for tenants, candidates and companies.
pub fn registry_router<R>(service: Arc<RegistryService<R>>) -> Router
where
    R: Repository + 'static,
{
    Router::new()
        .route("/api/v1/tenants", post(register_tenant_handler::<R>))
        .route(
            "/api/v1/candidates",
            post(create_candidate_handler::<R>).get(list_candidates_handler::<R>),
        )
        .route("/api/v1/candidates/cv", post(cv_upload_handler::<R>))
        .route(
            "/api/v1/candidates/:candidate_id",
            get(candidate_handler::<R>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/status",
            patch(candidate_status_handler::<R>),
        )
        .route(
            "/api/v1/companies",
            post(create_company_handler::<R>).get(list_companies_handler::<R>),
        )
        .route("/api/v1/companies/:company_id", get(company_handler::<R>))
        .with_state(service)
}

pub(crate) async fn register_tenant_handler<R>(
    State(service): State<Arc<RegistryService<R>>>,
    Json(request): Json<TenantRequest>,
) -> Result<(StatusCode, Json<Tenant>), AppError>
where
    R: Repository + 'static,
{
    let tenant = service.register_tenant(&request.name, &request.slug)?;
    Ok((StatusCode::CREATED, Json(tenant)))
}

pub(crate) async fn create_candidate_handler<R>(
    State(service): State<Arc<RegistryService<R>>>,
    principal: Principal,
    Json(draft): Json<CandidateDraft>,
) -> Result<(StatusCode, Json<Candidate>), AppError>
where
    R: Repository + 'static,
{
    let candidate = service.create_candidate(&principal, draft)?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

pub(crate) async fn cv_upload_handler<R>(
    State(service): State<Arc<RegistryService<R>>>,
    principal: Principal,
    Json(upload): Json<CvUpload>,
) -> Result<(StatusCode, Json<Candidate>), AppError>
where
    R: Repository + 'static,
{
    let candidate = service.create_candidate_from_cv(&principal, upload)?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

pub(crate) async fn list_candidates_handler<R>(
    State(service): State<Arc<RegistryService<R>>>,
    principal: Principal,
    Query(query): Query<CandidateQuery>,
) -> Json<Vec<Candidate>>
where
    R: Repository + 'static,
{
    let page = Page::new(query.page, query.size);
    Json(service.candidates(&principal, query.status, page))
}

pub(crate) async fn candidate_handler<R>(
    State(service): State<Arc<RegistryService<R>>>,
    principal: Principal,
    Path(candidate_id): Path<u64>,
) -> Result<Json<Candidate>, AppError>
where
    R: Repository + 'static,
{
    let candidate = service.candidate(&principal, CandidateId(candidate_id))?;
    Ok(Json(candidate))
}

pub(crate) async fn candidate_status_handler<R>(
    State(service): State<Arc<RegistryService<R>>>,
    principal: Principal,
    Path(candidate_id): Path<u64>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<Candidate>, AppError>
where
    R: Repository + 'static,
{
    let candidate =
        service.update_candidate_status(&principal, CandidateId(candidate_id), request.status)?;
    Ok(Json(candidate))
}

pub(crate) async fn create_company_handler<R>(
    State(service): State<Arc<RegistryService<R>>>,
    principal: Principal,
    Json(draft): Json<CompanyDraft>,
) -> Result<(StatusCode, Json<Company>), AppError>
where
    R: Repository + 'static,
{
    let company = service.create_company(&principal, draft)?;
    Ok((StatusCode::CREATED, Json(company)))
}

pub(crate) async fn list_companies_handler<R>(
    State(service): State<Arc<RegistryService<R>>>,
    principal: Principal,
    Query(query): Query<PageQuery>,
) -> Json<Vec<Company>>
where
    R: Repository + 'static,
{
    Json(service.companies(&principal, Page::from(query)))
}

pub(crate) async fn company_handler<R>(
    State(service): State<Arc<RegistryService<R>>>,
    principal: Principal,
    Path(company_id): Path<u64>,
) -> Result<Json<Company>, AppError>
where
    R: Repository + 'static,
{
    let company = service.company(&principal, CompanyId(company_id))?;
    Ok(Json(company))
}
