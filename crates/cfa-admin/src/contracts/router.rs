use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use super::domain::{
    AmendmentTerms, ContractTerms, ContractVersion, DossierId, DossierSummary, DossierView,
};
use super::service::ContractService;
use crate::error::AppError;
use crate::planning::domain::TrainingDay;
use crate::registry::domain::{CandidateId, CompanyId};
use crate::store::{Page, PageQuery, Repository};
use crate::tenancy::Principal;

#[derive(Debug, Deserialize)]
pub(crate) struct DossierRequest {
    pub(crate) candidate_id: CandidateId,
    pub(crate) company_id: CompanyId,
    pub(crate) terms: ContractTerms,
}

/// Endpoints for dossiers, amendments, history and contract calendars.
pub fn contract_router<R>(service: Arc<ContractService<R>>) -> Router
where
    R: Repository + 'static,
{
    Router::new()
        .route(
            "/api/v1/contracts",
            post(create_dossier_handler::<R>).get(list_dossiers_handler::<R>),
        )
        .route("/api/v1/contracts/:dossier_id", get(dossier_handler::<R>))
        .route(
            "/api/v1/contracts/:dossier_id/amendments",
            put(amend_handler::<R>),
        )
        .route(
            "/api/v1/contracts/:dossier_id/history",
            get(history_handler::<R>),
        )
        .route(
            "/api/v1/contracts/:dossier_id/calendar",
            get(calendar_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn create_dossier_handler<R>(
    State(service): State<Arc<ContractService<R>>>,
    principal: Principal,
    Json(request): Json<DossierRequest>,
) -> Result<(StatusCode, Json<DossierView>), AppError>
where
    R: Repository + 'static,
{
    let view = service.create_dossier(
        &principal,
        request.candidate_id,
        request.company_id,
        request.terms,
    )?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub(crate) async fn list_dossiers_handler<R>(
    State(service): State<Arc<ContractService<R>>>,
    principal: Principal,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<DossierSummary>>, AppError>
where
    R: Repository + 'static,
{
    let page = Page::from(query);
    Ok(Json(service.dossiers(&principal, page)?))
}

pub(crate) async fn dossier_handler<R>(
    State(service): State<Arc<ContractService<R>>>,
    principal: Principal,
    Path(dossier_id): Path<u64>,
) -> Result<Json<DossierView>, AppError>
where
    R: Repository + 'static,
{
    Ok(Json(service.dossier(&principal, DossierId(dossier_id))?))
}

pub(crate) async fn amend_handler<R>(
    State(service): State<Arc<ContractService<R>>>,
    principal: Principal,
    Path(dossier_id): Path<u64>,
    Json(terms): Json<AmendmentTerms>,
) -> Result<(StatusCode, Json<ContractVersion>), AppError>
where
    R: Repository + 'static,
{
    let version = service.amend(&principal, DossierId(dossier_id), terms)?;
    Ok((StatusCode::CREATED, Json(version)))
}

pub(crate) async fn history_handler<R>(
    State(service): State<Arc<ContractService<R>>>,
    principal: Principal,
    Path(dossier_id): Path<u64>,
) -> Result<Json<Vec<ContractVersion>>, AppError>
where
    R: Repository + 'static,
{
    Ok(Json(service.history(&principal, DossierId(dossier_id))?))
}

pub(crate) async fn calendar_handler<R>(
    State(service): State<Arc<ContractService<R>>>,
    principal: Principal,
    Path(dossier_id): Path<u64>,
) -> Result<Json<Vec<TrainingDay>>, AppError>
where
    R: Repository + 'static,
{
    Ok(Json(service.calendar(&principal, DossierId(dossier_id))?))
}
