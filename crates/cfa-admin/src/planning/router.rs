use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{DayFlags, DayId, SessionDraft, SessionId, TrainingDay, TrainingSession};
use super::service::PlanningService;
use crate::error::AppError;
use crate::store::{Page, PageQuery, Repository};
use crate::tenancy::Principal;

#[derive(Debug, Deserialize)]
pub(crate) struct CalendarRequest {
    pub(crate) days_of_week: Vec<u8>,
    #[serde(default)]
    pub(crate) start_date: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CalendarResponse {
    pub(crate) session_id: SessionId,
    pub(crate) days_created: usize,
}

/// Endpoints for sessions, calendar generation and day flags.
pub fn planning_router<R>(service: Arc<PlanningService<R>>) -> Router
where
    R: Repository + 'static,
{
    Router::new()
        .route(
            "/api/v1/sessions",
            post(create_session_handler::<R>).get(list_sessions_handler::<R>),
        )
        .route("/api/v1/sessions/:session_id", get(session_handler::<R>))
        .route(
            "/api/v1/sessions/:session_id/calendar",
            post(generate_calendar_handler::<R>),
        )
        .route("/api/v1/sessions/:session_id/days", get(days_handler::<R>))
        .route("/api/v1/days/:day_id", patch(day_flags_handler::<R>))
        .with_state(service)
}

pub(crate) async fn create_session_handler<R>(
    State(service): State<Arc<PlanningService<R>>>,
    principal: Principal,
    Json(draft): Json<SessionDraft>,
) -> Result<(StatusCode, Json<TrainingSession>), AppError>
where
    R: Repository + 'static,
{
    let session = service.create_session(&principal, draft)?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub(crate) async fn list_sessions_handler<R>(
    State(service): State<Arc<PlanningService<R>>>,
    principal: Principal,
    Query(query): Query<PageQuery>,
) -> Json<Vec<TrainingSession>>
where
    R: Repository + 'static,
{
    Json(service.sessions(&principal, Page::from(query)))
}

pub(crate) async fn session_handler<R>(
    State(service): State<Arc<PlanningService<R>>>,
    principal: Principal,
    Path(session_id): Path<u64>,
) -> Result<Json<TrainingSession>, AppError>
where
    R: Repository + 'static,
{
    Ok(Json(service.session(&principal, SessionId(session_id))?))
}

pub(crate) async fn generate_calendar_handler<R>(
    State(service): State<Arc<PlanningService<R>>>,
    principal: Principal,
    Path(session_id): Path<u64>,
    Json(request): Json<CalendarRequest>,
) -> Result<Json<CalendarResponse>, AppError>
where
    R: Repository + 'static,
{
    let session_id = SessionId(session_id);
    let range = match (request.start_date, request.end_date) {
        (Some(start), Some(end)) => Some((start, end)),
        (None, None) => None,
        _ => {
            return Err(crate::error::DomainError::invalid(
                "start_date and end_date must be provided together",
            )
            .into())
        }
    };
    let days_created =
        service.generate_calendar(&principal, session_id, &request.days_of_week, range)?;
    Ok(Json(CalendarResponse {
        session_id,
        days_created,
    }))
}

pub(crate) async fn days_handler<R>(
    State(service): State<Arc<PlanningService<R>>>,
    principal: Principal,
    Path(session_id): Path<u64>,
) -> Result<Json<Vec<TrainingDay>>, AppError>
where
    R: Repository + 'static,
{
    Ok(Json(service.days(&principal, SessionId(session_id))?))
}

pub(crate) async fn day_flags_handler<R>(
    State(service): State<Arc<PlanningService<R>>>,
    principal: Principal,
    Path(day_id): Path<u64>,
    Json(flags): Json<DayFlags>,
) -> Result<Json<TrainingDay>, AppError>
where
    R: Repository + 'static,
{
    Ok(Json(service.set_day_flags(&principal, DayId(day_id), flags)?))
}
