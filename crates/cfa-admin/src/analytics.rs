//! Per-tenant financial and recruitment indicators.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::finance::domain::AttendanceStatus;
use crate::planning::domain::TrainingDay;
use crate::registry::domain::{CandidateStatus, Civility};
use crate::store::{Repository, Store, Tables};
use crate::tenancy::{Principal, TenantId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    /// Negotiated cost of every active contract version. Unset costs count as zero.
    pub forecast_revenue: Decimal,
    /// Amounts of issued and paid invoices.
    pub realized_revenue: Decimal,
    pub total_candidates: usize,
    pub placed_candidates: usize,
    /// Placed candidates as a percentage of all candidates, 2 decimal places.
    pub placement_rate: Decimal,
}

pub fn dashboard(tables: &Tables, tenant: TenantId) -> Dashboard {
    let forecast_revenue: Decimal = tables
        .versions
        .scan(tenant)
        .filter(|version| version.is_active)
        .filter_map(|version| version.negotiated_cost)
        .sum();
    let realized_revenue: Decimal = tables
        .invoices
        .scan(tenant)
        .filter(|invoice| invoice.status.is_realized())
        .map(|invoice| invoice.amount)
        .sum();

    let total_candidates = tables.candidates.len(tenant);
    let placed_candidates = tables
        .candidates
        .scan(tenant)
        .filter(|candidate| candidate.status == CandidateStatus::Placed)
        .count();

    Dashboard {
        forecast_revenue,
        realized_revenue,
        total_candidates,
        placed_candidates,
        placement_rate: percentage(placed_candidates, total_candidates),
    }
}

fn percentage(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    let mut rate = (Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rate.rescale(2);
    rate
}

/// Head counts of candidates holding an active contract, by civility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CivilityBreakdown {
    pub men: usize,
    pub women: usize,
    /// Candidates without a recorded civility.
    pub other: usize,
}

/// Figures feeding the yearly training activity report (BPF).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BpfPreview {
    pub civility: CivilityBreakdown,
    /// Hours of every PRESENT attendance, by the half-day shape of its day.
    pub realized_hours: Decimal,
    /// Active contract versions per qualification of their session.
    pub qualifications: BTreeMap<String, usize>,
}

// Any day short of both halves counts as a half day.
fn attended_hours(day: &TrainingDay) -> Decimal {
    if day.morning && day.afternoon {
        Decimal::new(7, 0)
    } else {
        Decimal::new(35, 1)
    }
}

pub fn bpf_preview(tables: &Tables, tenant: TenantId) -> BpfPreview {
    let active: Vec<_> = tables
        .versions
        .scan(tenant)
        .filter(|version| version.is_active)
        .collect();

    let mut civility = CivilityBreakdown::default();
    for version in &active {
        let candidate = tables
            .dossiers
            .find(tenant, version.dossier_id)
            .and_then(|dossier| tables.candidates.find(tenant, dossier.candidate_id));
        let Some(candidate) = candidate else {
            continue;
        };
        match candidate.civility {
            Some(Civility::M) => civility.men += 1,
            Some(Civility::Mme) => civility.women += 1,
            None => civility.other += 1,
        }
    }

    // Rows left behind by a regenerated calendar no longer resolve to a day.
    let realized_hours: Decimal = tables
        .attendance
        .scan(tenant)
        .filter(|row| row.status == AttendanceStatus::Present)
        .filter_map(|row| tables.days.find(tenant, row.day_id))
        .map(attended_hours)
        .sum();

    let mut qualifications = BTreeMap::new();
    for version in &active {
        let qualification = version
            .session_id
            .and_then(|session_id| tables.sessions.find(tenant, session_id))
            .and_then(|session| session.qualification_id.clone());
        if let Some(qualification) = qualification {
            *qualifications.entry(qualification).or_insert(0) += 1;
        }
    }

    BpfPreview {
        civility,
        realized_hours,
        qualifications,
    }
}

#[derive(Debug, Clone)]
pub struct AnalyticsService<R = Store> {
    store: R,
}

impl<R> AnalyticsService<R>
where
    R: Repository,
{
    pub fn new(store: R) -> Self {
        Self { store }
    }

    pub fn dashboard(&self, principal: &Principal) -> Dashboard {
        self.store
            .read(|tables| dashboard(tables, principal.tenant_id))
    }

    pub fn bpf_preview(&self, principal: &Principal) -> BpfPreview {
        self.store
            .read(|tables| bpf_preview(tables, principal.tenant_id))
    }
}

pub fn analytics_router<R>(service: Arc<AnalyticsService<R>>) -> Router
where
    R: Repository + 'static,
{
    Router::new()
        .route("/api/v1/analytics/dashboard", get(dashboard_handler::<R>))
        .route("/api/v1/analytics/bpf-preview", get(bpf_preview_handler::<R>))
        .with_state(service)
}

pub(crate) async fn dashboard_handler<R>(
    State(service): State<Arc<AnalyticsService<R>>>,
    principal: Principal,
) -> Json<Dashboard>
where
    R: Repository + 'static,
{
    Json(service.dashboard(&principal))
}

pub(crate) async fn bpf_preview_handler<R>(
    State(service): State<Arc<AnalyticsService<R>>>,
    principal: Principal,
) -> Json<BpfPreview>
where
    R: Repository + 'static,
{
    Json(service.bpf_preview(&principal))
}
