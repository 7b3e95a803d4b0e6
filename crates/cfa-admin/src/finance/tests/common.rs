use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::BillingConfig;
use crate::contracts::domain::{AmendmentTerms, ContractTerms, ContractVersion, DossierId};
use crate::contracts::ContractService;
use crate::finance::domain::{AttendanceRequest, AttendanceStatus, BillingBreakdown};
use crate::finance::FinanceService;
use crate::planning::domain::{DayId, SessionDraft, TrainingSession};
use crate::planning::PlanningService;
use crate::registry::domain::{CandidateDraft, CompanyDraft};
use crate::registry::RegistryService;
use crate::store::Store;
use crate::tenancy::{Principal, TenantId, UserId};

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn principal(tenant: u64) -> Principal {
    Principal::new(UserId(tenant * 100), TenantId(tenant), "admin")
}

/// Monday and Wednesday sessions through January 2024: ten scheduled days, and a
/// dossier billed at 3500 for 500 hours (7 per hour).
pub(super) struct Fixture {
    pub(super) store: Store,
    pub(super) planning: PlanningService,
    pub(super) contracts: ContractService,
    pub(super) finance: FinanceService,
    pub(super) principal: Principal,
    pub(super) session: TrainingSession,
    pub(super) dossier_id: DossierId,
}

impl Fixture {
    pub(super) fn new() -> Self {
        Self::with_terms(|_| {})
    }

    pub(super) fn with_terms(adjust: impl FnOnce(&mut ContractTerms)) -> Self {
        let store = Store::new();
        let registry = RegistryService::new(store.clone());
        let planning = PlanningService::new(store.clone());
        let contracts = ContractService::new(store.clone());
        let finance = FinanceService::new(store.clone(), &BillingConfig::default());
        let principal = principal(1);

        let candidate = registry
            .create_candidate(
                &principal,
                CandidateDraft {
                    first_name: "Lea".to_string(),
                    last_name: "Moreau".to_string(),
                    email: None,
                    phone: None,
                    civility: None,
                    status: None,
                },
            )
            .expect("candidate created");
        let company = registry
            .create_company(
                &principal,
                CompanyDraft {
                    legal_name: "Fleurs et Cie".to_string(),
                    siret: None,
                    address: None,
                    idcc_code: None,
                },
            )
            .expect("company created");
        let session = planning
            .create_session(
                &principal,
                SessionDraft {
                    name: "CAP Fleuriste".to_string(),
                    start_date: date(2024, 1, 1),
                    end_date: date(2024, 6, 30),
                    qualification_id: None,
                },
            )
            .expect("session created");
        planning
            .generate_calendar(
                &principal,
                session.id,
                &[0, 2],
                Some((date(2024, 1, 1), date(2024, 1, 31))),
            )
            .expect("calendar generated");

        let mut terms = ContractTerms {
            session_id: Some(session.id),
            salary: Decimal::from(850),
            negotiated_cost: Some(Decimal::from(3500)),
            training_hours: Some(500),
            job_title: None,
            start_date: date(2024, 1, 1),
            end_date: date(2024, 6, 30),
        };
        adjust(&mut terms);
        let dossier_id = contracts
            .create_dossier(&principal, candidate.id, company.id, terms)
            .expect("dossier opened")
            .dossier
            .id;

        Self {
            store,
            planning,
            contracts,
            finance,
            principal,
            session,
            dossier_id,
        }
    }

    pub(super) fn version(&self) -> ContractVersion {
        self.contracts
            .active_version(&self.principal, self.dossier_id)
            .expect("active version")
    }

    pub(super) fn day_on(&self, on: NaiveDate) -> DayId {
        self.planning
            .days(&self.principal, self.session.id)
            .expect("days readable")
            .into_iter()
            .find(|day| day.date == on)
            .map(|day| day.id)
            .expect("scheduled day")
    }

    pub(super) fn mark(&self, on: NaiveDate, status: AttendanceStatus) {
        self.finance
            .record_attendance(
                &self.principal,
                AttendanceRequest {
                    version_id: self.version().id,
                    day_id: self.day_on(on),
                    status,
                },
            )
            .expect("attendance recorded");
    }

    pub(super) fn billing(&self, start: NaiveDate, end: NaiveDate) -> BillingBreakdown {
        self.finance
            .billing(&self.principal, self.dossier_id, start, end)
            .expect("billing computed")
    }

    /// Move the active version to start on `start`, keeping every other term.
    pub(super) fn restart_on(&self, start: NaiveDate) {
        let current = self.version();
        self.contracts
            .amend(
                &self.principal,
                self.dossier_id,
                AmendmentTerms {
                    session_id: None,
                    salary: current.salary,
                    negotiated_cost: None,
                    training_hours: None,
                    job_title: None,
                    start_date: start,
                    end_date: current.end_date,
                },
            )
            .expect("amendment recorded");
    }
}
