use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::contracts::domain::{AmendmentTerms, ContractTerms, ContractVersion, DossierId};
use crate::contracts::ContractService;
use crate::planning::domain::{SessionDraft, TrainingSession};
use crate::planning::PlanningService;
use crate::registry::domain::{Candidate, CandidateDraft, Company, CompanyDraft};
use crate::registry::RegistryService;
use crate::store::Store;
use crate::tenancy::{Principal, TenantId, UserId};

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn principal(tenant: u64) -> Principal {
    Principal::new(UserId(tenant * 100), TenantId(tenant), "admin")
}

pub(super) struct Fixture {
    pub(super) store: Store,
    pub(super) registry: RegistryService,
    pub(super) planning: PlanningService,
    pub(super) contracts: ContractService,
    pub(super) principal: Principal,
    pub(super) candidate: Candidate,
    pub(super) company: Company,
    pub(super) session: TrainingSession,
}

impl Fixture {
    pub(super) fn new() -> Self {
        let store = Store::new();
        let registry = RegistryService::new(store.clone());
        let planning = PlanningService::new(store.clone());
        let contracts = ContractService::new(store.clone());
        let principal = principal(1);

        let candidate = registry
            .create_candidate(&principal, candidate_draft("Jean", "Dupont"))
            .expect("candidate created");
        let company = registry
            .create_company(&principal, company_draft("Boulangerie Martin"))
            .expect("company created");
        let session = planning
            .create_session(
                &principal,
                SessionDraft {
                    name: "CAP Boulanger 2024".to_string(),
                    start_date: date(2024, 1, 1),
                    end_date: date(2024, 6, 30),
                    qualification_id: Some("RNCP37384".to_string()),
                },
            )
            .expect("session created");

        Self {
            store,
            registry,
            planning,
            contracts,
            principal,
            candidate,
            company,
            session,
        }
    }

    pub(super) fn open_dossier(&self) -> DossierId {
        self.contracts
            .create_dossier(
                &self.principal,
                self.candidate.id,
                self.company.id,
                self.terms(),
            )
            .expect("dossier opened")
            .dossier
            .id
    }

    pub(super) fn terms(&self) -> ContractTerms {
        ContractTerms {
            session_id: Some(self.session.id),
            salary: Decimal::new(98_000, 2),
            negotiated_cost: Some(Decimal::from(3500)),
            training_hours: Some(500),
            job_title: None,
            start_date: date(2024, 1, 1),
            end_date: date(2024, 6, 30),
        }
    }

    pub(super) fn active_count(&self, dossier_id: DossierId) -> usize {
        self.contracts
            .history(&self.principal, dossier_id)
            .expect("history readable")
            .iter()
            .filter(|version| version.is_active)
            .count()
    }

    pub(super) fn history(&self, dossier_id: DossierId) -> Vec<ContractVersion> {
        self.contracts
            .history(&self.principal, dossier_id)
            .expect("history readable")
    }
}

pub(super) fn candidate_draft(first: &str, last: &str) -> CandidateDraft {
    CandidateDraft {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: None,
        phone: None,
        civility: None,
        status: None,
    }
}

pub(super) fn company_draft(name: &str) -> CompanyDraft {
    CompanyDraft {
        legal_name: name.to_string(),
        siret: None,
        address: None,
        idcc_code: None,
    }
}

/// Amendment that only changes salary and dates.
pub(super) fn salary_amendment(salary: i64) -> AmendmentTerms {
    AmendmentTerms {
        session_id: None,
        salary: Decimal::from(salary),
        negotiated_cost: None,
        training_hours: None,
        job_title: None,
        start_date: date(2024, 3, 1),
        end_date: date(2024, 6, 30),
    }
}
