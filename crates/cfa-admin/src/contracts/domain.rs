use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::planning::domain::SessionId;
use crate::registry::domain::{Candidate, CandidateId, Company, CompanyId};
use crate::store::Record;
use crate::tenancy::{entity_id, TenantId};

entity_id!(DossierId);
entity_id!(VersionId);

pub const DEFAULT_JOB_TITLE: &str = "Apprenti";
pub const AMENDMENT_JOB_TITLE: &str = "Avenant";

/// Durable identity of a candidate-company relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dossier {
    pub id: DossierId,
    pub tenant_id: TenantId,
    pub candidate_id: CandidateId,
    pub company_id: CompanyId,
}

impl Record for Dossier {
    type Id = DossierId;
    const ENTITY: &'static str = "dossier";

    fn id(&self) -> DossierId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// One snapshot of contract terms. Immutable once superseded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractVersion {
    pub id: VersionId,
    pub tenant_id: TenantId,
    pub dossier_id: DossierId,
    pub session_id: Option<SessionId>,
    pub version_number: u32,
    pub salary: Decimal,
    pub negotiated_cost: Option<Decimal>,
    pub training_hours: Option<u32>,
    pub job_title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
}

impl Record for ContractVersion {
    type Id = VersionId;
    const ENTITY: &'static str = "contract version";

    fn id(&self) -> VersionId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// Terms of the first version, supplied when a dossier is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTerms {
    #[serde(default)]
    pub session_id: Option<SessionId>,
    pub salary: Decimal,
    #[serde(default)]
    pub negotiated_cost: Option<Decimal>,
    #[serde(default)]
    pub training_hours: Option<u32>,
    #[serde(default)]
    pub job_title: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Terms of an amendment. Unset session, negotiated cost, training hours and job title are
/// carried over from the version being superseded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmendmentTerms {
    #[serde(default)]
    pub session_id: Option<SessionId>,
    pub salary: Decimal,
    #[serde(default)]
    pub negotiated_cost: Option<Decimal>,
    #[serde(default)]
    pub training_hours: Option<u32>,
    #[serde(default)]
    pub job_title: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl AmendmentTerms {
    /// Merge over the superseded version, if any.
    pub(crate) fn inherit(self, previous: Option<&ContractVersion>) -> ContractTerms {
        let job_title = self
            .job_title
            .filter(|title| !title.trim().is_empty())
            .or_else(|| previous.map(|version| version.job_title.clone()))
            .unwrap_or_else(|| AMENDMENT_JOB_TITLE.to_string());

        ContractTerms {
            session_id: self
                .session_id
                .or_else(|| previous.and_then(|version| version.session_id)),
            salary: self.salary,
            negotiated_cost: self
                .negotiated_cost
                .or_else(|| previous.and_then(|version| version.negotiated_cost)),
            training_hours: self
                .training_hours
                .or_else(|| previous.and_then(|version| version.training_hours)),
            job_title: Some(job_title),
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

impl ContractTerms {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.start_date > self.end_date {
            return Err(DomainError::invalid(format!(
                "contract starts {} after it ends {}",
                self.start_date, self.end_date
            )));
        }
        if self.salary.is_sign_negative() {
            return Err(DomainError::invalid("salary must not be negative"));
        }
        if self
            .negotiated_cost
            .is_some_and(|cost| cost.is_sign_negative())
        {
            return Err(DomainError::invalid("negotiated cost must not be negative"));
        }
        if self.training_hours == Some(0) {
            return Err(DomainError::invalid("training hours must be positive"));
        }
        Ok(())
    }

    pub(crate) fn into_version(
        self,
        id: VersionId,
        tenant_id: TenantId,
        dossier_id: DossierId,
        version_number: u32,
    ) -> ContractVersion {
        let job_title = self
            .job_title
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| DEFAULT_JOB_TITLE.to_string());

        ContractVersion {
            id,
            tenant_id,
            dossier_id,
            session_id: self.session_id,
            version_number,
            salary: self.salary,
            negotiated_cost: self.negotiated_cost,
            training_hours: self.training_hours,
            job_title,
            start_date: self.start_date,
            end_date: self.end_date,
            is_active: true,
        }
    }
}

/// A dossier with its currently active version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DossierView {
    pub dossier: Dossier,
    pub active_version: ContractVersion,
}

/// Listing row: the dossier with its parties resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DossierSummary {
    pub dossier: Dossier,
    pub candidate: Candidate,
    pub company: Company,
    pub active_version: ContractVersion,
}
