use serde::{Deserialize, Serialize};

use crate::store::Record;
use crate::tenancy::{entity_id, TenantId};

entity_id!(CandidateId);
entity_id!(CompanyId);

/// Isolation boundary. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub slug: String,
}

impl Record for Tenant {
    type Id = TenantId;
    const ENTITY: &'static str = "tenant";

    fn id(&self) -> TenantId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.id
    }
}

/// Recruitment funnel position of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CandidateStatus {
    #[default]
    New,
    Admissible,
    Interview,
    Placed,
    Rejected,
}

impl CandidateStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CandidateStatus::New => "new",
            CandidateStatus::Admissible => "admissible",
            CandidateStatus::Interview => "interview",
            CandidateStatus::Placed => "placed",
            CandidateStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Civility {
    M,
    Mme,
}

/// Fields accepted when registering a candidate directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDraft {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub civility: Option<Civility>,
    #[serde(default)]
    pub status: Option<CandidateStatus>,
}

/// Text already extracted from an uploaded CV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvUpload {
    pub filename: String,
    pub raw_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub tenant_id: TenantId,
    pub first_name: String,
    pub last_name: String,
    pub civility: Option<Civility>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: CandidateStatus,
    pub cv_filename: Option<String>,
    #[serde(skip_serializing)]
    pub cv_raw_text: Option<String>,
}

impl Record for Candidate {
    type Id = CandidateId;
    const ENTITY: &'static str = "candidate";

    fn id(&self) -> CandidateId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDraft {
    pub legal_name: String,
    #[serde(default)]
    pub siret: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub idcc_code: Option<String>,
}

/// Employer party to a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub tenant_id: TenantId,
    pub legal_name: String,
    pub siret: Option<String>,
    pub address: Option<String>,
    pub idcc_code: Option<String>,
}

impl Company {
    pub fn from_draft(id: CompanyId, tenant_id: TenantId, draft: CompanyDraft) -> Self {
        Self {
            id,
            tenant_id,
            legal_name: draft.legal_name,
            siret: draft.siret,
            address: draft.address,
            idcc_code: draft.idcc_code,
        }
    }
}

impl Record for Company {
    type Id = CompanyId;
    const ENTITY: &'static str = "company";

    fn id(&self) -> CompanyId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}
