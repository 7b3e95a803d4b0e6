//! Tenants, candidates and companies: the parties a contract dossier refers to.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{
    Candidate, CandidateDraft, CandidateId, CandidateStatus, Civility, Company, CompanyDraft,
    CompanyId, CvUpload, Tenant,
};
pub use router::registry_router;
pub use service::{detect_email, RegistryService};
