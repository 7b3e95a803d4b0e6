//! Contract dossiers and their append-only version chains.
//!
//! A dossier links one candidate to one company. Its terms live in numbered versions; an
//! amendment (avenant) deactivates the current version and appends its successor inside a
//! single transaction, so exactly one version is active whenever the chain is observed.

pub mod chain;
pub mod domain;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use chain::{
    active_version, amend, contract_calendar, create_dossier, history, list_dossiers, view,
};
pub use domain::{
    AmendmentTerms, ContractTerms, ContractVersion, Dossier, DossierId, DossierSummary,
    DossierView, VersionId,
};
pub use router::contract_router;
pub use service::ContractService;
