use tracing::info;

use super::chain;
use super::domain::{
    AmendmentTerms, ContractTerms, ContractVersion, DossierId, DossierSummary, DossierView,
};
use crate::error::DomainError;
use crate::planning::domain::TrainingDay;
use crate::registry::domain::{CandidateId, CompanyId};
use crate::store::{Page, Repository, Store};
use crate::tenancy::Principal;

/// Service wrapping each version-chain operation in its own transaction.
#[derive(Debug, Clone)]
pub struct ContractService<R = Store> {
    store: R,
}

impl<R> ContractService<R>
where
    R: Repository,
{
    pub fn new(store: R) -> Self {
        Self { store }
    }

    pub fn create_dossier(
        &self,
        principal: &Principal,
        candidate_id: CandidateId,
        company_id: CompanyId,
        terms: ContractTerms,
    ) -> Result<DossierView, DomainError> {
        let view = self.store.transaction(|uow| {
            chain::create_dossier(uow, principal.tenant_id, candidate_id, company_id, terms)
        })?;

        info!(
            tenant_id = %principal.tenant_id,
            user_id = %principal.user_id,
            dossier_id = %view.dossier.id,
            "dossier opened with version 1"
        );
        Ok(view)
    }

    /// Record an amendment. Retrying after a failure is safe: the new version is always
    /// derived from the chain as currently committed.
    pub fn amend(
        &self,
        principal: &Principal,
        dossier_id: DossierId,
        terms: AmendmentTerms,
    ) -> Result<ContractVersion, DomainError> {
        let version = self
            .store
            .transaction(|uow| chain::amend(uow, principal.tenant_id, dossier_id, terms))?;

        info!(
            tenant_id = %principal.tenant_id,
            user_id = %principal.user_id,
            dossier_id = %dossier_id,
            version_number = version.version_number,
            "amendment recorded"
        );
        Ok(version)
    }

    pub fn dossier(
        &self,
        principal: &Principal,
        dossier_id: DossierId,
    ) -> Result<DossierView, DomainError> {
        self.store
            .read(|tables| chain::view(tables, principal.tenant_id, dossier_id))
    }

    pub fn active_version(
        &self,
        principal: &Principal,
        dossier_id: DossierId,
    ) -> Result<ContractVersion, DomainError> {
        self.store
            .read(|tables| chain::active_version(tables, principal.tenant_id, dossier_id))
    }

    pub fn history(
        &self,
        principal: &Principal,
        dossier_id: DossierId,
    ) -> Result<Vec<ContractVersion>, DomainError> {
        self.store
            .read(|tables| chain::history(tables, principal.tenant_id, dossier_id))
    }

    pub fn dossiers(
        &self,
        principal: &Principal,
        page: Page,
    ) -> Result<Vec<DossierSummary>, DomainError> {
        self.store
            .read(|tables| chain::list_dossiers(tables, principal.tenant_id, page))
    }

    pub fn calendar(
        &self,
        principal: &Principal,
        dossier_id: DossierId,
    ) -> Result<Vec<TrainingDay>, DomainError> {
        self.store
            .read(|tables| chain::contract_calendar(tables, principal.tenant_id, dossier_id))
    }
}
