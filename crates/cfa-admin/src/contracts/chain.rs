use super::domain::{
    AmendmentTerms, ContractTerms, ContractVersion, Dossier, DossierId, DossierSummary,
    DossierView,
};
use crate::error::DomainError;
use crate::planning::domain::TrainingDay;
use crate::registry::domain::{CandidateId, CompanyId};
use crate::store::{Page, Tables, UnitOfWork};
use crate::tenancy::TenantId;

/// Open a dossier with its first version, active.
///
/// Candidate, company and any linked session must belong to `tenant`; a foreign or missing
/// reference is reported as `NotFound`.
pub fn create_dossier(
    uow: &mut UnitOfWork,
    tenant: TenantId,
    candidate_id: CandidateId,
    company_id: CompanyId,
    terms: ContractTerms,
) -> Result<DossierView, DomainError> {
    terms.validate()?;
    uow.candidates.get(tenant, candidate_id)?;
    uow.companies.get(tenant, company_id)?;
    if let Some(session_id) = terms.session_id {
        uow.sessions.get(tenant, session_id)?;
    }

    let dossier = uow.dossiers.insert_with(|id| Dossier {
        id,
        tenant_id: tenant,
        candidate_id,
        company_id,
    });
    let active_version = uow
        .versions
        .insert_with(|id| terms.into_version(id, tenant, dossier.id, 1));

    Ok(DossierView {
        dossier,
        active_version,
    })
}

/// Supersede the active version with a new one built from `terms`.
///
/// Omitted session, negotiated cost, training hours and job title are inherited from the
/// superseded version. The deactivation and the insertion happen in the caller's unit of
/// work, so they commit or roll back together.
pub fn amend(
    uow: &mut UnitOfWork,
    tenant: TenantId,
    dossier_id: DossierId,
    terms: AmendmentTerms,
) -> Result<ContractVersion, DomainError> {
    let chain = history(uow, tenant, dossier_id)?;
    let previous = current_version(&chain, dossier_id)?.cloned();

    let terms = terms.inherit(previous.as_ref());
    terms.validate()?;
    if let Some(session_id) = terms.session_id {
        uow.sessions.get(tenant, session_id)?;
    }

    let version_number = chain
        .last()
        .map_or(1, |latest| latest.version_number + 1);

    if let Some(previous) = &previous {
        uow.versions.get_mut(tenant, previous.id)?.is_active = false;
    }

    Ok(uow
        .versions
        .insert_with(|id| terms.into_version(id, tenant, dossier_id, version_number)))
}

/// Every version of a dossier, oldest first.
pub fn history(
    tables: &Tables,
    tenant: TenantId,
    dossier_id: DossierId,
) -> Result<Vec<ContractVersion>, DomainError> {
    tables.dossiers.get(tenant, dossier_id)?;
    let mut chain: Vec<ContractVersion> = tables
        .versions
        .scan(tenant)
        .filter(|version| version.dossier_id == dossier_id)
        .cloned()
        .collect();
    chain.sort_by_key(|version| version.version_number);
    Ok(chain)
}

pub fn active_version(
    tables: &Tables,
    tenant: TenantId,
    dossier_id: DossierId,
) -> Result<ContractVersion, DomainError> {
    let chain = history(tables, tenant, dossier_id)?;
    current_version(&chain, dossier_id)?
        .cloned()
        .ok_or_else(|| DomainError::conflict(format!("dossier {dossier_id} has no versions")))
}

/// The single active version of a chain. An empty chain has none; a non-empty chain with
/// zero or several active versions is corrupt.
fn current_version(
    chain: &[ContractVersion],
    dossier_id: DossierId,
) -> Result<Option<&ContractVersion>, DomainError> {
    let mut active = chain.iter().filter(|version| version.is_active);
    match (active.next(), active.next()) {
        (Some(current), None) => Ok(Some(current)),
        (None, _) if chain.is_empty() => Ok(None),
        (None, _) => Err(DomainError::conflict(format!(
            "dossier {dossier_id} has {} versions but none is active",
            chain.len()
        ))),
        (Some(_), Some(_)) => Err(DomainError::conflict(format!(
            "dossier {dossier_id} has more than one active version"
        ))),
    }
}

pub fn view(
    tables: &Tables,
    tenant: TenantId,
    dossier_id: DossierId,
) -> Result<DossierView, DomainError> {
    let dossier = tables.dossiers.get(tenant, dossier_id)?.clone();
    let active_version = active_version(tables, tenant, dossier_id)?;
    Ok(DossierView {
        dossier,
        active_version,
    })
}

/// Dossiers of the tenant with their parties and active version, in id order.
pub fn list_dossiers(
    tables: &Tables,
    tenant: TenantId,
    page: Page,
) -> Result<Vec<DossierSummary>, DomainError> {
    page.collect(tables.dossiers.scan(tenant))
        .into_iter()
        .map(|dossier| -> Result<DossierSummary, DomainError> {
            Ok(DossierSummary {
                dossier: dossier.clone(),
                candidate: tables.candidates.get(tenant, dossier.candidate_id)?.clone(),
                company: tables.companies.get(tenant, dossier.company_id)?.clone(),
                active_version: active_version(tables, tenant, dossier.id)?,
            })
        })
        .collect()
}

/// Scheduled days of the active version's session that fall within the contract dates.
pub fn contract_calendar(
    tables: &Tables,
    tenant: TenantId,
    dossier_id: DossierId,
) -> Result<Vec<TrainingDay>, DomainError> {
    let version = active_version(tables, tenant, dossier_id)?;
    let session_id = version.session_id.ok_or_else(|| {
        DomainError::conflict(format!(
            "active version of dossier {dossier_id} is not linked to a session"
        ))
    })?;

    let mut days: Vec<TrainingDay> = tables
        .days
        .scan(tenant)
        .filter(|day| {
            day.session_id == session_id
                && day.date >= version.start_date
                && day.date <= version.end_date
        })
        .cloned()
        .collect();
    days.sort_by_key(|day| day.date);
    Ok(days)
}
