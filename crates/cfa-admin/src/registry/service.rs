use std::sync::OnceLock;

use regex::Regex;
use tracing::{info, warn};

use super::domain::{
    Candidate, CandidateDraft, CandidateId, CandidateStatus, Company, CompanyDraft, CompanyId,
    CvUpload, Tenant,
};
use crate::error::DomainError;
use crate::store::{Page, Repository, Store};
use crate::tenancy::{Principal, TenantId};

const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}";
const CV_FIRST_NAME: &str = "Candidat";
const CV_LAST_NAME: &str = "Inconnu";

static EMAIL_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

/// First e-mail address found in free text, if any.
pub fn detect_email(text: &str) -> Option<String> {
    let regex = EMAIL_REGEX.get_or_init(|| match Regex::new(EMAIL_PATTERN) {
        Ok(regex) => Some(regex),
        Err(err) => {
            warn!(%err, "e-mail detection disabled");
            None
        }
    });

    regex
        .as_ref()?
        .find(text)
        .map(|found| found.as_str().to_string())
}

fn required(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::invalid(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Plain create/list/filter operations over the parties of a dossier.
#[derive(Debug, Clone)]
pub struct RegistryService<R = Store> {
    store: R,
}

impl<R> RegistryService<R>
where
    R: Repository,
{
    pub fn new(store: R) -> Self {
        Self { store }
    }

    pub fn register_tenant(&self, name: &str, slug: &str) -> Result<Tenant, DomainError> {
        let name = required("tenant name", name)?;
        let slug = required("tenant slug", slug)?.to_ascii_lowercase();

        let tenant = self.store.transaction(|uow| {
            if uow.tenants.all().any(|tenant| tenant.slug == slug) {
                return Err(DomainError::conflict(format!(
                    "tenant slug '{slug}' already registered"
                )));
            }
            Ok(uow.tenants.insert_with(|id| Tenant {
                id,
                name: name.clone(),
                slug: slug.clone(),
            }))
        })?;

        info!(tenant_id = %tenant.id, slug = %tenant.slug, "tenant registered");
        Ok(tenant)
    }

    pub fn tenant(&self, tenant_id: TenantId) -> Result<Tenant, DomainError> {
        self.store
            .read(|tables| tables.tenants.get(tenant_id, tenant_id).cloned())
    }

    pub fn create_candidate(
        &self,
        principal: &Principal,
        draft: CandidateDraft,
    ) -> Result<Candidate, DomainError> {
        let first_name = required("first_name", &draft.first_name)?;
        let last_name = required("last_name", &draft.last_name)?;
        let tenant_id = principal.tenant_id;

        let candidate = self.store.transaction(|uow| -> Result<_, DomainError> {
            Ok(uow.candidates.insert_with(|id| Candidate {
                id,
                tenant_id,
                first_name,
                last_name,
                civility: draft.civility,
                email: optional(draft.email),
                phone: optional(draft.phone),
                status: draft.status.unwrap_or_default(),
                cv_filename: None,
                cv_raw_text: None,
            }))
        })?;

        info!(tenant_id = %tenant_id, candidate_id = %candidate.id, "candidate created");
        Ok(candidate)
    }

    /// Register a skeleton candidate from an uploaded CV. Names are placeholders until a
    /// recruiter completes the record; the e-mail is lifted from the CV text when present.
    pub fn create_candidate_from_cv(
        &self,
        principal: &Principal,
        upload: CvUpload,
    ) -> Result<Candidate, DomainError> {
        let filename = required("filename", &upload.filename)?;
        let email = detect_email(&upload.raw_text);
        let tenant_id = principal.tenant_id;

        let candidate = self.store.transaction(|uow| -> Result<_, DomainError> {
            Ok(uow.candidates.insert_with(|id| Candidate {
                id,
                tenant_id,
                first_name: CV_FIRST_NAME.to_string(),
                last_name: CV_LAST_NAME.to_string(),
                civility: None,
                email,
                phone: None,
                status: CandidateStatus::New,
                cv_filename: Some(filename),
                cv_raw_text: Some(upload.raw_text),
            }))
        })?;

        info!(
            tenant_id = %tenant_id,
            candidate_id = %candidate.id,
            email_detected = candidate.email.is_some(),
            "candidate created from cv"
        );
        Ok(candidate)
    }

    pub fn candidate(
        &self,
        principal: &Principal,
        candidate_id: CandidateId,
    ) -> Result<Candidate, DomainError> {
        self.store.read(|tables| {
            tables
                .candidates
                .get(principal.tenant_id, candidate_id)
                .cloned()
        })
    }

    pub fn candidates(
        &self,
        principal: &Principal,
        status: Option<CandidateStatus>,
        page: Page,
    ) -> Vec<Candidate> {
        self.store.read(|tables| {
            let rows = tables
                .candidates
                .scan(principal.tenant_id)
                .filter(|candidate| status.map_or(true, |wanted| candidate.status == wanted))
                .cloned();
            page.collect(rows)
        })
    }

    pub fn update_candidate_status(
        &self,
        principal: &Principal,
        candidate_id: CandidateId,
        status: CandidateStatus,
    ) -> Result<Candidate, DomainError> {
        let candidate = self.store.transaction(|uow| {
            let candidate = uow.candidates.get_mut(principal.tenant_id, candidate_id)?;
            candidate.status = status;
            Ok::<_, DomainError>(candidate.clone())
        })?;

        info!(
            tenant_id = %principal.tenant_id,
            candidate_id = %candidate_id,
            status = status.label(),
            "candidate status updated"
        );
        Ok(candidate)
    }

    pub fn candidate_exists(&self, tenant_id: TenantId, candidate_id: CandidateId) -> bool {
        self.store
            .read(|tables| tables.candidates.exists(tenant_id, candidate_id))
    }

    pub fn create_company(
        &self,
        principal: &Principal,
        mut draft: CompanyDraft,
    ) -> Result<Company, DomainError> {
        draft.legal_name = required("legal_name", &draft.legal_name)?;
        draft.siret = optional(draft.siret);
        draft.address = optional(draft.address);
        draft.idcc_code = optional(draft.idcc_code);
        let tenant_id = principal.tenant_id;

        let company = self.store.transaction(|uow| -> Result<_, DomainError> {
            Ok(uow
                .companies
                .insert_with(|id| Company::from_draft(id, tenant_id, draft)))
        })?;

        info!(tenant_id = %tenant_id, company_id = %company.id, "company created");
        Ok(company)
    }

    pub fn company(
        &self,
        principal: &Principal,
        company_id: CompanyId,
    ) -> Result<Company, DomainError> {
        self.store
            .read(|tables| tables.companies.get(principal.tenant_id, company_id).cloned())
    }

    pub fn companies(&self, principal: &Principal, page: Page) -> Vec<Company> {
        self.store
            .read(|tables| page.collect(tables.companies.scan(principal.tenant_id).cloned()))
    }

    pub fn company_exists(&self, tenant_id: TenantId, company_id: CompanyId) -> bool {
        self.store
            .read(|tables| tables.companies.exists(tenant_id, company_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenancy::UserId;

    fn principal(tenant: u64) -> Principal {
        Principal::new(UserId(1), TenantId(tenant), "admin")
    }

    fn draft(first: &str, last: &str) -> CandidateDraft {
        CandidateDraft {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: Some("  jean@example.com ".to_string()),
            phone: None,
            civility: None,
            status: None,
        }
    }

    #[test]
    fn detect_email_finds_first_address() {
        let text = "Jean Dupont\nContact: jean.dupont@cfa-lyon.fr / backup@example.org";
        assert_eq!(
            detect_email(text).as_deref(),
            Some("jean.dupont@cfa-lyon.fr")
        );
        assert_eq!(detect_email("no address here"), None);
    }

    #[test]
    fn candidates_default_to_new_and_trim_fields() {
        let registry = RegistryService::new(Store::new());
        let candidate = registry
            .create_candidate(&principal(1), draft(" Jean ", "Dupont"))
            .expect("candidate created");

        assert_eq!(candidate.status, CandidateStatus::New);
        assert_eq!(candidate.first_name, "Jean");
        assert_eq!(candidate.email.as_deref(), Some("jean@example.com"));
    }

    #[test]
    fn blank_names_are_rejected() {
        let registry = RegistryService::new(Store::new());
        match registry.create_candidate(&principal(1), draft("  ", "Dupont")) {
            Err(DomainError::InvalidInput(message)) => assert!(message.contains("first_name")),
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn cv_upload_creates_placeholder_candidate() {
        let registry = RegistryService::new(Store::new());
        let candidate = registry
            .create_candidate_from_cv(
                &principal(1),
                CvUpload {
                    filename: "cv.pdf".to_string(),
                    raw_text: "Experience ... mail: alice@example.com".to_string(),
                },
            )
            .expect("skeleton created");

        assert_eq!(candidate.first_name, "Candidat");
        assert_eq!(candidate.last_name, "Inconnu");
        assert_eq!(candidate.email.as_deref(), Some("alice@example.com"));
        assert_eq!(candidate.cv_filename.as_deref(), Some("cv.pdf"));
    }

    #[test]
    fn candidate_listing_filters_by_status_and_tenant() {
        let registry = RegistryService::new(Store::new());
        let placed = registry
            .create_candidate(&principal(1), draft("Jean", "Dupont"))
            .expect("created");
        registry
            .create_candidate(&principal(1), draft("Marie", "Curie"))
            .expect("created");
        registry
            .create_candidate(&principal(2), draft("Paul", "Other"))
            .expect("created");
        registry
            .update_candidate_status(&principal(1), placed.id, CandidateStatus::Placed)
            .expect("status updated");

        let all = registry.candidates(&principal(1), None, Page::default());
        assert_eq!(all.len(), 2);

        let only_placed =
            registry.candidates(&principal(1), Some(CandidateStatus::Placed), Page::default());
        assert_eq!(only_placed.len(), 1);
        assert_eq!(only_placed[0].id, placed.id);
    }

    #[test]
    fn status_update_on_foreign_candidate_is_not_found() {
        let registry = RegistryService::new(Store::new());
        let candidate = registry
            .create_candidate(&principal(1), draft("Jean", "Dupont"))
            .expect("created");

        let result =
            registry.update_candidate_status(&principal(2), candidate.id, CandidateStatus::Placed);
        assert_eq!(
            result,
            Err(DomainError::not_found("candidate", candidate.id))
        );
        let unchanged = registry
            .candidate(&principal(1), candidate.id)
            .expect("still visible to owner");
        assert_eq!(unchanged.status, CandidateStatus::New);
    }

    #[test]
    fn tenant_slugs_are_unique() {
        let registry = RegistryService::new(Store::new());
        let lyon = registry
            .register_tenant("CFA Lyon", "Lyon")
            .expect("tenant registered");
        assert_eq!(lyon.slug, "lyon");
        assert_eq!(registry.tenant(lyon.id), Ok(lyon));

        match registry.register_tenant("CFA Lyon bis", "lyon") {
            Err(DomainError::Conflict(_)) => {}
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn companies_are_scoped_to_their_tenant() {
        let registry = RegistryService::new(Store::new());
        let company = registry
            .create_company(
                &principal(1),
                CompanyDraft {
                    legal_name: "Boulangerie Martin".to_string(),
                    siret: Some(" 12345678900011 ".to_string()),
                    address: Some("".to_string()),
                    idcc_code: None,
                },
            )
            .expect("company created");

        assert_eq!(company.siret.as_deref(), Some("12345678900011"));
        assert_eq!(company.address, None);
        assert!(registry.company_exists(TenantId(1), company.id));
        assert!(!registry.company_exists(TenantId(2), company.id));
        assert_eq!(
            registry.company(&principal(2), company.id),
            Err(DomainError::not_found("company", company.id))
        );
        assert!(registry.companies(&principal(2), Page::default()).is_empty());
    }
}
