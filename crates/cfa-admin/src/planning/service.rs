use chrono::NaiveDate;
use tracing::info;

use super::calendar::{self, WeekdaySet};
use super::domain::{DayFlags, DayId, SessionDraft, SessionId, TrainingDay, TrainingSession};
use crate::error::DomainError;
use crate::store::{Page, Repository, Store};
use crate::tenancy::Principal;

/// Session management and calendar generation for the acting tenant.
#[derive(Debug, Clone)]
pub struct PlanningService<R = Store> {
    store: R,
}

impl<R> PlanningService<R>
where
    R: Repository,
{
    pub fn new(store: R) -> Self {
        Self { store }
    }

    pub fn create_session(
        &self,
        principal: &Principal,
        draft: SessionDraft,
    ) -> Result<TrainingSession, DomainError> {
        draft.validate()?;
        let tenant_id = principal.tenant_id;

        let session = self.store.transaction(|uow| -> Result<_, DomainError> {
            Ok(uow.sessions.insert_with(|id| TrainingSession {
                id,
                tenant_id,
                name: draft.name.trim().to_string(),
                start_date: draft.start_date,
                end_date: draft.end_date,
                qualification_id: draft.qualification_id,
            }))
        })?;

        info!(tenant_id = %tenant_id, session_id = %session.id, "session created");
        Ok(session)
    }

    pub fn session(
        &self,
        principal: &Principal,
        session_id: SessionId,
    ) -> Result<TrainingSession, DomainError> {
        self.store
            .read(|tables| tables.sessions.get(principal.tenant_id, session_id).cloned())
    }

    pub fn sessions(&self, principal: &Principal, page: Page) -> Vec<TrainingSession> {
        self.store
            .read(|tables| page.collect(tables.sessions.scan(principal.tenant_id).cloned()))
    }

    /// Regenerate the calendar of a session. Without an explicit range the session's own
    /// dates are used. Any previous days of the session, and hand-edited flags, are lost.
    pub fn generate_calendar(
        &self,
        principal: &Principal,
        session_id: SessionId,
        weekdays: &[u8],
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<usize, DomainError> {
        let weekdays = WeekdaySet::from_indices(weekdays)?;
        let tenant = principal.tenant_id;

        let created = self.store.transaction(|uow| {
            let (start, end) = match range {
                Some(range) => range,
                None => {
                    let session = uow.sessions.get(tenant, session_id)?;
                    (session.start_date, session.end_date)
                }
            };
            calendar::generate_calendar(uow, tenant, session_id, start, end, weekdays)
        })?;

        info!(
            tenant_id = %tenant,
            session_id = %session_id,
            created,
            "session calendar generated"
        );
        Ok(created)
    }

    pub fn days(
        &self,
        principal: &Principal,
        session_id: SessionId,
    ) -> Result<Vec<TrainingDay>, DomainError> {
        self.store
            .read(|tables| calendar::session_days(tables, principal.tenant_id, session_id))
    }

    pub fn set_day_flags(
        &self,
        principal: &Principal,
        day_id: DayId,
        flags: DayFlags,
    ) -> Result<TrainingDay, DomainError> {
        let day = self
            .store
            .transaction(|uow| calendar::set_day_flags(uow, principal.tenant_id, day_id, flags))?;

        info!(
            tenant_id = %principal.tenant_id,
            day_id = %day_id,
            morning = flags.morning,
            afternoon = flags.afternoon,
            "day flags updated"
        );
        Ok(day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenancy::{TenantId, UserId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn principal() -> Principal {
        Principal::new(UserId(1), TenantId(1), "admin")
    }

    fn draft() -> SessionDraft {
        SessionDraft {
            name: "CAP Boulanger".to_string(),
            start_date: date(2024, 1, 1),
            end_date: date(2024, 1, 31),
            qualification_id: None,
        }
    }

    #[test]
    fn calendar_defaults_to_session_dates() {
        let planning = PlanningService::new(Store::new());
        let session = planning
            .create_session(&principal(), draft())
            .expect("session created");

        // Mondays of January 2024: 1, 8, 15, 22, 29.
        let created = planning
            .generate_calendar(&principal(), session.id, &[0], None)
            .expect("calendar generated");
        assert_eq!(created, 5);
    }

    #[test]
    fn explicit_range_overrides_session_dates() {
        let planning = PlanningService::new(Store::new());
        let session = planning
            .create_session(&principal(), draft())
            .expect("session created");

        let created = planning
            .generate_calendar(
                &principal(),
                session.id,
                &[0, 2],
                Some((date(2024, 1, 1), date(2024, 1, 14))),
            )
            .expect("calendar generated");
        assert_eq!(created, 4);
    }

    #[test]
    fn inverted_session_dates_are_rejected() {
        let planning = PlanningService::new(Store::new());
        let mut bad = draft();
        bad.end_date = date(2023, 12, 1);
        assert!(matches!(
            planning.create_session(&principal(), bad),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn day_flags_can_be_edited() {
        let planning = PlanningService::new(Store::new());
        let session = planning
            .create_session(&principal(), draft())
            .expect("session created");
        planning
            .generate_calendar(&principal(), session.id, &[0], None)
            .expect("calendar generated");
        let day = planning.days(&principal(), session.id).expect("days")[0].clone();

        let edited = planning
            .set_day_flags(
                &principal(),
                day.id,
                DayFlags {
                    morning: false,
                    afternoon: true,
                },
            )
            .expect("flags edited");
        assert!(!edited.morning);
        assert!(edited.afternoon);
    }
}
