use chrono::{Datelike, NaiveDate};
use tracing::debug;

use super::domain::{DayFlags, DayId, SessionId, TrainingDay};
use crate::error::DomainError;
use crate::store::{Tables, UnitOfWork};
use crate::tenancy::TenantId;

/// Weekdays selected for training. Index 0 is Monday and 6 is Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub fn from_indices(indices: &[u8]) -> Result<Self, DomainError> {
        indices.iter().try_fold(Self::default(), |set, &index| {
            if index > 6 {
                return Err(DomainError::invalid(format!(
                    "weekday {index} out of range (0 = Monday .. 6 = Sunday)"
                )));
            }
            Ok(Self(set.0 | 1 << index))
        })
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        self.0 & (1 << date.weekday().num_days_from_monday()) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Replace the whole schedule of a session with one day per matching date of
/// `[start, end]`, both half-days enabled. Returns the number of days created.
///
/// This is a destructive regeneration: every existing day of the session is deleted first,
/// including flags edited by hand since the previous run. Attendance rows pointing at the
/// deleted days are left in place and simply stop matching any scheduled date.
pub fn generate_calendar(
    uow: &mut UnitOfWork,
    tenant: TenantId,
    session_id: SessionId,
    start: NaiveDate,
    end: NaiveDate,
    weekdays: WeekdaySet,
) -> Result<usize, DomainError> {
    if start > end {
        return Err(DomainError::invalid(format!(
            "calendar range starts {start} after it ends {end}"
        )));
    }
    uow.sessions.get(tenant, session_id)?;

    let removed = uow
        .days
        .delete_where(tenant, |day| day.session_id == session_id);

    let flags = DayFlags::default();
    let mut created = 0;
    for date in start.iter_days().take_while(|date| *date <= end) {
        if !weekdays.contains(date) {
            continue;
        }
        uow.days.insert_with(|id| TrainingDay {
            id,
            tenant_id: tenant,
            session_id,
            date,
            morning: flags.morning,
            afternoon: flags.afternoon,
        });
        created += 1;
    }

    debug!(%session_id, removed, created, "session calendar regenerated");
    Ok(created)
}

/// Days of a session ordered by date.
pub fn session_days(
    tables: &Tables,
    tenant: TenantId,
    session_id: SessionId,
) -> Result<Vec<TrainingDay>, DomainError> {
    tables.sessions.get(tenant, session_id)?;
    let mut days: Vec<TrainingDay> = tables
        .days
        .scan(tenant)
        .filter(|day| day.session_id == session_id)
        .cloned()
        .collect();
    days.sort_by_key(|day| day.date);
    Ok(days)
}

/// Hand-edit the half-day flags of one day. Lost on the next regeneration.
pub fn set_day_flags(
    uow: &mut UnitOfWork,
    tenant: TenantId,
    day_id: DayId,
    flags: DayFlags,
) -> Result<TrainingDay, DomainError> {
    let day = uow.days.get_mut(tenant, day_id)?;
    day.morning = flags.morning;
    day.afternoon = flags.afternoon;
    Ok(day.clone())
}
