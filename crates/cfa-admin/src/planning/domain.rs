use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::store::Record;
use crate::tenancy::{entity_id, TenantId};

entity_id!(SessionId);
entity_id!(DayId);

/// A training cohort with a bounded date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: SessionId,
    pub tenant_id: TenantId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub qualification_id: Option<String>,
}

impl Record for TrainingSession {
    type Id = SessionId;
    const ENTITY: &'static str = "session";

    fn id(&self) -> SessionId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDraft {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub qualification_id: Option<String>,
}

impl SessionDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::invalid("session name must not be empty"));
        }
        if self.start_date > self.end_date {
            return Err(DomainError::invalid(format!(
                "session starts {} after it ends {}",
                self.start_date, self.end_date
            )));
        }
        Ok(())
    }
}

/// One scheduled date of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingDay {
    pub id: DayId,
    pub tenant_id: TenantId,
    pub session_id: SessionId,
    pub date: NaiveDate,
    pub morning: bool,
    pub afternoon: bool,
}

impl Record for TrainingDay {
    type Id = DayId;
    const ENTITY: &'static str = "day";

    fn id(&self) -> DayId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// Half-day applicability of a scheduled date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayFlags {
    pub morning: bool,
    pub afternoon: bool,
}

impl Default for DayFlags {
    fn default() -> Self {
        Self {
            morning: true,
            afternoon: true,
        }
    }
}
