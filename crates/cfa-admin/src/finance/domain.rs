use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::contracts::domain::{DossierId, VersionId};
use crate::planning::domain::DayId;
use crate::store::Record;
use crate::tenancy::{entity_id, TenantId};

entity_id!(AttendanceId);
entity_id!(InvoiceId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    ExcusedAbsent,
    UnexcusedAbsent,
}

/// Presence of one contract version on one scheduled day. Unique per (tenant, version, day).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: AttendanceId,
    pub tenant_id: TenantId,
    pub version_id: VersionId,
    pub day_id: DayId,
    pub status: AttendanceStatus,
}

impl Record for Attendance {
    type Id = AttendanceId;
    const ENTITY: &'static str = "attendance";

    fn id(&self) -> AttendanceId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Draft,
    Issued,
    Paid,
}

impl InvoiceStatus {
    /// Invoices only move forward: draft, then issued, then paid.
    pub fn can_transition_to(self, next: InvoiceStatus) -> bool {
        matches!(
            (self, next),
            (InvoiceStatus::Draft, InvoiceStatus::Issued)
                | (InvoiceStatus::Issued, InvoiceStatus::Paid)
        )
    }

    /// Whether the amount counts as realized revenue.
    pub fn is_realized(self) -> bool {
        matches!(self, InvoiceStatus::Issued | InvoiceStatus::Paid)
    }
}

/// Persisted snapshot of a billed period. The amount is never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub tenant_id: TenantId,
    pub dossier_id: DossierId,
    pub number: String,
    pub amount: Decimal,
    pub status: InvoiceStatus,
    pub issued_on: NaiveDate,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

impl Record for Invoice {
    type Id = InvoiceId;
    const ENTITY: &'static str = "invoice";

    fn id(&self) -> InvoiceId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRequest {
    pub version_id: VersionId,
    pub day_id: DayId,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRequest {
    pub dossier_id: DossierId,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    #[serde(default)]
    pub issued_on: Option<NaiveDate>,
}

/// Intermediate figures of a billing run, kept for audit alongside the amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingBreakdown {
    pub hourly_rate: Decimal,
    pub scheduled_days: u32,
    pub unexcused_absences: u32,
    pub billable_days: i64,
    pub billable_hours: Decimal,
    pub amount: Decimal,
}

impl BillingBreakdown {
    /// Result for a version without negotiated economics.
    pub fn not_billable() -> Self {
        Self {
            hourly_rate: Decimal::ZERO,
            scheduled_days: 0,
            unexcused_absences: 0,
            billable_days: 0,
            billable_hours: Decimal::ZERO,
            amount: Decimal::new(0, 2),
        }
    }
}
