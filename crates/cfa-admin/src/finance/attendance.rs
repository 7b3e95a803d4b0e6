use tracing::debug;

use super::domain::{Attendance, AttendanceStatus};
use crate::contracts::domain::VersionId;
use crate::error::DomainError;
use crate::planning::domain::DayId;
use crate::store::{Tables, UnitOfWork};
use crate::tenancy::TenantId;

/// Upsert keyed by (tenant, version, day): a second submission overwrites the status.
///
/// Both the version and the day must belong to `tenant`. Whether the day falls inside the
/// version's contract dates is not checked here; billing bounds what it counts.
pub fn record_attendance(
    uow: &mut UnitOfWork,
    tenant: TenantId,
    version_id: VersionId,
    day_id: DayId,
    status: AttendanceStatus,
) -> Result<Attendance, DomainError> {
    uow.versions.get(tenant, version_id)?;
    uow.days.get(tenant, day_id)?;

    let existing = uow
        .attendance
        .scan_mut(tenant)
        .find(|row| row.version_id == version_id && row.day_id == day_id);
    if let Some(row) = existing {
        debug!(attendance_id = %row.id, ?status, "attendance overwritten");
        row.status = status;
        return Ok(row.clone());
    }

    Ok(uow.attendance.insert_with(|id| Attendance {
        id,
        tenant_id: tenant,
        version_id,
        day_id,
        status,
    }))
}

/// Attendance rows of one version, in id order.
pub fn version_attendance(
    tables: &Tables,
    tenant: TenantId,
    version_id: VersionId,
) -> Vec<Attendance> {
    tables
        .attendance
        .scan(tenant)
        .filter(|row| row.version_id == version_id)
        .cloned()
        .collect()
}
