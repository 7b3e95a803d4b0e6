use std::fmt;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use super::domain::{AttendanceStatus, BillingBreakdown};
use crate::config::BillingConfig;
use crate::contracts::domain::ContractVersion;
use crate::error::DomainError;
use crate::planning::domain::TrainingDay;
use crate::store::Tables;

const AMOUNT_SCALE: u32 = 2;

/// Billable hours credited for one scheduled day.
pub trait DayHours: fmt::Debug + Send + Sync {
    fn hours(&self, day: &TrainingDay) -> Decimal;
}

/// Same number of hours for every day, whatever its half-day flags say.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatDayHours {
    hours_per_day: Decimal,
}

impl FlatDayHours {
    pub fn new(config: &BillingConfig) -> Self {
        Self {
            hours_per_day: config.hours_per_day,
        }
    }
}

impl DayHours for FlatDayHours {
    fn hours(&self, _day: &TrainingDay) -> Decimal {
        self.hours_per_day
    }
}

/// Derives the billable amount of a contract version over a period.
///
/// Scheduled days are counted inside both the period and the version's contract dates,
/// while unexcused absences are only bounded by the period. The result is not floored: a
/// negative amount means the attendance data disagrees with the schedule.
#[derive(Debug, Clone)]
pub struct BillingCalculator<H = FlatDayHours> {
    day_hours: H,
}

impl BillingCalculator<FlatDayHours> {
    pub fn new(config: &BillingConfig) -> Self {
        Self::with_day_hours(FlatDayHours::new(config))
    }
}

impl<H: DayHours> BillingCalculator<H> {
    pub fn with_day_hours(day_hours: H) -> Self {
        Self { day_hours }
    }

    pub fn amount(
        &self,
        tables: &Tables,
        version: &ContractVersion,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<Decimal, DomainError> {
        Ok(self
            .breakdown(tables, version, period_start, period_end)?
            .amount)
    }

    pub fn breakdown(
        &self,
        tables: &Tables,
        version: &ContractVersion,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<BillingBreakdown, DomainError> {
        if period_start > period_end {
            return Err(DomainError::invalid(format!(
                "billing period starts {period_start} after it ends {period_end}"
            )));
        }

        let (cost, hours) = match (version.negotiated_cost, version.training_hours) {
            (Some(cost), Some(hours)) if hours > 0 => (cost, Decimal::from(hours)),
            _ => return Ok(BillingBreakdown::not_billable()),
        };
        let hourly_rate = cost
            .checked_div(hours)
            .ok_or_else(|| DomainError::invalid("hourly rate out of range"))?;

        let tenant = version.tenant_id;
        let in_period = |date: NaiveDate| date >= period_start && date <= period_end;

        let scheduled: Vec<&TrainingDay> = match version.session_id {
            Some(session_id) => tables
                .days
                .scan(tenant)
                .filter(|day| {
                    day.session_id == session_id
                        && in_period(day.date)
                        && day.date >= version.start_date
                        && day.date <= version.end_date
                })
                .collect(),
            None => Vec::new(),
        };

        // Only the billing period bounds absences. Rows whose day was regenerated away
        // no longer resolve and are not counted.
        let unexcused: Vec<&TrainingDay> = tables
            .attendance
            .scan(tenant)
            .filter(|row| {
                row.version_id == version.id && row.status == AttendanceStatus::UnexcusedAbsent
            })
            .filter_map(|row| tables.days.find(tenant, row.day_id))
            .filter(|day| in_period(day.date))
            .collect();

        let scheduled_hours: Decimal = scheduled.iter().map(|day| self.day_hours.hours(day)).sum();
        let absent_hours: Decimal = unexcused.iter().map(|day| self.day_hours.hours(day)).sum();
        let billable_hours = scheduled_hours - absent_hours;

        let mut amount = billable_hours
            .checked_mul(hourly_rate)
            .ok_or_else(|| DomainError::invalid("billing amount out of range"))?
            .round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        amount.rescale(AMOUNT_SCALE);

        let breakdown = BillingBreakdown {
            hourly_rate,
            scheduled_days: count(scheduled.len()),
            unexcused_absences: count(unexcused.len()),
            billable_days: scheduled.len() as i64 - unexcused.len() as i64,
            billable_hours,
            amount,
        };
        debug!(
            version_id = %version.id,
            scheduled_days = breakdown.scheduled_days,
            unexcused_absences = breakdown.unexcused_absences,
            amount = %breakdown.amount,
            "billing computed"
        );
        Ok(breakdown)
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
