use super::common::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::BillingConfig;
use crate::error::DomainError;
use crate::finance::billing::{BillingCalculator, DayHours};
use crate::finance::domain::AttendanceStatus;
use crate::planning::domain::{DayFlags, TrainingDay};
use crate::store::Repository;

#[test]
fn unexcused_absences_reduce_billable_days() {
    let fixture = Fixture::new();
    fixture.mark(date(2024, 1, 8), AttendanceStatus::UnexcusedAbsent);
    fixture.mark(date(2024, 1, 10), AttendanceStatus::UnexcusedAbsent);
    fixture.mark(date(2024, 1, 15), AttendanceStatus::ExcusedAbsent);
    fixture.mark(date(2024, 1, 17), AttendanceStatus::Present);

    let breakdown = fixture.billing(date(2024, 1, 1), date(2024, 1, 31));

    assert_eq!(breakdown.hourly_rate, dec!(7));
    assert_eq!(breakdown.scheduled_days, 10);
    assert_eq!(breakdown.unexcused_absences, 2);
    assert_eq!(breakdown.billable_days, 8);
    assert_eq!(breakdown.billable_hours, dec!(56));
    assert_eq!(breakdown.amount, dec!(392.00));
    assert_eq!(breakdown.amount.to_string(), "392.00");
}

#[test]
fn contract_without_negotiated_cost_bills_nothing() {
    let fixture = Fixture::with_terms(|terms| terms.negotiated_cost = None);
    fixture.mark(date(2024, 1, 8), AttendanceStatus::UnexcusedAbsent);

    let breakdown = fixture.billing(date(2024, 1, 1), date(2024, 1, 31));
    assert_eq!(breakdown.amount, Decimal::ZERO);
    assert_eq!(breakdown.amount.to_string(), "0.00");
    assert_eq!(breakdown.scheduled_days, 0);
}

#[test]
fn contract_without_training_hours_bills_nothing() {
    let fixture = Fixture::with_terms(|terms| terms.training_hours = None);

    let breakdown = fixture.billing(date(2024, 1, 1), date(2024, 1, 31));
    assert_eq!(breakdown.amount, Decimal::ZERO);
}

#[test]
fn contract_without_session_has_no_scheduled_days() {
    let fixture = Fixture::with_terms(|terms| terms.session_id = None);

    let breakdown = fixture.billing(date(2024, 1, 1), date(2024, 1, 31));
    assert_eq!(breakdown.scheduled_days, 0);
    assert_eq!(breakdown.amount, Decimal::ZERO);
}

#[test]
fn scheduled_days_respect_contract_dates_but_absences_do_not() {
    let fixture = Fixture::new();
    fixture.restart_on(date(2024, 1, 15));
    // Before the contract starts, still inside the billing period.
    fixture.mark(date(2024, 1, 8), AttendanceStatus::UnexcusedAbsent);

    let breakdown = fixture.billing(date(2024, 1, 1), date(2024, 1, 31));

    // 15, 17, 22, 24, 29 and 31 January.
    assert_eq!(breakdown.scheduled_days, 6);
    assert_eq!(breakdown.unexcused_absences, 1);
    assert_eq!(breakdown.billable_days, 5);
    assert_eq!(breakdown.amount, dec!(245.00));
}

#[test]
fn negative_results_are_not_floored() {
    let fixture = Fixture::new();
    fixture.restart_on(date(2024, 1, 15));
    fixture.mark(date(2024, 1, 8), AttendanceStatus::UnexcusedAbsent);
    fixture.mark(date(2024, 1, 10), AttendanceStatus::UnexcusedAbsent);

    let breakdown = fixture.billing(date(2024, 1, 1), date(2024, 1, 12));

    assert_eq!(breakdown.scheduled_days, 0);
    assert_eq!(breakdown.billable_days, -2);
    assert_eq!(breakdown.billable_hours, dec!(-14));
    assert_eq!(breakdown.amount, dec!(-98.00));
}

#[test]
fn absences_outside_the_period_are_ignored() {
    let fixture = Fixture::new();
    fixture.mark(date(2024, 1, 29), AttendanceStatus::UnexcusedAbsent);

    let breakdown = fixture.billing(date(2024, 1, 1), date(2024, 1, 15));

    // 1, 3, 8, 10 and 15 January.
    assert_eq!(breakdown.scheduled_days, 5);
    assert_eq!(breakdown.unexcused_absences, 0);
    assert_eq!(breakdown.amount, dec!(245.00));
}

#[test]
fn absences_on_regenerated_days_stop_counting() {
    let fixture = Fixture::new();
    fixture.mark(date(2024, 1, 8), AttendanceStatus::UnexcusedAbsent);
    fixture
        .planning
        .generate_calendar(
            &fixture.principal,
            fixture.session.id,
            &[0, 2],
            Some((date(2024, 1, 1), date(2024, 1, 31))),
        )
        .expect("calendar regenerated");

    let breakdown = fixture.billing(date(2024, 1, 1), date(2024, 1, 31));
    assert_eq!(breakdown.unexcused_absences, 0);
    assert_eq!(breakdown.amount, dec!(490.00));
}

#[test]
fn inverted_period_is_invalid() {
    let fixture = Fixture::new();

    let result = fixture.finance.billing(
        &fixture.principal,
        fixture.dossier_id,
        date(2024, 2, 1),
        date(2024, 1, 1),
    );
    assert!(matches!(result, Err(DomainError::InvalidInput(_))));
}

#[test]
fn rounding_is_half_up_at_the_last_step() {
    let fixture = Fixture::with_terms(|terms| {
        terms.negotiated_cost = Some(dec!(1));
        terms.training_hours = Some(8);
    });
    let calculator = BillingCalculator::new(&BillingConfig::with_hours_per_day(dec!(1)));
    let version = fixture.version();

    // One day at 0.125 per hour.
    let amount = fixture
        .store
        .read(|tables| calculator.amount(tables, &version, date(2024, 1, 1), date(2024, 1, 1)))
        .expect("amount computed");
    assert_eq!(amount, dec!(0.13));
}

#[test]
fn hourly_rate_is_not_rounded_before_multiplying() {
    let fixture = Fixture::with_terms(|terms| {
        terms.negotiated_cost = Some(dec!(1000));
        terms.training_hours = Some(3);
    });

    // 70 hours at 1000/3 per hour.
    let breakdown = fixture.billing(date(2024, 1, 1), date(2024, 1, 31));
    assert_eq!(breakdown.amount, dec!(23333.33));
}

#[test]
fn configured_hours_per_day_are_used() {
    let fixture = Fixture::new();
    let calculator = BillingCalculator::new(&BillingConfig::with_hours_per_day(dec!(3.5)));
    let version = fixture.version();

    let amount = fixture
        .store
        .read(|tables| calculator.amount(tables, &version, date(2024, 1, 1), date(2024, 1, 31)))
        .expect("amount computed");
    assert_eq!(amount, dec!(245.00));
}

#[derive(Debug)]
struct HalfDayHours;

impl DayHours for HalfDayHours {
    fn hours(&self, day: &TrainingDay) -> Decimal {
        let halves = u8::from(day.morning) + u8::from(day.afternoon);
        dec!(3.5) * Decimal::from(halves)
    }
}

#[test]
fn day_hours_policy_can_follow_half_day_flags() {
    let fixture = Fixture::new();
    fixture
        .planning
        .set_day_flags(
            &fixture.principal,
            fixture.day_on(date(2024, 1, 8)),
            DayFlags {
                morning: true,
                afternoon: false,
            },
        )
        .expect("flags updated");
    let calculator = BillingCalculator::with_day_hours(HalfDayHours);
    let version = fixture.version();

    let breakdown = fixture
        .store
        .read(|tables| calculator.breakdown(tables, &version, date(2024, 1, 1), date(2024, 1, 31)))
        .expect("breakdown computed");
    assert_eq!(breakdown.billable_hours, dec!(66.5));
    assert_eq!(breakdown.amount, dec!(465.50));
}
