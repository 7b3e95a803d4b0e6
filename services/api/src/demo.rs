use crate::infra::{parse_date, Services};
use cfa_admin::config::BillingConfig;
use cfa_admin::contracts::{AmendmentTerms, ContractTerms};
use cfa_admin::error::{AppError, DomainError};
use cfa_admin::finance::{AttendanceRequest, AttendanceStatus, BillingBreakdown};
use cfa_admin::planning::SessionDraft;
use cfa_admin::registry::{CandidateDraft, CandidateStatus, Civility, CompanyDraft};
use cfa_admin::store::Store;
use cfa_admin::tenancy::{Principal, UserId};
use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Billing period start (YYYY-MM-DD). Defaults to the first day of the session.
    #[arg(long, value_parser = parse_date)]
    pub(crate) period_start: Option<NaiveDate>,
    /// Billing period end (YYYY-MM-DD). Defaults to the end of the first month.
    #[arg(long, value_parser = parse_date)]
    pub(crate) period_end: Option<NaiveDate>,
    /// Hours credited per scheduled day (defaults to 7).
    #[arg(long)]
    pub(crate) hours_per_day: Option<Decimal>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let session_start = date(2024, 1, 1)?;
    let session_end = date(2024, 6, 28)?;
    let period_start = args.period_start.unwrap_or(session_start);
    let period_end = match args.period_end {
        Some(end) => end,
        None => date(2024, 1, 31)?,
    };
    let billing = args
        .hours_per_day
        .map(BillingConfig::with_hours_per_day)
        .unwrap_or_default();

    let services = Services::new(Store::new(), &billing);

    println!("Apprenticeship back office demo");
    let tenant = services
        .registry
        .register_tenant("CFA des Metiers de Bouche", "cfa-bouche")?;
    let principal = Principal::new(UserId(1), tenant.id, "admin");
    println!("- tenant {} ({})", tenant.name, tenant.slug);

    let candidate = services.registry.create_candidate(
        &principal,
        CandidateDraft {
            first_name: "Camille".to_string(),
            last_name: "Bernard".to_string(),
            email: Some("camille.bernard@example.org".to_string()),
            phone: None,
            civility: Some(Civility::Mme),
            status: Some(CandidateStatus::Placed),
        },
    )?;
    let company = services.registry.create_company(
        &principal,
        CompanyDraft {
            legal_name: "Boulangerie du Parc".to_string(),
            siret: Some("55210055400013".to_string()),
            address: None,
            idcc_code: Some("843".to_string()),
        },
    )?;
    println!(
        "- candidate {} {} placed at {}",
        candidate.first_name, candidate.last_name, company.legal_name
    );

    let session = services.planning.create_session(
        &principal,
        SessionDraft {
            name: "CAP Boulanger 2024".to_string(),
            start_date: session_start,
            end_date: session_end,
            qualification_id: Some("RNCP37384".to_string()),
        },
    )?;
    let created = services
        .planning
        .generate_calendar(&principal, session.id, &[0, 2], None)?;
    println!(
        "- session {} scheduled on Mondays and Wednesdays: {created} days",
        session.name
    );

    let view = services.contracts.create_dossier(
        &principal,
        candidate.id,
        company.id,
        ContractTerms {
            session_id: Some(session.id),
            salary: Decimal::new(98_000, 2),
            negotiated_cost: Some(Decimal::from(3500)),
            training_hours: Some(500),
            job_title: None,
            start_date: session_start,
            end_date: session_end,
        },
    )?;
    let amended = services.contracts.amend(
        &principal,
        view.dossier.id,
        AmendmentTerms {
            session_id: None,
            salary: Decimal::new(105_000, 2),
            negotiated_cost: None,
            training_hours: None,
            job_title: Some("Apprentie boulangere".to_string()),
            start_date: session_start,
            end_date: session_end,
        },
    )?;
    println!(
        "- dossier {} now at version {} (salary {})",
        view.dossier.id, amended.version_number, amended.salary
    );

    let days = services.planning.days(&principal, session.id)?;
    for day in days.iter().filter(|day| day.date >= period_start).take(2) {
        services.finance.record_attendance(
            &principal,
            AttendanceRequest {
                version_id: amended.id,
                day_id: day.id,
                status: AttendanceStatus::UnexcusedAbsent,
            },
        )?;
        println!("- unexcused absence on {}", day.date);
    }

    let breakdown =
        services
            .finance
            .billing(&principal, view.dossier.id, period_start, period_end)?;
    render_breakdown(period_start, period_end, &breakdown);

    let invoice = services.finance.generate_invoice(
        &principal,
        view.dossier.id,
        period_start,
        period_end,
        period_end,
    )?;
    println!(
        "- invoice {} drafted for {} ({:?})",
        invoice.number, invoice.amount, invoice.status
    );

    let dashboard = services.analytics.dashboard(&principal);
    println!(
        "Dashboard: forecast {} | realized {} | placement rate {}%",
        dashboard.forecast_revenue, dashboard.realized_revenue, dashboard.placement_rate
    );

    let bpf = services.analytics.bpf_preview(&principal);
    println!(
        "BPF preview: {} men, {} women, {} other | {} hours attended",
        bpf.civility.men, bpf.civility.women, bpf.civility.other, bpf.realized_hours
    );
    for (qualification, contracts) in &bpf.qualifications {
        println!("  {qualification}: {contracts} active contract(s)");
    }
    Ok(())
}

fn render_breakdown(start: NaiveDate, end: NaiveDate, breakdown: &BillingBreakdown) {
    println!("\nBilling {start} -> {end}");
    println!("  hourly rate        {}", breakdown.hourly_rate.round_dp(4));
    println!("  scheduled days     {}", breakdown.scheduled_days);
    println!("  unexcused absences {}", breakdown.unexcused_absences);
    println!("  billable days      {}", breakdown.billable_days);
    println!("  billable hours     {}", breakdown.billable_hours);
    println!("  amount             {}\n", breakdown.amount);
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate, DomainError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DomainError::invalid(format!("invalid date {year}-{month}-{day}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_runs_with_defaults() {
        run_demo(DemoArgs::default()).expect("demo completes");
    }

    #[test]
    fn demo_rejects_inverted_period() {
        let args = DemoArgs {
            period_start: Some(NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")),
            period_end: Some(NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date")),
            hours_per_day: None,
        };
        assert!(matches!(
            run_demo(args),
            Err(AppError::Domain(DomainError::InvalidInput(_)))
        ));
    }
}
