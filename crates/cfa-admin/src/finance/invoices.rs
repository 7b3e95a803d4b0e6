use std::fmt;

use chrono::{Datelike, NaiveDate};

use super::billing::{BillingCalculator, DayHours};
use super::domain::{Invoice, InvoiceId, InvoiceStatus};
use crate::contracts::chain;
use crate::contracts::domain::DossierId;
use crate::error::DomainError;
use crate::store::{Page, Tables, UnitOfWork};
use crate::tenancy::TenantId;

/// Produces the number printed on a new invoice. Numbers must be unique per tenant.
pub trait InvoiceNumbering: fmt::Debug + Send + Sync {
    fn next_number(
        &self,
        tables: &Tables,
        tenant: TenantId,
        dossier_id: DossierId,
        issued_on: NaiveDate,
    ) -> String;
}

/// `F{year}-{dossier}-{month}-{sequence}` where the sequence counts the tenant's invoices.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialNumbering;

impl InvoiceNumbering for SequentialNumbering {
    fn next_number(
        &self,
        tables: &Tables,
        tenant: TenantId,
        dossier_id: DossierId,
        issued_on: NaiveDate,
    ) -> String {
        let sequence = tables.invoices.len(tenant) + 1;
        format!(
            "F{}-{}-{}-{:04}",
            issued_on.year(),
            dossier_id,
            issued_on.month(),
            sequence
        )
    }
}

/// Bill the dossier's active version over the period and persist the result as a draft.
///
/// Billing the same period twice creates a second invoice; existing invoices are never
/// recomputed.
#[allow(clippy::too_many_arguments)]
pub fn generate_invoice<H: DayHours>(
    uow: &mut UnitOfWork,
    tenant: TenantId,
    calculator: &BillingCalculator<H>,
    numbering: &dyn InvoiceNumbering,
    dossier_id: DossierId,
    period_start: NaiveDate,
    period_end: NaiveDate,
    issued_on: NaiveDate,
) -> Result<Invoice, DomainError> {
    let version = chain::active_version(uow, tenant, dossier_id)?;
    let amount = calculator.amount(uow, &version, period_start, period_end)?;

    let number = numbering.next_number(uow, tenant, dossier_id, issued_on);
    if uow
        .invoices
        .scan(tenant)
        .any(|invoice| invoice.number == number)
    {
        return Err(DomainError::conflict(format!(
            "invoice number {number} already used"
        )));
    }

    Ok(uow.invoices.insert_with(|id| Invoice {
        id,
        tenant_id: tenant,
        dossier_id,
        number,
        amount,
        status: InvoiceStatus::Draft,
        issued_on,
        period_start,
        period_end,
    }))
}

/// Move an invoice forward. Only draft to issued and issued to paid are allowed.
pub fn update_invoice_status(
    uow: &mut UnitOfWork,
    tenant: TenantId,
    invoice_id: InvoiceId,
    next: InvoiceStatus,
) -> Result<Invoice, DomainError> {
    let invoice = uow.invoices.get_mut(tenant, invoice_id)?;
    if !invoice.status.can_transition_to(next) {
        return Err(DomainError::conflict(format!(
            "invoice {invoice_id} cannot move from {:?} to {next:?}",
            invoice.status
        )));
    }
    invoice.status = next;
    Ok(invoice.clone())
}

pub fn list_invoices(
    tables: &Tables,
    tenant: TenantId,
    dossier_id: Option<DossierId>,
    page: Page,
) -> Vec<Invoice> {
    page.collect(
        tables
            .invoices
            .scan(tenant)
            .filter(|invoice| dossier_id.map_or(true, |id| invoice.dossier_id == id))
            .cloned(),
    )
}
