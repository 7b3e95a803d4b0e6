use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use super::attendance;
use super::billing::{BillingCalculator, DayHours, FlatDayHours};
use super::domain::{
    Attendance, AttendanceRequest, BillingBreakdown, Invoice, InvoiceId, InvoiceStatus,
};
use super::invoices::{self, InvoiceNumbering, SequentialNumbering};
use crate::config::BillingConfig;
use crate::contracts::chain;
use crate::contracts::domain::DossierId;
use crate::error::DomainError;
use crate::store::{Page, Repository, Store};
use crate::tenancy::Principal;

/// Attendance ledger, billing and invoices for the acting tenant.
#[derive(Debug)]
pub struct FinanceService<R = Store, H = FlatDayHours, N = SequentialNumbering> {
    store: R,
    calculator: BillingCalculator<H>,
    numbering: Arc<N>,
}

impl<R> FinanceService<R>
where
    R: Repository,
{
    pub fn new(store: R, config: &BillingConfig) -> Self {
        Self::with_parts(
            store,
            BillingCalculator::new(config),
            Arc::new(SequentialNumbering),
        )
    }
}

impl<R, H, N> FinanceService<R, H, N>
where
    R: Repository,
    H: DayHours,
    N: InvoiceNumbering,
{
    pub fn with_parts(store: R, calculator: BillingCalculator<H>, numbering: Arc<N>) -> Self {
        Self {
            store,
            calculator,
            numbering,
        }
    }

    pub fn record_attendance(
        &self,
        principal: &Principal,
        request: AttendanceRequest,
    ) -> Result<Attendance, DomainError> {
        let row = self.store.transaction(|uow| {
            attendance::record_attendance(
                uow,
                principal.tenant_id,
                request.version_id,
                request.day_id,
                request.status,
            )
        })?;

        info!(
            tenant_id = %principal.tenant_id,
            version_id = %row.version_id,
            day_id = %row.day_id,
            status = ?row.status,
            "attendance recorded"
        );
        Ok(row)
    }

    /// Billing figures of the dossier's active version. Nothing is persisted.
    pub fn billing(
        &self,
        principal: &Principal,
        dossier_id: DossierId,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<BillingBreakdown, DomainError> {
        self.store.read(|tables| {
            let version = chain::active_version(tables, principal.tenant_id, dossier_id)?;
            self.calculator
                .breakdown(tables, &version, period_start, period_end)
        })
    }

    pub fn generate_invoice(
        &self,
        principal: &Principal,
        dossier_id: DossierId,
        period_start: NaiveDate,
        period_end: NaiveDate,
        issued_on: NaiveDate,
    ) -> Result<Invoice, DomainError> {
        let invoice = self.store.transaction(|uow| {
            invoices::generate_invoice(
                uow,
                principal.tenant_id,
                &self.calculator,
                self.numbering.as_ref(),
                dossier_id,
                period_start,
                period_end,
                issued_on,
            )
        })?;

        info!(
            tenant_id = %principal.tenant_id,
            user_id = %principal.user_id,
            dossier_id = %dossier_id,
            invoice = %invoice.number,
            amount = %invoice.amount,
            "invoice generated"
        );
        Ok(invoice)
    }

    pub fn invoice(
        &self,
        principal: &Principal,
        invoice_id: InvoiceId,
    ) -> Result<Invoice, DomainError> {
        self.store
            .read(|tables| tables.invoices.get(principal.tenant_id, invoice_id).cloned())
    }

    pub fn invoices(
        &self,
        principal: &Principal,
        dossier_id: Option<DossierId>,
        page: Page,
    ) -> Vec<Invoice> {
        self.store.read(|tables| {
            invoices::list_invoices(tables, principal.tenant_id, dossier_id, page)
        })
    }

    pub fn update_invoice_status(
        &self,
        principal: &Principal,
        invoice_id: InvoiceId,
        status: InvoiceStatus,
    ) -> Result<Invoice, DomainError> {
        let invoice = self.store.transaction(|uow| {
            invoices::update_invoice_status(uow, principal.tenant_id, invoice_id, status)
        })?;

        info!(
            tenant_id = %principal.tenant_id,
            invoice_id = %invoice_id,
            status = ?status,
            "invoice status updated"
        );
        Ok(invoice)
    }
}
